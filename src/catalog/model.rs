//! String catalog document model.
//!
//! Every object keeps the key order it was read with (see
//! [`super::layout`]). Fields this crate does not interpret are kept in
//! `extra` and written back in place.

use std::sync::Arc;

use indexmap::{
    IndexMap,
    IndexSet,
};
use serde::ser::SerializeMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use serde_json::Value;

use super::layout::{
    self,
    Fields,
    KeyOrder,
    KnownFields,
};
use super::unit::StringUnit;
use super::variation::VariationsMap;

/// A whole `.xcstrings` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Language of record
    pub source_language: String,
    /// Entries in file order. Shared so that a patched copy only duplicates
    /// the entry it touched.
    pub strings: IndexMap<String, Arc<Entry>>,
    /// Format marker (`"1.0"`)
    pub version: String,
    /// Unknown top-level fields
    pub extra: IndexMap<String, Value>,
    /// Key order read from the file
    layout: KeyOrder,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        layout::deserialize_object(deserializer, |fields| {
            let layout = KeyOrder::of(fields);
            Ok(Self {
                source_language: layout::require(fields, "sourceLanguage")?,
                strings: layout::require(fields, "strings")?,
                version: layout::require(fields, "version")?,
                extra: std::mem::take(fields),
                layout,
            })
        })
    }
}

impl KnownFields for Catalog {
    const FIELDS: &'static [&'static str] = &["sourceLanguage", "strings", "version"];

    fn layout(&self) -> &KeyOrder {
        &self.layout
    }

    fn extra(&self) -> &Fields {
        &self.extra
    }

    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match key {
            "sourceLanguage" => map.serialize_entry(key, &self.source_language),
            "strings" => map.serialize_entry(key, &self.strings),
            "version" => map.serialize_entry(key, &self.version),
            _ => Ok(()),
        }
    }
}

impl Serialize for Catalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        layout::serialize_object(self, serializer)
    }
}

impl Catalog {
    /// Empty catalog for `source_language`.
    #[must_use]
    pub fn new(source_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            strings: IndexMap::new(),
            version: "1.0".to_string(),
            extra: IndexMap::new(),
            layout: KeyOrder::default(),
        }
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.strings.get(key).map(Arc::as_ref)
    }

    /// Every language code used by any entry, in first-seen order.
    #[must_use]
    pub fn available_languages(&self) -> Vec<&str> {
        let languages: IndexSet<&str> = self
            .strings
            .values()
            .flat_map(|entry| entry.localizations.keys())
            .map(String::as_str)
            .collect();
        languages.into_iter().collect()
    }

    /// Keys of entries that have localizations but none for the source language.
    #[must_use]
    pub fn entries_missing_source(&self) -> Vec<&str> {
        self.strings
            .iter()
            .filter(|(_, entry)| {
                !entry.localizations.is_empty()
                    && !entry.localizations.contains_key(&self.source_language)
            })
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// One translatable unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Developer comment, display-only
    pub comment: Option<String>,
    /// Extraction status tag, display-only
    pub extraction_state: Option<String>,
    /// Language code → localization
    pub localizations: IndexMap<String, Localization>,
    /// `false` marks the entry as "don't translate"
    pub should_translate: Option<bool>,
    /// Unknown entry fields
    pub extra: IndexMap<String, Value>,
    /// Key order read from the file
    layout: KeyOrder,
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        layout::deserialize_object(deserializer, |fields| {
            let layout = KeyOrder::of(fields);
            Ok(Self {
                comment: layout::take(fields, "comment")?,
                extraction_state: layout::take(fields, "extractionState")?,
                localizations: layout::take(fields, "localizations")?.unwrap_or_default(),
                should_translate: layout::take(fields, "shouldTranslate")?,
                extra: std::mem::take(fields),
                layout,
            })
        })
    }
}

impl KnownFields for Entry {
    const FIELDS: &'static [&'static str] =
        &["comment", "extractionState", "localizations", "shouldTranslate"];

    fn layout(&self) -> &KeyOrder {
        &self.layout
    }

    fn extra(&self) -> &Fields {
        &self.extra
    }

    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match key {
            "comment" => layout::serialize_some(map, key, self.comment.as_ref()),
            "extractionState" => layout::serialize_some(map, key, self.extraction_state.as_ref()),
            // 読み込み時にあった `localizations` は空になっても書く
            "localizations" if self.localizations.is_empty() && !self.layout.contains(key) => Ok(()),
            "localizations" => map.serialize_entry(key, &self.localizations),
            "shouldTranslate" => layout::serialize_some(map, key, self.should_translate.as_ref()),
            _ => Ok(()),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        layout::serialize_object(self, serializer)
    }
}

impl Entry {
    #[must_use]
    pub fn localization(&self, language: &str) -> Option<&Localization> {
        self.localizations.get(language)
    }

    /// Explicitly flagged "don't translate".
    #[must_use]
    pub fn is_excluded_from_translation(&self) -> bool {
        self.should_translate == Some(false)
    }
}

/// One (entry, language) pair: a flat unit or a variation tree.
///
/// The setters keep the two forms mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Localization {
    /// Flat form
    string_unit: Option<StringUnit>,
    /// Format-specifier substitutions, preserved as-is
    substitutions: Option<Value>,
    /// Tree form
    variations: Option<VariationsMap>,
    /// Unknown localization fields
    extra: Fields,
    /// Key order read from the file
    layout: KeyOrder,
}

impl<'de> Deserialize<'de> for Localization {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        layout::deserialize_object(deserializer, |fields| {
            let layout = KeyOrder::of(fields);
            Ok(Self {
                string_unit: layout::take(fields, "stringUnit")?,
                substitutions: layout::take(fields, "substitutions")?,
                variations: layout::take(fields, "variations")?,
                extra: std::mem::take(fields),
                layout,
            })
        })
    }
}

impl KnownFields for Localization {
    const FIELDS: &'static [&'static str] = &["stringUnit", "substitutions", "variations"];

    fn layout(&self) -> &KeyOrder {
        &self.layout
    }

    fn extra(&self) -> &Fields {
        &self.extra
    }

    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match key {
            "stringUnit" => layout::serialize_some(map, key, self.string_unit.as_ref()),
            "substitutions" => layout::serialize_some(map, key, self.substitutions.as_ref()),
            "variations" => layout::serialize_some(map, key, self.variations.as_ref()),
            _ => Ok(()),
        }
    }
}

impl Serialize for Localization {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        layout::serialize_object(self, serializer)
    }
}

impl Localization {
    /// Flat localization holding `unit`.
    #[must_use]
    pub fn flat(unit: StringUnit) -> Self {
        Self { string_unit: Some(unit), ..Self::default() }
    }

    /// Tree localization holding `variations`.
    #[must_use]
    pub fn tree(variations: VariationsMap) -> Self {
        Self { variations: Some(variations), ..Self::default() }
    }

    #[must_use]
    pub const fn string_unit(&self) -> Option<&StringUnit> {
        self.string_unit.as_ref()
    }

    #[must_use]
    pub const fn variations(&self) -> Option<&VariationsMap> {
        self.variations.as_ref()
    }

    #[must_use]
    pub const fn substitutions(&self) -> Option<&Value> {
        self.substitutions.as_ref()
    }

    /// Has a variations map with at least one key.
    #[must_use]
    pub fn has_variations(&self) -> bool {
        self.variations.as_ref().is_some_and(VariationsMap::has_entries)
    }

    /// Stores a flat unit and drops any variation tree.
    pub fn set_string_unit(&mut self, unit: StringUnit) {
        self.variations = None;
        self.string_unit = Some(unit);
    }

    /// Removes the flat unit, returning it.
    pub const fn clear_string_unit(&mut self) -> Option<StringUnit> {
        self.string_unit.take()
    }

    /// Variations map for editing, created if absent. Drops the flat unit.
    pub fn variations_mut(&mut self) -> &mut VariationsMap {
        self.string_unit = None;
        self.variations.get_or_insert_with(VariationsMap::default)
    }

    /// Existing variations map for removals; leaves the flat unit alone.
    pub(crate) const fn existing_variations_mut(&mut self) -> Option<&mut VariationsMap> {
        self.variations.as_mut()
    }

    /// Drops `variations` when it holds no type at all.
    pub(crate) fn drop_empty_variations(&mut self) {
        if self.variations.as_ref().is_some_and(VariationsMap::is_empty) {
            self.variations = None;
        }
    }

    /// Serializes to `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.string_unit.is_none()
            && self.substitutions.is_none()
            && self.variations.is_none()
            && self.extra.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::sample_catalog;

    #[googletest::test]
    fn test_setters_keep_forms_exclusive() {
        let mut localization = Localization::flat(StringUnit::translated("Hello"));

        localization.variations_mut();
        assert!(localization.string_unit().is_none());
        assert!(localization.variations().is_some());

        localization.set_string_unit(StringUnit::translated("Bonjour"));
        assert!(localization.variations().is_none());
        assert_eq!(localization.string_unit().map(|u| u.value.as_str()), Some("Bonjour"));
    }

    #[googletest::test]
    fn test_is_empty_counts_preserved_fields() {
        let with_extra: Localization =
            serde_json::from_value(json!({ "comment": "kept" })).unwrap();

        expect_that!(Localization::default().is_empty(), eq(true));
        expect_that!(with_extra.is_empty(), eq(false));
    }

    #[googletest::test]
    fn test_available_languages_in_first_seen_order() {
        let catalog = sample_catalog();

        assert_eq!(catalog.available_languages(), ["en", "fr", "de"]);
    }

    #[googletest::test]
    fn test_entries_missing_source() {
        let catalog: Catalog = serde_json::from_value(json!({
            "sourceLanguage": "en",
            "strings": {
                "ok": { "localizations": { "en": { "stringUnit": { "state": "translated", "value": "OK" } } } },
                "orphan": { "localizations": { "fr": { "stringUnit": { "state": "translated", "value": "Seul" } } } },
                "bare": {}
            },
            "version": "1.0"
        }))
        .unwrap();

        assert_eq!(catalog.entries_missing_source(), ["orphan"]);
    }

    #[rstest]
    #[case::localizations_before_comment(
        r#"{"localizations":{},"comment":"c"}"#
    )]
    #[case::xcode_order_with_unknown_field(
        r#"{"comment":"c","isCommentAutoGenerated":true,"localizations":{},"shouldTranslate":false}"#
    )]
    #[case::unknown_field_first(
        r#"{"isCommentAutoGenerated":true,"extractionState":"manual","localizations":{"en":{"variations":{},"stringUnit":{"value":"x","state":"new"}}}}"#
    )]
    #[case::no_localizations(r#"{"extractionState":"stale"}"#)]
    fn test_entry_keeps_key_order(#[case] raw: &str) {
        let entry: Entry = serde_json::from_str(raw).unwrap();

        assert_that!(serde_json::to_string(&entry).unwrap(), eq(raw));
    }

    #[googletest::test]
    fn test_new_fields_are_written_last() {
        let mut entry: Entry =
            serde_json::from_str(r#"{"localizations":{},"isCommentAutoGenerated":true}"#).unwrap();

        entry.should_translate = Some(false);
        entry.comment = Some("c".to_string());

        assert_that!(
            serde_json::to_string(&entry).unwrap(),
            eq(r#"{"localizations":{},"isCommentAutoGenerated":true,"comment":"c","shouldTranslate":false}"#)
        );
    }

    #[googletest::test]
    fn test_catalog_requires_version() {
        let result = serde_json::from_value::<Catalog>(json!({ "sourceLanguage": "en", "strings": {} }));

        assert_that!(result.unwrap_err().to_string(), contains_substring("missing field `version`"));
    }

    #[googletest::test]
    fn test_unknown_fields_round_trip() {
        let raw = json!({
            "sourceLanguage": "en",
            "strings": {
                "title": {
                    "extractionState": "manual",
                    "isCommentAutoGenerated": true,
                    "localizations": {
                        "en": { "stringUnit": { "state": "translated", "value": "Title" } }
                    }
                }
            },
            "version": "1.0"
        });

        let catalog: Catalog = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&catalog).unwrap(), raw);
    }
}
