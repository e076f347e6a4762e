//! 翻訳テーブルの行データ
//!
//! 表示層に依存しない形で、エントリごとのメイン行とバリエーション行を組み立てる。

use crate::catalog::{
    Catalog,
    Entry,
    TranslationState,
};
use crate::completeness::has_variations;
use crate::flatten::{
    VariationRow,
    flatten,
};

/// "don't translate" バッジ
pub const DONT_TRANSLATE_BADGE: &str = "don't translate";

/// エントリのメイン行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub key: String,
    /// ソース言語の値。バリエーションを持つエントリでは空
    pub source_value: String,
    /// 対象言語の値
    pub target_value: Option<String>,
    /// 状態バッジ。バリエーションを持つエントリでは `None`
    pub target_state: Option<TranslationState>,
    pub comment: Option<String>,
    /// "don't translate" と `extractionState`
    pub badges: Vec<String>,
}

impl EntryRow {
    /// 対象言語の値が欠けているか
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.target_state == Some(TranslationState::Missing)
    }
}

/// メイン行とその下に並ぶバリエーション行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub main: EntryRow,
    pub variations: Vec<VariationRow>,
}

impl TableEntry {
    /// メイン行またはいずれかのバリエーション行が欠けているか
    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.main.is_missing() || self.variations.iter().any(VariationRow::is_missing)
    }
}

/// カタログ順にテーブルを組み立てる
///
/// `missing_only` の場合は欠けている行だけを残す。翻訳対象外のエントリは除外する。
#[must_use]
pub fn table(catalog: &Catalog, target_language: &str, missing_only: bool) -> Vec<TableEntry> {
    catalog
        .strings
        .iter()
        .filter(|(_, entry)| !(missing_only && entry.is_excluded_from_translation()))
        .map(|(key, entry)| table_entry(key, entry, &catalog.source_language, target_language))
        .filter_map(|mut row| {
            if !missing_only {
                return Some(row);
            }
            if !row.has_missing() {
                return None;
            }
            row.variations.retain(VariationRow::is_missing);
            Some(row)
        })
        .collect()
}

/// Main row plus variation rows for one entry. Variation entries leave the
/// main row's values empty.
fn table_entry(key: &str, entry: &Entry, source_language: &str, target_language: &str) -> TableEntry {
    let source = entry.localization(source_language);
    let target = entry.localization(target_language);

    let mut main = EntryRow {
        key: key.to_string(),
        source_value: String::new(),
        target_value: None,
        target_state: None,
        comment: entry.comment.clone(),
        badges: badges(entry),
    };

    if has_variations(source, target) {
        return TableEntry { main, variations: flatten(source, target) };
    }

    let source_unit = source.and_then(|localization| localization.string_unit());
    let target_unit = target.and_then(|localization| localization.string_unit());
    main.source_value = source_unit.map_or_else(|| key.to_string(), |unit| unit.value.clone());
    main.target_value = target_unit.map(|unit| unit.value.clone());
    main.target_state = Some(
        target_unit.and_then(|unit| unit.state.clone()).unwrap_or(TranslationState::Missing),
    );

    TableEntry { main, variations: Vec::new() }
}

/// Don't-translate first, then the extraction state
fn badges(entry: &Entry) -> Vec<String> {
    let mut badges = Vec::new();
    if entry.is_excluded_from_translation() {
        badges.push(DONT_TRANSLATE_BADGE.to_string());
    }
    if let Some(extraction_state) = &entry.extraction_state {
        badges.push(extraction_state.clone());
    }
    badges
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        catalog_from,
        sample_catalog,
    };

    fn keys(rows: &[TableEntry]) -> Vec<&str> {
        rows.iter().map(|row| row.main.key.as_str()).collect()
    }

    #[rstest]
    fn test_flat_rows() {
        let rows = table(&sample_catalog(), "fr", false);

        assert_eq!(keys(&rows), ["greeting", "farewell", "items", "Done"]);
        assert_eq!(
            rows[0].main,
            EntryRow {
                key: "greeting".to_string(),
                source_value: "Hello".to_string(),
                target_value: Some("Bonjour".to_string()),
                target_state: Some(TranslationState::Translated),
                comment: Some("Home screen title".to_string()),
                badges: Vec::new(),
            }
        );
        assert_eq!(rows[1].main.target_state, Some(TranslationState::NeedsReview));
    }

    #[rstest]
    fn test_absent_target_defaults_to_missing() {
        let rows = table(&sample_catalog(), "ja", false);

        assert_eq!(rows[0].main.target_value, None);
        assert_eq!(rows[0].main.target_state, Some(TranslationState::Missing));
    }

    #[rstest]
    fn test_variation_entry_has_no_main_state() {
        let rows = table(&sample_catalog(), "fr", false);
        let items = &rows[2];

        assert_eq!(items.main.source_value, "");
        assert_eq!(items.main.target_state, None);
        let paths: Vec<String> = items.variations.iter().map(|row| row.path.to_string()).collect();
        assert_eq!(paths, ["plural:one", "plural:other"]);
    }

    #[googletest::test]
    fn test_source_value_falls_back_to_key() {
        let rows = table(&sample_catalog(), "fr", false);
        let done = &rows[3];

        expect_that!(done.main.source_value, eq("Done"));
        expect_that!(done.main.badges.len(), eq(2));
        assert_eq!(done.main.badges, [DONT_TRANSLATE_BADGE, "manual"]);
    }

    #[rstest]
    fn test_missing_only_keeps_missing_rows() {
        let rows = table(&sample_catalog(), "fr", true);

        assert_eq!(keys(&rows), ["items"]);
        let paths: Vec<String> = rows[0].variations.iter().map(|row| row.path.to_string()).collect();
        assert_eq!(paths, ["plural:other"]);
    }

    #[rstest]
    fn test_missing_only_for_new_language() {
        let rows = table(&sample_catalog(), "de", true);

        assert_eq!(keys(&rows), ["greeting", "farewell", "items"]);
        assert_eq!(rows[1].main.target_state, Some(TranslationState::Missing));
    }

    #[rstest]
    fn test_missing_only_drops_complete_nested_entry() {
        let catalog = catalog_from(json!({
            "photos": { "localizations": {
                "en": { "variations": { "device": { "iphone": { "variations": { "plural": {
                    "other": { "stringUnit": { "value": "%d photos" } }
                } } } } } },
                "de": { "variations": { "device": { "iphone": { "variations": { "plural": {
                    "other": { "stringUnit": { "state": "translated", "value": "%d Fotos" } }
                } } } } } }
            } }
        }));

        assert!(table(&catalog, "de", true).is_empty());
        assert_eq!(table(&catalog, "de", false)[0].variations.len(), 2);
    }
}
