//! 終端の文字列値（`stringUnit`）と翻訳状態

use std::fmt;

use serde::ser::SerializeMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

use super::layout::{
    self,
    Fields,
    KeyOrder,
    KnownFields,
};

/// 翻訳状態タグ
///
/// 既知の値以外（`stale` など）も `Other` として保持し、書き出し時にそのまま戻す。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TranslationState {
    /// `new`
    New,
    /// `needs_review`
    NeedsReview,
    /// `translated`
    Translated,
    /// `missing`
    Missing,
    /// Any state tag this crate does not interpret.
    Other(String),
}

impl TranslationState {
    /// 状態タグの文字列表現
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::NeedsReview => "needs_review",
            Self::Translated => "translated",
            Self::Missing => "missing",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for TranslationState {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "new" => Self::New,
            "needs_review" => Self::NeedsReview,
            "translated" => Self::Translated,
            "missing" => Self::Missing,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for TranslationState {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<TranslationState> for String {
    fn from(state: TranslationState) -> Self {
        match state {
            TranslationState::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1 言語分の終端値
///
/// 入力では `state` が省略されることがある（ソース言語のツリーなど）。
/// 省略された `state` は書き出し時も省略する。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringUnit {
    /// 翻訳状態
    pub state: Option<TranslationState>,
    /// 文字列値
    pub value: String,
    /// 未知のフィールド
    extra: Fields,
    /// 読み込み時のキー順
    layout: KeyOrder,
}

impl<'de> Deserialize<'de> for StringUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        layout::deserialize_object(deserializer, |fields| {
            let layout = KeyOrder::of(fields);
            Ok(Self {
                state: layout::take(fields, "state")?,
                value: layout::take(fields, "value")?.unwrap_or_default(),
                extra: std::mem::take(fields),
                layout,
            })
        })
    }
}

impl KnownFields for StringUnit {
    const FIELDS: &'static [&'static str] = &["state", "value"];

    fn layout(&self) -> &KeyOrder {
        &self.layout
    }

    fn extra(&self) -> &Fields {
        &self.extra
    }

    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match key {
            "state" => layout::serialize_some(map, key, self.state.as_ref()),
            // 読み込み時になかった空の値は書かない
            "value" if self.value.is_empty() && !self.layout.contains(key) => Ok(()),
            "value" => map.serialize_entry(key, &self.value),
            _ => Ok(()),
        }
    }
}

impl Serialize for StringUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        layout::serialize_object(self, serializer)
    }
}

impl StringUnit {
    /// 状態と値から作る
    #[must_use]
    pub fn new(state: Option<TranslationState>, value: impl Into<String>) -> Self {
        Self { state, value: value.into(), ..Self::default() }
    }

    /// `translated` 状態の値を作る
    #[must_use]
    pub fn translated(value: impl Into<String>) -> Self {
        Self::new(Some(TranslationState::Translated), value)
    }

    /// Value is empty or absent.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.value.is_empty()
    }

    /// `state` が `missing` であるか
    #[must_use]
    pub fn is_marked_missing(&self) -> bool {
        self.state == Some(TranslationState::Missing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("new", TranslationState::New)]
    #[case("needs_review", TranslationState::NeedsReview)]
    #[case("translated", TranslationState::Translated)]
    #[case("missing", TranslationState::Missing)]
    #[case("stale", TranslationState::Other("stale".to_string()))]
    fn test_state_from_tag(#[case] tag: &str, #[case] expected: TranslationState) {
        assert_eq!(TranslationState::from(tag), expected);
        assert_that!(String::from(expected), eq(tag));
    }

    #[googletest::test]
    fn test_unit_without_state_keeps_state_absent() {
        let unit: StringUnit = serde_json::from_value(json!({ "value": "item" })).unwrap();

        expect_that!(unit.value, eq("item"));
        assert!(unit.state.is_none());
        assert_eq!(serde_json::to_value(&unit).unwrap(), json!({ "value": "item" }));
    }

    #[rstest]
    fn test_unknown_state_round_trips() {
        let raw = json!({ "state": "stale", "value": "Old" });

        let unit: StringUnit = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(unit.state, Some(TranslationState::Other("stale".to_string())));
        assert_eq!(serde_json::to_value(&unit).unwrap(), raw);
    }

    #[rstest]
    #[case::value_first(r#"{"value":"Hello","state":"translated"}"#)]
    #[case::unknown_field_between(r#"{"state":"new","origin":"import","value":"Hi"}"#)]
    #[case::empty_value_kept(r#"{"state":"new","value":""}"#)]
    fn test_unit_keeps_key_order(#[case] raw: &str) {
        let unit: StringUnit = serde_json::from_str(raw).unwrap();

        assert_that!(serde_json::to_string(&unit).unwrap(), eq(raw));
    }

    #[rstest]
    fn test_new_unit_writes_state_then_value() {
        let unit = StringUnit::translated("Bonjour");

        assert_that!(
            serde_json::to_string(&unit).unwrap(),
            eq(r#"{"state":"translated","value":"Bonjour"}"#)
        );
    }
}
