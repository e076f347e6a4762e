//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のカタログ fixture を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use serde_json::{
    Value,
    json,
};

use crate::catalog::{
    Catalog,
    Localization,
};

/// ソース言語 `en` のカタログを `strings` の JSON から作成する
pub(crate) fn catalog_from(strings: Value) -> Catalog {
    serde_json::from_value(json!({
        "sourceLanguage": "en",
        "strings": strings,
        "version": "1.0"
    }))
    .unwrap()
}

/// JSON から Localization を作成する
pub(crate) fn localization(value: Value) -> Localization {
    serde_json::from_value(value).unwrap()
}

/// 指定したキー・言語の Localization を JSON として取り出す
pub(crate) fn localization_json(catalog: &Catalog, key: &str, language: &str) -> Option<Value> {
    catalog
        .entry(key)?
        .localization(language)
        .map(|localization| serde_json::to_value(localization).unwrap())
}

/// 各パターンを含むサンプルカタログ
///
/// | key        | en         | fr                    | de      |
/// |------------|------------|-----------------------|---------|
/// | `greeting` | flat       | translated            | -       |
/// | `farewell` | flat       | `needs_review`        | missing |
/// | `items`    | plural     | plural (`one` only)   | -       |
/// | `Done`     | -          | -                     | -       |
pub(crate) fn sample_catalog() -> Catalog {
    catalog_from(json!({
        "greeting": {
            "comment": "Home screen title",
            "localizations": {
                "en": { "stringUnit": { "state": "translated", "value": "Hello" } },
                "fr": { "stringUnit": { "state": "translated", "value": "Bonjour" } }
            }
        },
        "farewell": {
            "localizations": {
                "en": { "stringUnit": { "state": "translated", "value": "Goodbye" } },
                "fr": { "stringUnit": { "state": "needs_review", "value": "Au revoir" } },
                "de": { "stringUnit": { "state": "missing", "value": "" } }
            }
        },
        "items": {
            "localizations": {
                "en": { "variations": { "plural": {
                    "one": { "stringUnit": { "state": "translated", "value": "%lld item" } },
                    "other": { "stringUnit": { "state": "translated", "value": "%lld items" } }
                } } },
                "fr": { "variations": { "plural": {
                    "one": { "stringUnit": { "state": "translated", "value": "%lld article" } }
                } } }
            }
        },
        "Done": {
            "extractionState": "manual",
            "shouldTranslate": false,
            "localizations": {}
        }
    }))
}
