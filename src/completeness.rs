//! Missing-translation classification.
//!
//! Nothing here is cached: every query re-derives the answer from the
//! current catalog, so results never go stale after a patch.

use crate::catalog::{
    Catalog,
    Entry,
    Localization,
    StringUnit,
};

/// Either side carries a variation type with at least one key.
#[must_use]
pub fn has_variations(source: Option<&Localization>, target: Option<&Localization>) -> bool {
    source.is_some_and(Localization::has_variations) || target.is_some_and(Localization::has_variations)
}

/// Whether `entry` still needs a translation into `target_language`.
///
/// - Variation entries: missing when the target has no variation tree, or any
///   leaf anywhere in it lacks a value.
/// - Flat entries: missing when the target unit is absent, marked `missing`,
///   or empty.
#[must_use]
pub fn is_missing(entry: &Entry, source_language: &str, target_language: &str) -> bool {
    let source = entry.localization(source_language);
    let target = entry.localization(target_language);

    if has_variations(source, target) {
        return match target.and_then(Localization::variations) {
            Some(variations) if variations.has_entries() => {
                !variations.all_leaves(|unit| unit.is_some_and(|unit| !unit.is_blank()))
            }
            _ => true,
        };
    }

    target.and_then(Localization::string_unit).is_none_or(|unit: &StringUnit| {
        unit.is_marked_missing() || unit.is_blank()
    })
}

/// Keys still needing a translation into `target_language`, in catalog order.
///
/// Entries flagged "don't translate" are skipped.
#[must_use]
pub fn missing_keys<'a>(catalog: &'a Catalog, target_language: &str) -> Vec<&'a str> {
    let keys: Vec<&str> = catalog
        .strings
        .iter()
        .filter(|(_, entry)| !entry.is_excluded_from_translation())
        .filter(|(_, entry)| is_missing(entry, &catalog.source_language, target_language))
        .map(|(key, _)| key.as_str())
        .collect();

    tracing::debug!(target_language, count = keys.len(), "Classified missing translations");
    keys
}
