//! Point edits and deletions on a catalog.
//!
//! [`patch`] never mutates its input. The returned catalog shares every
//! entry except the edited one with the input, so callers can compare
//! catalogs (or entries via `Arc::ptr_eq`) to detect what changed.

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{
    Catalog,
    Localization,
    PathSegment,
    StringUnit,
    VariationNode,
    VariationPath,
    VariationsMap,
};

/// Patch failures. All of them leave the input catalog authoritative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The key is not present in the catalog.
    #[error("String key not found: {0}")]
    KeyNotFound(String),
}

/// Applies one edit and returns the edited copy.
///
/// - `path == None` edits the flat `stringUnit` of the localization.
/// - `path == Some(_)` edits the variation tree at that node.
///
/// A value that is empty after trimming deletes instead of writing. Deleting
/// something already absent is a no-op. A localization left empty is removed
/// from the entry.
///
/// # Errors
/// - [`PatchError::KeyNotFound`] when `key` is not in the catalog
pub fn patch(
    catalog: &Catalog,
    key: &str,
    language: &str,
    value: &str,
    path: Option<&VariationPath>,
) -> Result<Catalog, PatchError> {
    if !catalog.strings.contains_key(key) {
        return Err(PatchError::KeyNotFound(key.to_string()));
    }

    let mut updated = catalog.clone();
    let Some(entry) = updated.strings.get_mut(key) else {
        return Err(PatchError::KeyNotFound(key.to_string()));
    };
    let entry = Arc::make_mut(entry);

    let localization = entry.localizations.entry(language.to_string()).or_default();
    let trimmed = value.trim();

    match (path, trimmed.is_empty()) {
        (None, false) => {
            tracing::debug!(key, language, "Setting flat value");
            localization.set_string_unit(StringUnit::translated(trimmed));
        }
        (None, true) => {
            tracing::debug!(key, language, "Removing flat value");
            localization.clear_string_unit();
        }
        (Some(path), false) => {
            tracing::debug!(key, language, %path, "Setting variation value");
            insert_leaf(localization.variations_mut(), path.segments(), StringUnit::translated(trimmed));
        }
        (Some(path), true) => {
            tracing::debug!(key, language, %path, "Removing variation value");
            remove_variation(localization, path);
        }
    }

    if localization.is_empty() {
        tracing::debug!(key, language, "Dropping empty localization");
        entry.localizations.shift_remove(language);
    }

    Ok(updated)
}

/// Writes `unit` at the node addressed by `segments`, creating branches on the way.
///
/// The addressed node is replaced whole. An intermediate leaf gains children
/// and keeps its old unit, which no longer reads as a value.
fn insert_leaf(variations: &mut VariationsMap, segments: &[PathSegment], unit: StringUnit) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let keys = variations.types.entry(segment.kind.clone()).or_default();

    if rest.is_empty() {
        keys.insert(segment.key.clone(), VariationNode::leaf(unit));
        return;
    }

    let node = keys.entry(segment.key.clone()).or_default();
    insert_leaf(node.branch_mut(), rest, unit);
}

/// Deletes the node at `path` and prunes what became empty.
fn remove_variation(localization: &mut Localization, path: &VariationPath) {
    if let Some(variations) = localization.existing_variations_mut() {
        remove_leaf(variations, path.segments());
    }
    localization.drop_empty_variations();
}

/// Removes the node addressed by `segments`, then prunes emptied containers
/// on the way back up.
///
/// Stops silently where the path leaves the tree.
fn remove_leaf(variations: &mut VariationsMap, segments: &[PathSegment]) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };
    let Some(keys) = variations.types.get_mut(&segment.kind) else {
        return;
    };

    if rest.is_empty() {
        keys.shift_remove(&segment.key);
    } else if let Some(children) = keys.get_mut(&segment.key).and_then(VariationNode::children_mut) {
        remove_leaf(children, rest);
        if children.is_empty() {
            tracing::debug!(kind = %segment.kind, key = %segment.key, "Pruning empty container");
            keys.shift_remove(&segment.key);
        }
    }

    if keys.is_empty() {
        tracing::debug!(kind = %segment.kind, "Pruning empty variation type");
        variations.types.shift_remove(&segment.kind);
    }
}
