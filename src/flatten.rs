//! Flattens a source variation tree, paired with the target language's
//! tree, into display rows.
//!
//! The source tree decides which rows exist. Rows come out in pre-order:
//! a container row is followed by the rows of its children, and siblings
//! keep source file order.

use crate::catalog::{
    Localization,
    PathSegment,
    TranslationState,
    VariationNode,
    VariationPath,
    VariationsMap,
};

/// One displayable row of a variation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationRow {
    /// Variation type of the addressed node (`plural`, `device`)
    pub variation_type: String,
    /// Variation key of the addressed node (`one`, `ipad`)
    pub var_key: String,
    /// Source value; empty for containers
    pub source_value: String,
    /// Target value at the same path; empty when absent
    pub target_value: String,
    /// Status badge. Always `None` for containers.
    pub target_state: Option<TranslationState>,
    /// Nesting depth, 0 for top-level variations
    pub depth: usize,
    /// Address of the node, the only identity valid across re-renders
    pub path: VariationPath,
    /// The source node has children
    pub is_container: bool,
}

impl VariationRow {
    /// Leaf row whose target is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.target_state == Some(TranslationState::Missing)
    }
}

/// Builds the rows for one entry.
///
/// Returns no rows when the source localization has no variation tree;
/// such entries are edited as flat strings.
#[must_use]
pub fn flatten(source: Option<&Localization>, target: Option<&Localization>) -> Vec<VariationRow> {
    let Some(source_tree) = source.and_then(Localization::variations) else {
        return Vec::new();
    };
    let target_tree = target.and_then(Localization::variations);

    let mut rows = Vec::with_capacity(source_tree.leaf_count());
    flatten_level(source_tree, target_tree, None, &mut rows);
    rows
}

/// Emits rows for every node of one tree level and recurses into containers
fn flatten_level(
    source: &VariationsMap,
    target: Option<&VariationsMap>,
    parent: Option<&VariationPath>,
    rows: &mut Vec<VariationRow>,
) {
    for (kind, keys) in source.iter() {
        let target_keys = target.and_then(|tree| tree.keys_of(kind));

        for (key, source_node) in keys {
            let target_node = target_keys.and_then(|keys| keys.get(key));
            let segment = PathSegment::new(kind, key.as_str());
            let path = match parent {
                Some(parent) => parent.child(segment),
                None => VariationPath::root(segment),
            };

            rows.push(build_row(source_node, target_node, path.clone()));

            if let Some(children) = source_node.children() {
                let target_children = target_node.and_then(VariationNode::children);
                flatten_level(children, target_children, Some(&path), rows);
            }
        }
    }
}

/// Builds a single row from the node pair at `path`
fn build_row(
    source: &VariationNode,
    target: Option<&VariationNode>,
    path: VariationPath,
) -> VariationRow {
    let source_value = source.value().unwrap_or_default().to_string();
    let target_value = target.and_then(VariationNode::value).unwrap_or_default().to_string();

    let target_state = if source.is_branch() {
        None
    } else {
        target
            .and_then(VariationNode::unit)
            .and_then(|unit| unit.state.clone())
            .or_else(|| (!source_value.is_empty()).then_some(TranslationState::Missing))
    };

    let (variation_type, var_key) = path
        .last()
        .map(|segment| (segment.kind.clone(), segment.key.clone()))
        .unwrap_or_default();

    VariationRow {
        variation_type,
        var_key,
        source_value,
        target_value,
        target_state,
        depth: path.depth(),
        is_container: source.is_branch(),
        path,
    }
}
