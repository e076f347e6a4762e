//! Variation tree: plural / device forms nested to any depth.

use indexmap::IndexMap;
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
use super::path::VariationPath;
use super::unit::StringUnit;

/// Variation key (`one`, `other`, `ipad`, ...) → node, in file order.
pub type VariationKeys = IndexMap<String, VariationNode>;

/// One node of a variation tree.
///
/// A node carrying `variations` is a branch. A `stringUnit` stored next to
/// them is stale: it is not read as a value but is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariationNode {
    /// Terminal unit, stale on branches
    string_unit: Option<StringUnit>,
    /// Children
    variations: Option<VariationsMap>,
    /// Unknown node fields
    extra: Fields,
    /// Key order read from the file
    layout: KeyOrder,
}

impl<'de> Deserialize<'de> for VariationNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        layout::deserialize_object(deserializer, |fields| {
            let layout = KeyOrder::of(fields);
            Ok(Self {
                string_unit: layout::take(fields, "stringUnit")?,
                variations: layout::take(fields, "variations")?,
                extra: std::mem::take(fields),
                layout,
            })
        })
    }
}

impl KnownFields for VariationNode {
    const FIELDS: &'static [&'static str] = &["stringUnit", "variations"];

    fn layout(&self) -> &KeyOrder {
        &self.layout
    }

    fn extra(&self) -> &Fields {
        &self.extra
    }

    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error> {
        match key {
            "stringUnit" => layout::serialize_some(map, key, self.string_unit.as_ref()),
            "variations" => layout::serialize_some(map, key, self.variations.as_ref()),
            _ => Ok(()),
        }
    }
}

impl Serialize for VariationNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        layout::serialize_object(self, serializer)
    }
}

impl VariationNode {
    /// Leaf holding `unit`.
    #[must_use]
    pub fn leaf(unit: StringUnit) -> Self {
        Self { string_unit: Some(unit), ..Self::default() }
    }

    /// Translated leaf holding `value`.
    #[must_use]
    pub fn translated(value: impl Into<String>) -> Self {
        Self::leaf(StringUnit::translated(value))
    }

    #[must_use]
    pub const fn is_branch(&self) -> bool {
        self.variations.is_some()
    }

    /// The terminal unit, if this is a leaf that has one.
    #[must_use]
    pub const fn unit(&self) -> Option<&StringUnit> {
        if self.is_branch() { None } else { self.string_unit.as_ref() }
    }

    /// Leaf value; `None` for branches and unit-less leaves.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.unit().map(|unit| unit.value.as_str())
    }

    #[must_use]
    pub const fn children(&self) -> Option<&VariationsMap> {
        self.variations.as_ref()
    }

    /// Children for removals.
    pub(crate) const fn children_mut(&mut self) -> Option<&mut VariationsMap> {
        self.variations.as_mut()
    }

    /// Children for inserts, turning a leaf into a branch. A unit already
    /// on the node stays as it is.
    pub(crate) fn branch_mut(&mut self) -> &mut VariationsMap {
        self.variations.get_or_insert_with(VariationsMap::default)
    }
}

/// Variation type (`plural`, `device`) → keys → nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationsMap {
    /// Types in file order
    pub(crate) types: IndexMap<String, VariationKeys>,
}

impl VariationsMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No variation type present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// At least one type holds at least one key.
    ///
    /// `{}` and `{"plural": {}}` both count as having no variations.
    #[must_use]
    pub fn has_entries(&self) -> bool {
        self.types.values().any(|keys| !keys.is_empty())
    }

    /// All keys of one variation type.
    #[must_use]
    pub fn keys_of(&self, kind: &str) -> Option<&VariationKeys> {
        self.types.get(kind)
    }

    /// Direct child node.
    #[must_use]
    pub fn get(&self, kind: &str, key: &str) -> Option<&VariationNode> {
        self.types.get(kind)?.get(key)
    }

    /// Types with their keys, in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariationKeys)> {
        self.types.iter().map(|(kind, keys)| (kind.as_str(), keys))
    }

    /// Node at exactly `path`.
    ///
    /// Every segment but the last must land on a branch.
    #[must_use]
    pub fn node_at(&self, path: &VariationPath) -> Option<&VariationNode> {
        let (last, ancestors) = path.segments().split_last()?;
        let mut current = self;
        for segment in ancestors {
            current = current.get(&segment.kind, &segment.key)?.children()?;
        }
        current.get(&last.kind, &last.key)
    }

    /// Leaf value at exactly `path`.
    #[must_use]
    pub fn value_at(&self, path: &VariationPath) -> Option<&str> {
        self.node_at(path)?.value()
    }

    /// Whether every leaf in the whole tree satisfies `predicate`.
    pub fn all_leaves<F>(&self, predicate: F) -> bool
    where
        F: Fn(Option<&StringUnit>) -> bool + Copy,
    {
        self.types.values().flat_map(IndexMap::values).all(|node| match node.children() {
            Some(children) => children.all_leaves(predicate),
            None => predicate(node.unit()),
        })
    }

    /// Number of leaves in the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.types
            .values()
            .flat_map(IndexMap::values)
            .map(|node| node.children().map_or(1, Self::leaf_count))
            .sum()
    }
}
