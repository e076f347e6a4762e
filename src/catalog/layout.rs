//! Key order of catalog objects.
//!
//! Each typed object remembers the order its keys had in the file. Writing
//! follows that order, so an object nobody edited comes out as it went in.
//! Keys that were not in the file go last: typed fields first, in
//! declaration order, then preserved unknown fields.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use serde_json::Value;

/// Raw object fields by name, in file order
pub(crate) type Fields = IndexMap<String, Value>;

/// Keys of one object as read. Equality ignores it.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyOrder(Vec<String>);

impl PartialEq for KeyOrder {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for KeyOrder {}

impl KeyOrder {
    /// Records the key order of `fields`.
    pub(crate) fn of(fields: &Fields) -> Self {
        Self(fields.keys().cloned().collect())
    }

    /// Whether the file had `key` on this object.
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|recorded| recorded == key)
    }

    /// Keys in write order: recorded ones, then new typed fields, then new unknown fields.
    fn keys<'a>(
        &'a self,
        known: &'static [&'static str],
        extra: &'a Fields,
    ) -> impl Iterator<Item = &'a str> {
        let added_known = known.iter().copied().filter(move |key| !self.contains(key));
        let added_extra = extra.keys().map(String::as_str).filter(move |key| !self.contains(key));
        self.0.iter().map(String::as_str).chain(added_known).chain(added_extra)
    }
}

/// An object with typed fields plus preserved unknown ones.
pub(crate) trait KnownFields {
    /// Typed field names, in the order a new object writes them
    const FIELDS: &'static [&'static str];

    /// Key order read from the file
    fn layout(&self) -> &KeyOrder;

    /// Fields this crate does not interpret
    fn extra(&self) -> &Fields;

    /// Writes the typed field `key` when it is present.
    fn serialize_field<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<(), M::Error>;
}

/// Writes `object` as a JSON object in its recorded key order.
pub(crate) fn serialize_object<T, S>(object: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: KnownFields,
    S: Serializer,
{
    let mut map = serializer.serialize_map(None)?;
    for key in object.layout().keys(T::FIELDS, object.extra()) {
        if T::FIELDS.contains(&key) {
            object.serialize_field(key, &mut map)?;
        } else if let Some(value) = object.extra().get(key) {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

/// Writes `key` when `value` is present.
pub(crate) fn serialize_some<M, T>(map: &mut M, key: &str, value: Option<&T>) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    match value {
        Some(value) => map.serialize_entry(key, value),
        None => Ok(()),
    }
}

/// Reads a JSON object and hands its fields to `build`.
///
/// `build` removes the typed fields; what it leaves behind is the object's
/// unknown fields.
pub(crate) fn deserialize_object<'de, D, T, F>(deserializer: D, build: F) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    F: FnOnce(&mut Fields) -> Result<T, serde_json::Error>,
{
    let mut fields = Fields::deserialize(deserializer)?;
    build(&mut fields).map_err(<D::Error as serde::de::Error>::custom)
}

/// Removes `key` from `fields` and reads it. Absent and `null` read as `None`.
pub(crate) fn take<T>(fields: &mut Fields, key: &str) -> Result<Option<T>, serde_json::Error>
where
    T: DeserializeOwned,
{
    fields
        .shift_remove(key)
        .map(serde_json::from_value::<Option<T>>)
        .transpose()
        .map(Option::flatten)
        .map_err(|e| serde::de::Error::custom(format_args!("{key}: {e}")))
}

/// Like [`take`] for a field that must be present.
pub(crate) fn require<T>(fields: &mut Fields, key: &'static str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    take(fields, key)?.ok_or_else(|| serde::de::Error::missing_field(key))
}
