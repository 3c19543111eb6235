//! Open records: a handful of named fields plus a catch-all map.
//!
//! FHIR resources and npm-style manifests allow arbitrary additional keys.
//! Types that model them keep the keys they know as struct fields and flatten
//! everything else into an [`ExtensionMap`].
//!
//! Named fields always win over the map. Deserialization hands a known key to
//! its field, so it never reaches the map; serialization goes through
//! [`serialize_unreserved`], which drops any map entry whose key a named field
//! owns, whether or not that field is set.

use serde::ser::SerializeMap;
pub use serde::ser::Serializer;
use serde_json::{Map, Value};

/// Unrecognized keys of an open record, in document order.
pub type ExtensionMap = Map<String, Value>;

/// A record with fixed fields and an open extension map.
pub trait OpenRecord {
    /// JSON keys owned by named fields of the record.
    const RESERVED: &'static [&'static str];

    fn extra_fields(&self) -> &ExtensionMap;

    fn extra_fields_mut(&mut self) -> &mut ExtensionMap;

    /// Whether `key` belongs to a named field rather than to the map.
    fn is_reserved(key: &str) -> bool {
        Self::RESERVED.contains(&key)
    }

    /// Look up an additional field. Reserved keys are never answered here.
    fn extra(&self, key: &str) -> Option<&Value> {
        if Self::is_reserved(key) {
            return None;
        }
        self.extra_fields().get(key)
    }

    /// Set an additional field, returning the previous value.
    ///
    /// Reserved keys are refused: the value is handed back untouched as `Err`.
    fn set_extra(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>, Value> {
        let key = key.into();
        if Self::is_reserved(&key) {
            return Err(value);
        }
        Ok(self.extra_fields_mut().insert(key, value))
    }
}

/// Serialize `map` as flattened entries, skipping every key in `reserved`.
///
/// Meant for `#[serde(flatten, serialize_with = "...")]` on the extension
/// field of an open record.
pub fn serialize_unreserved<S>(
    map: &ExtensionMap,
    reserved: &[&str],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = serializer.serialize_map(None)?;
    for (key, value) in map {
        if reserved.contains(&key.as_str()) {
            continue;
        }
        state.serialize_entry(key, value)?;
    }
    state.end()
}

/// Implement [`OpenRecord`] for a type with an `extra: ExtensionMap` field and
/// define the serializer its `#[serde(flatten, serialize_with = "...")]`
/// attribute names.
///
/// ```rust
/// use fhirkit_package::{open_record, ExtensionMap, OpenRecord};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Tagged {
///     tag: String,
///     #[serde(flatten, serialize_with = "serialize_tagged_extra")]
///     extra: ExtensionMap,
/// }
///
/// open_record!(impl for Tagged, serialize = serialize_tagged_extra, reserved = ["tag"]);
///
/// assert!(Tagged::is_reserved("tag"));
/// ```
#[macro_export]
macro_rules! open_record {
    (
        impl $(<$($gen:ident),+>)? for $ty:ty,
        serialize = $ser:ident,
        reserved = [$($key:literal),* $(,)?] $(,)?
    ) => {
        impl $(<$($gen),+>)? $crate::OpenRecord for $ty {
            const RESERVED: &'static [&'static str] = &[$($key),*];

            fn extra_fields(&self) -> &$crate::ExtensionMap {
                &self.extra
            }

            fn extra_fields_mut(&mut self) -> &mut $crate::ExtensionMap {
                &mut self.extra
            }
        }

        fn $ser<S>(
            map: &$crate::ExtensionMap,
            serializer: S,
        ) -> ::std::result::Result<S::Ok, S::Error>
        where
            S: $crate::open::Serializer,
        {
            $crate::open::serialize_unreserved(map, &[$($key),*], serializer)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_record;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Probe {
        name: String,
        #[serde(flatten, serialize_with = "serialize_probe_extra")]
        extra: ExtensionMap,
    }

    open_record!(impl for Probe, serialize = serialize_probe_extra, reserved = ["name"]);

    #[test]
    fn test_reserved_keys_are_not_serialized_from_map() {
        let mut extra = ExtensionMap::new();
        extra.insert("name".into(), json!("shadow"));
        extra.insert("other".into(), json!(1));
        let probe = Probe {
            name: "real".into(),
            extra,
        };

        let value = serde_json::to_value(&probe).unwrap();
        assert_eq!(value, json!({"name": "real", "other": 1}));
    }

    #[test]
    fn test_set_extra_refuses_reserved_key() {
        let mut probe = Probe {
            name: "real".into(),
            extra: ExtensionMap::new(),
        };

        assert_eq!(probe.set_extra("name", json!("x")), Err(json!("x")));
        assert_eq!(probe.set_extra("color", json!("red")), Ok(None));
        assert_eq!(probe.extra("color"), Some(&json!("red")));
        assert_eq!(probe.extra("name"), None);
    }
}
