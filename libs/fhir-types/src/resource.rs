//! Base FHIR Resource model
//!
//! [`Resource`] is the generic envelope: a `resourceType` discriminant, an
//! optional logical id and any number of additional JSON fields.

use crate::error::{Error, Result};
use fhirkit_package::{open_record, ExtensionMap};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// JSON-compatible value type for FHIR resources.
///
/// Covers string, number, boolean, null, arrays and string-keyed objects.
/// An absent ("undefined") value is an `Option::None` field, never a variant.
pub type JsonValue = Value;

/// String-keyed JSON object.
pub type JsonObject = serde_json::Map<String, Value>;

/// Common accessors of every resource shape.
pub trait FhirResource {
    fn resource_type(&self) -> &str;

    fn id(&self) -> Option<&str>;

    /// `Type/id` when the resource has an id.
    fn reference(&self) -> Option<String> {
        self.id()
            .map(|id| format!("{}/{}", self.resource_type(), id))
    }
}

/// Base FHIR Resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource type discriminant (e.g. "Patient")
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Every other field of the resource
    #[serde(flatten, serialize_with = "serialize_resource_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for Resource,
    serialize = serialize_resource_extra,
    reserved = ["resourceType", "id"],
);

impl Resource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            extra: ExtensionMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Re-read this resource as a more specific shape.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_value()?).map_err(Error::from)
    }

    /// Erase a specific shape into the generic envelope.
    pub fn from_typed<T: Serialize>(typed: &T) -> Result<Self> {
        Self::from_value(&serde_json::to_value(typed)?)
    }

    /// Fail unless this resource has the given `resourceType`.
    pub fn expect_type(&self, expected: &str) -> Result<()> {
        if self.resource_type == expected {
            Ok(())
        } else {
            Err(Error::ResourceTypeMismatch {
                expected: expected.to_string(),
                found: self.resource_type.clone(),
            })
        }
    }
}

impl FhirResource for Resource {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl TryFrom<Value> for Resource {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::from)
    }
}

/// Zero-sized `resourceType` that only ever holds one literal.
macro_rules! resource_type_literal {
    ($(#[$meta:meta])* $name:ident => $literal:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            pub const VALUE: &'static str = $literal;

            pub fn as_str(&self) -> &'static str {
                Self::VALUE
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Self::VALUE)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(Self::VALUE)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let found = String::deserialize(deserializer)?;
                if found == Self::VALUE {
                    Ok($name)
                } else {
                    Err(de::Error::invalid_value(
                        de::Unexpected::Str(&found),
                        &Self::VALUE,
                    ))
                }
            }
        }
    };
}

resource_type_literal!(
    /// `resourceType` of a Bundle, always `"Bundle"`
    BundleResourceType => "Bundle"
);

resource_type_literal!(
    /// `resourceType` of a CapabilityStatement, always `"CapabilityStatement"`
    CapabilityStatementResourceType => "CapabilityStatement"
);
