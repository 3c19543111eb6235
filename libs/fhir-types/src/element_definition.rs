//! FHIR ElementDefinition model
//!
//! One element of a StructureDefinition snapshot or differential, with the
//! slicing, binding, type and constraint records it refers to.

use crate::error::{Error, Result};
use fhirkit_package::{open_record, ExtensionMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// FHIR Extension instance: a `url` plus its `valueX` (or nested `extension`) fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FhirExtensionInstance {
    pub url: String,

    #[serde(flatten, serialize_with = "serialize_extension_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for FhirExtensionInstance,
    serialize = serialize_extension_extra,
    reserved = ["url"],
);

impl FhirExtensionInstance {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: ExtensionMap::new(),
        }
    }

    /// Extension with a single `value{type_suffix}` field, e.g. `valueString`
    pub fn with_value(url: impl Into<String>, type_suffix: &str, value: Value) -> Self {
        let mut extension = Self::new(url);
        extension.extra.insert(format!("value{}", type_suffix), value);
        extension
    }

    /// The `valueX` field, as `(type suffix, value)`
    pub fn value(&self) -> Option<(&str, &Value)> {
        self.extra.iter().find_map(|(key, value)| {
            key.strip_prefix("value")
                .filter(|suffix| suffix.starts_with(|c: char| c.is_ascii_uppercase()))
                .map(|suffix| (suffix, value))
        })
    }
}

/// Constraint metadata on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConstraint {
    /// Reference to original source of constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// XPath expression of constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,

    /// key, severity, human, expression, ...
    #[serde(flatten, serialize_with = "serialize_constraint_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ElementConstraint,
    serialize = serialize_constraint_extra,
    reserved = ["source", "xpath"],
);

impl ElementConstraint {
    /// The constraint `key` (e.g. "ele-1"), when it is a string
    pub fn key(&self) -> Option<&str> {
        self.extra.get("key").and_then(Value::as_str)
    }

    /// The FHIRPath `expression`, when it is a string
    pub fn expression(&self) -> Option<&str> {
        self.extra.get("expression").and_then(Value::as_str)
    }
}

/// Type of slicing discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminatorType {
    Value,
    Exists,
    Pattern,
    Type,
    Profile,
}

/// Slicing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlicingRules {
    Closed,
    Open,
    OpenAtEnd,
}

/// Binding strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrength {
    Required,
    Extensible,
    Preferred,
    Example,
}

impl DiscriminatorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Exists => "exists",
            Self::Pattern => "pattern",
            Self::Type => "type",
            Self::Profile => "profile",
        }
    }
}

impl SlicingRules {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::OpenAtEnd => "openAtEnd",
        }
    }

    /// Whether content outside the defined slices is allowed
    pub fn allows_other_content(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl BindingStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Extensible => "extensible",
            Self::Preferred => "preferred",
            Self::Example => "example",
        }
    }

    /// Required and extensible bindings constrain conformant instances
    pub fn is_conformance_binding(&self) -> bool {
        matches!(self, Self::Required | Self::Extensible)
    }
}

impl FromStr for DiscriminatorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "value" => Ok(Self::Value),
            "exists" => Ok(Self::Exists),
            "pattern" => Ok(Self::Pattern),
            "type" => Ok(Self::Type),
            "profile" => Ok(Self::Profile),
            _ => Err(Error::UnknownLiteral {
                kind: "DiscriminatorType",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SlicingRules {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            "openAtEnd" => Ok(Self::OpenAtEnd),
            _ => Err(Error::UnknownLiteral {
                kind: "SlicingRules",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for BindingStrength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "required" => Ok(Self::Required),
            "extensible" => Ok(Self::Extensible),
            "preferred" => Ok(Self::Preferred),
            "example" => Ok(Self::Example),
            _ => Err(Error::UnknownLiteral {
                kind: "BindingStrength",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DiscriminatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SlicingRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BindingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slicing discriminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlicingDiscriminator {
    /// value | exists | pattern | type | profile
    #[serde(rename = "type")]
    pub discriminator_type: DiscriminatorType,

    /// Path to element value
    pub path: String,

    #[serde(flatten, serialize_with = "serialize_discriminator_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for SlicingDiscriminator,
    serialize = serialize_discriminator_extra,
    reserved = ["type", "path"],
);

impl SlicingDiscriminator {
    pub fn new(discriminator_type: DiscriminatorType, path: impl Into<String>) -> Self {
        Self {
            discriminator_type,
            path: path.into(),
            extra: ExtensionMap::new(),
        }
    }
}

/// Slicing information for an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinitionSlicing {
    /// Element values that are used to distinguish slices
    pub discriminator: Vec<SlicingDiscriminator>,

    /// closed | open | openAtEnd
    pub rules: SlicingRules,

    /// Text description of how slicing works
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// If elements must be in same order as slices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,

    /// `id`, `extension`, ...
    #[serde(flatten, serialize_with = "serialize_slicing_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ElementDefinitionSlicing,
    serialize = serialize_slicing_extra,
    reserved = ["discriminator", "rules", "description", "ordered"],
);

impl ElementDefinitionSlicing {
    pub fn new(discriminator: Vec<SlicingDiscriminator>, rules: SlicingRules) -> Self {
        Self {
            discriminator,
            rules,
            description: None,
            ordered: None,
            extra: ExtensionMap::new(),
        }
    }
}

/// ValueSet binding for a coded element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinitionBinding {
    /// required | extensible | preferred | example
    pub strength: BindingStrength,

    /// Human explanation of the value set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Canonical URL of the ValueSet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_set: Option<String>,

    /// `extension` (e.g. `elementdefinition-bindingName`), `additional`, ...
    #[serde(flatten, serialize_with = "serialize_binding_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ElementDefinitionBinding,
    serialize = serialize_binding_extra,
    reserved = ["strength", "description", "valueSet"],
);

impl ElementDefinitionBinding {
    pub fn new(strength: BindingStrength, value_set: Option<String>) -> Self {
        Self {
            strength,
            description: None,
            value_set,
            extra: ExtensionMap::new(),
        }
    }
}

/// Data type for an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinitionType {
    /// Data type code, e.g. `string`, `CodeableConcept`, `Reference`
    pub code: String,

    /// Profiles (StructureDefinition canonical URLs) that apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Vec<String>>,

    /// Allowed target profiles for Reference/canonical types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_profile: Option<Vec<String>>,

    /// Extensions on the type (e.g. the FHIRPath type of a primitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Value>,

    /// `aggregation`, `versioning`, ...
    #[serde(flatten, serialize_with = "serialize_type_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ElementDefinitionType,
    serialize = serialize_type_extra,
    reserved = ["code", "profile", "targetProfile", "extension"],
);

impl ElementDefinitionType {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            profile: None,
            target_profile: None,
            extension: None,
            extra: ExtensionMap::new(),
        }
    }
}

/// FHIR ElementDefinition - defines an element in a resource or data type structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    /// Unique id for inter-element referencing (e.g. "Extension.value[x]")
    pub id: String,

    /// Path of the element in the hierarchy (e.g. "Extension.value[x]")
    pub path: String,

    /// Extensions for this element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<FhirExtensionInstance>>,

    /// Minimum cardinality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,

    /// Maximum cardinality ("1", "*", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    /// Possible types for this element
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<ElementDefinitionType>>,

    /// This element is sliced - slices follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slicing: Option<ElementDefinitionSlicing>,

    /// Name for this particular element (in a slice)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_name: Option<String>,

    /// Value must be exactly this uri
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_uri: Option<String>,

    /// ValueSet details if this is coded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<ElementDefinitionBinding>,

    /// Short label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    /// Full formal definition (markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Comments about the use of this element (markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Why this element has been defined (markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    /// Implicit meaning when this element is missing (markdown)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning_when_missing: Option<String>,

    /// Reference to definition of content if present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_reference: Option<String>,

    /// Conditions that must evaluate to true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Vec<ElementConstraint>>,

    /// Additional content beyond core fields
    #[serde(flatten, serialize_with = "serialize_element_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ElementDefinition,
    serialize = serialize_element_extra,
    reserved = [
        "id",
        "path",
        "extension",
        "min",
        "max",
        "type",
        "slicing",
        "sliceName",
        "fixedUri",
        "binding",
        "short",
        "definition",
        "comment",
        "requirements",
        "meaningWhenMissing",
        "contentReference",
        "constraint",
    ],
);

impl ElementDefinition {
    /// Element with only the required `id` and `path`
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            extension: None,
            min: None,
            max: None,
            types: None,
            slicing: None,
            slice_name: None,
            fixed_uri: None,
            binding: None,
            short: None,
            definition: None,
            comment: None,
            requirements: None,
            meaning_when_missing: None,
            content_reference: None,
            constraint: None,
            extra: ExtensionMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// `path`, or `path:sliceName` when the element is a slice
    pub fn key(&self) -> String {
        match &self.slice_name {
            Some(slice_name) => format!("{}:{}", self.path, slice_name),
            None => self.path.clone(),
        }
    }

    /// Carries a `sliceName`
    pub fn is_slice(&self) -> bool {
        self.slice_name.is_some()
    }

    /// Declares `slicing` for the slices that follow it
    pub fn is_sliced(&self) -> bool {
        self.slicing.is_some()
    }

    /// Path of the enclosing element, `None` for the root
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(parent, _)| parent)
    }

    /// Polymorphic `value[x]`-style element
    pub fn is_choice_type(&self) -> bool {
        self.path.ends_with("[x]")
    }

    pub fn type_codes(&self) -> Vec<&str> {
        self.types
            .iter()
            .flatten()
            .map(|t| t.code.as_str())
            .collect()
    }

    /// `min` of at least one; an absent `min` counts as zero
    pub fn is_required(&self) -> bool {
        matches!(self.min, Some(min) if min > 0)
    }

    /// Repeating element: `max` is `*` or a number above one
    pub fn is_array(&self) -> bool {
        match self.max.as_deref() {
            Some("*") => true,
            Some(max) => max.parse::<u32>().is_ok_and(|n| n > 1),
            None => false,
        }
    }

    /// `min..max` with FHIR defaults `0` and `*` for absent bounds
    pub fn cardinality_string(&self) -> String {
        format!(
            "{}..{}",
            self.min.unwrap_or_default(),
            self.max.as_deref().unwrap_or("*")
        )
    }

    /// First extension with the given url
    pub fn extension_by_url(&self, url: &str) -> Option<&FhirExtensionInstance> {
        self.extension.iter().flatten().find(|e| e.url == url)
    }
}
