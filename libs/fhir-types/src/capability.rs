//! FHIR CapabilityStatement model

use crate::error::{Error, Result};
use crate::resource::{CapabilityStatementResourceType, FhirResource, Resource};
use crate::version::FhirVersion;
use fhirkit_package::{open_record, ExtensionMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// FHIR CapabilityStatement resource describing server capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    /// Resource type - always "CapabilityStatement"
    pub resource_type: CapabilityStatementResourceType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// draft | active | retired | unknown
    pub status: String,

    /// Date last changed
    pub date: String,

    /// instance | capability | requirements
    pub kind: String,

    /// FHIR version the system supports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fhir_version: Option<String>,

    /// Formats supported (xml | json | ttl | mime type)
    pub format: Vec<String>,

    /// If the endpoint is a RESTful one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<Vec<CapabilityStatementRest>>,

    #[serde(flatten, serialize_with = "serialize_capability_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for CapabilityStatement,
    serialize = serialize_capability_extra,
    reserved = [
        "resourceType",
        "id",
        "status",
        "date",
        "kind",
        "fhirVersion",
        "format",
        "rest",
    ],
);

/// RESTful capabilities of one endpoint mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityStatementRest {
    /// client | server
    pub mode: String,

    /// Resource served on the REST interface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Vec<CapabilityStatementRestResource>>,

    #[serde(flatten, serialize_with = "serialize_rest_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for CapabilityStatementRest,
    serialize = serialize_rest_extra,
    reserved = ["mode", "resource"],
);

/// Capabilities for one resource type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatementRestResource {
    /// A resource type that is supported
    #[serde(rename = "type")]
    pub resource_type: String,

    /// What operations are supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Vec<ResourceInteraction>>,

    /// Search parameters supported by implementation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_param: Option<Vec<SearchParam>>,

    #[serde(flatten, serialize_with = "serialize_rest_resource_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for CapabilityStatementRestResource,
    serialize = serialize_rest_resource_extra,
    reserved = ["type", "interaction", "searchParam"],
);

/// One supported interaction (read, vread, search-type, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceInteraction {
    pub code: String,

    #[serde(flatten, serialize_with = "serialize_interaction_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for ResourceInteraction,
    serialize = serialize_interaction_extra,
    reserved = ["code"],
);

/// Search parameter supported by a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParam {
    /// Name of the search parameter used in the interface
    pub name: String,

    /// number | date | string | token | reference | composite | quantity | uri | special
    #[serde(rename = "type")]
    pub param_type: String,

    /// Server-specific usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    #[serde(flatten, serialize_with = "serialize_search_param_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for SearchParam,
    serialize = serialize_search_param_extra,
    reserved = ["name", "type", "documentation"],
);

impl CapabilityStatement {
    /// Create a CapabilityStatement with its required fields
    pub fn new(
        status: impl Into<String>,
        date: impl Into<String>,
        kind: impl Into<String>,
        format: Vec<String>,
    ) -> Self {
        Self {
            resource_type: CapabilityStatementResourceType,
            id: None,
            status: status.into(),
            date: date.into(),
            kind: kind.into(),
            fhir_version: None,
            format,
            rest: None,
            extra: ExtensionMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Re-read a generic resource as a CapabilityStatement
    pub fn from_resource(resource: &Resource) -> Result<Self> {
        resource.expect_type(CapabilityStatementResourceType::VALUE)?;
        resource.to_typed()
    }

    /// The declared `fhirVersion` as a known version, if present.
    pub fn parsed_fhir_version(&self) -> Result<Option<FhirVersion>> {
        self.fhir_version.as_deref().map(str::parse::<FhirVersion>).transpose()
    }

    /// REST block for a mode ("server" or "client")
    pub fn rest_for_mode(&self, mode: &str) -> Option<&CapabilityStatementRest> {
        self.rest.iter().flatten().find(|r| r.mode == mode)
    }

    /// Whether any REST block declares the resource type
    pub fn supports_resource(&self, resource_type: &str) -> bool {
        self.rest
            .iter()
            .flatten()
            .any(|rest| rest.resource_for(resource_type).is_some())
    }

    pub fn add_rest(&mut self, rest: CapabilityStatementRest) {
        self.rest.get_or_insert_with(Vec::new).push(rest);
    }
}

impl FhirResource for CapabilityStatement {
    fn resource_type(&self) -> &str {
        CapabilityStatementResourceType::VALUE
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl CapabilityStatementRest {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            resource: None,
            extra: ExtensionMap::new(),
        }
    }

    pub fn resource_for(&self, resource_type: &str) -> Option<&CapabilityStatementRestResource> {
        self.resource
            .iter()
            .flatten()
            .find(|r| r.resource_type == resource_type)
    }

    pub fn add_resource(&mut self, resource: CapabilityStatementRestResource) {
        self.resource.get_or_insert_with(Vec::new).push(resource);
    }
}

impl CapabilityStatementRestResource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            interaction: None,
            search_param: None,
            extra: ExtensionMap::new(),
        }
    }

    /// Add interactions by code
    pub fn with_interactions<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let interactions = self.interaction.get_or_insert_with(Vec::new);
        interactions.extend(codes.into_iter().map(|code| ResourceInteraction {
            code: code.into(),
            extra: ExtensionMap::new(),
        }));
        self
    }

    pub fn supports_interaction(&self, code: &str) -> bool {
        self.interaction.iter().flatten().any(|i| i.code == code)
    }

    pub fn search_param(&self, name: &str) -> Option<&SearchParam> {
        self.search_param.iter().flatten().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn capability_json() -> Value {
        json!({
            "resourceType": "CapabilityStatement",
            "status": "active",
            "date": "2025-12-13",
            "kind": "instance",
            "fhirVersion": "4.0.1",
            "format": ["json", "xml"],
            "rest": [{
                "mode": "server",
                "resource": [{
                    "type": "Patient",
                    "interaction": [{"code": "read"}, {"code": "search-type"}],
                    "searchParam": [{
                        "name": "identifier",
                        "type": "token",
                        "documentation": "Search by identifier"
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_deserialize_capability_statement() {
        let cs = CapabilityStatement::from_value(&capability_json()).unwrap();
        assert_eq!(cs.status, "active");
        assert_eq!(cs.format, vec!["json", "xml"]);
        assert_eq!(cs.parsed_fhir_version().unwrap(), Some(FhirVersion::V4_0_1));

        let server = cs.rest_for_mode("server").unwrap();
        let patient = server.resource_for("Patient").unwrap();
        assert!(patient.supports_interaction("search-type"));
        assert!(!patient.supports_interaction("delete"));
        assert_eq!(patient.search_param("identifier").unwrap().param_type, "token");
        assert!(cs.supports_resource("Patient"));
        assert!(!cs.supports_resource("Observation"));
        assert!(cs.rest_for_mode("client").is_none());
    }

    #[test]
    fn test_capability_round_trips() {
        let cs = CapabilityStatement::from_value(&capability_json()).unwrap();
        assert_eq!(cs.to_value().unwrap(), capability_json());
    }

    #[test]
    fn test_required_fields() {
        for field in ["status", "date", "kind", "format"] {
            let mut value = capability_json();
            value.as_object_mut().unwrap().remove(field);
            assert!(
                CapabilityStatement::from_value(&value).is_err(),
                "{} should be required",
                field
            );
        }

        let mut value = capability_json();
        value.as_object_mut().unwrap().remove("rest");
        value.as_object_mut().unwrap().remove("fhirVersion");
        assert!(CapabilityStatement::from_value(&value).is_ok());
    }

    #[test]
    fn test_wrong_primitive_types_are_rejected() {
        let mut value = capability_json();
        value["format"] = json!("json");
        assert!(CapabilityStatement::from_value(&value).is_err());

        let mut value = capability_json();
        value["resourceType"] = json!("Bundle");
        assert!(CapabilityStatement::from_value(&value).is_err());
    }

    #[test]
    fn test_build_capability_statement() {
        let mut cs =
            CapabilityStatement::new("active", "2026-01-01", "instance", vec!["json".into()]);
        cs.fhir_version = Some("R5".to_string());
        let mut rest = CapabilityStatementRest::new("server");
        rest.add_resource(
            CapabilityStatementRestResource::new("Observation")
                .with_interactions(["read", "create"]),
        );
        cs.add_rest(rest);

        assert!(cs.supports_resource("Observation"));
        assert_eq!(cs.parsed_fhir_version().unwrap(), Some(FhirVersion::R5));
        assert_eq!(cs.resource_type(), "CapabilityStatement");

        let value = cs.to_value().unwrap();
        assert_eq!(value["rest"][0]["resource"][0]["interaction"][1]["code"], "create");

        let resource = Resource::from_value(&value).unwrap();
        assert_eq!(CapabilityStatement::from_resource(&resource).unwrap(), cs);
    }

    #[test]
    fn test_unknown_fhir_version_is_reported() {
        let mut cs = CapabilityStatement::new("draft", "2026-01-01", "capability", vec![]);
        cs.fhir_version = Some("6.0.0".to_string());
        assert!(matches!(
            cs.parsed_fhir_version(),
            Err(Error::UnknownFhirVersion(_))
        ));
    }
}
