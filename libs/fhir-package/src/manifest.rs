//! Package manifest (`package/package.json`).

use crate::error::PackageResult;
use crate::identifier::FhirPackageIdentifier;
use crate::index::{FileIndexEntryWithPkg, PackageIndex};
use crate::open::ExtensionMap;
use crate::open_record;
use crate::{PackageName, Version, VersionReference};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// FHIR NPM package manifest.
///
/// Superset of a conventional `package.json`: `installedPath` and an embedded
/// `.index.json` are added by package caches. Every other key (`author`,
/// `fhirVersions`, `canonical`, ...) is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: PackageName,
    pub version: Version,
    /// Dependencies in document order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<PackageName, VersionReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_path: Option<String>,
    #[serde(
        rename = ".index.json",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<PackageIndex>,
    #[serde(flatten, serialize_with = "serialize_manifest_extra")]
    pub extra: ExtensionMap,
}

open_record!(
    impl for PackageManifest,
    serialize = serialize_manifest_extra,
    reserved = ["name", "version", "dependencies", "installedPath", ".index.json"],
);

impl PackageManifest {
    pub fn new(name: impl Into<PackageName>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: None,
            installed_path: None,
            index: None,
            extra: ExtensionMap::new(),
        }
    }

    pub fn from_value(value: &Value) -> PackageResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_value(&self) -> PackageResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Identifier of this package (`name#version`).
    pub fn identifier(&self) -> FhirPackageIdentifier {
        FhirPackageIdentifier::new(self.name.clone(), self.version.clone())
    }

    /// Declared dependencies as identifiers, sorted by package id.
    pub fn dependency_identifiers(&self) -> Vec<FhirPackageIdentifier> {
        let mut deps: Vec<_> = self
            .dependencies
            .iter()
            .flatten()
            .map(|(name, version)| FhirPackageIdentifier::new(name.clone(), version.clone()))
            .collect();
        deps.sort();
        deps
    }

    /// Add or replace a dependency.
    pub fn add_dependency(
        &mut self,
        name: impl Into<PackageName>,
        version: impl Into<VersionReference>,
    ) {
        self.dependencies
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), version.into());
    }

    /// Check if package has a core FHIR package dependency.
    pub fn has_core_dependency(&self) -> bool {
        self.dependencies.iter().flatten().any(|(name, _)| {
            name == "hl7.fhir.core" || (name.starts_with("hl7.fhir.r") && name.ends_with(".core"))
        })
    }

    /// Entries of the embedded index, each tagged with this package.
    pub fn index_entries_with_package(&self) -> Vec<FileIndexEntryWithPkg> {
        let package = self.identifier();
        self.index
            .iter()
            .flat_map(|index| index.files.iter())
            .map(|entry| FileIndexEntryWithPkg::new(entry.clone(), &package))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FileInPackageIndex;
    use crate::open::OpenRecord;
    use serde_json::json;

    #[test]
    fn test_minimal_manifest() {
        let manifest = PackageManifest::from_value(&json!({
            "name": "my.local.ig",
            "version": "0.1.0"
        }))
        .unwrap();

        assert!(manifest.dependencies.is_none());
        assert!(manifest.index.is_none());
        assert!(manifest.extra.is_empty());
        assert!(manifest.dependency_identifiers().is_empty());
        assert_eq!(
            manifest.to_value().unwrap(),
            json!({"name": "my.local.ig", "version": "0.1.0"})
        );
    }

    #[test]
    fn test_manifest_keeps_open_fields_and_embedded_index() {
        let value = json!({
            "name": "hl7.fhir.us.core",
            "version": "6.1.0",
            "canonical": "http://hl7.org/fhir/us/core",
            "fhirVersions": ["4.0.1"],
            "dependencies": {
                "hl7.terminology.r4": "5.0.0",
                "hl7.fhir.r4.core": "4.0.1"
            },
            "installedPath": "/home/user/.fhir/packages/hl7.fhir.us.core#6.1.0",
            ".index.json": {
                "index-version": 2,
                "files": [{
                    "filename": "StructureDefinition-us-core-patient.json",
                    "resourceType": "StructureDefinition",
                    "id": "us-core-patient"
                }]
            }
        });

        let manifest = PackageManifest::from_value(&value).unwrap();
        assert_eq!(manifest.extra.len(), 2);
        assert_eq!(manifest.extra("canonical"), Some(&json!("http://hl7.org/fhir/us/core")));
        assert!(manifest.has_core_dependency());
        assert_eq!(
            manifest.dependency_identifiers(),
            vec![
                FhirPackageIdentifier::new("hl7.fhir.r4.core", "4.0.1"),
                FhirPackageIdentifier::new("hl7.terminology.r4", "5.0.0"),
            ]
        );
        assert_eq!(manifest.index.as_ref().unwrap().files.len(), 1);
        assert_eq!(manifest.to_value().unwrap(), value);
    }

    #[test]
    fn test_dependency_order_survives_round_trip() {
        let text = r#"{"name":"pkg.c","version":"1.0.0","dependencies":{"z.pkg":"1.0.0","a.pkg":"2.0.0","m.pkg":"3.0.0","b.pkg":"4.0.0","y.pkg":"5.0.0"}}"#;
        let manifest: PackageManifest = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&manifest).unwrap(), text);

        let names: Vec<&str> = manifest
            .dependencies
            .iter()
            .flatten()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["z.pkg", "a.pkg", "m.pkg", "b.pkg", "y.pkg"]);
    }

    #[test]
    fn test_added_dependencies_keep_insertion_order() {
        let mut manifest = PackageManifest::new("pkg.d", "0.1.0");
        manifest.add_dependency("hl7.fhir.r4.core", "4.0.1");
        manifest.add_dependency("hl7.fhir.uv.extensions.r4", "5.1.0");
        manifest.add_dependency("hl7.terminology.r4", "6.0.2");
        manifest.add_dependency("hl7.fhir.r4.core", "4.0.2");

        assert_eq!(
            serde_json::to_string(&manifest).unwrap(),
            r#"{"name":"pkg.d","version":"0.1.0","dependencies":{"hl7.fhir.r4.core":"4.0.2","hl7.fhir.uv.extensions.r4":"5.1.0","hl7.terminology.r4":"6.0.2"}}"#
        );
    }

    #[test]
    fn test_named_fields_win_over_extra() {
        let mut manifest = PackageManifest::new("pkg.a", "1.0.0");
        manifest.extra.insert("version".to_string(), json!("9.9.9"));
        manifest.extra.insert("author".to_string(), json!("someone"));

        let value = manifest.to_value().unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["author"], "someone");

        let reparsed = PackageManifest::from_value(&value).unwrap();
        assert_eq!(reparsed.version, "1.0.0");
        assert!(!reparsed.extra.contains_key("version"));
    }

    #[test]
    fn test_index_entries_with_package() {
        let mut manifest = PackageManifest::new("pkg.b", "2.0.0");
        assert!(manifest.index_entries_with_package().is_empty());

        manifest.index = Some(PackageIndex::new(vec![
            FileInPackageIndex::new("a.json", "Patient", "a"),
            FileInPackageIndex::new("b.json", "Observation", "b"),
        ]));
        manifest.add_dependency("hl7.fhir.r5.core", "5.0.0");

        let entries = manifest.index_entries_with_package();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.package_id == "pkg.b"));
        assert_eq!(entries[1].package_version.as_deref(), Some("2.0.0"));
        assert!(manifest.has_core_dependency());
    }
}
