use fhirkit_package::{
    FhirPackageIdentifier, FileIndexEntryWithPkg, OpenRecord, PackageError, PackageIndex,
    PackageManifest,
};
use serde_json::json;

fn us_core_manifest() -> serde_json::Value {
    json!({
        "name": "hl7.fhir.us.core",
        "version": "6.1.0",
        "tools-version": 3,
        "type": "IG",
        "date": "20230629120000",
        "license": "CC0-1.0",
        "canonical": "http://hl7.org/fhir/us/core",
        "url": "http://hl7.org/fhir/us/core/STU6.1",
        "title": "US Core Implementation Guide",
        "fhirVersions": ["4.0.1"],
        "dependencies": {
            "hl7.fhir.r4.core": "4.0.1",
            "hl7.terminology.r4": "5.0.0",
            "hl7.fhir.uv.sdc": "3.0.0"
        },
        "author": "HL7 International / Cross-Group Projects",
        "maintainers": [{"name": "HL7 International", "url": "http://www.hl7.org/Special/committees/cgp"}],
        "jurisdiction": "urn:iso:std:iso:3166#US"
    })
}

#[test]
fn registry_manifest_round_trips() {
    let manifest = PackageManifest::from_value(&us_core_manifest()).unwrap();

    assert_eq!(manifest.identifier().to_string(), "hl7.fhir.us.core#6.1.0");
    assert!(manifest.has_core_dependency());
    assert_eq!(manifest.extra("fhirVersions"), Some(&json!(["4.0.1"])));
    assert_eq!(manifest.extra("type"), Some(&json!("IG")));
    assert_eq!(manifest.to_value().unwrap(), us_core_manifest());
}

#[test]
fn registry_manifest_text_keeps_key_order() {
    let text = serde_json::to_string(&us_core_manifest()).unwrap();
    let manifest: PackageManifest = serde_json::from_str(&text).unwrap();
    let written = serde_json::to_string(&manifest).unwrap();

    let dependencies = &written[written.find("\"dependencies\"").unwrap()..];
    let r4 = dependencies.find("hl7.fhir.r4.core").unwrap();
    let terminology = dependencies.find("hl7.terminology.r4").unwrap();
    let sdc = dependencies.find("hl7.fhir.uv.sdc").unwrap();
    assert!(r4 < terminology && terminology < sdc, "{written}");
}

#[test]
fn dependencies_are_sorted_identifiers() {
    let manifest = PackageManifest::from_value(&us_core_manifest()).unwrap();
    let ids: Vec<String> = manifest
        .dependency_identifiers()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        ids,
        vec![
            "hl7.fhir.r4.core#4.0.1",
            "hl7.fhir.uv.sdc#3.0.0",
            "hl7.terminology.r4#5.0.0"
        ]
    );
}

#[test]
fn manifest_without_core_dependency() {
    let mut manifest = PackageManifest::new("example.fhir.profiles", "0.0.1");
    assert!(!manifest.has_core_dependency());

    manifest.add_dependency("hl7.fhir.r5.core", "5.0.0");
    assert!(manifest.has_core_dependency());
    assert_eq!(
        manifest.to_value().unwrap(),
        json!({
            "name": "example.fhir.profiles",
            "version": "0.0.1",
            "dependencies": {"hl7.fhir.r5.core": "5.0.0"}
        })
    );
}

#[test]
fn cached_manifest_with_embedded_index() {
    let manifest = PackageManifest::from_value(&json!({
        "name": "hl7.terminology.r4",
        "version": "5.0.0",
        "installedPath": "/home/user/.fhir/packages/hl7.terminology.r4#5.0.0",
        ".index.json": {
            "index-version": 2,
            "files": [{
                "filename": "CodeSystem-v3-ActCode.json",
                "resourceType": "CodeSystem",
                "id": "v3-ActCode",
                "url": "http://terminology.hl7.org/CodeSystem/v3-ActCode",
                "version": "7.0.0",
                "content": "complete"
            }]
        }
    }))
    .unwrap();

    let entries = manifest.index_entries_with_package();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].package(),
        FhirPackageIdentifier::new("hl7.terminology.r4", "5.0.0")
    );
    assert_eq!(entries[0].entry.content.as_deref(), Some("complete"));

    let flat = serde_json::to_value(&entries[0]).unwrap();
    assert_eq!(flat["__packageId"], "hl7.terminology.r4");
    assert_eq!(flat["id"], "v3-ActCode");

    let back: FileIndexEntryWithPkg = serde_json::from_value(flat).unwrap();
    assert_eq!(back, entries[0]);
}

#[test]
fn index_lookup_by_url() {
    let index = PackageIndex::from_value(&json!({
        "index-version": 2,
        "files": [
            {
                "filename": "StructureDefinition-bp.json",
                "resourceType": "StructureDefinition",
                "id": "bp",
                "url": "http://hl7.org/fhir/StructureDefinition/bp",
                "kind": "resource",
                "type": "Observation",
                "derivation": "constraint"
            },
            {
                "filename": "SearchParameter-patient-name.json",
                "resourceType": "SearchParameter",
                "id": "individual-given",
                "url": "http://hl7.org/fhir/SearchParameter/individual-given",
                "type": "string"
            }
        ]
    }))
    .unwrap();

    let bp = index
        .find_by_url("http://hl7.org/fhir/StructureDefinition/bp")
        .unwrap();
    assert_eq!(bp.r#type.as_deref(), Some("Observation"));
    assert!(index.find_by_url("http://example.org/missing").is_none());
    assert_eq!(index.files_of_type("SearchParameter").count(), 1);
}

#[test]
fn malformed_documents_are_json_errors() {
    let err = PackageManifest::from_value(&json!({"name": "no.version"})).unwrap_err();
    assert!(matches!(err, PackageError::Json(_)));

    let err = PackageIndex::from_value(&json!({"files": []})).unwrap_err();
    assert!(matches!(err, PackageError::Json(_)));
}

#[test]
fn identifier_references() {
    let scoped: FhirPackageIdentifier = "@scope/pkg@1.2.3".parse().unwrap();
    assert_eq!(scoped.id, "@scope/pkg");
    assert_eq!(scoped.version.as_deref(), Some("1.2.3"));

    let latest: FhirPackageIdentifier = "hl7.fhir.r4.core".parse().unwrap();
    assert!(latest.is_latest());

    assert!(matches!(
        "hl7.fhir.r4.core#".parse::<FhirPackageIdentifier>(),
        Err(PackageError::InvalidIdentifier(_))
    ));
}
