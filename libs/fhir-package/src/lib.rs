//! Canonical shapes for the FHIR NPM Package documents.
//!
//! Provides serde-friendly representations of `package.json` manifests,
//! `.index.json` / `.fpi.index.json` file indexes and registry package
//! identifiers. Field names follow the documents exactly, see
//! <https://hl7.org/fhir/packages.html>.
//!
//! Nothing here reads or writes files; the types only describe what a
//! consumer should expect to find.
//!
//! # Example
//!
//! ```rust
//! use fhirkit_package::{FhirPackageIdentifier, PackageManifest};
//! use serde_json::json;
//!
//! let manifest: PackageManifest = serde_json::from_value(json!({
//!     "name": "hl7.fhir.us.core",
//!     "version": "6.1.0",
//!     "dependencies": { "hl7.fhir.r4.core": "4.0.1" },
//!     "author": "HL7 International"
//! }))
//! .unwrap();
//!
//! assert_eq!(
//!     manifest.dependency_identifiers(),
//!     vec![FhirPackageIdentifier::new("hl7.fhir.r4.core", "4.0.1")]
//! );
//! assert_eq!(manifest.extra["author"], "HL7 International");
//! ```

pub mod error;
pub mod identifier;
pub mod index;
pub mod manifest;
pub mod open;

pub use error::{PackageError, PackageResult};
pub use identifier::FhirPackageIdentifier;
pub use index::{FileInPackageIndex, FileIndexEntryWithPkg, PackageIndex};
pub use manifest::PackageManifest;
pub use open::{ExtensionMap, OpenRecord};

pub type PackageName = String;
pub type Version = String;
pub type VersionReference = String;
