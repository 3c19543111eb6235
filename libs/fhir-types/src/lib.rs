//! FHIR type catalog
//!
//! Strongly-typed shapes shared by FHIR tooling: version identifiers, the
//! generic resource envelope, Bundles, CapabilityStatements, element
//! definitions and the package registry documents re-exported from
//! [`fhirkit_package`].
//!
//! # Design
//!
//! - **Open records**: resource-like shapes keep every field they do not
//!   model in an `extra` map, so documents round-trip unchanged
//! - **Fixed fields win**: a named field always owns its JSON key; the same
//!   key in `extra` is never serialized
//! - **Closed literal sets**: versions, binding strengths, slicing rules and
//!   discriminator types reject anything outside their set
//!
//! # Example
//!
//! ```rust
//! use fhirkit_types::{Bundle, FhirResource, FhirVersion, Resource};
//! use serde_json::json;
//!
//! let bundle: Bundle = serde_json::from_value(json!({
//!     "resourceType": "Bundle",
//!     "type": "searchset",
//!     "total": 1,
//!     "entry": [{
//!         "fullUrl": "http://example.org/fhir/Patient/p1",
//!         "resource": {"resourceType": "Patient", "id": "p1", "active": true}
//!     }]
//! }))
//! .unwrap();
//!
//! let patient: &Resource = bundle.resources().next().unwrap();
//! assert_eq!(patient.reference().as_deref(), Some("Patient/p1"));
//! assert_eq!(patient.extra["active"], true);
//!
//! assert_eq!(FhirVersion::R4.core_package().to_string(), "hl7.fhir.r4.core#4.0.1");
//! ```

pub mod bundle;
pub mod capability;
pub mod element_definition;
pub mod error;
pub mod logger;
pub mod resource;
pub mod version;

pub use bundle::*;
pub use capability::*;
pub use element_definition::*;
pub use error::{Error, Result};
pub use logger::*;
pub use resource::*;
pub use version::*;

pub use fhirkit_package as package;
pub use fhirkit_package::{
    ExtensionMap, FhirPackageIdentifier, FileInPackageIndex, FileIndexEntryWithPkg, OpenRecord,
    PackageError, PackageIndex, PackageManifest,
};
