//! Package index documents (`.index.json`, `.fpi.index.json`), index version 2.

use crate::error::PackageResult;
use crate::identifier::FhirPackageIdentifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File entry in a package index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInPackageIndex {
    pub filename: String,
    pub resource_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl FileInPackageIndex {
    pub fn new(
        filename: impl Into<String>,
        resource_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            resource_type: resource_type.into(),
            id: id.into(),
            url: None,
            name: None,
            version: None,
            kind: None,
            r#type: None,
            supplements: None,
            content: None,
            base_definition: None,
            derivation: None,
            date: None,
        }
    }
}

/// Package index (`.index.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIndex {
    #[serde(rename = "index-version")]
    pub index_version: u32,
    pub files: Vec<FileInPackageIndex>,
}

impl PackageIndex {
    /// Index format version written by current package tooling.
    pub const CURRENT_VERSION: u32 = 2;

    pub fn new(files: Vec<FileInPackageIndex>) -> Self {
        Self {
            index_version: Self::CURRENT_VERSION,
            files,
        }
    }

    /// Entries whose `resourceType` equals `resource_type`.
    pub fn files_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a FileInPackageIndex> + 'a {
        self.files
            .iter()
            .filter(move |file| file.resource_type == resource_type)
    }

    /// Find the entry for a canonical URL.
    pub fn find_by_url(&self, url: &str) -> Option<&FileInPackageIndex> {
        self.files
            .iter()
            .find(|file| file.url.as_deref() == Some(url))
    }

    pub fn from_value(value: &Value) -> PackageResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_value(&self) -> PackageResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Index entry annotated with the package it was found in.
///
/// Serialized as one flat object: the entry's fields plus `__packageId` and
/// `__packageVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndexEntryWithPkg {
    #[serde(flatten)]
    pub entry: FileInPackageIndex,
    #[serde(rename = "__packageId")]
    pub package_id: String,
    #[serde(
        rename = "__packageVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub package_version: Option<String>,
}

impl FileIndexEntryWithPkg {
    pub fn new(entry: FileInPackageIndex, package: &FhirPackageIdentifier) -> Self {
        Self {
            entry,
            package_id: package.id.clone(),
            package_version: package.version.clone(),
        }
    }

    /// The owning package.
    pub fn package(&self) -> FhirPackageIdentifier {
        FhirPackageIdentifier {
            id: self.package_id.clone(),
            version: self.package_version.clone(),
        }
    }
}

impl AsRef<FileInPackageIndex> for FileIndexEntryWithPkg {
    fn as_ref(&self) -> &FileInPackageIndex {
        &self.entry
    }
}

impl From<FileIndexEntryWithPkg> for FileInPackageIndex {
    fn from(annotated: FileIndexEntryWithPkg) -> Self {
        annotated.entry
    }
}
