//! Registry package identifiers (`hl7.fhir.r4.core#4.0.1`).

use crate::error::{PackageError, PackageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for a FHIR package in a registry.
///
/// A missing `version` means "latest".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FhirPackageIdentifier {
    /// Package id, e.g. `hl7.fhir.r4.core`
    pub id: String,
    /// Package version, e.g. `4.0.1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl FhirPackageIdentifier {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Some(version.into()),
        }
    }

    /// Identifier without a version, resolved by registries to the latest release.
    pub fn latest(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
        }
    }

    pub fn is_latest(&self) -> bool {
        self.version.is_none()
    }

    /// Parse `id#version`, `id@version` or a bare `id`.
    pub fn parse(input: &str) -> PackageResult<Self> {
        let input = input.trim();
        let (id, version) = match split_reference(input) {
            Some((id, version)) => (id, Some(version)),
            None => (input, None),
        };

        if id.is_empty() {
            return Err(PackageError::InvalidIdentifier(format!(
                "'{}' has no package id",
                input
            )));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(PackageError::InvalidIdentifier(format!(
                "package id '{}' contains whitespace",
                id
            )));
        }
        if version.is_some_and(str::is_empty) {
            return Err(PackageError::InvalidIdentifier(format!(
                "'{}' has an empty version",
                input
            )));
        }

        Ok(Self {
            id: id.to_string(),
            version: version.map(str::to_string),
        })
    }
}

/// Split on `#`, or on an `@` that does not start the string (npm scopes).
fn split_reference(input: &str) -> Option<(&str, &str)> {
    if let Some(split) = input.split_once('#') {
        return Some(split);
    }
    match input.rfind('@') {
        Some(pos) if pos > 0 => Some((&input[..pos], &input[pos + 1..])),
        _ => None,
    }
}

impl fmt::Display for FhirPackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}#{}", self.id, version),
            None => write!(f, "{}", self.id),
        }
    }
}

impl FromStr for FhirPackageIdentifier {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
