//! FHIR version identifiers
//!
//! Three closed sets of literals: full versions and release names
//! ([`FhirVersion`]), `major.minor` numbers ([`FhirVersionMinor`]) and
//! release names alone ([`FhirRelease`]).

use crate::error::{Error, Result};
use fhirkit_package::FhirPackageIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported FHIR version formats: full versions, minor versions and release names.
///
/// Any other literal is rejected, both when naming a variant and when parsing:
///
/// ```compile_fail
/// use fhirkit_types::FhirVersion;
///
/// let _ = FhirVersion::R6;
/// ```
///
/// ```rust
/// use fhirkit_types::FhirVersion;
///
/// assert_eq!("4.0.1".parse::<FhirVersion>().unwrap(), FhirVersion::V4_0_1);
/// assert!("6.0.0".parse::<FhirVersion>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FhirVersion {
    #[serde(rename = "3.0.2")]
    V3_0_2,
    #[serde(rename = "4.0.1")]
    V4_0_1,
    #[serde(rename = "4.3.0")]
    V4_3_0,
    #[serde(rename = "5.0.0")]
    V5_0_0,
    #[serde(rename = "3.0")]
    V3_0,
    #[serde(rename = "4.0")]
    V4_0,
    #[serde(rename = "4.3")]
    V4_3,
    #[serde(rename = "5.0")]
    V5_0,
    R3,
    #[serde(rename = "STU3")]
    Stu3,
    R4,
    R4B,
    R5,
}

impl FhirVersion {
    pub const ALL: [FhirVersion; 13] = [
        Self::V3_0_2,
        Self::V4_0_1,
        Self::V4_3_0,
        Self::V5_0_0,
        Self::V3_0,
        Self::V4_0,
        Self::V4_3,
        Self::V5_0,
        Self::R3,
        Self::Stu3,
        Self::R4,
        Self::R4B,
        Self::R5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3_0_2 => "3.0.2",
            Self::V4_0_1 => "4.0.1",
            Self::V4_3_0 => "4.3.0",
            Self::V5_0_0 => "5.0.0",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
            Self::V4_3 => "4.3",
            Self::V5_0 => "5.0",
            Self::R3 => "R3",
            Self::Stu3 => "STU3",
            Self::R4 => "R4",
            Self::R4B => "R4B",
            Self::R5 => "R5",
        }
    }

    /// Release this version belongs to. `STU3` stays `STU3`; the numeric
    /// 3.x forms map to `R3`.
    pub fn release(&self) -> FhirRelease {
        match self {
            Self::V3_0_2 | Self::V3_0 | Self::R3 => FhirRelease::R3,
            Self::Stu3 => FhirRelease::Stu3,
            Self::V4_0_1 | Self::V4_0 | Self::R4 => FhirRelease::R4,
            Self::V4_3_0 | Self::V4_3 | Self::R4B => FhirRelease::R4B,
            Self::V5_0_0 | Self::V5_0 | Self::R5 => FhirRelease::R5,
        }
    }

    pub fn minor(&self) -> FhirVersionMinor {
        match self.release() {
            FhirRelease::R3 | FhirRelease::Stu3 => FhirVersionMinor::V3_0,
            FhirRelease::R4 => FhirVersionMinor::V4_0,
            FhirRelease::R4B => FhirVersionMinor::V4_3,
            FhirRelease::R5 => FhirVersionMinor::V5_0,
        }
    }

    /// Full `major.minor.patch` version of the release.
    pub fn full_version(&self) -> &'static str {
        match self.minor() {
            FhirVersionMinor::V3_0 => "3.0.2",
            FhirVersionMinor::V4_0 => "4.0.1",
            FhirVersionMinor::V4_3 => "4.3.0",
            FhirVersionMinor::V5_0 => "5.0.0",
        }
    }

    /// Core package of the release, e.g. `hl7.fhir.r4.core#4.0.1`.
    pub fn core_package(&self) -> FhirPackageIdentifier {
        let id = match self.minor() {
            FhirVersionMinor::V3_0 => "hl7.fhir.r3.core",
            FhirVersionMinor::V4_0 => "hl7.fhir.r4.core",
            FhirVersionMinor::V4_3 => "hl7.fhir.r4b.core",
            FhirVersionMinor::V5_0 => "hl7.fhir.r5.core",
        };
        FhirPackageIdentifier::new(id, self.full_version())
    }

    /// Whether two identifiers name the same release (`4.0.1` ~ `R4`).
    pub fn same_release(&self, other: &FhirVersion) -> bool {
        self.minor() == other.minor()
    }
}

impl fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FhirVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnknownFhirVersion(s.to_string()))
    }
}

impl From<FhirVersionMinor> for FhirVersion {
    fn from(minor: FhirVersionMinor) -> Self {
        match minor {
            FhirVersionMinor::V3_0 => Self::V3_0,
            FhirVersionMinor::V4_0 => Self::V4_0,
            FhirVersionMinor::V4_3 => Self::V4_3,
            FhirVersionMinor::V5_0 => Self::V5_0,
        }
    }
}

impl From<FhirRelease> for FhirVersion {
    fn from(release: FhirRelease) -> Self {
        match release {
            FhirRelease::R3 => Self::R3,
            FhirRelease::Stu3 => Self::Stu3,
            FhirRelease::R4 => Self::R4,
            FhirRelease::R4B => Self::R4B,
            FhirRelease::R5 => Self::R5,
        }
    }
}

/// FHIR minor version numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FhirVersionMinor {
    #[serde(rename = "3.0")]
    V3_0,
    #[serde(rename = "4.0")]
    V4_0,
    #[serde(rename = "4.3")]
    V4_3,
    #[serde(rename = "5.0")]
    V5_0,
}

impl FhirVersionMinor {
    pub const ALL: [FhirVersionMinor; 4] = [Self::V3_0, Self::V4_0, Self::V4_3, Self::V5_0];

    pub fn as_str(&self) -> &'static str {
        FhirVersion::from(*self).as_str()
    }
}

impl fmt::Display for FhirVersionMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FhirVersionMinor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnknownLiteral {
                kind: "FhirVersionMinor",
                value: s.to_string(),
            })
    }
}

/// FHIR release names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FhirRelease {
    R3,
    #[serde(rename = "STU3")]
    Stu3,
    R4,
    R4B,
    R5,
}

impl FhirRelease {
    pub const ALL: [FhirRelease; 5] = [Self::R3, Self::Stu3, Self::R4, Self::R4B, Self::R5];

    pub fn as_str(&self) -> &'static str {
        FhirVersion::from(*self).as_str()
    }

    pub fn minor(&self) -> FhirVersionMinor {
        FhirVersion::from(*self).minor()
    }
}

impl fmt::Display for FhirRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FhirRelease {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::UnknownLiteral {
                kind: "FhirRelease",
                value: s.to_string(),
            })
    }
}
