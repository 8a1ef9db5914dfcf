//! Shared types for artifact content binding.
//!
//! The digest functions in this crate operate on [`ArtifactMetadata`], the
//! fixed set of descriptive fields every artifact record carries. Keeping the
//! type here lets the server and the CLI compute byte-identical digests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of a cultural-heritage artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Batik,
    Tenun,
    Carving,
    Kris,
    Other,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Batik => "batik",
            ArtifactKind::Tenun => "tenun",
            ArtifactKind::Carving => "carving",
            ArtifactKind::Kris => "kris",
            ArtifactKind::Other => "other",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized artifact kind.
#[derive(Debug, thiserror::Error)]
#[error("unknown artifact kind: '{0}' (expected batik, tenun, carving, kris or other)")]
pub struct UnknownKind(pub String);

impl FromStr for ArtifactKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batik" => Ok(ArtifactKind::Batik),
            "tenun" => Ok(ArtifactKind::Tenun),
            "carving" => Ok(ArtifactKind::Carving),
            "kris" => Ok(ArtifactKind::Kris),
            "other" => Ok(ArtifactKind::Other),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// The descriptive fields bound by an artifact's digests.
///
/// The verification hash covers this metadata plus the artifact's image
/// bytes, so editing any of these fields after upload invalidates the
/// recorded digest. Field names here are part of the digest input (the
/// canonical JCS encoding serializes them), which is why `kind` keeps the
/// wire name `type` used by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub origin: String,
    /// Price in the smallest currency unit.
    pub price: i64,
}
