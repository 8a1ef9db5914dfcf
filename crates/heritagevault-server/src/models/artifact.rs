//! Artifact model for the cultural-heritage catalog.

use chrono::{DateTime, Utc};
use heritagevault_hash::{ArtifactKind, ArtifactMetadata};
use serde::{Deserialize, Serialize};

/// A cataloged artifact record.
///
/// The two hash fields are written once, when the artifact is created with
/// image bytes, and never overwritten afterwards. Verification recomputes
/// digests from the stored metadata and image copy and compares them against
/// these recorded values; `verified` only ever transitions false -> true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub origin: String,
    /// Price in the smallest currency unit.
    pub price: i64,
    /// Public URL of the artifact image.
    pub image_url: String,
    /// File name of the server-local stored copy of the uploaded image,
    /// relative to the uploads directory. Absent for records created
    /// without image bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Digest over canonical metadata + image bytes, recorded at creation.
    pub verification_hash: Option<String>,
    /// Digest over canonical metadata alone, recorded at creation.
    pub metadata_hash: Option<String>,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// The descriptive fields bound by this artifact's digests.
    pub fn metadata(&self) -> ArtifactMetadata {
        ArtifactMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            kind: self.kind,
            origin: self.origin.clone(),
            price: self.price,
        }
    }
}

/// Data required to create a new artifact.
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub name: String,
    pub description: String,
    pub kind: ArtifactKind,
    pub origin: String,
    pub price: i64,
    pub image_url: String,
    pub image_path: Option<String>,
    pub verification_hash: Option<String>,
    pub metadata_hash: Option<String>,
    pub owner_id: i32,
}
