// HeritageVault Hash - content digests for artifact records

pub mod content;
pub mod hash;
pub mod jcs;
pub mod types;

pub use content::{json_digest, metadata_hash, verification_hash};
pub use hash::sha256_hex;
pub use jcs::jcs_canonical_bytes;
pub use types::{ArtifactKind, ArtifactMetadata, UnknownKind};
