//! Artifact content digests.
//!
//! Two digests are recorded for every uploaded artifact:
//!
//! - the metadata hash, computed over the canonical JCS encoding of the
//!   descriptive fields alone, and
//! - the verification hash, computed over the canonical metadata encoding
//!   followed by the base64 encoding of the exact image bytes.
//!
//! The verification hash binds the record to both its description and its
//! image content: a later edit to either produces a different digest, which
//! is what the server's verify step detects.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::hash::{sha256_hex, sha256_hex_concat};
use crate::jcs::jcs_canonical_bytes;
use crate::types::ArtifactMetadata;

/// Digest of the canonical JCS encoding of any serializable value.
///
/// Used for the free-form key/value metadata attached to pinned uploads.
pub fn json_digest<T: Serialize>(value: &T) -> Result<String> {
    Ok(sha256_hex(&jcs_canonical_bytes(value)?))
}

/// Digest of an artifact's descriptive fields.
///
/// Deterministic: identical field values produce identical digests on every
/// platform, independent of field order at the call site.
pub fn metadata_hash(metadata: &ArtifactMetadata) -> Result<String> {
    json_digest(metadata)
}

/// Digest binding an artifact's descriptive fields to its image bytes.
///
/// The image bytes enter the digest through a fixed base64 (standard
/// alphabet, padded) encoding appended to the canonical metadata bytes.
pub fn verification_hash(metadata: &ArtifactMetadata, image_bytes: &[u8]) -> Result<String> {
    let canonical = jcs_canonical_bytes(metadata)?;
    let encoded_image = BASE64_STANDARD.encode(image_bytes);
    Ok(sha256_hex_concat(&canonical, encoded_image.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactKind;

    fn sample_metadata() -> ArtifactMetadata {
        ArtifactMetadata {
            name: "Batik A".to_string(),
            description: "Hand-drawn batik from Solo".to_string(),
            kind: ArtifactKind::Batik,
            origin: "Solo".to_string(),
            price: 100_000,
        }
    }

    #[test]
    fn metadata_hash_golden_value() {
        // sha256 of:
        // {"description":"Hand-drawn batik from Solo","name":"Batik A","origin":"Solo","price":100000,"type":"batik"}
        assert_eq!(
            metadata_hash(&sample_metadata()).unwrap(),
            "14b12976ae736e28d0e6e3b7536e87aaf78b28b6600056c785a52f64720493a9"
        );
    }

    #[test]
    fn verification_hash_golden_value() {
        let digest = verification_hash(&sample_metadata(), b"batik image bytes").unwrap();
        assert_eq!(
            digest,
            "4b1cfb981cef8c0753b03c1e930f7c578477bd61f524b53bbd6953ab3ada7204"
        );
    }

    #[test]
    fn metadata_hash_is_deterministic() {
        let a = metadata_hash(&sample_metadata()).unwrap();
        let b = metadata_hash(&sample_metadata()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verification_hash_changes_with_any_image_byte() {
        let metadata = sample_metadata();
        let original = verification_hash(&metadata, b"batik image bytes").unwrap();
        let tampered = verification_hash(&metadata, b"batik image byteX").unwrap();
        assert_ne!(original, tampered);
    }

    #[test]
    fn verification_hash_changes_with_metadata() {
        let image = b"batik image bytes";
        let original = verification_hash(&sample_metadata(), image).unwrap();

        let mut renamed = sample_metadata();
        renamed.name = "Batik B".to_string();
        assert_ne!(original, verification_hash(&renamed, image).unwrap());

        let mut repriced = sample_metadata();
        repriced.price += 1;
        assert_ne!(original, verification_hash(&repriced, image).unwrap());
    }

    #[test]
    fn verification_hash_differs_from_metadata_hash() {
        let metadata = sample_metadata();
        assert_ne!(
            metadata_hash(&metadata).unwrap(),
            verification_hash(&metadata, b"").unwrap()
        );
    }

    #[test]
    fn json_digest_of_pin_keyvalues() {
        let keyvalues = serde_json::json!({ "region": "Solo", "artist": "Ibu Sari" });
        assert_eq!(
            json_digest(&keyvalues).unwrap(),
            "b02e1631ad4e36558389b83a57c3777e471d0d2e5896575874aaa3b27064fb97"
        );
    }

    #[test]
    fn json_digest_of_empty_object() {
        let empty = serde_json::json!({});
        assert_eq!(
            json_digest(&empty).unwrap(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
