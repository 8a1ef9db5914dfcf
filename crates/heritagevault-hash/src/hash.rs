// SHA-256 digest helpers

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the input bytes and returns it as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Computes the SHA-256 hash of two byte slices fed in sequence.
///
/// Used to bind a canonical metadata encoding to image content without
/// allocating an intermediate concatenated buffer.
pub fn sha256_hex_concat(first: &[u8], second: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(first);
    hasher.update(second);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn lowercase_hex_output() {
        let digest = sha256_hex(b"heritage");
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn concat_matches_single_buffer() {
        let mut joined = b"abc".to_vec();
        joined.extend_from_slice(b"def");
        assert_eq!(sha256_hex_concat(b"abc", b"def"), sha256_hex(&joined));
    }
}
