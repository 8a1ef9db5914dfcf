// JCS (JSON Canonicalization Scheme) - RFC 8785

use anyhow::Result;
use serde::Serialize;

/// Canonicalizes a serializable value according to RFC 8785 (JCS) and returns the UTF-8 bytes.
///
/// This is the "stable byte string" that artifact digests are computed over:
/// object keys are sorted lexicographically, whitespace is dropped, and
/// numbers serialize the same way on every platform. Two metadata values with
/// identical fields always canonicalize to identical bytes, regardless of the
/// field order the caller happened to use.
pub fn jcs_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let canonical = serde_jcs::to_string(value)?;
    Ok(canonical.into_bytes())
}
