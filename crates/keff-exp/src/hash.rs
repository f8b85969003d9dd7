//! Canonical JSON serialization and stable plan hashing.

use serde::Serialize;
use sha2::{Digest, Sha256};

use keff_core::{ErrorInfo, KeffError};

/// Serializes a payload to canonical JSON bytes (object keys sorted by the
/// `serde_json::Value` round trip) so equal payloads hash equally.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, KeffError> {
    let value = serde_json::to_value(value)
        .map_err(|err| KeffError::Report(ErrorInfo::new("json-encode", err.to_string())))?;
    serde_json::to_vec_pretty(&value)
        .map_err(|err| KeffError::Report(ErrorInfo::new("json-encode", err.to_string())))
}

/// Computes a stable hexadecimal SHA-256 hash for a serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, KeffError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{digest:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_payloads_hash_equally() {
        let a = stable_hash_string(&("plan", 42u64)).unwrap();
        let b = stable_hash_string(&("plan", 42u64)).unwrap();
        let c = stable_hash_string(&("plan", 43u64)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
