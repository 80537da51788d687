//! Deterministic fingerprints over serializable values.
//!
//! Range keys and policy parameter hashes are xxh64 digests of a value's
//! canonical JSON encoding. Struct fields serialize in declaration order
//! and hashed values must not contain `HashMap`s (use `BTreeMap`), so the
//! same input always produces the same digest.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Compute the xxh64 fingerprint of a serializable value.
pub fn fingerprint<T: Serialize>(value: &T) -> u64 {
    let bytes = serde_json::to_vec(value).expect("fingerprint serialization failed");
    xxh64(&bytes, 0)
}

/// Compute the fingerprint and render it as a fixed-width hex string.
pub fn fingerprint_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", fingerprint(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        label: String,
        count: u32,
    }

    #[test]
    fn test_fingerprint_determinism() {
        let s = Sample {
            label: "window".to_string(),
            count: 7,
        };
        assert_eq!(fingerprint(&s), fingerprint(&s));
    }

    #[test]
    fn test_fingerprint_sensitivity() {
        let a = Sample {
            label: "window".to_string(),
            count: 7,
        };
        let b = Sample {
            label: "window".to_string(),
            count: 8,
        };
        assert_ne!(fingerprint_hex(&a), fingerprint_hex(&b));
    }

    #[test]
    fn test_hex_width() {
        let s = Sample {
            label: String::new(),
            count: 0,
        };
        assert_eq!(fingerprint_hex(&s).len(), 16);
    }
}
