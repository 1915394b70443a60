//! Hashing Utilities

use sha2::{Digest, Sha256};

/// Derive a stable 32-bit key from an identifying string.
///
/// Used for alarm slots (keyed by event id) and notification ids (keyed by
/// title). The value is the first four bytes of the SHA-256 digest read as a
/// big-endian `i32`, so it is identical across runs and processes.
pub fn stable_key(s: &str) -> i32 {
    let digest = Sha256::digest(s.as_bytes());
    i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_key() {
        // sha256("hello") = 2cf24dba...
        assert_eq!(stable_key("hello"), 0x2cf24dba);
        assert_eq!(stable_key("Open House"), stable_key("Open House"));
        assert_ne!(stable_key("evt-42"), stable_key("evt-43"));
    }
}
