// Integrity stage - content digests for backup payloads

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of a byte payload.
///
/// This is the integrity anchor for a backup run: it is computed over the
/// raw capture bytes before any compression or encryption, and restore
/// verifies the recovered content against it.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let payload = b"order ledger snapshot";
        assert_eq!(sha256_hex(payload), sha256_hex(payload));
    }

    #[test]
    fn digest_is_64_hex_chars() {
        let digest = sha256_hex(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn distinct_payloads_have_distinct_digests() {
        assert_ne!(sha256_hex(b"catalog-a"), sha256_hex(b"catalog-b"));
    }
}
