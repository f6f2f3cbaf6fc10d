//! Content Hashing for Proof Records
//!
//! Provides deterministic SHA-256 hashing for:
//! - Proof record digests (tamper evidence)
//! - Audit replay (recompute and compare)
//! - Deduplication of identical verifications
//!
//! Variable-length fields are length-prefixed so that adjacent fields can
//! never be confused (`"ab" + "c"` hashes differently from `"a" + "bc"`).

use std::collections::BTreeSet;
use sha2::{Sha256, Digest};

use super::rewrite::RuleId;
use super::word::LifecycleWord;

/// Hash output type (256 bits / 32 bytes)
pub type ContentHash = [u8; 32];

/// Deterministic hasher for verification content.
///
/// Wraps SHA-256 with helpers for words and rule sets.
/// Order of updates is critical for determinism.
pub struct ContentHasher {
    hasher: Sha256,
}

impl ContentHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for proof records.
    pub fn for_proof_record() -> Self {
        Self::new(b"HECKE_GATE_PROOF_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a length-prefixed UTF-8 string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
    }

    /// Update with a length-prefixed lifecycle word.
    pub fn update_word(&mut self, word: &LifecycleWord) {
        self.update_u32(word.len() as u32);
        self.hasher.update(word.as_slice());
    }

    /// Update with a length-prefixed rule set (sorted by construction).
    pub fn update_rules(&mut self, rules: &BTreeSet<RuleId>) {
        self.update_u8(rules.len() as u8);
        for rule in rules {
            self.update_u8(rule.tag());
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> ContentHash {
        self.hasher.finalize().into()
    }
}

/// Parse a lowercase or uppercase hex digest.
pub fn parse_hex_hash(s: &str) -> Option<ContentHash> {
    let bytes = hex::decode(s).ok()?;
    bytes.try_into().ok()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn word(g: &[u8]) -> LifecycleWord {
        LifecycleWord::new(g.to_vec()).unwrap()
    }

    #[test]
    fn test_content_hasher_determinism() {
        let make_hash = || {
            let mut hasher = ContentHasher::for_proof_record();
            hasher.update_str("TXN-0001");
            hasher.update_word(&word(&[1, 1, 2]));
            hasher.update_rules(&[RuleId::R1].into_iter().collect::<BTreeSet<_>>());
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = ContentHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = ContentHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        let hash1 = {
            let mut h = ContentHasher::new(b"test");
            h.update_str("ab");
            h.update_str("c");
            h.finalize()
        };

        let hash2 = {
            let mut h = ContentHasher::new(b"test");
            h.update_str("a");
            h.update_str("bc");
            h.finalize()
        };

        assert_ne!(hash1, hash2);

        let hash3 = {
            let mut h = ContentHasher::new(b"test");
            h.update_word(&word(&[1, 2]));
            h.update_word(&word(&[3]));
            h.finalize()
        };

        let hash4 = {
            let mut h = ContentHasher::new(b"test");
            h.update_word(&word(&[1]));
            h.update_word(&word(&[2, 3]));
            h.finalize()
        };

        assert_ne!(hash3, hash4);
    }

    #[test]
    fn test_domain_separation() {
        let hash_in = |domain: &[u8]| {
            let mut h = ContentHasher::new(domain);
            h.update_bytes(&[1, 2, 3, 4]);
            h.finalize()
        };

        assert_ne!(hash_in(b"DOMAIN_A"), hash_in(b"DOMAIN_B"));
    }

    #[test]
    fn test_hex_parsing() {
        let hash = ContentHasher::new(b"hecke").finalize();
        let encoded = hex::encode(hash);
        assert_eq!(encoded.len(), 64);
        assert_eq!(parse_hex_hash(&encoded), Some(hash));
        assert_eq!(parse_hex_hash(&encoded.to_uppercase()), Some(hash));
        assert_eq!(parse_hex_hash("abcd"), None);
        assert_eq!(parse_hex_hash("zz"), None);
    }
}
