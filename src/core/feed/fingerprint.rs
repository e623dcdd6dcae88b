use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 128-bit digest identifying an entry revision, kept as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes `entry_id` immediately followed by `updated`. Stored fingerprints
/// depend on this exact concatenation, so neither a separator nor the order
/// may change.
pub fn fingerprint(entry_id: &str, updated: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(entry_id.as_bytes());
    hasher.update(updated.as_bytes());
    let digest = hasher.finalize();
    let hex = digest[..16]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    Fingerprint(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint("urn:post:1", "2026-02-24T10:00:00Z");
        let b = fingerprint("urn:post:1", "2026-02-24T10:00:00Z");
        assert_eq!(a, b);
        assert_eq!(a.as_hex().len(), 32);
        assert!(a.as_hex().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_changes_with_either_input() {
        let base = fingerprint("urn:post:1", "2026-02-24T10:00:00Z");
        assert_ne!(base, fingerprint("urn:post:2", "2026-02-24T10:00:00Z"));
        assert_ne!(base, fingerprint("urn:post:1", "2026-02-24T11:00:00Z"));
    }

    #[test]
    fn fingerprint_uses_plain_concatenation() {
        assert_eq!(fingerprint("ab", "c"), fingerprint("a", "bc"));
        assert_eq!(fingerprint("", ""), fingerprint("", ""));
    }
}
