//! Source snapshots taken when a run is triggered

use sha2::{Digest, Sha256};

/// Immutable copy of the source text at a given buffer revision
///
/// A run compiles the snapshot, never the live buffer, so edits made while
/// a run is in flight cannot leak into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    text: String,
    revision: u64,
}

impl SourceSnapshot {
    pub fn new(text: impl Into<String>, revision: u64) -> Self {
        Self {
            text: text.into(),
            revision,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Buffer revision the snapshot was taken at
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Short content hash, used to correlate log lines with runs
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.text.as_bytes());
        digest[..8].iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

impl From<&str> for SourceSnapshot {
    fn from(text: &str) -> Self {
        Self::new(text, 0)
    }
}

impl AsRef<str> for SourceSnapshot {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = SourceSnapshot::new("(+ 1 2)", 7);
        assert_eq!(snapshot.text(), "(+ 1 2)");
        assert_eq!(snapshot.revision(), 7);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let a = SourceSnapshot::new("(print 1)", 1);
        let b = SourceSnapshot::new("(print 1)", 9);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_fingerprint_differs_for_different_text() {
        let a = SourceSnapshot::from("(print 1)");
        let b = SourceSnapshot::from("(print 2)");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
