//! Console transcript

/// Ordered, append-only record of console output
///
/// Chunks are kept exactly as written. The visible transcript is their
/// concatenation in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleTranscript {
    chunks: Vec<String>,
    len: usize,
}

impl ConsoleTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk
    ///
    /// Empty chunks leave the transcript untouched. Returns whether anything
    /// was appended.
    pub fn append(&mut self, chunk: &str) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.len += chunk.len();
        self.chunks.push(chunk.to_string());
        true
    }

    /// Drop every chunk
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.len = 0;
    }

    /// The concatenated transcript text
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.len);
        for chunk in &self.chunks {
            text.push_str(chunk);
        }
        text
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Length of the concatenated text in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let transcript = ConsoleTranscript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.text(), "");
        assert_eq!(transcript.chunk_count(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = ConsoleTranscript::new();
        transcript.append("a");
        transcript.append("b");
        transcript.append("c");
        assert_eq!(transcript.text(), "abc");
        assert_eq!(transcript.chunks(), ["a", "b", "c"]);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_empty_chunk_ignored() {
        let mut transcript = ConsoleTranscript::new();
        assert!(!transcript.append(""));
        assert!(transcript.append("x"));
        assert_eq!(transcript.chunk_count(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut transcript = ConsoleTranscript::new();
        transcript.append("hello\n");
        transcript.append("world\n");
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.text(), "");
        assert_eq!(transcript.chunk_count(), 0);

        transcript.append("again");
        assert_eq!(transcript.text(), "again");
    }
}
