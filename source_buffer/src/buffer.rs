//! Source buffer and its shared handle

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use highlighter::{highlight_with, Markup};

use crate::snapshot::SourceSnapshot;
use crate::transcript::ConsoleTranscript;

/// Source text, its highlighted rendering, and the console transcript
///
/// Every observable change bumps `revision`, which hosts use to decide
/// whether a frame needs to be redrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    source: String,
    rendered: String,
    markup: Markup,
    console: ConsoleTranscript,
    revision: u64,
}

impl SourceBuffer {
    /// Create an empty buffer rendering HTML markup
    pub fn new() -> Self {
        Self::with_markup(Markup::default())
    }

    /// Create an empty buffer rendering the given markup
    pub fn with_markup(markup: Markup) -> Self {
        Self {
            source: String::new(),
            rendered: String::new(),
            markup,
            console: ConsoleTranscript::new(),
            revision: 0,
        }
    }

    /// Replace the source text
    ///
    /// No validation. The highlighted rendering is recomputed immediately.
    pub fn set_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
        self.rendered = highlight_with(&self.source, self.markup);
        self.revision += 1;
    }

    /// Append a chunk of output to the console transcript
    pub fn append_to_console(&mut self, chunk: &str) {
        if self.console.append(chunk) {
            self.revision += 1;
        }
    }

    /// Reset the console transcript to empty
    pub fn clear_console(&mut self) {
        self.console.clear();
        self.revision += 1;
    }

    /// Switch rendering target, re-rendering the current source
    pub fn set_markup(&mut self, markup: Markup) {
        if self.markup != markup {
            self.markup = markup;
            self.rendered = highlight_with(&self.source, markup);
            self.revision += 1;
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Highlighted rendering of the current source
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn markup(&self) -> Markup {
        self.markup
    }

    pub fn console(&self) -> &ConsoleTranscript {
        &self.console
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Capture the current source for a run
    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot::new(self.source.clone(), self.revision)
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, single-threaded handle to a [`SourceBuffer`]
///
/// The host edits through one clone while the console sink appends through
/// another. Borrows are never held across calls into the engine.
#[derive(Debug, Clone, Default)]
pub struct SharedSourceBuffer {
    inner: Rc<RefCell<SourceBuffer>>,
}

impl SharedSourceBuffer {
    pub fn new(buffer: SourceBuffer) -> Self {
        Self {
            inner: Rc::new(RefCell::new(buffer)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, SourceBuffer> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, SourceBuffer> {
        self.inner.borrow_mut()
    }

    pub fn set_source(&self, text: impl Into<String>) {
        self.inner.borrow_mut().set_source(text);
    }

    pub fn append_to_console(&self, chunk: &str) {
        self.inner.borrow_mut().append_to_console(chunk);
    }

    pub fn clear_console(&self) {
        self.inner.borrow_mut().clear_console();
    }

    pub fn snapshot(&self) -> SourceSnapshot {
        self.inner.borrow().snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision()
    }

    /// Concatenated console transcript
    pub fn transcript(&self) -> String {
        self.inner.borrow().console().text()
    }

    /// Whether two handles point at the same buffer
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<SourceBuffer> for SharedSourceBuffer {
    fn from(buffer: SourceBuffer) -> Self {
        Self::new(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = SourceBuffer::new();
        assert_eq!(buffer.source(), "");
        assert_eq!(buffer.rendered(), "");
        assert!(buffer.console().is_empty());
        assert_eq!(buffer.revision(), 0);
        assert_eq!(buffer.markup(), Markup::Html);
    }

    #[test]
    fn test_set_source_rerenders() {
        let mut buffer = SourceBuffer::new();
        buffer.set_source("(+ 1 2)");
        assert_eq!(buffer.source(), "(+ 1 2)");
        assert_eq!(buffer.rendered(), "<b>(</b>+ 1 2<b>)</b>");
        assert_eq!(buffer.revision(), 1);
    }

    #[test]
    fn test_set_source_unconditional() {
        let mut buffer = SourceBuffer::new();
        buffer.set_source("(((");
        buffer.set_source("");
        assert_eq!(buffer.source(), "");
        assert_eq!(buffer.rendered(), "");
        assert_eq!(buffer.revision(), 2);
    }

    #[test]
    fn test_console_append_and_clear() {
        let mut buffer = SourceBuffer::new();
        buffer.append_to_console("a");
        buffer.append_to_console("b");
        assert_eq!(buffer.console().text(), "ab");

        buffer.clear_console();
        assert_eq!(buffer.console().text(), "");
    }

    #[test]
    fn test_console_does_not_touch_source() {
        let mut buffer = SourceBuffer::new();
        buffer.set_source("(print 1)");
        buffer.append_to_console("1\n");
        buffer.clear_console();
        assert_eq!(buffer.source(), "(print 1)");
    }

    #[test]
    fn test_empty_chunk_keeps_revision() {
        let mut buffer = SourceBuffer::new();
        buffer.append_to_console("");
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_set_markup_rerenders() {
        let mut buffer = SourceBuffer::with_markup(Markup::Plain);
        buffer.set_source("(x)");
        assert_eq!(buffer.rendered(), "(x)");

        buffer.set_markup(Markup::Html);
        assert_eq!(buffer.rendered(), "<b>(</b>x<b>)</b>");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buffer = SourceBuffer::new();
        buffer.set_source("(print 1)");
        let snapshot = buffer.snapshot();

        buffer.set_source("(print 2)");
        assert_eq!(snapshot.text(), "(print 1)");
        assert_eq!(snapshot.revision(), 1);
    }

    #[test]
    fn test_shared_handles_see_same_buffer() {
        let host = SharedSourceBuffer::default();
        let sink = host.clone();

        host.set_source("(print 1)");
        sink.append_to_console("1\n");

        assert!(host.ptr_eq(&sink));
        assert_eq!(host.transcript(), "1\n");
        assert_eq!(sink.borrow().source(), "(print 1)");
        assert_eq!(host.revision(), 2);
    }
}
