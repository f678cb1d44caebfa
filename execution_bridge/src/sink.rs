//! Console sink handed to the engine

use std::fmt;
use std::rc::Rc;

use source_buffer::SharedSourceBuffer;

/// Anything console output can be written into
pub trait OutputSink {
    fn write(&self, text: &str);
}

impl OutputSink for SharedSourceBuffer {
    fn write(&self, text: &str) {
        self.append_to_console(text);
    }
}

/// The single write channel between engine and transcript
///
/// Cloning shares the same target. The bridge keeps one clone for its own
/// notices and installs another into the engine.
#[derive(Clone)]
pub struct ConsoleSink {
    target: Rc<dyn OutputSink>,
}

impl ConsoleSink {
    pub fn new(target: Rc<dyn OutputSink>) -> Self {
        Self { target }
    }

    /// Sink appending to a source buffer's console transcript
    pub fn to_buffer(buffer: SharedSourceBuffer) -> Self {
        Self::new(Rc::new(buffer))
    }

    pub fn write(&self, text: &str) {
        self.target.write(text);
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl From<SharedSourceBuffer> for ConsoleSink {
    fn from(buffer: SharedSourceBuffer) -> Self {
        Self::to_buffer(buffer)
    }
}
