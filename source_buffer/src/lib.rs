//! # Source Buffer
//!
//! The only mutable state of the playground: the program being edited and
//! the console transcript its runs produce.
//!
//! ## Philosophy
//!
//! - **Cannot fail**: No I/O, no parsing, no validation
//! - **Append-only console**: Chunks keep arrival order until an explicit clear
//! - **Snapshots, not references**: Runs see the text as it was when triggered
//! - **Single-threaded sharing**: `Rc<RefCell<_>>`, never locks
//!
//! ## Design
//!
//! - `SourceBuffer`: source text, highlighted rendering, transcript, revision
//! - `SharedSourceBuffer`: cloneable handle used by the host and the console sink
//! - `ConsoleTranscript`: ordered chunks written by the engine
//! - `SourceSnapshot`: immutable copy of the source taken at run time
//! - `EditSurface`: line/cursor editing model that feeds `set_source`

pub mod buffer;
pub mod snapshot;
pub mod surface;
pub mod transcript;

pub use buffer::{SharedSourceBuffer, SourceBuffer};
pub use highlighter::Markup;
pub use snapshot::SourceSnapshot;
pub use surface::{EditSurface, Position};
pub use transcript::ConsoleTranscript;
