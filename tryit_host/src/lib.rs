//! # Tryit Host Runtime
//!
//! Hosts the playground editor outside a browser.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Engines write to the sink, the host draws frames
//! - **Output is snapshot rendering**: Each frame is the whole playground
//! - **Deterministic mode is first-class**: Session scripts drive tests
//! - **Dumb host**: Typing, Run, Clear, nothing clever
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Builds the engine and bridge from configuration
//! - Runs an event loop (input → step → render)
//! - Mounts the bridge and polls it until the engine is ready
//! - Maps editing actions onto the edit surface and source buffer
//! - Turns command typos and unreadable files into status messages
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Interpret programs (the engine does)
//! - Retry failed runs or queue runs before the engine is ready
//! - Install a tracing subscriber (the binary does)

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod runtime;
pub mod session_script;

pub use cli::{EngineKind, HostArgs, DEFAULT_LOG_FILTER};
pub use commands::{HostCommand, HostCommandError, HostCommandParser};
pub use config::{ConfigError, ConfigResult, EngineConfig, HostConfig};
pub use render::{PlaygroundRenderer, Status};
pub use runtime::{build_engine, HostInput, HostRuntime, HostRuntimeError};
pub use session_script::{EditKey, ScriptedAction, SessionScript, SessionScriptError};
