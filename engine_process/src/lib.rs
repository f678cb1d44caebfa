//! # Process Engine
//!
//! Runs programs through the native toolchain: a compiler executable that
//! turns a directory of `*.ot` sources into a bytecode file, and a VM
//! executable that runs that file and prints to stdout.
//!
//! ## Philosophy
//!
//! - **Executables are resolved once**: `initialize` looks both up on `PATH`
//! - **Nothing touches the working directory**: Every compile gets its own
//!   temporary directory
//! - **Output streams**: VM stdout reaches the sink as it is read, not at exit
//!
//! ## Design
//!
//! - `ProcessEngineConfig`: executable names, arguments, file names
//! - `ProcessEngine`: the [`execution_bridge::Engine`] implementation
//! - `forward_output`: chunked UTF-8 forwarding from a reader to a writer fn

pub mod config;
pub mod engine;
pub mod error;
pub mod forward;

pub use config::{ProcessEngineConfig, PATH_PLACEHOLDER};
pub use engine::ProcessEngine;
pub use error::{ProcessEngineError, ProcessResult};
pub use forward::forward_output;
