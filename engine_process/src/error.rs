//! Process engine errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessEngineError {
    #[error("Executable '{name}' not found: {source}")]
    ExecutableNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Compiler exited with {status}: {stderr}")]
    CompilerFailed { status: String, stderr: String },

    #[error("Compiler produced no output file at {0}")]
    MissingOutput(PathBuf),

    #[error("Program exited with {status}: {stderr}")]
    RunnerFailed { status: String, stderr: String },

    #[error("Engine not initialized")]
    NotInitialized,

    #[error("No console sink installed")]
    NoSink,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type ProcessResult<T> = Result<T, ProcessEngineError>;
