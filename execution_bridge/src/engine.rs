//! Engine capability interface

use std::fmt;

use thiserror::Error;

use crate::sink::ConsoleSink;

/// Engine error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),
}

/// Opaque compiled program
///
/// Produced by [`Engine::compile`] and handed straight to [`Engine::run`].
/// The bridge never looks inside.
#[derive(Clone, PartialEq, Eq)]
pub struct Bytecode(Vec<u8>);

impl Bytecode {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytecode({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Result of an initialization step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// `compile` and `run` may be called
    Ready,
    /// Initialization is still in flight; poll again later
    Pending,
}

/// External compile/run engine
///
/// The bridge calls these in a fixed order: `install_sink` once, then
/// `initialize` once, then `poll_ready` until it reports `Ready`. Only then
/// are `compile` and `run` called.
pub trait Engine {
    /// Short name for logs
    fn name(&self) -> &str {
        "engine"
    }

    /// Receive the console sink all program output must be written to
    fn install_sink(&mut self, sink: ConsoleSink);

    /// Start initialization
    fn initialize(&mut self) -> Result<Readiness, EngineError>;

    /// Check on an initialization that reported `Pending`
    fn poll_ready(&mut self) -> Result<Readiness, EngineError> {
        Ok(Readiness::Ready)
    }

    /// Compile source text into bytecode
    fn compile(&mut self, source: &str) -> Result<Bytecode, EngineError>;

    /// Run bytecode; output goes to the installed sink
    fn run(&mut self, bytecode: Bytecode) -> Result<(), EngineError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn install_sink(&mut self, sink: ConsoleSink) {
        (**self).install_sink(sink)
    }

    fn initialize(&mut self) -> Result<Readiness, EngineError> {
        (**self).initialize()
    }

    fn poll_ready(&mut self) -> Result<Readiness, EngineError> {
        (**self).poll_ready()
    }

    fn compile(&mut self, source: &str) -> Result<Bytecode, EngineError> {
        (**self).compile(source)
    }

    fn run(&mut self, bytecode: Bytecode) -> Result<(), EngineError> {
        (**self).run(bytecode)
    }
}
