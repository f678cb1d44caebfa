//! # Execution Bridge
//!
//! Mediates between the playground UI and an external compile/run engine.
//!
//! ## Philosophy
//!
//! - **Initialize once**: `Uninitialized → Initializing → Ready`, at most one
//!   initialization in flight
//! - **Output through the sink only**: The engine never returns program output
//! - **Contain compile failures**: A bad program yields a console line, not a crash
//! - **Injected, not global**: The sink and the engine are passed in at construction
//!
//! ## Design
//!
//! - `Engine`: capability interface `{install_sink, initialize, compile, run}`
//! - `ConsoleSink`: the single write channel handed to the engine
//! - `ExecutionBridge`: lifecycle state machine plus `compile_and_run`
//! - `RunFailurePolicy`: whether run failures propagate (default) or are contained

pub mod bridge;
pub mod engine;
pub mod sink;
pub mod state;

pub use bridge::{
    BridgeError, BridgeResult, ExecutionBridge, COMPILE_FAILURE_NOTICE, RUN_FAILURE_NOTICE,
};
pub use engine::{Bytecode, Engine, EngineError, Readiness};
pub use sink::{ConsoleSink, OutputSink};
pub use state::{EngineState, RunFailurePolicy, RunOutcome};
