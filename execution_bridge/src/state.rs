//! Engine lifecycle and run outcomes

use std::fmt;

/// Engine lifecycle state
///
/// Moves forward exactly once per session:
/// `Uninitialized → Initializing → Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Uninitialized => "UNINITIALIZED",
            EngineState::Initializing => "INITIALIZING",
            EngineState::Ready => "READY",
        }
    }

    pub fn is_ready(self) -> bool {
        self == EngineState::Ready
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the bridge does when `run` fails
///
/// Compile failures are always contained. Run failures propagate by
/// default; `Contain` turns them into a console notice instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunFailurePolicy {
    #[default]
    Propagate,
    Contain,
}

impl RunFailurePolicy {
    pub fn from_contain_flag(contain: bool) -> Self {
        if contain {
            RunFailurePolicy::Contain
        } else {
            RunFailurePolicy::Propagate
        }
    }
}

/// How a `compile_and_run` call that did not error ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Compiled and `run` returned
    Completed,
    /// Compilation failed; the compile notice was written
    CompileFailed,
    /// `run` failed under `RunFailurePolicy::Contain`; the run notice was written
    RunFailed,
}

impl RunOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::CompileFailed => "compile failed",
            RunOutcome::RunFailed => "run failed",
        }
    }
}
