//! Execution bridge: lifecycle plus compile-then-run

use source_buffer::SourceSnapshot;
use thiserror::Error;
use tracing::{debug, debug_span, info, trace, warn};

use crate::engine::{Engine, EngineError, Readiness};
use crate::sink::ConsoleSink;
use crate::state::{EngineState, RunFailurePolicy, RunOutcome};

/// Written to the console when compilation fails
pub const COMPILE_FAILURE_NOTICE: &str = "Failed to compile\n";

/// Default notice written when a run fails under `RunFailurePolicy::Contain`
pub const RUN_FAILURE_NOTICE: &str = "Failed to run\n";

/// Bridge error
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Engine not ready (state: {0})")]
    NotReady(EngineState),

    #[error("Engine initialization failed: {0}")]
    Initialization(#[source] EngineError),

    #[error("Run failed: {0}")]
    Runtime(#[source] EngineError),
}

/// Bridge result
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Mediator between the UI and an [`Engine`]
///
/// Owns the engine and the lifecycle state. All calls take `&mut self`, so
/// two triggers can never overlap.
pub struct ExecutionBridge<E: Engine> {
    engine: E,
    sink: ConsoleSink,
    state: EngineState,
    run_policy: RunFailurePolicy,
    run_failure_notice: String,
    sink_installed: bool,
    runs: u64,
}

impl<E: Engine> ExecutionBridge<E> {
    /// Create a bridge; nothing is called on the engine until `mount`
    pub fn new(engine: E, sink: ConsoleSink) -> Self {
        Self {
            engine,
            sink,
            state: EngineState::Uninitialized,
            run_policy: RunFailurePolicy::default(),
            run_failure_notice: RUN_FAILURE_NOTICE.to_string(),
            sink_installed: false,
            runs: 0,
        }
    }

    pub fn with_run_policy(mut self, policy: RunFailurePolicy) -> Self {
        self.run_policy = policy;
        self
    }

    /// Replace the text written for a contained run failure
    pub fn with_run_failure_notice(mut self, notice: impl Into<String>) -> Self {
        self.run_failure_notice = notice.into();
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn run_policy(&self) -> RunFailurePolicy {
        self.run_policy
    }

    /// Number of `compile_and_run` calls that reached the engine
    pub fn run_count(&self) -> u64 {
        self.runs
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Drive initialization forward
    ///
    /// The first call installs the sink and starts initialization. Calls
    /// made while `Initializing` only poll; calls made once `Ready` do
    /// nothing. On failure the state falls back to `Uninitialized`.
    pub fn mount(&mut self) -> BridgeResult<EngineState> {
        let readiness = match self.state {
            EngineState::Ready => return Ok(EngineState::Ready),
            EngineState::Initializing => self.engine.poll_ready(),
            EngineState::Uninitialized => {
                if !self.sink_installed {
                    self.engine.install_sink(self.sink.clone());
                    self.sink_installed = true;
                }
                self.state = EngineState::Initializing;
                debug!(engine = self.engine.name(), "initializing engine");
                self.engine.initialize()
            }
        };

        match readiness {
            Ok(Readiness::Ready) => {
                self.state = EngineState::Ready;
                info!(engine = self.engine.name(), "engine ready");
            }
            Ok(Readiness::Pending) => {
                trace!(engine = self.engine.name(), "engine initialization pending");
            }
            Err(err) => {
                self.state = EngineState::Uninitialized;
                warn!(engine = self.engine.name(), error = %err, "engine initialization failed");
                return Err(BridgeError::Initialization(err));
            }
        }

        Ok(self.state)
    }

    /// Compile a snapshot and run it
    ///
    /// Compile failures are contained: exactly one `COMPILE_FAILURE_NOTICE`
    /// is written and the call succeeds with `RunOutcome::CompileFailed`.
    /// Run failures follow the configured [`RunFailurePolicy`].
    pub fn compile_and_run(&mut self, snapshot: &SourceSnapshot) -> BridgeResult<RunOutcome> {
        if !self.state.is_ready() {
            return Err(BridgeError::NotReady(self.state));
        }

        self.runs += 1;
        let span = debug_span!(
            "compile_and_run",
            run = self.runs,
            revision = snapshot.revision(),
            fingerprint = %snapshot.fingerprint(),
        );
        let _guard = span.enter();

        let bytecode = match self.engine.compile(snapshot.text()) {
            Ok(bytecode) => bytecode,
            Err(err) => {
                debug!(error = %err, "compile failed");
                self.sink.write(COMPILE_FAILURE_NOTICE);
                return Ok(RunOutcome::CompileFailed);
            }
        };
        debug!(bytes = bytecode.len(), "compiled");

        match self.engine.run(bytecode) {
            Ok(()) => {
                debug!("run returned");
                Ok(RunOutcome::Completed)
            }
            Err(err) => match self.run_policy {
                RunFailurePolicy::Propagate => {
                    warn!(error = %err, "run failed");
                    Err(BridgeError::Runtime(err))
                }
                RunFailurePolicy::Contain => {
                    debug!(error = %err, "run failed, contained");
                    self.sink.write(&self.run_failure_notice);
                    Ok(RunOutcome::RunFailed)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Bytecode;
    use source_buffer::SharedSourceBuffer;

    /// Engine double recording every call
    #[derive(Default)]
    struct FakeEngine {
        sink: Option<ConsoleSink>,
        sink_installs: usize,
        initializations: usize,
        polls: usize,
        pending_polls: usize,
        fail_init: bool,
        fail_compile: bool,
        fail_run: bool,
        output: Vec<&'static str>,
        compiled: Vec<String>,
        runs: usize,
    }

    impl Engine for FakeEngine {
        fn name(&self) -> &str {
            "fake"
        }

        fn install_sink(&mut self, sink: ConsoleSink) {
            self.sink = Some(sink);
            self.sink_installs += 1;
        }

        fn initialize(&mut self) -> Result<Readiness, EngineError> {
            self.initializations += 1;
            if self.fail_init {
                return Err(EngineError::Initialization("no module".into()));
            }
            self.poll_ready()
        }

        fn poll_ready(&mut self) -> Result<Readiness, EngineError> {
            self.polls += 1;
            if self.pending_polls > 0 {
                self.pending_polls -= 1;
                Ok(Readiness::Pending)
            } else {
                Ok(Readiness::Ready)
            }
        }

        fn compile(&mut self, source: &str) -> Result<Bytecode, EngineError> {
            self.compiled.push(source.to_string());
            if self.fail_compile {
                return Err(EngineError::Compile("bad program".into()));
            }
            Ok(Bytecode::new(source.as_bytes().to_vec()))
        }

        fn run(&mut self, _bytecode: Bytecode) -> Result<(), EngineError> {
            self.runs += 1;
            let sink = self.sink.as_ref().expect("sink installed before run");
            for chunk in &self.output {
                sink.write(chunk);
            }
            if self.fail_run {
                return Err(EngineError::Runtime("division by zero".into()));
            }
            Ok(())
        }
    }

    fn bridge_with(engine: FakeEngine) -> (ExecutionBridge<FakeEngine>, SharedSourceBuffer) {
        let buffer = SharedSourceBuffer::default();
        let bridge = ExecutionBridge::new(engine, ConsoleSink::to_buffer(buffer.clone()));
        (bridge, buffer)
    }

    #[test]
    fn test_new_bridge_is_uninitialized() {
        let (bridge, _) = bridge_with(FakeEngine::default());
        assert_eq!(bridge.state(), EngineState::Uninitialized);
        assert_eq!(bridge.engine().initializations, 0);
        assert_eq!(bridge.engine().sink_installs, 0);
    }

    #[test]
    fn test_mount_reaches_ready() {
        let (mut bridge, _) = bridge_with(FakeEngine::default());
        assert_eq!(bridge.mount().unwrap(), EngineState::Ready);
        assert!(bridge.is_ready());
        assert_eq!(bridge.engine().sink_installs, 1);
        assert_eq!(bridge.engine().initializations, 1);
    }

    #[test]
    fn test_mount_is_idempotent() {
        let (mut bridge, _) = bridge_with(FakeEngine::default());
        for _ in 0..3 {
            bridge.mount().unwrap();
        }
        assert_eq!(bridge.engine().initializations, 1);
        assert_eq!(bridge.engine().sink_installs, 1);
    }

    #[test]
    fn test_pending_initialization_polls_without_reinitializing() {
        let engine = FakeEngine {
            pending_polls: 2,
            ..Default::default()
        };
        let (mut bridge, _) = bridge_with(engine);

        assert_eq!(bridge.mount().unwrap(), EngineState::Initializing);
        assert_eq!(bridge.mount().unwrap(), EngineState::Initializing);
        assert_eq!(bridge.mount().unwrap(), EngineState::Ready);
        assert_eq!(bridge.engine().initializations, 1);
    }

    #[test]
    fn test_initialization_failure_resets_state() {
        let engine = FakeEngine {
            fail_init: true,
            ..Default::default()
        };
        let (mut bridge, _) = bridge_with(engine);

        let err = bridge.mount().unwrap_err();
        assert!(matches!(err, BridgeError::Initialization(_)));
        assert_eq!(bridge.state(), EngineState::Uninitialized);

        // Retrying initializes again but never reinstalls the sink.
        bridge.engine_mut().fail_init = false;
        assert_eq!(bridge.mount().unwrap(), EngineState::Ready);
        assert_eq!(bridge.engine().initializations, 2);
        assert_eq!(bridge.engine().sink_installs, 1);
    }

    #[test]
    fn test_compile_and_run_before_ready_is_rejected() {
        let (mut bridge, buffer) = bridge_with(FakeEngine::default());
        let err = bridge
            .compile_and_run(&SourceSnapshot::from("(+ 1 2)"))
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::NotReady(EngineState::Uninitialized)
        ));
        assert!(bridge.engine().compiled.is_empty());
        assert_eq!(bridge.run_count(), 0);
        assert_eq!(buffer.transcript(), "");
    }

    #[test]
    fn test_compile_and_run_while_initializing_is_rejected() {
        let engine = FakeEngine {
            pending_polls: 1,
            ..Default::default()
        };
        let (mut bridge, _) = bridge_with(engine);
        bridge.mount().unwrap();

        let err = bridge
            .compile_and_run(&SourceSnapshot::from("(+ 1 2)"))
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::NotReady(EngineState::Initializing)
        ));
        assert!(bridge.engine().compiled.is_empty());
    }

    #[test]
    fn test_successful_run_writes_output() {
        let engine = FakeEngine {
            output: vec!["3\n"],
            ..Default::default()
        };
        let (mut bridge, buffer) = bridge_with(engine);
        bridge.mount().unwrap();

        let outcome = bridge
            .compile_and_run(&SourceSnapshot::from("(+ 1 2)"))
            .unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(buffer.transcript(), "3\n");
        assert_eq!(bridge.engine().compiled, ["(+ 1 2)"]);
        assert_eq!(bridge.engine().runs, 1);
    }

    #[test]
    fn test_compile_failure_is_contained() {
        let engine = FakeEngine {
            fail_compile: true,
            ..Default::default()
        };
        let (mut bridge, buffer) = bridge_with(engine);
        bridge.mount().unwrap();

        let outcome = bridge
            .compile_and_run(&SourceSnapshot::from("(+ 1"))
            .unwrap();

        assert_eq!(outcome, RunOutcome::CompileFailed);
        assert_eq!(buffer.transcript(), COMPILE_FAILURE_NOTICE);
        assert_eq!(bridge.engine().runs, 0);
    }

    #[test]
    fn test_run_failure_propagates_by_default() {
        let engine = FakeEngine {
            fail_run: true,
            output: vec!["partial\n"],
            ..Default::default()
        };
        let (mut bridge, buffer) = bridge_with(engine);
        bridge.mount().unwrap();

        let err = bridge
            .compile_and_run(&SourceSnapshot::from("(/ 1 0)"))
            .unwrap_err();

        assert!(matches!(err, BridgeError::Runtime(_)));
        assert_eq!(buffer.transcript(), "partial\n");
    }

    #[test]
    fn test_run_failure_contained_when_configured() {
        let engine = FakeEngine {
            fail_run: true,
            output: vec!["partial\n"],
            ..Default::default()
        };
        let (bridge, buffer) = bridge_with(engine);
        let mut bridge = bridge.with_run_policy(RunFailurePolicy::Contain);
        bridge.mount().unwrap();

        let outcome = bridge
            .compile_and_run(&SourceSnapshot::from("(/ 1 0)"))
            .unwrap();

        assert_eq!(outcome, RunOutcome::RunFailed);
        assert_eq!(buffer.transcript(), "partial\nFailed to run\n");
    }

    #[test]
    fn test_run_failure_notice_can_match_compile_notice() {
        let engine = FakeEngine {
            fail_run: true,
            ..Default::default()
        };
        let (bridge, buffer) = bridge_with(engine);
        let mut bridge = bridge
            .with_run_policy(RunFailurePolicy::Contain)
            .with_run_failure_notice(COMPILE_FAILURE_NOTICE);
        bridge.mount().unwrap();

        let outcome = bridge
            .compile_and_run(&SourceSnapshot::from("(/ 1 0)"))
            .unwrap();

        assert_eq!(outcome, RunOutcome::RunFailed);
        assert_eq!(buffer.transcript(), "Failed to compile\n");
    }

    #[test]
    fn test_run_counter() {
        let (mut bridge, _) = bridge_with(FakeEngine::default());
        bridge.mount().unwrap();
        bridge.compile_and_run(&SourceSnapshot::from("a")).unwrap();
        bridge.compile_and_run(&SourceSnapshot::from("b")).unwrap();
        assert_eq!(bridge.run_count(), 2);
    }
}
