//! # Simulated Engine
//!
//! Deterministic in-process [`Engine`] for tests and the offline host mode.
//!
//! ## Philosophy
//!
//! - **Scripted, not clever**: Output is looked up, never evaluated
//! - **Observable**: Every call the bridge makes is counted
//! - **Output through the sink**: Exactly like a real engine
//!
//! ## Behavior
//!
//! - `compile` rejects sources whose parentheses do not balance; otherwise
//!   the bytecode is the source bytes
//! - `run` writes the chunks registered with [`SimEngine::respond`] for that
//!   source, or echoes the source (newline-terminated) when none are
//!   registered
//! - In deferred mode `run` only queues its output; [`SimEngine::flush`]
//!   writes it later

use std::collections::{HashMap, VecDeque};

use execution_bridge::{Bytecode, ConsoleSink, Engine, EngineError, Readiness};
use tracing::trace;

/// Call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub sink_installs: usize,
    pub initializations: usize,
    pub polls: usize,
    pub compiles: usize,
    pub runs: usize,
}

/// Deterministic engine
#[derive(Debug, Default)]
pub struct SimEngine {
    sink: Option<ConsoleSink>,
    responses: HashMap<String, Vec<String>>,
    rejected: Vec<String>,
    run_failure: Option<String>,
    pending_polls: usize,
    deferred: bool,
    queued: VecDeque<String>,
    initialized: bool,
    echo: bool,
    compiled_sources: Vec<String>,
    stats: SimStats,
}

impl SimEngine {
    /// Engine that echoes sources without a registered response
    pub fn new() -> Self {
        Self {
            echo: true,
            ..Default::default()
        }
    }

    /// Engine that writes nothing for sources without a registered response
    pub fn silent() -> Self {
        Self {
            echo: false,
            ..Default::default()
        }
    }

    /// Register the chunks written when `source` is run
    pub fn respond<I, S>(mut self, source: &str, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses
            .insert(source.to_string(), chunks.into_iter().map(Into::into).collect());
        self
    }

    /// Make compilation of `source` fail even if it balances
    pub fn fail_compile(mut self, source: &str) -> Self {
        self.rejected.push(source.to_string());
        self
    }

    /// Make every run fail with `message` after writing its output
    pub fn fail_runs(mut self, message: &str) -> Self {
        self.run_failure = Some(message.to_string());
        self
    }

    /// Report `Pending` for the first `polls` readiness checks
    pub fn pending_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }

    /// Queue run output until `flush` is called
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Write queued output to the sink, returning how many chunks were written
    pub fn flush(&mut self) -> usize {
        let Some(sink) = &self.sink else {
            return 0;
        };
        let mut written = 0;
        while let Some(chunk) = self.queued.pop_front() {
            sink.write(&chunk);
            written += 1;
        }
        written
    }

    /// Number of chunks waiting for `flush`
    pub fn queued(&self) -> usize {
        self.queued.len()
    }

    /// Every source handed to `compile`, in order
    pub fn compiled_sources(&self) -> &[String] {
        &self.compiled_sources
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn output_for(&self, source: &str) -> Vec<String> {
        if let Some(chunks) = self.responses.get(source) {
            return chunks.clone();
        }
        if !self.echo || source.is_empty() {
            return Vec::new();
        }
        if source.ends_with('\n') {
            vec![source.to_string()]
        } else {
            vec![format!("{}\n", source)]
        }
    }
}

/// Checks that every `)` closes an earlier `(`
pub fn parens_balance(source: &str) -> Result<(), String> {
    let mut depth = 0usize;
    for (offset, c) in source.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unexpected ')' at byte {}", offset))?;
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(format!("{} unclosed '('", depth));
    }
    Ok(())
}

impl Engine for SimEngine {
    fn name(&self) -> &str {
        "sim"
    }

    fn install_sink(&mut self, sink: ConsoleSink) {
        self.stats.sink_installs += 1;
        self.sink = Some(sink);
    }

    fn initialize(&mut self) -> Result<Readiness, EngineError> {
        self.stats.initializations += 1;
        self.poll_ready()
    }

    fn poll_ready(&mut self) -> Result<Readiness, EngineError> {
        self.stats.polls += 1;
        if self.pending_polls > 0 {
            self.pending_polls -= 1;
            return Ok(Readiness::Pending);
        }
        self.initialized = true;
        Ok(Readiness::Ready)
    }

    fn compile(&mut self, source: &str) -> Result<Bytecode, EngineError> {
        self.stats.compiles += 1;
        self.compiled_sources.push(source.to_string());

        if !self.initialized {
            return Err(EngineError::Compile("engine not initialized".into()));
        }
        if self.rejected.iter().any(|rejected| rejected == source) {
            return Err(EngineError::Compile("rejected source".into()));
        }
        parens_balance(source).map_err(EngineError::Compile)?;

        Ok(Bytecode::new(source.as_bytes().to_vec()))
    }

    fn run(&mut self, bytecode: Bytecode) -> Result<(), EngineError> {
        self.stats.runs += 1;
        if !self.initialized {
            return Err(EngineError::Runtime("engine not initialized".into()));
        }
        let sink = self
            .sink
            .clone()
            .ok_or_else(|| EngineError::Runtime("no console sink installed".into()))?;

        let source = String::from_utf8_lossy(bytecode.as_bytes()).into_owned();
        let output = self.output_for(&source);
        trace!(chunks = output.len(), deferred = self.deferred, "sim run");

        if self.deferred {
            self.queued.extend(output);
        } else {
            for chunk in &output {
                sink.write(chunk);
            }
        }

        match &self.run_failure {
            Some(message) => Err(EngineError::Runtime(message.clone())),
            None => Ok(()),
        }
    }
}
