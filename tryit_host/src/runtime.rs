//! # Host Runtime
//!
//! The event loop that ties the playground together.

use std::fs;
use std::io::{self, BufRead, Write};

use engine_process::ProcessEngine;
use execution_bridge::{BridgeError, ConsoleSink, Engine, EngineState, ExecutionBridge};
use sim_engine::SimEngine;
use source_buffer::{EditSurface, SharedSourceBuffer, SourceBuffer};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::commands::{HostCommand, HostCommandParser};
use crate::config::{ConfigError, EngineConfig, HostConfig};
use crate::render::{PlaygroundRenderer, Status};
use crate::session_script::{EditKey, ScriptedAction, SessionScript, SessionScriptError};

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Engine error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Script error: {0}")]
    Script(#[from] SessionScriptError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where actions come from
pub enum HostInput {
    /// Deterministic session script
    Script(SessionScript),
    /// Interactive lines (usually stdin)
    Lines(Box<dyn BufRead>),
}

impl HostInput {
    pub fn script(text: &str) -> Result<Self, SessionScriptError> {
        Ok(HostInput::Script(SessionScript::from_text(text)?))
    }

    fn next_action(&mut self) -> io::Result<Option<ScriptedAction>> {
        match self {
            HostInput::Script(script) => Ok(script.next_action()),
            HostInput::Lines(reader) => {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(ScriptedAction::from_interactive_line(&line)))
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        match self {
            HostInput::Script(script) => !script.has_more(),
            HostInput::Lines(_) => false,
        }
    }
}

/// Host runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    Running,
    Shutdown,
}

/// Build the engine a config asks for
pub fn build_engine(config: &EngineConfig) -> Box<dyn Engine> {
    match config {
        EngineConfig::Sim { responses } => {
            let mut engine = SimEngine::new();
            for (source, chunks) in responses {
                engine = engine.respond(source, chunks.iter().cloned());
            }
            Box::new(engine)
        }
        EngineConfig::Process(process) => Box::new(ProcessEngine::new(process.clone())),
    }
}

/// Host runtime
pub struct HostRuntime {
    config: HostConfig,
    buffer: SharedSourceBuffer,
    surface: EditSurface,
    bridge: ExecutionBridge<Box<dyn Engine>>,
    renderer: PlaygroundRenderer,
    input: HostInput,
    state: HostState,
    steps: usize,
    message: Option<String>,
}

impl HostRuntime {
    /// Creates a runtime with the engine described by `config`
    pub fn new(config: HostConfig, input: HostInput) -> Self {
        let engine = build_engine(&config.engine);
        Self::with_engine(config, engine, input)
    }

    /// Creates a runtime around an existing engine
    pub fn with_engine(config: HostConfig, engine: Box<dyn Engine>, input: HostInput) -> Self {
        let buffer = SharedSourceBuffer::from(SourceBuffer::with_markup(config.markup));
        let bridge = ExecutionBridge::new(engine, ConsoleSink::to_buffer(buffer.clone()))
            .with_run_policy(config.run_policy())
            .with_run_failure_notice(config.run_failure_notice.clone());
        let renderer = PlaygroundRenderer::new(config.line_numbers);

        Self {
            config,
            buffer,
            surface: EditSurface::new(),
            bridge,
            renderer,
            input,
            state: HostState::Running,
            steps: 0,
            message: None,
        }
    }

    /// Runs the host event loop
    ///
    /// Returns when:
    /// - Quit command received
    /// - Max steps reached (if configured)
    /// - Script exhausted or input closed
    pub fn run(&mut self, out: &mut dyn Write) -> Result<(), HostRuntimeError> {
        info!(engine = self.bridge.engine().name(), "host starting");

        loop {
            if self.state == HostState::Shutdown {
                break;
            }

            if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
                debug!(steps = self.steps, "max steps reached");
                break;
            }

            if self.input.is_exhausted() {
                break;
            }

            self.step(out)?;
            self.steps += 1;
        }

        info!(steps = self.steps, "host stopped");
        Ok(())
    }

    /// Executes one step: mount, one input action, render
    pub fn step(&mut self, out: &mut dyn Write) -> Result<(), HostRuntimeError> {
        // 1. Drive initialization
        if !self.bridge.is_ready() {
            self.bridge.mount()?;
        }

        // 2. Input
        match self.input.next_action()? {
            Some(action) => self.apply(action)?,
            None => self.state = HostState::Shutdown,
        }

        // 3. Render (if anything changed)
        self.render(out)?;

        Ok(())
    }

    /// Applies a single action
    pub fn apply(&mut self, action: ScriptedAction) -> Result<(), HostRuntimeError> {
        debug!(?action, "action");
        match action {
            ScriptedAction::Type(text) => {
                if self.surface.insert_text(&text) {
                    self.sync_source();
                }
            }
            ScriptedAction::Key(key) => self.press(key),
            ScriptedAction::Idle => {}
            ScriptedAction::Command(text) => self.execute_command(&text)?,
        }
        Ok(())
    }

    fn press(&mut self, key: EditKey) {
        let changed = match key {
            EditKey::Enter => self.surface.insert_newline(),
            EditKey::Backspace => self.surface.backspace(),
            EditKey::Left => {
                self.surface.move_left();
                false
            }
            EditKey::Right => {
                self.surface.move_right();
                false
            }
            EditKey::Up => {
                self.surface.move_up();
                false
            }
            EditKey::Down => {
                self.surface.move_down();
                false
            }
            EditKey::Home => {
                self.surface.move_home();
                false
            }
            EditKey::End => {
                self.surface.move_end();
                false
            }
        };
        if changed {
            self.sync_source();
        }
    }

    fn sync_source(&mut self) {
        self.buffer.set_source(self.surface.as_string());
    }

    /// Executes a host command
    ///
    /// Bad commands and unreadable files become status messages. Only
    /// engine failures the bridge does not contain are returned as errors.
    pub fn execute_command(&mut self, command_text: &str) -> Result<(), HostRuntimeError> {
        let command = match HostCommandParser::parse(command_text) {
            Ok(command) => command,
            Err(err) => {
                self.message = Some(err.to_string());
                return Ok(());
            }
        };

        match command {
            HostCommand::Run => self.run_source()?,
            HostCommand::Clear => {
                self.buffer.clear_console();
                self.message = None;
            }
            HostCommand::Reset => {
                self.surface.set_text("");
                self.sync_source();
                self.message = None;
            }
            HostCommand::Load { path } => match fs::read_to_string(&path) {
                Ok(text) => {
                    self.surface.set_text(&text);
                    self.sync_source();
                    self.message = Some(format!("loaded {}", path));
                }
                Err(err) => {
                    warn!(%path, error = %err, "load failed");
                    self.message = Some(format!("cannot load {}: {}", path, err));
                }
            },
            HostCommand::Show => self.renderer.invalidate(),
            HostCommand::State => {
                self.message = Some(format!(
                    "engine {} is {}, {} runs",
                    self.bridge.engine().name(),
                    self.bridge.state(),
                    self.bridge.run_count()
                ));
            }
            HostCommand::Quit => self.state = HostState::Shutdown,
        }

        Ok(())
    }

    fn run_source(&mut self) -> Result<(), HostRuntimeError> {
        let snapshot = self.buffer.snapshot();
        match self.bridge.compile_and_run(&snapshot) {
            Ok(outcome) => {
                info!(
                    revision = snapshot.revision(),
                    fingerprint = %snapshot.fingerprint(),
                    outcome = outcome.as_str(),
                    "run finished"
                );
                self.message = Some(outcome.as_str().to_string());
                Ok(())
            }
            Err(BridgeError::NotReady(state)) => {
                self.message = Some(format!("engine not ready ({})", state));
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn status(&self) -> Status {
        Status {
            engine: self.bridge.engine().name().to_string(),
            state: self.bridge.state(),
            revision: self.buffer.revision(),
            message: self.message.clone(),
        }
    }

    fn render(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let status = self.status();
        let buffer = self.buffer.borrow();
        if self.renderer.needs_redraw(&buffer, &status) {
            let frame = self.renderer.render(&buffer, &status);
            out.write_all(frame.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }

    pub fn buffer(&self) -> &SharedSourceBuffer {
        &self.buffer
    }

    pub fn surface(&self) -> &EditSurface {
        &self.surface
    }

    /// Current console transcript
    pub fn transcript(&self) -> String {
        self.buffer.transcript()
    }

    pub fn source(&self) -> String {
        self.buffer.borrow().source().to_string()
    }

    pub fn engine_state(&self) -> EngineState {
        self.bridge.state()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn step_count(&self) -> usize {
        self.steps
    }

    pub fn is_shutdown(&self) -> bool {
        self.state == HostState::Shutdown
    }

    /// Outcome-independent run counter from the bridge
    pub fn run_count(&self) -> u64 {
        self.bridge.run_count()
    }
}
