//! Native toolchain engine

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use execution_bridge::{Bytecode, ConsoleSink, Engine, EngineError, Readiness};
use tracing::{debug, info, warn};

use crate::config::{expand_args, ProcessEngineConfig};
use crate::error::{ProcessEngineError, ProcessResult};
use crate::forward::forward_output;

/// Engine backed by the compiler and VM executables
#[derive(Debug)]
pub struct ProcessEngine {
    config: ProcessEngineConfig,
    sink: Option<ConsoleSink>,
    compiler_path: Option<PathBuf>,
    runner_path: Option<PathBuf>,
}

impl ProcessEngine {
    pub fn new(config: ProcessEngineConfig) -> Self {
        Self {
            config,
            sink: None,
            compiler_path: None,
            runner_path: None,
        }
    }

    pub fn config(&self) -> &ProcessEngineConfig {
        &self.config
    }

    /// Resolved executables, once initialized
    pub fn executables(&self) -> Option<(&Path, &Path)> {
        Some((self.compiler_path.as_deref()?, self.runner_path.as_deref()?))
    }

    fn resolve(name: &str) -> ProcessResult<PathBuf> {
        which::which(name).map_err(|source| ProcessEngineError::ExecutableNotFound {
            name: name.to_string(),
            source,
        })
    }

    fn resolve_all(&mut self) -> ProcessResult<()> {
        let compiler = Self::resolve(&self.config.compiler)?;
        let runner = Self::resolve(&self.config.runner)?;
        info!(compiler = %compiler.display(), runner = %runner.display(), "toolchain resolved");
        self.compiler_path = Some(compiler);
        self.runner_path = Some(runner);
        Ok(())
    }

    /// Write the source into a fresh directory and compile it there
    pub fn compile_source(&self, source: &str) -> ProcessResult<Vec<u8>> {
        let compiler = self
            .compiler_path
            .as_deref()
            .ok_or(ProcessEngineError::NotInitialized)?;

        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(&self.config.source_file), source)?;

        let dir_arg = dir.path().to_string_lossy();
        let output = Command::new(compiler)
            .args(expand_args(&self.config.compiler_args, &dir_arg))
            .current_dir(dir.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessEngineError::Spawn {
                program: self.config.compiler.clone(),
                source,
            })?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(ProcessEngineError::CompilerFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let bytecode_path = dir.path().join(&self.config.bytecode_file);
        if !bytecode_path.is_file() {
            return Err(ProcessEngineError::MissingOutput(bytecode_path));
        }
        let bytes = fs::read(&bytecode_path)?;
        debug!(bytes = bytes.len(), "compiler finished");
        Ok(bytes)
    }

    /// Run bytecode in the VM, streaming its stdout into the sink
    pub fn run_bytecode(&self, bytecode: &[u8]) -> ProcessResult<()> {
        let runner = self
            .runner_path
            .as_deref()
            .ok_or(ProcessEngineError::NotInitialized)?;
        let sink = self.sink.as_ref().ok_or(ProcessEngineError::NoSink)?;

        let mut program = tempfile::NamedTempFile::new()?;
        program.write_all(bytecode)?;
        program.flush()?;

        let mut stderr_file = tempfile::tempfile()?;
        let program_arg = program.path().to_string_lossy();
        let mut child = Command::new(runner)
            .args(expand_args(&self.config.runner_args, &program_arg))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(stderr_file.try_clone()?))
            .spawn()
            .map_err(|source| ProcessEngineError::Spawn {
                program: self.config.runner.clone(),
                source,
            })?;

        let forwarded = match child.stdout.take() {
            Some(stdout) => forward_output(stdout, self.config.read_chunk, |text| sink.write(text)),
            None => Ok(0),
        };
        let forwarded = match forwarded {
            Ok(bytes) => bytes,
            Err(err) => {
                if let Err(kill_err) = child.kill() {
                    warn!(error = %kill_err, "failed to stop program");
                }
                if let Err(wait_err) = child.wait() {
                    warn!(error = %wait_err, "failed to reap program");
                }
                return Err(err.into());
            }
        };

        let status = child.wait()?;
        debug!(bytes = forwarded, %status, "program finished");

        if !status.success() {
            let mut stderr = String::new();
            stderr_file.seek(SeekFrom::Start(0))?;
            stderr_file.read_to_string(&mut stderr)?;
            return Err(ProcessEngineError::RunnerFailed {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ProcessEngine {
    fn default() -> Self {
        Self::new(ProcessEngineConfig::default())
    }
}

impl Engine for ProcessEngine {
    fn name(&self) -> &str {
        "process"
    }

    fn install_sink(&mut self, sink: ConsoleSink) {
        self.sink = Some(sink);
    }

    fn initialize(&mut self) -> Result<Readiness, EngineError> {
        self.resolve_all()
            .map_err(|err| EngineError::Initialization(err.to_string()))?;
        Ok(Readiness::Ready)
    }

    fn compile(&mut self, source: &str) -> Result<Bytecode, EngineError> {
        self.compile_source(source)
            .map(Bytecode::new)
            .map_err(|err| EngineError::Compile(err.to_string()))
    }

    fn run(&mut self, bytecode: Bytecode) -> Result<(), EngineError> {
        self.run_bytecode(bytecode.as_bytes())
            .map_err(|err| EngineError::Runtime(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_before_initialize() {
        let engine = ProcessEngine::default();
        assert!(matches!(
            engine.compile_source("(x)"),
            Err(ProcessEngineError::NotInitialized)
        ));
    }

    #[test]
    fn test_missing_executable_fails_initialization() {
        let config = ProcessEngineConfig::default()
            .with_compiler("tryit-no-such-compiler-7f3a", Vec::new());
        let mut engine = ProcessEngine::new(config);
        assert!(matches!(
            engine.initialize(),
            Err(EngineError::Initialization(_))
        ));
        assert!(engine.executables().is_none());
    }
}
