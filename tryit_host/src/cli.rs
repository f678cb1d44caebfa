//! Command line arguments
//!
//! Flags override the config file; the file overrides built-in defaults.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use engine_process::ProcessEngineConfig;
use highlighter::Markup;

use crate::config::{ConfigResult, EngineConfig, HostConfig};

/// Default tracing filter when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn,tryit=info,tryit_host=info,execution_bridge=info,engine_process=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    Sim,
    Process,
}

#[derive(Parser, Debug)]
#[command(name = "tryit")]
#[command(about = "Edit a program, run it, watch its console")]
pub struct HostArgs {
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session script to play instead of reading stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Engine to drive
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,

    /// Compiler executable (implies --engine process)
    #[arg(long)]
    pub compiler: Option<String>,

    /// VM executable (implies --engine process)
    #[arg(long)]
    pub runner: Option<String>,

    /// Delimiter emphasis: html, ansi or plain
    #[arg(long, value_parser = parse_markup)]
    pub markup: Option<Markup>,

    /// Show "Failed to run" instead of exiting when a program fails
    #[arg(long)]
    pub contain_run_failures: bool,

    /// Maximum steps to run (0 = unlimited)
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Tracing filter, e.g. `debug` or `execution_bridge=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

fn parse_markup(value: &str) -> Result<Markup, String> {
    value.parse().map_err(|e: highlighter::UnknownMarkup| e.to_string())
}

impl HostArgs {
    /// Load the config file (if any) and apply the flags on top
    pub fn resolve_config(&self) -> ConfigResult<HostConfig> {
        let mut config = match &self.config {
            Some(path) => HostConfig::load(path)?,
            None => HostConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut HostConfig) {
        let wants_process = self.engine == Some(EngineKind::Process)
            || self.compiler.is_some()
            || self.runner.is_some();

        if wants_process {
            let mut process = match std::mem::take(&mut config.engine) {
                EngineConfig::Process(process) => process,
                EngineConfig::Sim { .. } => ProcessEngineConfig::default(),
            };
            if let Some(compiler) = &self.compiler {
                process.compiler = compiler.clone();
            }
            if let Some(runner) = &self.runner {
                process.runner = runner.clone();
            }
            config.engine = EngineConfig::Process(process);
        } else if self.engine == Some(EngineKind::Sim)
            && !matches!(config.engine, EngineConfig::Sim { .. })
        {
            config.engine = EngineConfig::default();
        }

        if let Some(markup) = self.markup {
            config.markup = markup;
        }
        if self.contain_run_failures {
            config.contain_run_failures = true;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
    }

    /// Filter directives for the tracing subscriber
    pub fn log_filter(&self) -> Option<&str> {
        self.log_level.as_deref()
    }
}
