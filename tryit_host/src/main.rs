//! # Tryit
//!
//! Main entry point for the playground host.

use std::fs;
use std::io::{self, BufReader};
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tryit_host::{HostArgs, HostInput, HostRuntime, HostRuntimeError, DEFAULT_LOG_FILTER};

fn main() {
    let args = HostArgs::parse();

    let filter = match args.log_filter() {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &HostArgs) -> Result<(), HostRuntimeError> {
    let config = args.resolve_config()?;

    let input = match &args.script {
        Some(path) => HostInput::script(&fs::read_to_string(path)?)?,
        None => HostInput::Lines(Box::new(BufReader::new(io::stdin()))),
    };

    let mut runtime = HostRuntime::new(config, input);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime.run(&mut out)
}
