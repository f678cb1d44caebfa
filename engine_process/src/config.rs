//! Process engine configuration

use serde::{Deserialize, Serialize};

/// Argument token replaced by the directory or file the tool operates on
///
/// When no argument contains it, the path is appended after all arguments.
pub const PATH_PLACEHOLDER: &str = "{}";

/// Toolchain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessEngineConfig {
    /// Compiler executable, looked up on `PATH`
    pub compiler: String,
    /// Arguments before (or around) the source directory
    pub compiler_args: Vec<String>,
    /// VM executable, looked up on `PATH`
    pub runner: String,
    /// Arguments before (or around) the bytecode path
    pub runner_args: Vec<String>,
    /// Name the snapshot is written under inside the source directory
    pub source_file: String,
    /// File the compiler leaves in its working directory
    pub bytecode_file: String,
    /// Size of each stdout read
    pub read_chunk: usize,
}

impl Default for ProcessEngineConfig {
    fn default() -> Self {
        Self {
            compiler: "codegen".to_string(),
            compiler_args: Vec::new(),
            runner: "vm".to_string(),
            runner_args: Vec::new(),
            source_file: "main.ot".to_string(),
            bytecode_file: ".out".to_string(),
            read_chunk: 4096,
        }
    }
}

impl ProcessEngineConfig {
    pub fn with_compiler(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.compiler = program.into();
        self.compiler_args = args;
        self
    }

    pub fn with_runner(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.runner = program.into();
        self.runner_args = args;
        self
    }
}

/// Substitute `path` into `args`
pub(crate) fn expand_args(args: &[String], path: &str) -> Vec<String> {
    if args.iter().any(|arg| arg.contains(PATH_PLACEHOLDER)) {
        args.iter()
            .map(|arg| arg.replace(PATH_PLACEHOLDER, path))
            .collect()
    } else {
        let mut expanded = args.to_vec();
        expanded.push(path.to_string());
        expanded
    }
}
