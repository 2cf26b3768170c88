/// Process oracle configuration: what to run and how long to let it run.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for running the target program once per candidate.
///
/// The request is written to the child's stdin as JSON; the child is
/// killed when it exceeds `timeout_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOracleConfig {
    /// Executable to launch (resolved through PATH).
    pub program: String,
    /// Arguments passed to `program`.
    pub args: Vec<String>,
    /// Wall-clock budget per candidate in milliseconds (default: 1000).
    pub timeout_ms: u64,
    /// Extra environment variables for the child.
    pub env: BTreeMap<String, String>,
    /// Working directory. None = inherit.
    pub working_dir: Option<PathBuf>,
}

impl Default for ProcessOracleConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            timeout_ms: 1_000,
            env: BTreeMap::new(),
            working_dir: None,
        }
    }
}

impl ProcessOracleConfig {
    /// Config for `program args...` with default limits.
    pub fn command(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
