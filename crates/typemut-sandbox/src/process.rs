use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::runtime::Runtime;
use tracing::{trace, warn};
use typemut_explore::oracle::{Oracle, Outcome};
use typemut_ir::types::Value;

use crate::config::ProcessOracleConfig;

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("no program configured for the process oracle")]
    MissingProgram,

    #[error("timeout_ms must be at least 1")]
    ZeroTimeout,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to child process: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// JSON document written to the child's stdin.
#[derive(Debug, Serialize)]
pub struct OracleRequest<'a> {
    pub contract_code: &'a str,
    pub signature: &'a str,
    /// Candidate as plain JSON.
    pub input: serde_json::Value,
    /// Candidate in the lossless tagged form.
    pub typed_input: serde_json::Value,
}

impl<'a> OracleRequest<'a> {
    pub fn new(contract_code: &'a str, candidate: &Value, signature: &'a str) -> Self {
        Self {
            contract_code,
            signature,
            input: candidate.to_json(),
            typed_input: candidate.to_tagged_json(),
        }
    }
}

/// Raw result of one child run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Exited {
        success: bool,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut,
}

impl RunOutcome {
    /// Classify into an oracle verdict.
    ///
    /// Exit status 0 returns stdout, parsed as JSON when possible and as a
    /// JSON string otherwise. Any other exit (including death by signal)
    /// is an exception carrying stderr.
    pub fn into_outcome(self) -> Outcome {
        match self {
            RunOutcome::TimedOut => Outcome::Timeout,
            RunOutcome::Exited {
                success: true,
                stdout,
                ..
            } => {
                let text = stdout.trim();
                let payload = serde_json::from_str(text)
                    .unwrap_or_else(|_| serde_json::Value::String(text.to_string()));
                Outcome::Returned(payload)
            }
            RunOutcome::Exited { code, stderr, .. } => {
                let stderr = stderr.trim();
                let message = match (stderr.is_empty(), code) {
                    (false, _) => stderr.to_string(),
                    (true, Some(code)) => format!("exit status {code}"),
                    (true, None) => "terminated by signal".to_string(),
                };
                Outcome::Exception(message)
            }
        }
    }
}

/// Oracle that launches the target program once per candidate.
///
/// Execution is synchronous from the caller's point of view: each call
/// blocks on a private current-thread runtime until the child exits or
/// the wall-clock budget runs out. On unix the child leads its own process
/// group and a timeout kills the whole group, including anything the
/// target forked.
pub struct ProcessOracle {
    config: ProcessOracleConfig,
    runtime: Runtime,
}

impl ProcessOracle {
    pub fn new(config: &ProcessOracleConfig) -> Result<Self, OracleError> {
        if config.program.is_empty() {
            return Err(OracleError::MissingProgram);
        }
        if config.timeout_ms == 0 {
            return Err(OracleError::ZeroTimeout);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config: config.clone(),
            runtime,
        })
    }

    pub fn config(&self) -> &ProcessOracleConfig {
        &self.config
    }

    /// Run the child once with `request` on stdin.
    pub fn run(&self, request: &OracleRequest<'_>) -> Result<RunOutcome, OracleError> {
        let payload = serde_json::to_vec(request)?;
        let limit = Duration::from_millis(self.config.timeout_ms);
        self.runtime.block_on(run_child(&self.config, payload, limit))
    }
}

async fn run_child(
    config: &ProcessOracleConfig,
    payload: Vec<u8>,
    limit: Duration,
) -> Result<RunOutcome, OracleError> {
    let mut command = Command::new(&config.program);
    command
        .args(&config.args)
        .envs(&config.env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // Own process group, so a timeout can kill everything the target started.
    #[cfg(unix)]
    command.process_group(0);
    if let Some(dir) = &config.working_dir {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|source| OracleError::Spawn {
        program: config.program.clone(),
        source,
    })?;
    // Doubles as the process group id. Read before waiting: a reaped child
    // reports None while its descendants may still hold the pipes.
    let pgid = child.id();
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let write = async move {
        let Some(mut stdin) = stdin else {
            return Ok(());
        };
        match stdin.write_all(&payload).await {
            // The child may exit without reading its input.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    };

    let started = Instant::now();
    let run = async {
        tokio::join!(write, read_pipe(stdout), read_pipe(stderr), child.wait())
    };
    let finished = tokio::time::timeout(limit, run).await;
    match finished {
        Err(_) => {
            kill_process_tree(&mut child, pgid).await;
            trace!(elapsed_ms = started.elapsed().as_millis() as u64, "child timed out");
            Ok(RunOutcome::TimedOut)
        }
        Ok((written, stdout, stderr, status)) => {
            written?;
            let status = status?;
            trace!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                %status,
                "child exited"
            );
            Ok(RunOutcome::Exited {
                success: status.success(),
                code: status.code(),
                stdout: String::from_utf8_lossy(&stdout?).into_owned(),
                stderr: String::from_utf8_lossy(&stderr?).into_owned(),
            })
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// SIGKILL the child's process group, then reap the child.
async fn kill_process_tree(child: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pgid {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            trace!(pid, error = %e, "killpg failed");
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;
    if let Err(e) = child.kill().await {
        trace!(error = %e, "kill after timeout failed");
    }
}

impl Oracle for ProcessOracle {
    fn execute(&mut self, contract_code: &str, candidate: &Value, signature: &str) -> Outcome {
        let request = OracleRequest::new(contract_code, candidate, signature);
        match self.run(&request) {
            Ok(outcome) => outcome.into_outcome(),
            Err(e) => {
                warn!(program = %self.config.program, error = %e, "oracle integration fault");
                Outcome::Exception(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_parses_json_stdout() {
        let run = RunOutcome::Exited {
            success: true,
            code: Some(0),
            stdout: " {\"x\": 1}\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(run.into_outcome(), Outcome::Returned(serde_json::json!({"x": 1})));
    }

    #[test]
    fn test_success_with_plain_stdout_is_string() {
        let run = RunOutcome::Exited {
            success: true,
            code: Some(0),
            stdout: "hello\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(run.into_outcome(), Outcome::Returned(serde_json::json!("hello")));
    }

    #[test]
    fn test_failure_prefers_stderr() {
        let run = RunOutcome::Exited {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: "Traceback: ZeroDivisionError\n".to_string(),
        };
        assert_eq!(
            run.into_outcome(),
            Outcome::Exception("Traceback: ZeroDivisionError".to_string())
        );
    }

    #[test]
    fn test_failure_without_stderr_reports_status() {
        let by_code = RunOutcome::Exited {
            success: false,
            code: Some(3),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(by_code.into_outcome(), Outcome::Exception("exit status 3".to_string()));

        let by_signal = RunOutcome::Exited {
            success: false,
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(
            by_signal.into_outcome(),
            Outcome::Exception("terminated by signal".to_string())
        );
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        assert_eq!(RunOutcome::TimedOut.into_outcome(), Outcome::Timeout);
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            ProcessOracle::new(&ProcessOracleConfig::default()),
            Err(OracleError::MissingProgram)
        ));
        let zero = ProcessOracleConfig {
            timeout_ms: 0,
            ..ProcessOracleConfig::command("true", Vec::<String>::new())
        };
        assert!(matches!(ProcessOracle::new(&zero), Err(OracleError::ZeroTimeout)));
    }
}
