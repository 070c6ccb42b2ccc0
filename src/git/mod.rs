//! Git plumbing used while provisioning a demo project.
//!
//! Everything here shells out to the `git` executable through a
//! [`ShellRunner`], which always hands back the exit code and captured output
//! instead of failing on a non-zero exit. Exit codes are load-bearing for the
//! remote classifier, so callers dispatch on them explicitly.
//!
//! - [`RemoteClassifier`]: reachability/state of a remote repository
//! - [`Provisioner`]: clone / init / commit / remote-add on a local working copy

pub mod provision;
pub mod remote;

pub use provision::{Provisioner, ensure_git_installed, repo_name_from_uri};
pub use remote::{RemoteClassifier, RemoteRepositoryState, RemoteRepositoryVerdict};

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// A single subprocess invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; `None` inherits the caller's.
    pub cwd: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Shorthand for a `git` invocation.
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code with signal termination folded to -1.
    pub fn code(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    fn from_output(output: std::process::Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Abstraction over subprocess execution for testability.
/// Real implementation: `TokioShellRunner`. Test double: `StubRunner`.
///
/// Implementations must return `Ok` for any process that ran to completion,
/// whatever its exit code. `Err` is reserved for failing to launch it.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput>;

    fn run_blocking(&self, command: &ShellCommand) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioShellRunner;

#[async_trait]
impl ShellRunner for TokioShellRunner {
    #[instrument(skip_all, fields(command = %command))]
    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args).stdin(std::process::Stdio::null());
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        let output = CommandOutput::from_output(cmd.output().await?);
        debug!(exit_code = ?output.exit_code, "command finished");
        Ok(output)
    }

    #[instrument(skip_all, fields(command = %command))]
    fn run_blocking(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        let mut cmd = std::process::Command::new(&command.program);
        cmd.args(&command.args).stdin(std::process::Stdio::null());
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        let output = CommandOutput::from_output(cmd.output()?);
        debug!(exit_code = ?output.exit_code, "command finished");
        Ok(output)
    }
}
