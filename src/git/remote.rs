//! Remote repository state classification.
//!
//! The probe is `git ls-remote --exit-code -h <uri>`: read-only, heads only.
//! Its exit code decides the verdict:
//!
//! | exit code | state                  |
//! |-----------|------------------------|
//! | 0         | `ReachableWithHistory` |
//! | 2         | `ReachableEmpty`       |
//! | 128       | `Unreachable`          |
//! | other     | `IndeterminateError`   |
//!
//! The blocking helpers are coarser than [`RemoteClassifier::classify`]: they
//! only answer "did the probe exit 0", so an empty remote and a missing one
//! look the same to [`RemoteClassifier::is_reachable_with_history`].

use super::{CommandOutput, ShellCommand, ShellRunner};
use crate::errors::{FalconError, Result, require_non_empty};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Exit code for a remote with at least one ref under `refs/heads`.
pub const EXIT_REACHABLE_WITH_HISTORY: i32 = 0;
/// `--exit-code` status when the remote answered but matched no heads.
pub const EXIT_REACHABLE_EMPTY: i32 = 2;
/// Git's fatal status: repository missing or not accessible.
pub const EXIT_UNREACHABLE: i32 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteRepositoryState {
    ReachableWithHistory,
    ReachableEmpty,
    Unreachable,
    IndeterminateError,
}

impl RemoteRepositoryState {
    /// Map a probe exit code to a state. `None` (killed by signal) is indeterminate.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(EXIT_REACHABLE_WITH_HISTORY) => RemoteRepositoryState::ReachableWithHistory,
            Some(EXIT_REACHABLE_EMPTY) => RemoteRepositoryState::ReachableEmpty,
            Some(EXIT_UNREACHABLE) => RemoteRepositoryState::Unreachable,
            _ => RemoteRepositoryState::IndeterminateError,
        }
    }
}

impl fmt::Display for RemoteRepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteRepositoryState::ReachableWithHistory => write!(f, "reachable-with-history"),
            RemoteRepositoryState::ReachableEmpty => write!(f, "reachable-empty"),
            RemoteRepositoryState::Unreachable => write!(f, "unreachable"),
            RemoteRepositoryState::IndeterminateError => write!(f, "indeterminate-error"),
        }
    }
}

/// Outcome of one probe, with the raw signals it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepositoryVerdict {
    pub state: RemoteRepositoryState,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub message: String,
}

impl RemoteRepositoryVerdict {
    fn from_probe(remote_uri: &str, output: CommandOutput) -> Self {
        let state = RemoteRepositoryState::from_exit_code(output.exit_code);
        let message = match state {
            RemoteRepositoryState::ReachableWithHistory => {
                format!("Remote repository {remote_uri} is reachable and has commits")
            }
            RemoteRepositoryState::ReachableEmpty => {
                format!("Remote repository {remote_uri} is reachable but has no commits")
            }
            RemoteRepositoryState::Unreachable => {
                format!("Remote repository {remote_uri} does not exist or is not accessible")
            }
            RemoteRepositoryState::IndeterminateError => format!(
                "Unexpected result (exit {}) while probing {remote_uri}: {}",
                output.code(),
                output.stderr.trim()
            ),
        };
        Self {
            state,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            message,
        }
    }

    /// True only for an unexpected probe result. Empty and missing remotes
    /// are answers, not anomalies.
    pub fn is_anomaly(&self) -> bool {
        self.state == RemoteRepositoryState::IndeterminateError
    }
}

/// Classifies remote repositories by probing them with `git ls-remote`.
#[derive(Clone)]
pub struct RemoteClassifier {
    runner: Arc<dyn ShellRunner>,
}

impl RemoteClassifier {
    pub fn new(runner: Arc<dyn ShellRunner>) -> Self {
        Self { runner }
    }

    /// Probe `remote_uri` after waiting `delay_seconds`, and classify the result.
    ///
    /// The delay throttles repeated probes against a remote that may be
    /// rate-limited or still provisioning. `IndeterminateError` is returned as
    /// a verdict; only a failure to launch git is an `Err`.
    #[instrument(skip(self))]
    pub async fn classify(
        &self,
        remote_uri: &str,
        delay_seconds: u64,
    ) -> Result<RemoteRepositoryVerdict> {
        require_non_empty("remote_uri", remote_uri)?;
        if delay_seconds > 0 {
            debug!(delay_seconds, "waiting before probing remote");
            tokio::time::sleep(Duration::from_secs(delay_seconds)).await;
        }

        let command = probe_command(remote_uri);
        let output = self
            .runner
            .run(&command)
            .await
            .map_err(|source| FalconError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let verdict = RemoteRepositoryVerdict::from_probe(remote_uri, output);
        if verdict.is_anomaly() {
            warn!(
                exit_code = ?verdict.exit_code,
                stderr = %verdict.stderr.trim(),
                "remote probe returned an unexpected exit code"
            );
        } else {
            info!(state = %verdict.state, "remote repository classified");
        }
        Ok(verdict)
    }

    /// Blocking check: true iff the `--exit-code` probe ran and exited 0.
    ///
    /// Cannot tell an empty remote from an unreachable one; use
    /// [`classify`](Self::classify) when that distinction matters.
    pub fn is_reachable_with_history(&self, remote_uri: &str) -> bool {
        if remote_uri.trim().is_empty() {
            return false;
        }
        self.probe_blocking(&probe_command(remote_uri))
    }

    /// Blocking check: true iff `git ls-remote -h <uri>` exits 0, which holds
    /// for empty and populated remotes alike.
    pub fn is_readable(&self, remote_uri: &str) -> bool {
        if remote_uri.trim().is_empty() {
            return false;
        }
        self.probe_blocking(&ShellCommand::git(["ls-remote", "-h", remote_uri]))
    }

    fn probe_blocking(&self, command: &ShellCommand) -> bool {
        match self.runner.run_blocking(command) {
            Ok(output) => output.success(),
            Err(err) => {
                debug!(command = %command, error = %err, "probe could not be launched");
                false
            }
        }
    }
}

fn probe_command(remote_uri: &str) -> ShellCommand {
    ShellCommand::git(["ls-remote", "--exit-code", "-h", remote_uri])
}
