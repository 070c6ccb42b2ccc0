//! Typed error hierarchy for falcon-demo.
//!
//! A single `FalconError` enum covers project resolution, intent control,
//! sequence assembly and repository provisioning. Every variant renders as
//! `<Kind>: <detail>` so callers can branch on [`FalconError::kind`] and still
//! show a readable message.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FalconError {
    #[error("MissingArguments: {0}")]
    MissingArguments(String),

    #[error("TypeError: expected a non-empty string for '{param}'")]
    EmptyArgument { param: &'static str },

    #[error("UnparsedConfig: could not parse {path}: {detail}")]
    UnparsedConfig { path: PathBuf, detail: String },

    #[error("ConfigNotFound: {path} does not exist")]
    ConfigNotFound { path: PathBuf },

    #[error("InvalidConfig: {context} (invalid or missing: {})", keys.join(", "))]
    InvalidConfig { context: String, keys: Vec<String> },

    #[error("SequenceAlreadyRunning: an execution intent has already been set for this run")]
    SequenceAlreadyRunning,

    #[error("UnknownIntent: '{0}' is not a recognized execution intent")]
    UnknownIntent(String),

    #[error("InvalidIntent: '{0}' cannot drive a demo build")]
    InvalidIntent(String),

    #[error("IntentNotImplemented: '{0}' is recognized but not implemented yet")]
    IntentNotImplemented(String),

    #[error("InvalidTargetDir: {path}: {detail}")]
    InvalidTargetDir { path: PathBuf, detail: String },

    #[error("NoTargetDir: {path} was created but is not usable as a directory")]
    NoTargetDir { path: PathBuf },

    #[error("DestinationNotEmpty: '{path}' already exists and is not an empty directory: {detail}")]
    DestinationNotEmpty { path: PathBuf, detail: String },

    #[error("UnreadableRepoName: could not read a repository name from '{0}'")]
    UnreadableRepoName(String),

    #[error("GitNotInstalled: the git executable could not be found on PATH")]
    GitNotInstalled,

    #[error("GitCommandFailed: `{command}` exited with {exit_code}: {stderr}")]
    GitCommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Spawn: failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Executor: {0:#}")]
    Executor(#[source] anyhow::Error),
}

impl FalconError {
    /// Stable, machine-parsable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            FalconError::MissingArguments(_) => "MissingArguments",
            FalconError::EmptyArgument { .. } => "TypeError",
            FalconError::UnparsedConfig { .. } => "UnparsedConfig",
            FalconError::ConfigNotFound { .. } => "ConfigNotFound",
            FalconError::InvalidConfig { .. } => "InvalidConfig",
            FalconError::SequenceAlreadyRunning => "SequenceAlreadyRunning",
            FalconError::UnknownIntent(_) => "UnknownIntent",
            FalconError::InvalidIntent(_) => "InvalidIntent",
            FalconError::IntentNotImplemented(_) => "IntentNotImplemented",
            FalconError::InvalidTargetDir { .. } => "InvalidTargetDir",
            FalconError::NoTargetDir { .. } => "NoTargetDir",
            FalconError::DestinationNotEmpty { .. } => "DestinationNotEmpty",
            FalconError::UnreadableRepoName(_) => "UnreadableRepoName",
            FalconError::GitNotInstalled => "GitNotInstalled",
            FalconError::GitCommandFailed { .. } => "GitCommandFailed",
            FalconError::Spawn { .. } => "Spawn",
            FalconError::Executor(_) => "Executor",
        }
    }

    /// Keys carried by an `InvalidConfig` error; empty for every other kind.
    pub fn invalid_keys(&self) -> &[String] {
        match self {
            FalconError::InvalidConfig { keys, .. } => keys,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, FalconError>;

/// Reject an empty (or whitespace-only) required string argument.
pub fn require_non_empty(param: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FalconError::EmptyArgument { param });
    }
    Ok(())
}
