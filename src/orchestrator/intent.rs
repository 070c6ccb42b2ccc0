//! Execution intent and the one-shot guard around setting it.
//!
//! ```text
//! NotSpecified ──set_intent──▶ ValidateDemo | DeployDemo      (Idle → Running)
//!              ──set_intent──▶ HealthCheck | RepairProject    IntentNotImplemented
//! any state while Running ───▶ SequenceAlreadyRunning
//! ```

use crate::errors::{FalconError, Result};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionIntent {
    #[default]
    NotSpecified,
    ValidateDemo,
    DeployDemo,
    HealthCheck,
    RepairProject,
}

impl ExecutionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionIntent::NotSpecified => "not-specified",
            ExecutionIntent::ValidateDemo => "validate-demo",
            ExecutionIntent::DeployDemo => "deploy-demo",
            ExecutionIntent::HealthCheck => "health-check",
            ExecutionIntent::RepairProject => "repair-project",
        }
    }
}

impl fmt::Display for ExecutionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExecutionIntent {
    type Err = FalconError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "validate-demo" | "validate" => Ok(ExecutionIntent::ValidateDemo),
            "deploy-demo" | "deploy" => Ok(ExecutionIntent::DeployDemo),
            "health-check" => Ok(ExecutionIntent::HealthCheck),
            "repair-project" => Ok(ExecutionIntent::RepairProject),
            _ => Err(FalconError::UnknownIntent(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Holds the active intent for one orchestrator instance.
///
/// Once an intent is accepted the controller stays `Running` for the rest of
/// its life, so the intent is effectively write-once.
#[derive(Debug, Default)]
pub struct IntentController {
    intent: ExecutionIntent,
    state: RunState,
}

impl IntentController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> ExecutionIntent {
        self.intent
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Accept `intent` and mark the run as in progress, in one step.
    pub fn set_intent(&mut self, intent: ExecutionIntent) -> Result<()> {
        if self.state == RunState::Running {
            return Err(FalconError::SequenceAlreadyRunning);
        }
        match intent {
            ExecutionIntent::ValidateDemo | ExecutionIntent::DeployDemo => {
                self.intent = intent;
                self.state = RunState::Running;
                debug!(intent = %intent, "execution intent set");
                Ok(())
            }
            ExecutionIntent::HealthCheck | ExecutionIntent::RepairProject => {
                Err(FalconError::IntentNotImplemented(intent.to_string()))
            }
            ExecutionIntent::NotSpecified => Err(FalconError::UnknownIntent(intent.to_string())),
        }
    }

    /// Default to `DeployDemo` when nothing has been chosen yet; otherwise keep
    /// whatever intent is already active.
    pub fn ensure_deploy_default(&mut self) -> Result<ExecutionIntent> {
        if self.intent == ExecutionIntent::NotSpecified {
            self.set_intent(ExecutionIntent::DeployDemo)?;
        }
        Ok(self.intent)
    }
}
