//! Demo build orchestration.
//!
//! [`DemoOrchestrator`] owns a resolved [`ProjectContext`] and runs its
//! sequence description once, either as a validation run against a freshly
//! rebuilt scratch org or as a deployment to the configured org.

pub mod assembler;
pub mod intent;

pub use assembler::{build_context, prepare_sequence};
pub use intent::{ExecutionIntent, IntentController, RunState};

use crate::errors::{FalconError, Result};
use crate::project::ProjectContext;
use crate::sequence::{LogLevel, ProgressObserver, SequenceExecutor, StatusReport, load_sequence};
use tracing::{info, instrument};

pub struct DemoOrchestrator<E: SequenceExecutor> {
    project: ProjectContext,
    executor: E,
    controller: IntentController,
    log_level: LogLevel,
    observer: Option<ProgressObserver>,
}

impl<E: SequenceExecutor> DemoOrchestrator<E> {
    pub fn new(project: ProjectContext, executor: E) -> Self {
        Self {
            project,
            executor,
            controller: IntentController::new(),
            log_level: LogLevel::default(),
            observer: None,
        }
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    pub fn intent(&self) -> ExecutionIntent {
        self.controller.intent()
    }

    /// Validate the demo: rebuild the validation scratch org (unless disabled
    /// by the sequence) and run the sequence against it.
    pub async fn validate(&mut self) -> Result<StatusReport> {
        self.controller.set_intent(ExecutionIntent::ValidateDemo)?;
        self.deploy().await
    }

    /// Run the sequence under the active intent, defaulting to `DeployDemo`
    /// when none has been set.
    #[instrument(skip(self), fields(project = %self.project.path().display()))]
    pub async fn deploy(&mut self) -> Result<StatusReport> {
        let intent = self.controller.ensure_deploy_default()?;

        let context =
            assembler::build_context(&self.project, intent, self.log_level, self.observer.clone())?;
        let loaded = load_sequence(&self.project.sequence_file())?;
        let sequence = assembler::prepare_sequence(&loaded, intent, &context);

        info!(
            intent = %intent,
            target = %context.target_org_alias,
            groups = sequence.sequence_groups.len(),
            "handing sequence to executor"
        );
        self.executor
            .execute(sequence, context)
            .await
            .map_err(FalconError::Executor)
    }
}
