//! The boundary to whatever actually runs a sequence's steps.
//!
//! The real engine (its action catalogue, retries and org commands) lives
//! outside this crate. [`DryRunExecutor`] walks the sequence and reports every
//! step as planned, which is enough to inspect what a run would do.

use super::{CommandSequence, ProgressEvent, SequenceContext};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Planned,
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub group_name: String,
    pub step_name: String,
    pub action: String,
    pub status: StepStatus,
}

/// Status report handed back by an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub target_org_alias: String,
    pub target_is_scratch_org: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
    pub success: bool,
}

impl StatusReport {
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }
}

/// Runs an assembled sequence against the target described by the context.
#[async_trait]
pub trait SequenceExecutor: Send + Sync {
    async fn execute(
        &self,
        sequence: CommandSequence,
        context: SequenceContext,
    ) -> Result<StatusReport>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl SequenceExecutor for DryRunExecutor {
    async fn execute(
        &self,
        sequence: CommandSequence,
        context: SequenceContext,
    ) -> Result<StatusReport> {
        let started_at = Utc::now();
        let mut steps = Vec::with_capacity(sequence.step_count());

        for group in &sequence.sequence_groups {
            context.notify(ProgressEvent::GroupStarted {
                group_name: group.group_name.clone(),
                total_steps: group.sequence_steps.len(),
            });
            for step in &group.sequence_steps {
                context.notify(ProgressEvent::StepStarted {
                    group_name: group.group_name.clone(),
                    step_name: step.step_name.clone(),
                    action: step.action.clone(),
                });
                info!(
                    group = %group.group_name,
                    step = %step.step_name,
                    action = %step.action,
                    target = %context.target_org_alias,
                    "planned step"
                );
                steps.push(StepReport {
                    group_name: group.group_name.clone(),
                    step_name: step.step_name.clone(),
                    action: step.action.clone(),
                    status: StepStatus::Planned,
                });
                context.notify(ProgressEvent::StepFinished {
                    step_name: step.step_name.clone(),
                    succeeded: true,
                });
            }
        }

        Ok(StatusReport {
            target_org_alias: context.target_org_alias.clone(),
            target_is_scratch_org: context.target_is_scratch_org,
            started_at,
            finished_at: Utc::now(),
            steps,
            success: true,
        })
    }
}
