//! Builds the per-run context and the executable copy of a sequence.

use super::intent::ExecutionIntent;
use crate::errors::{FalconError, Result};
use crate::project::ProjectContext;
use crate::sequence::{
    CommandSequence, LogLevel, Options, ProgressObserver, SequenceContext, SequenceGroup,
    SequenceStep,
};
use serde_json::Value;
use tracing::{debug, info};

pub const REBUILD_VALIDATION_ORG: &str = "rebuildValidationOrg";
pub const SCRATCH_DEF_JSON: &str = "scratchDefJson";
pub const REBUILD_GROUP_NAME: &str = "Re-build Validation Org";

/// Derive the run context for `intent` from the resolved project.
pub fn build_context(
    project: &ProjectContext,
    intent: ExecutionIntent,
    log_level: LogLevel,
    observer: Option<ProgressObserver>,
) -> Result<SequenceContext> {
    let local = &project.config().local;
    let (target_key, target_org_alias, target_is_scratch_org) = match intent {
        ExecutionIntent::ValidateDemo => (
            "demoValidationOrgAlias",
            local.demo_validation_org_alias.clone(),
            true,
        ),
        ExecutionIntent::DeployDemo => (
            "demoDeploymentOrgAlias",
            local.demo_deployment_org_alias.clone(),
            false,
        ),
        other => return Err(FalconError::InvalidIntent(other.to_string())),
    };

    let missing: Vec<String> = [
        ("devHubAlias", local.dev_hub_alias.as_str()),
        (target_key, target_org_alias.as_str()),
    ]
    .into_iter()
    .filter(|(_, alias)| alias.trim().is_empty())
    .map(|(key, _)| key.to_string())
    .collect();
    if !missing.is_empty() {
        return Err(FalconError::InvalidConfig {
            context: format!("local configuration has no org alias for a {intent} run"),
            keys: missing,
        });
    }

    Ok(SequenceContext {
        dev_hub_alias: local.dev_hub_alias.clone(),
        target_org_alias,
        target_is_scratch_org,
        project_path: project.path().to_path_buf(),
        config_path: project.config_dir(),
        mdapi_source_path: project.mdapi_source_dir(),
        data_path: project.data_dir(),
        log_level,
        observer,
    })
}

/// Produce the sequence that will actually be executed.
///
/// `loaded` is left untouched. For a validation run the copy gets a definite
/// boolean `rebuildValidationOrg` (defaulting to `true`) and, when it is true,
/// a rebuild group at the front. Deploy runs are passed through unchanged.
pub fn prepare_sequence(
    loaded: &CommandSequence,
    intent: ExecutionIntent,
    context: &SequenceContext,
) -> CommandSequence {
    let mut sequence = loaded.clone();
    if intent != ExecutionIntent::ValidateDemo {
        return sequence;
    }

    let rebuild = match sequence.options.get(REBUILD_VALIDATION_ORG) {
        Some(Value::Bool(flag)) => *flag,
        _ => true,
    };
    sequence
        .options
        .insert(REBUILD_VALIDATION_ORG.to_string(), Value::Bool(rebuild));

    if rebuild {
        let scratch_def = sequence
            .options
            .get(SCRATCH_DEF_JSON)
            .cloned()
            .unwrap_or(Value::Null);
        info!(target = %context.target_org_alias, "prepending validation org rebuild");
        sequence
            .sequence_groups
            .insert(0, rebuild_group(&context.target_org_alias, scratch_def));
    } else {
        debug!("validation org rebuild disabled by sequence options");
    }
    sequence
}

fn rebuild_group(target_org_alias: &str, scratch_def: Value) -> SequenceGroup {
    let mut options = Options::new();
    options.insert(
        "scratchOrgAlias".to_string(),
        Value::String(target_org_alias.to_string()),
    );
    options.insert(SCRATCH_DEF_JSON.to_string(), scratch_def);

    SequenceGroup {
        group_id: 0,
        group_name: REBUILD_GROUP_NAME.to_string(),
        description: "Deletes the current validation org, then creates a fresh one".to_string(),
        sequence_steps: vec![
            SequenceStep {
                step_name: "Delete Existing Scratch Org".to_string(),
                description: format!("Deletes the scratch org aliased '{target_org_alias}'"),
                action: "delete-scratch-org".to_string(),
                options: options.clone(),
            },
            SequenceStep {
                step_name: "Create New Scratch Org".to_string(),
                description: format!("Creates a scratch org aliased '{target_org_alias}'"),
                action: "create-scratch-org".to_string(),
                options,
            },
        ],
    }
}
