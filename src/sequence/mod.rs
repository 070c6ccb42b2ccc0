//! Declarative command sequences.
//!
//! A sequence description is a JSON file under `demo-config/`:
//!
//! ```json
//! {
//!   "options": { "rebuildValidationOrg": true, "scratchDefJson": "demo-scratch-def.json" },
//!   "sequenceGroups": [
//!     {
//!       "groupId": 1,
//!       "groupName": "Deploy Metadata",
//!       "description": "Pushes the demo metadata to the target org",
//!       "sequenceSteps": [
//!         {
//!           "stepName": "Deploy Source",
//!           "action": "deploy-metadata",
//!           "options": { "mdapiSource": "v1" }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Validation runs on the raw JSON before typed deserialization so a missing
//! or empty group list is reported as `InvalidConfig`, not a parse error.

pub mod context;
pub mod executor;

pub use context::{LogLevel, ProgressEvent, ProgressObserver, SequenceContext};
pub use executor::{DryRunExecutor, SequenceExecutor, StatusReport, StepReport, StepStatus};

use crate::errors::{FalconError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, instrument};

/// Named settings bag used by sequences and steps.
pub type Options = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSequence {
    #[serde(default)]
    pub options: Options,
    pub sequence_groups: Vec<SequenceGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceGroup {
    #[serde(default)]
    pub group_id: u32,
    pub group_name: String,
    #[serde(default)]
    pub description: String,
    pub sequence_steps: Vec<SequenceStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStep {
    pub step_name: String,
    #[serde(default)]
    pub description: String,
    /// Symbolic operation name understood by the executor, e.g. `create-scratch-org`.
    pub action: String,
    #[serde(default)]
    pub options: Options,
}

impl CommandSequence {
    pub fn step_count(&self) -> usize {
        self.sequence_groups
            .iter()
            .map(|g| g.sequence_steps.len())
            .sum()
    }
}

/// Read, validate and parse the sequence description at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_sequence(path: &Path) -> Result<CommandSequence> {
    if !path.is_file() {
        return Err(FalconError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let unparsed = |detail: String| FalconError::UnparsedConfig {
        path: path.to_path_buf(),
        detail,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| unparsed(e.to_string()))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| unparsed(e.to_string()))?;
    validate_sequence(&value)?;
    let sequence: CommandSequence =
        serde_json::from_value(value).map_err(|e| unparsed(e.to_string()))?;

    debug!(
        groups = sequence.sequence_groups.len(),
        steps = sequence.step_count(),
        "loaded sequence description"
    );
    Ok(sequence)
}

/// Validate a raw sequence description.
///
/// A present, non-empty `sequenceGroups` array is a hard precondition and
/// short-circuits. Group and step content is then checked in one pass and
/// every offending key is reported together.
pub fn validate_sequence(value: &Value) -> Result<()> {
    let groups = match value.get("sequenceGroups") {
        Some(Value::Array(groups)) if !groups.is_empty() => groups,
        _ => {
            return Err(FalconError::InvalidConfig {
                context: "sequence description must define at least one group in 'sequenceGroups'"
                    .to_string(),
                keys: vec!["sequenceGroups".to_string()],
            });
        }
    };

    let mut invalid = Vec::new();
    if let Some(options) = value.get("options")
        && !options.is_object()
    {
        invalid.push("options".to_string());
    }
    for (i, group) in groups.iter().enumerate() {
        collect_group_errors(&format!("sequenceGroups[{i}]"), group, &mut invalid);
    }

    if !invalid.is_empty() {
        return Err(FalconError::InvalidConfig {
            context: "sequence description has invalid groups or steps".to_string(),
            keys: invalid,
        });
    }
    Ok(())
}

fn collect_group_errors(prefix: &str, group: &Value, invalid: &mut Vec<String>) {
    let Some(group) = group.as_object() else {
        invalid.push(prefix.to_string());
        return;
    };
    if !is_non_empty_str(group.get("groupName")) {
        invalid.push(format!("{prefix}.groupName"));
    }
    match group.get("sequenceSteps") {
        Some(Value::Array(steps)) if !steps.is_empty() => {
            for (j, step) in steps.iter().enumerate() {
                let step_prefix = format!("{prefix}.sequenceSteps[{j}]");
                let Some(step) = step.as_object() else {
                    invalid.push(step_prefix);
                    continue;
                };
                for key in ["stepName", "action"] {
                    if !is_non_empty_str(step.get(key)) {
                        invalid.push(format!("{step_prefix}.{key}"));
                    }
                }
                if let Some(options) = step.get("options")
                    && !options.is_object()
                {
                    invalid.push(format!("{step_prefix}.options"));
                }
            }
        }
        _ => invalid.push(format!("{prefix}.sequenceSteps")),
    }
}

fn is_non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}


#[cfg(test)]
mod tests {
    use super::fixtures::sequence_json;
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn loads_valid_sequence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build.json");
        std::fs::write(&path, sequence_json().to_string()).unwrap();

        let sequence = load_sequence(&path).unwrap();

        assert_eq!(sequence.sequence_groups.len(), 2);
        assert_eq!(sequence.step_count(), 2);
        assert_eq!(sequence.sequence_groups[1].description, "");
        assert!(sequence.sequence_groups[1].sequence_steps[0].options.is_empty());
        assert_eq!(sequence.options["scratchDefJson"], "demo-scratch-def.json");
    }

    #[test]
    fn empty_group_list_fails_before_content_checks() {
        let value = json!({ "options": "not-an-object", "sequenceGroups": [] });
        let err = validate_sequence(&value).unwrap_err();
        assert_eq!(err.kind(), "InvalidConfig");
        assert_eq!(err.invalid_keys(), ["sequenceGroups"]);
    }

    #[test]
    fn missing_or_non_array_groups_is_invalid() {
        for value in [json!({}), json!({ "sequenceGroups": { "a": 1 } })] {
            let err = validate_sequence(&value).unwrap_err();
            assert_eq!(err.invalid_keys(), ["sequenceGroups"]);
        }
    }

    #[test]
    fn content_errors_are_collected() {
        let value = json!({
            "sequenceGroups": [
                { "groupName": "", "sequenceSteps": [] },
                { "groupName": "ok", "sequenceSteps": [ { "stepName": "s" }, 5 ] },
                "nope"
            ]
        });
        let err = validate_sequence(&value).unwrap_err();
        assert_eq!(
            err.invalid_keys(),
            [
                "sequenceGroups[0].groupName",
                "sequenceGroups[0].sequenceSteps",
                "sequenceGroups[1].sequenceSteps[0].action",
                "sequenceGroups[1].sequenceSteps[1]",
                "sequenceGroups[2]",
            ]
        );
    }

    #[test]
    fn missing_file_and_bad_json_are_distinguished() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build.json");
        assert_eq!(load_sequence(&path).unwrap_err().kind(), "ConfigNotFound");

        std::fs::write(&path, "[1, 2").unwrap();
        assert_eq!(load_sequence(&path).unwrap_err().kind(), "UnparsedConfig");
    }
}
