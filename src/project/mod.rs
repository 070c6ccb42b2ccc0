//! Project resolution and configuration validation.
//!
//! A demo project is a directory with two JSON configuration files:
//!
//! ```text
//! <project>/
//! ├── falcon-project.json          # shared, project-level settings ("demo" section)
//! ├── .falcon-config/
//! │   └── falcon-config.json       # developer-local org aliases ("demo" section)
//! ├── demo-config/                 # sequence descriptions
//! ├── mdapi-source/
//! └── demo-data/
//! ```
//!
//! Parse failures (`UnparsedConfig`) are kept apart from semantic
//! completeness failures (`InvalidConfig`) on an already-parsed object.

use crate::errors::{FalconError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub const PROJECT_CONFIG_FILE: &str = "falcon-project.json";
pub const LOCAL_CONFIG_DIR: &str = ".falcon-config";
pub const LOCAL_CONFIG_FILE: &str = "falcon-config.json";

/// Shared project settings. Every field is required and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLevelConfig {
    pub demo_alias: String,
    /// Sequence description filename, relative to `demo-config/`.
    pub demo_config: String,
    pub demo_title: String,
    pub demo_type: String,
    pub demo_version: String,
    pub git_hub_url: String,
    pub git_remote_uri: String,
    pub partner_alias: String,
    pub partner_name: String,
    pub schema_version: String,
}

/// Developer-specific org aliases, read from the local config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDeveloperConfig {
    #[serde(default)]
    pub dev_hub_alias: String,
    #[serde(default)]
    pub demo_validation_org_alias: String,
    #[serde(default)]
    pub demo_deployment_org_alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project: ProjectLevelConfig,
    pub local: LocalDeveloperConfig,
}

/// Parsed but unchecked project-level settings; absent keys stay `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProjectLevelConfig {
    demo_alias: Option<String>,
    demo_config: Option<String>,
    demo_title: Option<String>,
    demo_type: Option<String>,
    demo_version: Option<String>,
    git_hub_url: Option<String>,
    git_remote_uri: Option<String>,
    partner_alias: Option<String>,
    partner_name: Option<String>,
    schema_version: Option<String>,
}

/// Both config files wrap their settings in a `demo` section.
#[derive(Debug, Deserialize)]
struct DemoSection<T> {
    #[serde(default)]
    demo: Option<T>,
}

impl RawProjectLevelConfig {
    fn into_config(self) -> ProjectLevelConfig {
        ProjectLevelConfig {
            demo_alias: self.demo_alias.unwrap_or_default(),
            demo_config: self.demo_config.unwrap_or_default(),
            demo_title: self.demo_title.unwrap_or_default(),
            demo_type: self.demo_type.unwrap_or_default(),
            demo_version: self.demo_version.unwrap_or_default(),
            git_hub_url: self.git_hub_url.unwrap_or_default(),
            git_remote_uri: self.git_remote_uri.unwrap_or_default(),
            partner_alias: self.partner_alias.unwrap_or_default(),
            partner_name: self.partner_name.unwrap_or_default(),
            schema_version: self.schema_version.unwrap_or_default(),
        }
    }
}

impl ProjectLevelConfig {
    /// Every key that is absent or blank, in declaration order.
    pub fn missing_keys(&self) -> Vec<String> {
        [
            ("demoAlias", &self.demo_alias),
            ("demoConfig", &self.demo_config),
            ("demoTitle", &self.demo_title),
            ("demoType", &self.demo_type),
            ("demoVersion", &self.demo_version),
            ("gitHubUrl", &self.git_hub_url),
            ("gitRemoteUri", &self.git_remote_uri),
            ("partnerAlias", &self.partner_alias),
            ("partnerName", &self.partner_name),
            ("schemaVersion", &self.schema_version),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key.to_string())
        .collect()
    }
}

/// The resolved view of a local demo project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    path: PathBuf,
    config: ProjectConfig,
}

impl ProjectContext {
    /// Resolve the project rooted at `project_dir`.
    ///
    /// `sequence_override`, when given and non-empty, replaces the configured
    /// sequence description filename and nothing else.
    #[instrument(skip_all, fields(project_dir = %project_dir.as_ref().display()))]
    pub fn resolve(project_dir: impl AsRef<Path>, sequence_override: Option<&str>) -> Result<Self> {
        let project_dir = project_dir.as_ref();
        if project_dir.as_os_str().is_empty() {
            return Err(FalconError::MissingArguments(
                "a project directory is required to resolve a demo project".to_string(),
            ));
        }
        let path = project_dir
            .canonicalize()
            .map_err(|_| FalconError::ConfigNotFound {
                path: project_dir.to_path_buf(),
            })?;

        let project_file = path.join(PROJECT_CONFIG_FILE);
        let local_file = local_config_path(&path);

        let raw: RawProjectLevelConfig = read_demo_section(&project_file)?;
        let local: LocalDeveloperConfig = read_demo_section(&local_file)?;

        Self::from_parts(path, raw.into_config(), local, sequence_override)
    }

    /// Build a context from already-loaded parts. `path` must be absolute and
    /// every project-level key must be present; blank keys are all reported
    /// in one `InvalidConfig`.
    pub fn from_parts(
        path: PathBuf,
        mut project: ProjectLevelConfig,
        local: LocalDeveloperConfig,
        sequence_override: Option<&str>,
    ) -> Result<Self> {
        if !path.is_absolute() {
            return Err(FalconError::MissingArguments(format!(
                "project path must be absolute, got {}",
                path.display()
            )));
        }
        let missing = project.missing_keys();
        if !missing.is_empty() {
            return Err(FalconError::InvalidConfig {
                context: "project configuration is incomplete".to_string(),
                keys: missing,
            });
        }
        if let Some(name) = sequence_override.map(str::trim).filter(|n| !n.is_empty()) {
            debug!(sequence = name, "overriding configured sequence description");
            project.demo_config = name.to_string();
        }
        Ok(Self {
            path,
            config: ProjectConfig { project, local },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_dir(&self) -> PathBuf {
        self.path.join("demo-config")
    }

    pub fn mdapi_source_dir(&self) -> PathBuf {
        self.path.join("mdapi-source")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join("demo-data")
    }

    /// Full path of the sequence description this project will run.
    pub fn sequence_file(&self) -> PathBuf {
        self.config_dir().join(&self.config.project.demo_config)
    }
}

pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_DIR).join(LOCAL_CONFIG_FILE)
}

fn read_demo_section<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(FalconError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|err| FalconError::UnparsedConfig {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    let section: DemoSection<T> =
        serde_json::from_str(&raw).map_err(|err| FalconError::UnparsedConfig {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
    Ok(section.demo.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn project_json() -> serde_json::Value {
        json!({
            "demo": {
                "demoAlias": "acme-demo",
                "demoConfig": "demo-build-config.json",
                "demoTitle": "ACME Demo",
                "demoType": "Partner",
                "demoVersion": "1.0.0",
                "gitHubUrl": "https://github.com/acme/acme-demo",
                "gitRemoteUri": "https://github.com/acme/acme-demo.git",
                "partnerAlias": "acme",
                "partnerName": "ACME Corp",
                "schemaVersion": "1"
            }
        })
    }

    pub fn local_json() -> serde_json::Value {
        json!({
            "demo": {
                "devHubAlias": "DevHub",
                "demoValidationOrgAlias": "demo-validate",
                "demoDeploymentOrgAlias": "demo-deploy"
            }
        })
    }

    pub fn write_project(
        dir: &Path,
        project: &serde_json::Value,
        local: Option<&serde_json::Value>,
    ) {
        std::fs::write(dir.join(PROJECT_CONFIG_FILE), project.to_string()).unwrap();
        if let Some(local) = local {
            std::fs::create_dir_all(dir.join(LOCAL_CONFIG_DIR)).unwrap();
            std::fs::write(local_config_path(dir), local.to_string()).unwrap();
        }
    }
}
