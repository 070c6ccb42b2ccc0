use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Verbosity requested for the executor's own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => anyhow::bail!(
                "Invalid log level '{}'. Valid values: trace, debug, info, warn, error",
                s
            ),
        }
    }
}

/// Progress notifications emitted by an executor while it walks a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    GroupStarted {
        group_name: String,
        total_steps: usize,
    },
    StepStarted {
        group_name: String,
        step_name: String,
        action: String,
    },
    StepFinished {
        step_name: String,
        succeeded: bool,
    },
}

pub type ProgressObserver = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Parameters for one run of a sequence. Built fresh per `validate`/`deploy`.
#[derive(Clone)]
pub struct SequenceContext {
    pub dev_hub_alias: String,
    pub target_org_alias: String,
    pub target_is_scratch_org: bool,
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub mdapi_source_path: PathBuf,
    pub data_path: PathBuf,
    pub log_level: LogLevel,
    pub observer: Option<ProgressObserver>,
}

impl SequenceContext {
    pub fn notify(&self, event: ProgressEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }
}

impl fmt::Debug for SequenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceContext")
            .field("dev_hub_alias", &self.dev_hub_alias)
            .field("target_org_alias", &self.target_org_alias)
            .field("target_is_scratch_org", &self.target_is_scratch_org)
            .field("project_path", &self.project_path)
            .field("config_path", &self.config_path)
            .field("mdapi_source_path", &self.mdapi_source_path)
            .field("data_path", &self.data_path)
            .field("log_level", &self.log_level)
            .field("observer", &self.observer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::default().to_string(), "info");
    }

    #[test]
    fn notify_reaches_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let ctx = SequenceContext {
            dev_hub_alias: "hub".into(),
            target_org_alias: "org".into(),
            target_is_scratch_org: false,
            project_path: PathBuf::from("/p"),
            config_path: PathBuf::from("/p/demo-config"),
            mdapi_source_path: PathBuf::from("/p/mdapi-source"),
            data_path: PathBuf::from("/p/demo-data"),
            log_level: LogLevel::Info,
            observer: Some(Arc::new(move |e: &ProgressEvent| {
                sink.lock().unwrap().push(e.clone())
            })),
        };

        ctx.notify(ProgressEvent::StepFinished {
            step_name: "x".into(),
            succeeded: true,
        });

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(format!("{ctx:?}").contains("<fn>"));
    }
}
