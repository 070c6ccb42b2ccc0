use crate::git::{RemoteRepositoryState, RemoteRepositoryVerdict};
use crate::sequence::{ProgressEvent, ProgressObserver, StatusReport, StepStatus};
use crate::ui::icons::{CHECK, CROSS, GROUP, PLANNED, REMOTE, SKIPPED, STEP, WARN};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Terminal UI for a demo build, rendered via `indicatif`.
///
/// Two bars are stacked vertically:
/// - Group bar: the sequence group currently running
/// - Step spinner: the step inside that group
///
/// Executors report through [`BuildUI::observer`]; the UI never drives the run.
pub struct BuildUI {
    multi: MultiProgress,
    group_bar: ProgressBar,
    step_bar: ProgressBar,
    verbose: bool,
}

impl BuildUI {
    pub fn new(verbose: bool) -> Arc<Self> {
        let multi = MultiProgress::new();

        let group_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} {msg}")
            .expect("progress bar template is a valid static string");
        let group_bar = multi.add(ProgressBar::new(0));
        group_bar.set_style(group_style);
        group_bar.set_prefix(" Group");

        let step_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");
        let step_bar = multi.add(ProgressBar::new_spinner());
        step_bar.set_style(step_style);
        step_bar.set_prefix("  Step");

        Arc::new(Self {
            multi,
            group_bar,
            step_bar,
            verbose,
        })
    }

    /// Print a line via `MultiProgress`, falling back to `eprintln!` if the rich UI fails.
    fn print_line(&self, msg: impl AsRef<str>) {
        if self.multi.println(msg.as_ref()).is_err() {
            eprintln!("{}", msg.as_ref());
        }
    }

    pub fn handle(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::GroupStarted {
                group_name,
                total_steps,
            } => {
                self.group_bar.set_message(format!(
                    "{}{} {}",
                    GROUP,
                    style(group_name).yellow(),
                    style(format!("({total_steps} steps)")).dim()
                ));
            }
            ProgressEvent::StepStarted {
                step_name, action, ..
            } => {
                self.step_bar.set_message(format!(
                    "{} {}",
                    step_name,
                    style(format!("[{action}]")).dim()
                ));
                self.step_bar.enable_steady_tick(Duration::from_millis(100));
                if self.verbose {
                    self.print_line(format!("    {}{}", STEP, style(step_name).dim()));
                }
            }
            ProgressEvent::StepFinished {
                step_name,
                succeeded,
            } => {
                if !succeeded {
                    self.print_line(format!("    {}{}", CROSS, style(step_name).red()));
                }
            }
        }
    }

    /// An observer to hand to the orchestrator.
    pub fn observer(self: &Arc<Self>) -> ProgressObserver {
        let ui = Arc::clone(self);
        Arc::new(move |event: &ProgressEvent| ui.handle(event))
    }

    pub fn finish(&self) {
        self.step_bar.finish_and_clear();
        self.group_bar.finish_and_clear();
    }
}

/// Print the executor's report as a step list plus a one-line summary.
pub fn print_report(report: &StatusReport) {
    println!();
    for step in &report.steps {
        let icon = match step.status {
            StepStatus::Succeeded => &CHECK,
            StepStatus::Failed => &CROSS,
            StepStatus::Planned => &PLANNED,
            StepStatus::Skipped => &SKIPPED,
        };
        println!(
            "  {}{} {} {}",
            icon,
            style(&step.group_name).dim(),
            step.step_name,
            style(format!("[{}]", step.action)).dim()
        );
    }
    let kind = if report.target_is_scratch_org {
        "scratch org"
    } else {
        "org"
    };
    let headline = if report.success {
        style("Sequence complete").green().bold()
    } else {
        style("Sequence failed").red().bold()
    };
    println!();
    println!(
        "{} against {} '{}' ({} steps, {}s)",
        headline,
        kind,
        report.target_org_alias,
        report.steps.len(),
        (report.finished_at - report.started_at).num_seconds()
    );
}

pub fn print_verdict(remote_uri: &str, verdict: &RemoteRepositoryVerdict) {
    let icon = match verdict.state {
        RemoteRepositoryState::ReachableWithHistory | RemoteRepositoryState::ReachableEmpty => {
            &CHECK
        }
        RemoteRepositoryState::Unreachable => &CROSS,
        RemoteRepositoryState::IndeterminateError => &WARN,
    };
    println!(
        "{}{} {}",
        REMOTE,
        style(remote_uri).bold(),
        style(verdict.state.to_string()).cyan()
    );
    println!("  {}{}", icon, verdict.message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_accepts_every_event_kind() {
        let ui = BuildUI::new(true);
        let observer = ui.observer();
        observer(&ProgressEvent::GroupStarted {
            group_name: "Deploy".into(),
            total_steps: 1,
        });
        observer(&ProgressEvent::StepStarted {
            group_name: "Deploy".into(),
            step_name: "Push".into(),
            action: "deploy-metadata".into(),
        });
        observer(&ProgressEvent::StepFinished {
            step_name: "Push".into(),
            succeeded: false,
        });
        ui.finish();
    }
}
