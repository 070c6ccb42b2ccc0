//! Demo `validate` and `deploy` commands.

use anyhow::{Context, Result};
use falcon_demo::orchestrator::DemoOrchestrator;
use falcon_demo::project::ProjectContext;
use falcon_demo::sequence::DryRunExecutor;
use falcon_demo::ui::{BuildUI, print_report};
use std::path::Path;

use crate::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Validate,
    Deploy,
}

pub async fn cmd_build(
    cli: &Cli,
    project_dir: &Path,
    sequence: Option<&str>,
    kind: BuildKind,
) -> Result<()> {
    let project = ProjectContext::resolve(project_dir, sequence)?;
    let sequence_file = project.sequence_file();

    let ui = BuildUI::new(cli.verbose);
    let mut orchestrator = DemoOrchestrator::new(project, DryRunExecutor)
        .with_log_level(cli.log_level)
        .with_observer(ui.observer());

    let result = match kind {
        BuildKind::Validate => orchestrator.validate().await,
        BuildKind::Deploy => orchestrator.deploy().await,
    };
    ui.finish();

    let report = result
        .with_context(|| format!("Demo build failed for {}", sequence_file.display()))?;
    print_report(&report);

    if !report.success {
        anyhow::bail!("Sequence reported failed steps");
    }
    Ok(())
}
