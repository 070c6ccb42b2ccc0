//! Repository commands: clone, init-repo and remote-status.

use anyhow::{Context, Result};
use console::style;
use falcon_demo::errors::require_non_empty;
use falcon_demo::git::{
    Provisioner, RemoteClassifier, ShellRunner, TokioShellRunner, ensure_git_installed,
};
use falcon_demo::ui::icons::{CHECK, FOLDER};
use falcon_demo::ui::print_verdict;
use std::path::Path;
use std::sync::Arc;

fn runner() -> Arc<dyn ShellRunner> {
    Arc::new(TokioShellRunner)
}

pub async fn cmd_clone(remote_uri: &str, target_dir: &Path) -> Result<()> {
    require_non_empty("remote_uri", remote_uri)?;
    let runner = runner();
    ensure_git_installed(runner.as_ref()).await?;

    let provisioner = Provisioner::new(runner);
    let cloned_into = provisioner
        .clone_repo(remote_uri, target_dir)
        .await
        .with_context(|| format!("Failed to clone {remote_uri}"))?;

    println!(
        "{}Cloned {} into {}{}",
        CHECK,
        style(remote_uri).bold(),
        FOLDER,
        cloned_into.display()
    );
    Ok(())
}

pub async fn cmd_init_repo(target_dir: &Path, remote: Option<&str>, message: &str) -> Result<()> {
    let runner = runner();
    ensure_git_installed(runner.as_ref()).await?;

    let provisioner = Provisioner::new(runner);
    provisioner.init(target_dir).await?;
    provisioner.add_and_commit(target_dir, message).await?;
    println!(
        "{}Initialized repository at {}{}",
        CHECK,
        FOLDER,
        target_dir.display()
    );

    if let Some(remote_uri) = remote {
        provisioner.add_remote_origin(target_dir, remote_uri).await?;
        println!("{}Added origin {}", CHECK, style(remote_uri).bold());
    }
    Ok(())
}

pub async fn cmd_remote_status(remote_uri: &str, delay_seconds: u64) -> Result<()> {
    let classifier = RemoteClassifier::new(runner());
    let verdict = classifier.classify(remote_uri, delay_seconds).await?;

    print_verdict(remote_uri, &verdict);

    if verdict.is_anomaly() {
        anyhow::bail!("{}", verdict.message);
    }
    Ok(())
}
