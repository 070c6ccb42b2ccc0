//! Local working-copy provisioning: clone, init, commit and remote setup.

use super::{CommandOutput, ShellCommand, ShellRunner};
use crate::errors::{FalconError, Result, require_non_empty};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, instrument, warn};

static REPO_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/[^/]*\.git$").expect("repo name pattern is a valid static regex")
});

/// Extract the bare repository name from a remote URI.
///
/// Matches the trailing `/<name>.git` segment and strips the separator and
/// extension, so `https://example.com/org/my-repo.git` yields `my-repo`.
pub fn repo_name_from_uri(remote_uri: &str) -> Result<String> {
    let name = REPO_NAME_RE
        .find(remote_uri.trim())
        .map(|m| {
            m.as_str()
                .trim_start_matches('/')
                .trim_end_matches(".git")
                .to_string()
        })
        .unwrap_or_default();
    if name.is_empty() {
        return Err(FalconError::UnreadableRepoName(remote_uri.to_string()));
    }
    Ok(name)
}

/// Fail with `GitNotInstalled` unless `which git` succeeds.
pub async fn ensure_git_installed(runner: &dyn ShellRunner) -> Result<()> {
    match runner.run(&ShellCommand::new("which", ["git"])).await {
        Ok(output) if output.success() => Ok(()),
        Ok(_) => Err(FalconError::GitNotInstalled),
        Err(err) => {
            debug!(error = %err, "could not run `which git`");
            Err(FalconError::GitNotInstalled)
        }
    }
}

/// Performs the handful of git operations needed to stand up a local copy.
///
/// Each operation names its target directory explicitly; nothing relies on the
/// process working directory.
#[derive(Clone)]
pub struct Provisioner {
    runner: Arc<dyn ShellRunner>,
}

impl Provisioner {
    pub fn new(runner: Arc<dyn ShellRunner>) -> Self {
        Self { runner }
    }

    /// Clone `remote_uri` inside `target_dir`, creating the directory if needed.
    ///
    /// Directory creation is attempted once. Returns the absolute target path.
    #[instrument(skip(self, target_dir), fields(target_dir = %target_dir.as_ref().display()))]
    pub async fn clone_repo(
        &self,
        remote_uri: &str,
        target_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        require_non_empty("remote_uri", remote_uri)?;
        require_non_empty("target_dir", &target_dir.as_ref().to_string_lossy())?;

        let target = absolute_normalized(target_dir.as_ref())?;
        enter_or_create(&target)?;

        let command = ShellCommand::git(["clone", remote_uri]).in_dir(&target);
        let output = self.run(&command).await?;
        if !output.success() {
            let destination = repo_name_from_uri(remote_uri)
                .map(|name| target.join(name))
                .unwrap_or_else(|_| target.clone());
            let detail = output.stderr.trim().to_string();
            warn!(exit_code = output.code(), stderr = %detail, "git clone failed");
            return Err(FalconError::DestinationNotEmpty {
                path: destination,
                detail,
            });
        }

        info!(target = %target.display(), "cloned remote repository");
        Ok(target)
    }

    /// `git init` in an existing directory.
    pub async fn init(&self, target_dir: impl AsRef<Path>) -> Result<CommandOutput> {
        let target = existing_dir("target_dir", target_dir.as_ref())?;
        self.run_checked(ShellCommand::git(["init"]).in_dir(&target))
            .await
    }

    /// Stage every change, then commit it with `message`.
    #[instrument(skip(self, target_dir))]
    pub async fn add_and_commit(
        &self,
        target_dir: impl AsRef<Path>,
        message: &str,
    ) -> Result<CommandOutput> {
        require_non_empty("message", message)?;
        let target = existing_dir("target_dir", target_dir.as_ref())?;
        self.run_checked(ShellCommand::git(["add", "-A"]).in_dir(&target))
            .await?;
        self.run_checked(ShellCommand::git(["commit", "-m", message]).in_dir(&target))
            .await
    }

    /// `git remote add origin <remote_uri>`.
    pub async fn add_remote_origin(
        &self,
        target_dir: impl AsRef<Path>,
        remote_uri: &str,
    ) -> Result<CommandOutput> {
        require_non_empty("remote_uri", remote_uri)?;
        let target = existing_dir("target_dir", target_dir.as_ref())?;
        self.run_checked(ShellCommand::git(["remote", "add", "origin", remote_uri]).in_dir(&target))
            .await
    }

    async fn run(&self, command: &ShellCommand) -> Result<CommandOutput> {
        self.runner
            .run(command)
            .await
            .map_err(|source| FalconError::Spawn {
                command: command.to_string(),
                source,
            })
    }

    async fn run_checked(&self, command: ShellCommand) -> Result<CommandOutput> {
        let output = self.run(&command).await?;
        if !output.success() {
            return Err(FalconError::GitCommandFailed {
                command: command.to_string(),
                exit_code: output.code(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        debug!(command = %command, "git command succeeded");
        Ok(output)
    }
}

/// Resolve `path` against the current directory and fold `.` / `..` lexically.
fn absolute_normalized(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| FalconError::InvalidTargetDir {
                path: path.to_path_buf(),
                detail: format!("cannot resolve relative path: {err}"),
            })?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Make sure `target` is a usable directory: try it, create it, try once more.
fn enter_or_create(target: &Path) -> Result<()> {
    if target.is_dir() {
        return Ok(());
    }
    debug!(target = %target.display(), "target directory missing, creating it");
    std::fs::create_dir_all(target).map_err(|err| FalconError::InvalidTargetDir {
        path: target.to_path_buf(),
        detail: err.to_string(),
    })?;
    if !target.is_dir() {
        return Err(FalconError::NoTargetDir {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

fn existing_dir(param: &'static str, target_dir: &Path) -> Result<PathBuf> {
    require_non_empty(param, &target_dir.to_string_lossy())?;
    let target = absolute_normalized(target_dir)?;
    if !target.is_dir() {
        return Err(FalconError::InvalidTargetDir {
            path: target,
            detail: "not an existing directory".to_string(),
        });
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubRunner;
    use tempfile::tempdir;

    const URI: &str = "https://example.com/org/my-repo.git";

    fn provisioner(runner: &Arc<StubRunner>) -> Provisioner {
        Provisioner::new(runner.clone())
    }

    #[test]
    fn repo_name_strips_separator_and_extension() {
        assert_eq!(repo_name_from_uri(URI).unwrap(), "my-repo");
        assert_eq!(
            repo_name_from_uri("git@github.com:org/demo-app.git").unwrap(),
            "demo-app"
        );
    }

    #[test]
    fn repo_name_without_name_is_unreadable() {
        let err = repo_name_from_uri("https://example.com/.git").unwrap_err();
        assert_eq!(err.kind(), "UnreadableRepoName");
        let err = repo_name_from_uri("https://example.com/org/repo").unwrap_err();
        assert_eq!(err.kind(), "UnreadableRepoName");
    }

    #[test]
    fn normalization_folds_dot_segments() {
        let path = absolute_normalized(Path::new("/tmp/a/./b/../c")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a/c"));
        assert!(absolute_normalized(Path::new("rel/dir")).unwrap().is_absolute());
    }

    #[tokio::test]
    async fn clone_creates_missing_nested_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("c");
        let runner = Arc::new(StubRunner::new());

        let resolved = provisioner(&runner).clone_repo(URI, &target).await.unwrap();

        assert!(target.is_dir());
        assert_eq!(resolved, target);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command.to_string(), format!("git clone {URI}"));
        assert_eq!(calls[0].command.cwd.as_deref(), Some(target.as_path()));
    }

    #[tokio::test]
    async fn clone_into_non_empty_destination_fails() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("my-repo")).unwrap();
        std::fs::write(dir.path().join("my-repo/README.md"), "hi").unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.push_exit(
            128,
            "",
            "fatal: destination path 'my-repo' already exists and is not an empty directory.",
        );

        let err = provisioner(&runner)
            .clone_repo(URI, dir.path())
            .await
            .unwrap_err();

        match err {
            FalconError::DestinationNotEmpty { path, detail } => {
                assert_eq!(path, dir.path().join("my-repo"));
                assert!(detail.contains("already exists"));
            }
            other => panic!("expected DestinationNotEmpty, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn clone_onto_a_file_is_invalid_target() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "not a dir").unwrap();
        let runner = Arc::new(StubRunner::new());

        let err = provisioner(&runner).clone_repo(URI, &file).await.unwrap_err();

        assert_eq!(err.kind(), "InvalidTargetDir");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_arguments_are_rejected_before_shelling_out() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        let p = provisioner(&runner);

        assert_eq!(p.clone_repo("", dir.path()).await.unwrap_err().kind(), "TypeError");
        assert_eq!(p.clone_repo(URI, "").await.unwrap_err().kind(), "TypeError");
        assert_eq!(p.init("").await.unwrap_err().kind(), "TypeError");
        assert_eq!(
            p.add_and_commit(dir.path(), "").await.unwrap_err().kind(),
            "TypeError"
        );
        assert_eq!(
            p.add_remote_origin(dir.path(), " ").await.unwrap_err().kind(),
            "TypeError"
        );
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn add_and_commit_stages_then_commits() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());

        provisioner(&runner)
            .add_and_commit(dir.path(), "Initial commit")
            .await
            .unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["git add -A", "git commit -m Initial commit"]
        );
    }

    #[tokio::test]
    async fn add_and_commit_stops_when_staging_fails() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.push_exit(128, "", "fatal: not a git repository");

        let err = provisioner(&runner)
            .add_and_commit(dir.path(), "msg")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "GitCommandFailed");
        assert!(err.to_string().contains("not a git repository"));
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn init_and_remote_add_run_in_target() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        let p = provisioner(&runner);

        p.init(dir.path()).await.unwrap();
        p.add_remote_origin(dir.path(), URI).await.unwrap();

        assert_eq!(
            runner.command_lines(),
            vec!["git init".to_string(), format!("git remote add origin {URI}")]
        );
        for call in runner.calls() {
            assert_eq!(call.command.cwd.as_deref(), Some(dir.path()));
        }
    }

    #[tokio::test]
    async fn init_requires_existing_directory() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        let err = provisioner(&runner)
            .init(dir.path().join("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidTargetDir");
    }

    #[tokio::test]
    async fn clone_failure_keeps_git_stderr() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.push_exit(
            128,
            "",
            "fatal: Authentication failed for 'https://example.com/'\n",
        );

        let err = provisioner(&runner)
            .clone_repo(URI, dir.path())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "DestinationNotEmpty");
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[tokio::test]
    async fn git_installed_check_follows_which_exit_code() {
        let runner = StubRunner::with_exit_codes(&[0, 1]);
        assert!(ensure_git_installed(&runner).await.is_ok());
        assert_eq!(
            ensure_git_installed(&runner).await.unwrap_err().kind(),
            "GitNotInstalled"
        );
        assert_eq!(runner.command_lines()[0], "which git");
    }
}
