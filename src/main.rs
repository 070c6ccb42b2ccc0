use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use falcon_demo::sequence::LogLevel;
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "falcon-demo")]
#[command(version, about = "Demo build orchestrator")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Log level handed to the sequence executor
    #[arg(long, global = true, env = "FALCON_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the validation scratch org and run the demo sequence against it
    Validate {
        /// Sequence description in demo-config/ to use instead of the configured one
        #[arg(short, long)]
        sequence: Option<String>,
    },
    /// Run the demo sequence against the deployment org
    Deploy {
        /// Sequence description in demo-config/ to use instead of the configured one
        #[arg(short, long)]
        sequence: Option<String>,
    },
    /// Clone a remote repository into a target directory
    Clone {
        remote_uri: String,

        /// Directory to clone inside (created if missing)
        #[arg(long, default_value = ".")]
        target_dir: PathBuf,
    },
    /// Initialize a local repository, commit its contents and add an origin
    InitRepo {
        target_dir: PathBuf,

        /// Remote to register as origin
        #[arg(long)]
        remote: Option<String>,

        /// Commit message for the initial commit
        #[arg(short, long, default_value = "Initial commit")]
        message: String,
    },
    /// Classify a remote repository as reachable, empty or unreachable
    RemoteStatus {
        remote_uri: String,

        /// Seconds to wait before probing
        #[arg(long, default_value = "0")]
        delay: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    falcon_demo::logging::init(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Validate { sequence } => {
            cmd::cmd_build(&cli, &project_dir, sequence.as_deref(), cmd::BuildKind::Validate)
                .await?;
        }
        Commands::Deploy { sequence } => {
            cmd::cmd_build(&cli, &project_dir, sequence.as_deref(), cmd::BuildKind::Deploy)
                .await?;
        }
        Commands::Clone {
            remote_uri,
            target_dir,
        } => cmd::cmd_clone(remote_uri, target_dir).await?,
        Commands::InitRepo {
            target_dir,
            remote,
            message,
        } => cmd::cmd_init_repo(target_dir, remote.as_deref(), message).await?,
        Commands::RemoteStatus { remote_uri, delay } => {
            cmd::cmd_remote_status(remote_uri, *delay).await?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_validate_with_override() {
        let cli = Cli::parse_from(["falcon-demo", "validate", "--sequence", "alt.json"]);
        match cli.command {
            Commands::Validate { sequence } => assert_eq!(sequence.as_deref(), Some("alt.json")),
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn parse_remote_status_delay() {
        let cli = Cli::parse_from([
            "falcon-demo",
            "remote-status",
            "https://x/y.git",
            "--delay",
            "3",
        ]);
        assert!(matches!(cli.command, Commands::RemoteStatus { delay: 3, .. }));
    }

    #[test]
    fn parse_log_level() {
        let cli = Cli::parse_from(["falcon-demo", "--log-level", "debug", "deploy"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
