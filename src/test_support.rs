//! Test doubles shared by unit tests.

use crate::git::{CommandOutput, ShellCommand, ShellRunner};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

/// A recorded invocation and the (possibly paused) tokio clock at that moment.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: ShellCommand,
    pub at: Instant,
}

/// Scripted `ShellRunner`: pops queued outputs in order, then falls back to
/// exit 0. A queued `None` simulates a launch failure.
#[derive(Default)]
pub struct StubRunner {
    responses: Mutex<VecDeque<Option<CommandOutput>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_codes(codes: &[i32]) -> Self {
        let runner = Self::new();
        for code in codes {
            runner.push_exit(*code, "", "");
        }
        runner
    }

    pub fn push_exit(&self, code: i32, stdout: &str, stderr: &str) {
        self.responses.lock().unwrap().push_back(Some(CommandOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }));
    }

    pub fn push_spawn_failure(&self) {
        self.responses.lock().unwrap().push_back(None);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands rendered as `program arg arg ...`.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|call| call.command.to_string())
            .collect()
    }

    fn respond(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.clone(),
            at: Instant::now(),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Some(output)) => Ok(output),
            Some(None) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "stubbed launch failure",
            )),
            None => Ok(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl ShellRunner for StubRunner {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        self.respond(command)
    }

    fn run_blocking(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        self.respond(command)
    }
}
