//! Runs the hosted web server as a child process next to the heartbeat.
//!
//! The heartbeat lives exactly as long as the child: when the child exits the
//! heartbeat is stopped and the child's exit code is handed back.

use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{info, warn};

use crate::config::{Config, ENV_PORT};
use crate::error::{KeepaliveError, Result};
use crate::heartbeat::HeartbeatService;

/// Command line of the supervised child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ChildCommand {
    /// Split `argv` into program and arguments. Returns `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn build(&self, config: &Config) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);
        if let Some(port) = config.port {
            command.env(ENV_PORT, port.to_string());
        }
        command
    }
}

/// Spawn `child`, run `service` until it exits, and return its status.
pub async fn run_with_child(
    service: &HeartbeatService,
    config: &Config,
    child: &ChildCommand,
) -> Result<ExitStatus> {
    let mut process = child.build(config).spawn().map_err(|e| {
        KeepaliveError::Process(format!("Failed to spawn '{}': {}", child.program, e))
    })?;

    info!(program = %child.program, pid = ?process.id(), "Started supervised process");
    service.start().await?;

    let status = process.wait().await;
    service.stop().await;

    let status = status?;
    if status.success() {
        info!(program = %child.program, "Supervised process exited");
    } else {
        warn!(program = %child.program, status = %status, "Supervised process exited with failure");
    }
    Ok(status)
}

/// Map an exit status to a process exit code. Signal deaths map to 1.
pub fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
