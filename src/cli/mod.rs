//! Command-line surface for keepalive.

mod ping;
mod run;
mod signal;

use clap::{Parser, Subcommand, ValueEnum};

pub(crate) use ping::{cmd_ping, cmd_url};
pub(crate) use run::cmd_run;

#[derive(Parser)]
#[command(name = "keepalive")]
#[command(about = "Periodic heartbeat that keeps a hosted web app awake", long_about = None)]
pub(crate) struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the heartbeat loop (default), optionally alongside a server command
    Run {
        /// Override KEEPALIVE_INTERVAL (e.g. 600, 10m, 1h)
        #[arg(short, long)]
        interval: Option<String>,
        /// Command to supervise, given after `--`
        #[arg(last = true)]
        command: Vec<String>,
    },
    /// Send one heartbeat now and report the outcome
    Ping {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved target endpoint
    Url,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}
