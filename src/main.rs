use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, LogFormat};

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        None => cli::cmd_run(None, Vec::new()).await,
        Some(Commands::Run { interval, command }) => cli::cmd_run(interval, command).await,
        Some(Commands::Ping { json }) => {
            cli::cmd_ping(json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Url) => {
            cli::cmd_url()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Version) => {
            println!("keepalive {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}
