//! `keepalive run`: heartbeat loop, optionally supervising a server.

use std::future::Future;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use keepalive::supervisor::{exit_code, run_with_child, ChildCommand};
use keepalive::utils::{format_interval, parse_interval};
use keepalive::{Config, HeartbeatService};

use super::signal::shutdown_signal;

pub(crate) async fn cmd_run(interval: Option<String>, command: Vec<String>) -> Result<ExitCode> {
    let mut config = Config::load().with_context(|| "Failed to load configuration")?;
    if let Some(raw) = interval {
        config = config.with_interval(parse_interval(&raw)?);
    }

    let service =
        HeartbeatService::from_config(&config).with_context(|| "Failed to create heartbeat")?;
    info!(
        endpoint = %config.endpoint,
        interval = %format_interval(config.interval),
        "Keepalive configured"
    );

    let child = ChildCommand::from_argv(&command);
    let code = run_until(&service, &config, child.as_ref(), shutdown_signal()).await?;

    let stats = service.stats().snapshot();
    info!(
        attempts = stats.attempts,
        successes = stats.successes,
        failures = stats.failures,
        "Keepalive exiting"
    );

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

/// Run the heartbeat until `shutdown` resolves or the supervised child
/// exits. Returns the process exit code.
pub(crate) async fn run_until<S>(
    service: &HeartbeatService,
    config: &Config,
    child: Option<&ChildCommand>,
    shutdown: S,
) -> Result<i32>
where
    S: Future<Output = std::io::Result<()>>,
{
    match child {
        Some(child) => {
            tokio::select! {
                status = run_with_child(service, config, child) => {
                    let status = status.with_context(|| format!("Failed to run '{}'", child.program))?;
                    Ok(exit_code(&status))
                }
                signal = shutdown => {
                    service.stop().await;
                    signal.with_context(|| "Failed to install signal handlers")?;
                    Ok(0)
                }
            }
        }
        None => {
            service.start().await?;
            let signal = shutdown.await;
            service.stop().await;
            signal.with_context(|| "Failed to install signal handlers")?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use keepalive::config::{build_endpoint, DEFAULT_HOST_SUFFIX};
    use keepalive::Pinger;
    use reqwest::Url;
    use tokio::sync::oneshot;

    const INTERVAL: Duration = Duration::from_secs(600);

    struct OkPinger;

    #[async_trait]
    impl Pinger for OkPinger {
        async fn ping(&self, _endpoint: &Url) -> keepalive::Result<u16> {
            Ok(200)
        }
    }

    fn config() -> Config {
        Config::new(build_endpoint("abc", "xyz", DEFAULT_HOST_SUFFIX).unwrap())
    }

    fn service() -> Arc<HeartbeatService> {
        Arc::new(HeartbeatService::new(config().endpoint, INTERVAL, Arc::new(OkPinger)).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_stops_heartbeat_without_child() {
        let service = service();
        let (tx, rx) = oneshot::channel::<()>();

        let runner = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let shutdown = async move {
                    let _ = rx.await;
                    Ok::<(), std::io::Error>(())
                };
                run_until(&service, &config(), None, shutdown).await
            })
        };

        tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;
        assert!(service.is_running());
        assert_eq!(service.stats().attempts(), 2);

        tx.send(()).unwrap();
        let code = runner.await.unwrap().unwrap();
        assert_eq!(code, 0);
        assert!(!service.is_running());
    }

    #[tokio::test]
    async fn test_signal_handler_failure_still_stops_heartbeat() {
        let service = service();
        let shutdown = async {
            Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "no signals"))
        };

        let err = run_until(&service, &config(), None, shutdown).await.unwrap_err();
        assert!(err.to_string().contains("signal handlers"));
        assert!(!service.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_exit_code_is_mirrored() {
        let service = service();
        let argv: Vec<String> = ["sh", "-c", "exit 7"].iter().map(|s| s.to_string()).collect();
        let child = ChildCommand::from_argv(&argv).unwrap();

        let never = std::future::pending::<std::io::Result<()>>();

        let code = run_until(&service, &config(), Some(&child), never).await.unwrap();
        assert_eq!(code, 7);
        assert!(!service.is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_while_child_runs_stops_heartbeat() {
        let service = service();
        let argv: Vec<String> = ["sleep", "30"].iter().map(|s| s.to_string()).collect();
        let child = ChildCommand::from_argv(&argv).unwrap();
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<(), std::io::Error>(())
        };

        let code = run_until(&service, &config(), Some(&child), shutdown).await.unwrap();
        assert_eq!(code, 0);
        assert!(!service.is_running());
    }
}
