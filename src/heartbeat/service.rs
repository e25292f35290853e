//! Heartbeat service implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use super::pinger::{HttpPinger, Pinger};
use super::stats::HeartbeatStats;
use crate::config::Config;
use crate::error::{KeepaliveError, Result};

/// Background service that periodically pings the target endpoint.
///
/// The first request goes out one full interval after [`start`](Self::start).
/// Request failures are counted in [`HeartbeatStats`] and otherwise ignored;
/// the loop only ends on [`stop`](Self::stop) or when the service is dropped.
pub struct HeartbeatService {
    endpoint: Url,
    interval: Duration,
    pinger: Arc<dyn Pinger>,
    stats: Arc<HeartbeatStats>,
    running: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HeartbeatService {
    /// Create a new heartbeat service.
    ///
    /// Returns a `Config` error for a zero interval, which the ticker
    /// cannot schedule.
    pub fn new(endpoint: Url, interval: Duration, pinger: Arc<dyn Pinger>) -> Result<Self> {
        if interval.is_zero() {
            return Err(KeepaliveError::Config(
                "Heartbeat interval must be greater than zero".to_string(),
            ));
        }

        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            endpoint,
            interval,
            pinger,
            stats: Arc::new(HeartbeatStats::new()),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            task: Mutex::new(None),
        })
    }

    /// Create a service that pings over HTTP using the config's timings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let pinger = HttpPinger::new(config.request_timeout)?;
        Self::new(config.endpoint.clone(), config.interval, Arc::new(pinger))
    }

    /// Start heartbeat loop in the background.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Heartbeat service already running");
            return Ok(());
        }

        self.shutdown_tx.send_replace(false);
        let shutdown_rx = self.shutdown_tx.subscribe();

        info!(
            "Heartbeat service started (interval={}s, endpoint={})",
            self.interval.as_secs(),
            self.endpoint
        );

        let handle = tokio::spawn(Self::run(
            self.endpoint.clone(),
            self.interval,
            Arc::clone(&self.pinger),
            Arc::clone(&self.stats),
            Arc::clone(&self.running),
            shutdown_rx,
        ));
        *self.task.lock().await = Some(handle);

        Ok(())
    }

    /// Stop heartbeat loop and wait for it to exit.
    ///
    /// An in-flight request is abandoned rather than awaited.
    pub async fn stop(&self) {
        self.shutdown_tx.send_replace(true);

        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Heartbeat task ended abnormally: {}", e);
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Trigger heartbeat immediately, outside the regular schedule.
    pub async fn trigger_now(&self) -> Result<u16> {
        Self::beat(&self.endpoint, self.pinger.as_ref(), &self.stats).await
    }

    /// Returns whether service is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shared handle to the service's counters.
    pub fn stats(&self) -> Arc<HeartbeatStats> {
        Arc::clone(&self.stats)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(
        endpoint: Url,
        interval: Duration,
        pinger: Arc<dyn Pinger>,
        stats: Arc<HeartbeatStats>,
        running: Arc<AtomicBool>,
        shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        let shutdown = shutdown_requested(shutdown_rx);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = Self::beat(&endpoint, pinger.as_ref(), &stats) => {}
            }
        }

        running.store(false, Ordering::SeqCst);
        info!("Heartbeat service stopped");
    }

    async fn beat(endpoint: &Url, pinger: &dyn Pinger, stats: &HeartbeatStats) -> Result<u16> {
        match pinger.ping(endpoint).await {
            Ok(status) => {
                stats.record_success(status);
                trace!(status, endpoint = %endpoint, "Heartbeat delivered");
                Ok(status)
            }
            Err(e) => {
                let status = match &e {
                    KeepaliveError::Status(code) => Some(*code),
                    _ => None,
                };
                stats.record_failure(status);
                if e.is_request_failure() {
                    debug!(error = %e, endpoint = %endpoint, "Heartbeat request failed, continuing");
                } else {
                    warn!(error = %e, endpoint = %endpoint, "Heartbeat could not be sent, continuing");
                }
                Err(e)
            }
        }
    }
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        if stop {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
