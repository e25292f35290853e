//! Observable counters for the heartbeat loop.
//!
//! Failures never stop the loop; they are only counted here so the policy
//! stays inspectable. All counters use `AtomicU64` with `Relaxed` ordering.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Running totals for a heartbeat service.
#[derive(Debug, Default)]
pub struct HeartbeatStats {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    last_status: AtomicU64,
}

/// Point-in-time copy of [`HeartbeatStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    /// Last HTTP status seen, if any request got a response.
    pub last_status: Option<u16>,
}

impl HeartbeatStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&self, status: u16) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.last_status.store(u64::from(status), Ordering::Relaxed);
    }

    /// Records a failed request. `status` is set when the server answered
    /// with a non-success code.
    pub(crate) fn record_failure(&self, status: Option<u16>) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        if let Some(code) = status {
            self.last_status.store(u64::from(code), Ordering::Relaxed);
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let last = self.last_status.load(Ordering::Relaxed);
        StatsSnapshot {
            attempts: self.attempts(),
            successes: self.successes(),
            failures: self.failures(),
            last_status: u16::try_from(last).ok().filter(|code| *code != 0),
        }
    }
}
