//! Heartbeat service - periodic best-effort request that keeps the hosted
//! app from being treated as idle.

mod pinger;
mod service;
mod stats;

pub use pinger::{HttpPinger, Pinger, HEARTBEAT_USER_AGENT};
pub use service::HeartbeatService;
pub use stats::{HeartbeatStats, StatsSnapshot};
