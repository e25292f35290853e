//! keepalive - periodic heartbeat that keeps an idle-detected hosted app awake

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod supervisor;
pub mod utils;

pub use config::Config;
pub use error::{KeepaliveError, Result};
pub use heartbeat::{HeartbeatService, HeartbeatStats, HttpPinger, Pinger};
