//! The network side of a heartbeat.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::{KeepaliveError, Result};

/// User agent sent with every heartbeat request.
pub const HEARTBEAT_USER_AGENT: &str = concat!("keepalive/", env!("CARGO_PKG_VERSION"));

/// Issues a single heartbeat request.
///
/// Returns the response status code on success. Any non-success status must
/// be reported as [`KeepaliveError::Status`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, endpoint: &Url) -> Result<u16>;
}

/// [`Pinger`] backed by a reqwest GET.
#[derive(Debug, Clone)]
pub struct HttpPinger {
    client: Client,
}

impl HttpPinger {
    /// Create a pinger whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(HEARTBEAT_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Pinger for HttpPinger {
    async fn ping(&self, endpoint: &Url) -> Result<u16> {
        let response = self.client.get(endpoint.clone()).send().await?;
        let status = response.status();
        // Body is never read; dropping the response releases the connection.
        drop(response);

        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(KeepaliveError::Status(status.as_u16()))
        }
    }
}
