//! Runtime configuration for keepalive.
//!
//! All settings come from the environment (optionally seeded from a `.env`
//! file) and are resolved exactly once into an immutable [`Config`] that is
//! handed to the heartbeat service at startup. Nothing reads the environment
//! after that point.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::error::{KeepaliveError, Result};
use crate::utils::parse_interval;

/// First identifier of the target host (`{id1}` in `https://{id1}.{id2}.{suffix}/`).
pub const ENV_APP_SLUG: &str = "APP_SLUG";
/// Second identifier of the target host.
pub const ENV_APP_OWNER: &str = "APP_OWNER";
/// Full endpoint override; when set the identifiers are not consulted.
pub const ENV_URL: &str = "KEEPALIVE_URL";
/// Domain suffix appended after the two identifiers.
pub const ENV_HOST_SUFFIX: &str = "KEEPALIVE_HOST_SUFFIX";
/// Heartbeat interval, e.g. `600`, `10m`.
pub const ENV_INTERVAL: &str = "KEEPALIVE_INTERVAL";
/// Per-request timeout, e.g. `30s`.
pub const ENV_TIMEOUT: &str = "KEEPALIVE_TIMEOUT";
/// Port of the hosted web server. Only passed through to a supervised child.
pub const ENV_PORT: &str = "PORT";

/// Default hosting domain suffix.
pub const DEFAULT_HOST_SUFFIX: &str = "example-host.tld";
/// Default heartbeat interval (10 minutes).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);
/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_LABEL_LEN: usize = 63;

/// Resolved keepalive configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL the heartbeat polls.
    pub endpoint: Url,
    /// Fixed delay between successive heartbeats.
    pub interval: Duration,
    /// Upper bound on a single heartbeat request.
    pub request_timeout: Duration,
    /// Port the hosted server listens on, if provided.
    pub port: Option<u16>,
}

impl Config {
    /// Create a config for an explicit endpoint with default timings.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            interval: DEFAULT_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            port: None,
        }
    }

    /// Override the heartbeat interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from `./.env` (if present) layered under the
    /// process environment.
    pub fn load() -> Result<Self> {
        Self::from_dotenv_with(Path::new(".env"), |key| std::env::var(key).ok())
    }

    /// Build from a `.env` file layered under `lookup`.
    ///
    /// Values from `lookup` win over the file, matching `dotenvy` semantics
    /// where already-set variables are never overridden. A missing file is
    /// not an error.
    pub fn from_dotenv_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = read_dotenv(path)?;
        Self::from_lookup(|key| lookup(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let endpoint = match get(ENV_URL) {
            Some(raw) => parse_endpoint(&raw)?,
            None => {
                let slug = get(ENV_APP_SLUG).ok_or_else(|| missing(ENV_APP_SLUG))?;
                let owner = get(ENV_APP_OWNER).ok_or_else(|| missing(ENV_APP_OWNER))?;
                let suffix = get(ENV_HOST_SUFFIX).unwrap_or_else(|| DEFAULT_HOST_SUFFIX.to_string());
                build_endpoint(&slug, &owner, &suffix)?
            }
        };

        let interval = match get(ENV_INTERVAL) {
            Some(raw) => parse_interval(&raw)?,
            None => DEFAULT_INTERVAL,
        };

        let request_timeout = match get(ENV_TIMEOUT) {
            Some(raw) => parse_interval(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let port = match get(ENV_PORT) {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                KeepaliveError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, raw))
            })?),
            None => None,
        };

        Ok(Self {
            endpoint,
            interval,
            request_timeout,
            port,
        })
    }
}

/// Assemble `https://{id1}.{id2}.{suffix}/`.
pub fn build_endpoint(id1: &str, id2: &str, suffix: &str) -> Result<Url> {
    let id1 = validate_label(ENV_APP_SLUG, id1)?;
    let id2 = validate_label(ENV_APP_OWNER, id2)?;
    let suffix = suffix.trim().trim_matches('.');
    if suffix.is_empty() {
        return Err(KeepaliveError::Config(format!(
            "{} must not be empty",
            ENV_HOST_SUFFIX
        )));
    }

    parse_endpoint(&format!("https://{}.{}.{}/", id1, id2, suffix))
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| KeepaliveError::Config(format!("Invalid endpoint URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(KeepaliveError::Config(format!(
            "Endpoint must use http or https, got '{}'",
            other
        ))),
    }
}

fn validate_label<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(missing(name));
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(KeepaliveError::Config(format!(
            "{} is longer than {} characters",
            name, MAX_LABEL_LEN
        )));
    }
    let valid = value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !value.starts_with('-')
        && !value.ends_with('-');
    if !valid {
        return Err(KeepaliveError::Config(format!(
            "{} must be a DNS label (letters, digits, '-'), got '{}'",
            name, value
        )));
    }
    Ok(value)
}

fn missing(name: &str) -> KeepaliveError {
    KeepaliveError::Config(format!("{} is not set", name))
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        KeepaliveError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            KeepaliveError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}
