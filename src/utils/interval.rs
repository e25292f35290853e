//! Human-friendly interval strings ("10m", "600s", "1h", "600").

use std::time::Duration;

use crate::error::{KeepaliveError, Result};

/// Parse interval string like "1h", "30m", "15m", "60s" into a duration.
///
/// A bare number is taken as seconds. Zero is rejected since the heartbeat
/// loop cannot tick at a zero period.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    let (digits, multiplier) = if let Some(hours) = s.strip_suffix('h') {
        (hours, 3600)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else {
        (s.as_str(), 1)
    };

    let n: u64 = digits.trim().parse().map_err(|_| {
        KeepaliveError::Config(format!(
            "Invalid interval '{}'. Use formats like 1h, 10m, or 600s",
            s
        ))
    })?;

    let secs = n
        .checked_mul(multiplier)
        .ok_or_else(|| KeepaliveError::Config(format!("Interval '{}' is too large", s)))?;
    if secs == 0 {
        return Err(KeepaliveError::Config(
            "Interval must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Render a duration back in the largest whole unit.
pub fn format_interval(d: Duration) -> String {
    let secs = d.as_secs();
    if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_hours() {
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("2H").unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn test_parse_interval_minutes() {
        assert_eq!(parse_interval("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_interval("15m").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn test_parse_interval_seconds() {
        assert_eq!(parse_interval("600s").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_interval(" 30s ").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_interval_bare_number() {
        assert_eq!(parse_interval("600").unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn test_parse_interval_invalid() {
        assert!(parse_interval("abc").is_err());
        assert!(parse_interval("").is_err());
        assert!(parse_interval("-5m").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_zero() {
        let err = parse_interval("0m").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(600)), "10m");
        assert_eq!(format_interval(Duration::from_secs(7200)), "2h");
        assert_eq!(format_interval(Duration::from_secs(45)), "45s");
        assert_eq!(format_interval(Duration::from_secs(0)), "0s");
    }
}
