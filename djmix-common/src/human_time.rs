//! Duration parsing and human-readable time formatting
//!
//! The extend mode accepts compact target durations such as `30m`, `1h`,
//! `300s` or a bare `300`. Log lines format times with a magnitude-dependent
//! layout so minute-long mixes and multi-hour extensions both stay readable.

use crate::{Error, Result};

/// Format selection thresholds (seconds)
const SHORT_FORMAT_MAX: f64 = 100.0; // < 100s → X.XXs
const MEDIUM_FORMAT_MAX: f64 = 6000.0; // < 100m → M:SS.Xs
                                       // otherwise → H:MM:SS

/// Parse a target duration into seconds.
///
/// Grammar (case-insensitive):
/// - trailing `h`: hours × 3600
/// - trailing `m`: minutes × 60
/// - trailing `s` or no suffix: seconds
///
/// # Errors
/// `InvalidInput` when the numeric prefix does not parse, or the value is
/// negative or not finite.
///
/// # Examples
///
/// ```
/// use djmix_common::human_time::parse_duration;
///
/// assert_eq!(parse_duration("30m").unwrap(), 1800.0);
/// assert_eq!(parse_duration("1h").unwrap(), 3600.0);
/// assert_eq!(parse_duration("300s").unwrap(), 300.0);
/// assert_eq!(parse_duration("42.5").unwrap(), 42.5);
/// assert!(parse_duration("abc").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<f64> {
    let lowered = input.trim().to_lowercase();

    let (number, multiplier) = if let Some(n) = lowered.strip_suffix('m') {
        (n, 60.0)
    } else if let Some(n) = lowered.strip_suffix('h') {
        (n, 3600.0)
    } else if let Some(n) = lowered.strip_suffix('s') {
        (n, 1.0)
    } else {
        (lowered.as_str(), 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Invalid duration '{}'", input)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Duration must be a non-negative number, got '{}'",
            input
        )));
    }

    Ok(value * multiplier)
}

/// Format seconds for log output.
///
/// - `< 100s`: `X.XXs`
/// - `< 100m`: `M:SS.Xs`
/// - otherwise: `H:MM:SS`
///
/// ```
/// use djmix_common::human_time::format_duration;
///
/// assert_eq!(format_duration(45.0), "45.00s");
/// assert_eq!(format_duration(330.0), "5:30.0s");
/// assert_eq!(format_duration(3661.0), "1:01:01");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let is_negative = seconds < 0.0;
    let abs = seconds.abs();

    let formatted = if abs < SHORT_FORMAT_MAX {
        format!("{:.2}s", abs)
    } else if abs < MEDIUM_FORMAT_MAX {
        let minutes = (abs / 60.0).floor();
        let secs = abs - minutes * 60.0;
        format!("{}:{:04.1}s", minutes as u64, secs)
    } else {
        let total = abs.round() as u64;
        let hours = total / 3600;
        let mins = (total % 3600) / 60;
        let secs = total % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_duration("30m").unwrap(), 1800.0);
        assert_eq!(parse_duration("1h").unwrap(), 3600.0);
        assert_eq!(parse_duration("1.5H").unwrap(), 5400.0);
        assert_eq!(parse_duration("300s").unwrap(), 300.0);
        assert_eq!(parse_duration("300").unwrap(), 300.0);
        assert_eq!(parse_duration(" 10M ").unwrap(), 600.0);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(parse_duration("abc"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_duration("m"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_duration(""), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_duration("10x"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_negative_and_infinite() {
        assert!(parse_duration("-5m").is_err());
        assert!(parse_duration("inf").is_err());
        assert!(parse_duration("NaN").is_err());
    }

    #[test]
    fn test_format_layouts() {
        assert_eq!(format_duration(5.0), "5.00s");
        assert_eq!(format_duration(99.994), "99.99s");
        assert_eq!(format_duration(120.0), "2:00.0s");
        assert_eq!(format_duration(7200.0), "2:00:00");
        assert_eq!(format_duration(-3.5), "-3.50s");
    }
}
