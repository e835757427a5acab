use std::path::Path;

use crate::error::{Result, SilenceError};

/// Helper to convert a Path to &str, returning an error if not valid UTF-8.
pub fn path_to_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        SilenceError::InvalidArgument(format!("path is not valid UTF-8: {}", path.display()))
    })
}

/// Round half away from zero, e.g. 2.5 -> 3 and -2.5 -> -3.
pub fn round_away_from_zero(value: f64) -> i64 {
    (value + 0.5 * value.signum()) as i64
}

/// Whole seconds as `mm:ss`; minutes are not wrapped into hours.
pub fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Timestamp with millisecond precision, the way the tools print boundaries.
pub fn format_timestamp(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(round_away_from_zero(2.5), 3);
        assert_eq!(round_away_from_zero(2.49), 2);
        assert_eq!(round_away_from_zero(-2.5), -3);
        assert_eq!(round_away_from_zero(0.0), 0);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_seconds(0), "00:00");
        assert_eq!(format_seconds(59), "00:59");
        assert_eq!(format_seconds(540), "09:00");
        assert_eq!(format_seconds(3725), "62:05");
    }

    #[test]
    fn formats_timestamps_to_milliseconds() {
        assert_eq!(format_timestamp(4.5), "4.500");
        assert_eq!(format_timestamp(539.8321), "539.832");
    }
}
