//! Durations, e.g. `300ms`, `90s`, `1h 30m`.

use super::SettingValue;
use crate::error::ValueError;
use std::time::Duration;

impl SettingValue for Duration {
    fn parse_setting(value: &str) -> Result<Self, ValueError> {
        humantime::parse_duration(value).map_err(|err| ValueError::malformed(value, "duration", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_durations() {
        assert_eq!(
            Duration::parse_setting("300ms"),
            Ok(Duration::from_millis(300))
        );
        assert_eq!(Duration::parse_setting("90s"), Ok(Duration::from_secs(90)));
        assert_eq!(
            Duration::parse_setting("1h 30m"),
            Ok(Duration::from_secs(5400))
        );
    }

    #[test]
    fn test_malformed_duration() {
        let err = Duration::parse_setting("soon").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedValue);
        assert!(err.to_string().starts_with("malformed value: \"soon\" is not a valid duration"));
    }
}
