//! Booleans from human readable tokens.

use super::SettingValue;
use crate::error::ValueError;

pub const TRUE_TOKENS: [&str; 4] = ["enabled", "yes", "on", "true"];
pub const FALSE_TOKENS: [&str; 4] = ["disabled", "no", "off", "false"];

/// Parse a boolean token, case insensitively.
pub fn parse_bool(value: &str) -> Result<bool, ValueError> {
    let lowercased = value.to_lowercase();
    if TRUE_TOKENS.contains(&lowercased.as_str()) {
        return Ok(true);
    }
    if FALSE_TOKENS.contains(&lowercased.as_str()) {
        return Ok(false);
    }

    let choices: Vec<&str> = TRUE_TOKENS.iter().chain(FALSE_TOKENS.iter()).copied().collect();
    Err(ValueError::not_one_of(lowercased, &choices))
}

impl SettingValue for bool {
    fn parse_setting(value: &str) -> Result<Self, ValueError> {
        parse_bool(value)
    }
}
