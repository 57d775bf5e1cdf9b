//! Command line flag source.
//!
//! Flags are untyped, so a bare flag is a boolean `true` only when it is
//! followed by another flag or by nothing at all:
//! - `--key=value` and `--key value` set `key` to `value`
//! - `--enabled --other=1` and a trailing `--enabled` set `enabled` to `true`
//!
//! Do not put a bare boolean flag before a positional word (`--enabled command`
//! reads `command` as the value); use `--enabled=true command` instead.

use super::Source;
use std::collections::HashMap;

/// Parsed command line flags.
#[derive(Debug, Clone, Default)]
pub struct FlagSource {
    values: HashMap<String, String>,
}

impl FlagSource {
    /// Parse arguments, discarding the leading program name.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        // Program name
        args.next();
        Self::from_flags(args)
    }

    /// Parse the arguments of the running process.
    pub fn from_process() -> Self {
        Self::new(std::env::args_os().filter_map(|arg| arg.into_string().ok()))
    }

    /// Parse arguments that do not start with a program name.
    pub fn from_flags<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut source = Self::default();

        let mut rest = args.as_slice();
        while let Some((parsed, next)) = parse_one(rest) {
            rest = next;
            if let Some((key, value)) = parsed {
                let key = source.transform_key(&key);
                source.values.insert(key, value);
            }
        }

        source
    }
}

/// Consume one flag (and its value, if separate) from the front of `args`.
///
/// Returns `None` once `args` is exhausted, and `Some((None, rest))` when the
/// front argument is not a flag.
fn parse_one(args: &[String]) -> Option<(Option<(String, String)>, &[String])> {
    let (arg, rest) = args.split_first()?;
    if !is_flag(arg) {
        return Some((None, rest));
    }

    let arg = arg.trim_start_matches('-');
    if let Some((key, value)) = arg.split_once('=') {
        return Some((Some((key.to_string(), value.to_string())), rest));
    }

    match rest.split_first() {
        Some((value, after)) if !is_flag(value) => {
            Some((Some((arg.to_string(), value.clone())), after))
        }
        _ => Some((Some((arg.to_string(), "true".to_string())), rest)),
    }
}

fn is_flag(arg: &str) -> bool {
    arg.len() >= 2
        && arg.starts_with('-')
        && arg != "--"
        && !arg.starts_with("---")
        && !arg.starts_with("-=")
        && !arg.starts_with("--=")
}

impl Source for FlagSource {
    fn name(&self) -> &str {
        "flag"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Lowercase, with underscores and spaces replaced by dashes.
    fn transform_key(&self, key: &str) -> String {
        key.to_lowercase().replace(['_', ' '], "-")
    }
}
