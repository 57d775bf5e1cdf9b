//! CLI definition for settings-reader
//!
//! The binary resolves a single key from the flags given after `--` and the
//! process environment, then prints where the value came from.

use crate::format::OutputFormat;
use crate::options::ReadOverrides;
use crate::source::{EnvSource, FlagSource, Source};
use clap::{Parser, ValueEnum};

/// Type to parse the value as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueType {
    /// Normalized string (default)
    #[default]
    String,
    /// enabled/yes/on/true or disabled/no/off/false
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Duration such as `1h 30m` or `250ms`
    Duration,
    /// IPv4 or IPv6 address
    Ip,
    /// Address and port, e.g. `127.0.0.1:8080`
    Socket,
    /// Network prefix, e.g. `10.0.0.0/8`
    Prefix,
}

/// Resolve a setting from command line flags and environment variables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Key to read, e.g. LISTEN_PORT
    pub key: String,

    /// Type to parse the value as
    #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
    pub value_type: ValueType,

    /// Read the value as comma separated elements
    #[arg(long)]
    pub csv: bool,

    /// Deprecated alias for KEY, oldest first (repeatable)
    #[arg(short, long = "deprecated")]
    pub deprecated: Vec<String>,

    /// Treat KEY as deprecated in favour of this key
    #[arg(long)]
    pub current_key: Option<String>,

    /// Prefix of environment variable names
    #[arg(long, default_value = "")]
    pub env_prefix: String,

    /// Do not read the process environment
    #[arg(long)]
    pub no_env: bool,

    /// Treat a key set to the empty string as set
    #[arg(long)]
    pub accept_empty: bool,

    /// Keep the case of the value
    #[arg(long)]
    pub keep_case: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,

    /// Flags to read settings from, given after `--`
    #[arg(last = true, allow_hyphen_values = true)]
    pub flags: Vec<String>,
}

impl Cli {
    /// Flags first, then the environment unless disabled.
    pub fn sources(&self) -> Vec<Box<dyn Source>> {
        let mut sources: Vec<Box<dyn Source>> =
            vec![Box::new(FlagSource::from_flags(self.flags.iter().cloned()))];
        if !self.no_env {
            sources.push(Box::new(EnvSource::from_process(self.env_prefix.clone())));
        }
        sources
    }

    pub fn overrides(&self) -> ReadOverrides {
        let mut overrides = ReadOverrides::new()
            .accept_empty(self.accept_empty)
            .force_lowercase(!self.keep_case)
            .deprecated_keys(self.deprecated.iter().cloned());
        if let Some(ref current) = self.current_key {
            overrides = overrides.current_key(current.clone());
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["settings-reader", "PORT"]).unwrap();
        assert_eq!(cli.key, "PORT");
        assert_eq!(cli.value_type, ValueType::String);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log, "2");
        assert!(cli.flags.is_empty());
    }

    #[test]
    fn test_trailing_flags() {
        let cli = Cli::try_parse_from([
            "settings-reader",
            "PORT",
            "--type",
            "u16",
            "-d",
            "OLD_PORT",
            "--no-env",
            "--",
            "--port=8080",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.value_type, ValueType::U16);
        assert_eq!(cli.deprecated, vec!["OLD_PORT".to_string()]);
        assert_eq!(cli.flags, vec!["--port=8080", "--verbose"]);
        assert!(!cli.verbose);

        let sources = cli.sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].get("port"), Some("8080".to_string()));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "settings-reader",
            "NAME",
            "--keep-case",
            "--current-key",
            "FULL_NAME",
        ])
        .unwrap();
        let options = cli.overrides().resolve();
        assert!(!options.force_lowercase);
        assert!(!options.accept_empty);
        assert_eq!(options.current_key.as_deref(), Some("FULL_NAME"));
        assert!(options.deprecated_keys.is_empty());
    }
}
