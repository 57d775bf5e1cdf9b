//! Logging setup and the log line for deprecated keys.
//!
//! The library only emits `tracing` events. Installing a subscriber is left
//! to the binary (or the embedding application) through [`init`].

use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Off,
    Stdout,
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

impl LogOutput {
    /// Parse `0`/`off`, `1`/`stdout`, `2`/`stderr`; anything else is a file name.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogOutput::Off,
            "1" | "stdout" => LogOutput::Stdout,
            "2" | "stderr" => LogOutput::Stderr,
            filename => LogOutput::File(PathBuf::from(filename)),
        }
    }
}

/// Filter at `level`, unless `RUST_LOG` says otherwise.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install a global `FmtSubscriber` writing to `output` at `level`.
pub fn init(level: Level, output: &LogOutput) -> anyhow::Result<()> {
    match output {
        LogOutput::Off => {}
        LogOutput::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogOutput::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogOutput::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(level))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// Render the notice for a key read under a deprecated name.
pub fn deprecation_message(source: &str, deprecated: &str, current: &str) -> String {
    format!("{source} {deprecated} is deprecated, use {current} instead")
}

pub fn log_deprecated_key(source: &str, deprecated: &str, current: &str) {
    tracing::warn!(
        source = %source,
        deprecated = %deprecated,
        current = %current,
        "{}",
        deprecation_message(source, deprecated, current)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_output_parse() {
        assert_eq!(LogOutput::parse("0"), LogOutput::Off);
        assert_eq!(LogOutput::parse("off"), LogOutput::Off);
        assert_eq!(LogOutput::parse("1"), LogOutput::Stdout);
        assert_eq!(LogOutput::parse("stdout"), LogOutput::Stdout);
        assert_eq!(LogOutput::parse("2"), LogOutput::Stderr);
        assert_eq!(LogOutput::parse("stderr"), LogOutput::Stderr);
        assert_eq!(
            LogOutput::parse("reader.log"),
            LogOutput::File(PathBuf::from("reader.log"))
        );
    }

    #[test]
    fn test_deprecation_message() {
        assert_eq!(
            deprecation_message("environment variable", "OLD_PORT", "PORT"),
            "environment variable OLD_PORT is deprecated, use PORT instead"
        );
    }

    #[test]
    fn test_init_off_installs_nothing() {
        assert!(init(Level::INFO, &LogOutput::Off).is_ok());
    }

    #[test]
    fn test_env_filter_default_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter(Level::DEBUG).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(env_filter(Level::INFO).max_level_hint(), Some(LevelFilter::INFO));
    }
}
