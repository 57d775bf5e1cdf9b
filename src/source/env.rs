//! Environment variable source.
//!
//! Keys are uppercased and dashes become underscores, then the configured
//! prefix is prepended unchanged: with prefix `APP_`, `server-address` is
//! read from `APP_SERVER_ADDRESS`.

use super::{Source, split_key_value};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Settings for an [`EnvSource`].
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    /// `KEY=value` lines. `None` reads the process environment.
    /// Lines without `=` are ignored.
    pub environ: Option<Vec<String>>,
    /// Prefix added to every transformed key, usually the program name.
    pub key_prefix: String,
}

/// Environment variables, snapshotted at construction.
#[derive(Debug)]
pub struct EnvSource {
    values: RwLock<HashMap<String, String>>,
    key_prefix: String,
    /// Whether `unset` also removes the variable from the process.
    process_backed: bool,
}

impl EnvSource {
    pub fn new(settings: EnvSettings) -> Self {
        match settings.environ {
            Some(environ) => Self::from_environ(environ, settings.key_prefix),
            None => Self::from_process(settings.key_prefix),
        }
    }

    /// Snapshot the process environment. Non UTF-8 variables are skipped.
    pub fn from_process(key_prefix: impl Into<String>) -> Self {
        let values = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .map(|(k, v)| (upper_snake(&k), v))
            .collect();
        Self {
            values: RwLock::new(values),
            key_prefix: key_prefix.into(),
            process_backed: true,
        }
    }

    /// Build from `KEY=value` lines.
    pub fn from_environ<I, S>(environ: I, key_prefix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = environ
            .into_iter()
            .filter_map(|line| {
                let (key, value) = split_key_value(line.as_ref())?;
                Some((upper_snake(key), value.to_string()))
            })
            .collect();
        Self {
            values: RwLock::new(values),
            key_prefix: key_prefix.into(),
            process_backed: false,
        }
    }
}

fn upper_snake(key: &str) -> String {
    key.to_uppercase().replace('-', "_")
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        "environment variable"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn transform_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, upper_snake(key))
    }

    fn unset(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);

        if self.process_backed {
            debug!(key, "removing environment variable");
            // SAFETY: reads are single threaded and call scoped; callers opt
            // into unsetting and must not read the process environment from
            // other threads at the same time.
            unsafe { std::env::remove_var(key) };
        }
    }
}
