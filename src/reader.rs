//! Reader facade over a fixed list of sources.
//!
//! ```
//! use settings_reader::reader::{Reader, ReaderSettings};
//! use settings_reader::source::{EnvSource, FlagSource, Source};
//!
//! let reader = Reader::new(ReaderSettings {
//!     sources: vec![
//!         Box::new(FlagSource::new(["program", "--key1=A"])) as Box<dyn Source>,
//!         Box::new(EnvSource::from_environ(["KEY1=B", "KEY2=2"], "")),
//!     ],
//!     ..Default::default()
//! });
//!
//! // The flag source takes precedence
//! assert_eq!(reader.string("KEY1"), "a");
//! // Only the environment sets KEY2
//! assert_eq!(reader.parse::<i32>("KEY2").unwrap(), 2);
//! ```

use crate::csv;
use crate::error::{ReadResult, ValueError};
use crate::options::{DeprecationHandler, ReadOptions, ReadOverrides};
use crate::parse::{self, SettingValue};
use crate::resolve::{self, Sourced};
use crate::source::{EnvSource, FlagSource, Source};
use std::fmt;
use std::sync::Arc;

/// Settings to build a [`Reader`].
#[derive(Default)]
pub struct ReaderSettings {
    /// Sources in priority order, index 0 first. Empty defaults to the
    /// process flags followed by the process environment.
    pub sources: Vec<Box<dyn Source>>,
    /// Options applied to every read unless overridden per call.
    pub defaults: ReadOverrides,
    /// Called when a deprecated key is used. Defaults to a tracing warning.
    pub on_deprecated_key: Option<DeprecationHandler>,
}

/// Reads typed settings from an ordered list of sources.
pub struct Reader {
    sources: Vec<Box<dyn Source>>,
    defaults: ReadOverrides,
}

impl Reader {
    pub fn new(settings: ReaderSettings) -> Self {
        let sources = if settings.sources.is_empty() {
            vec![
                Box::new(FlagSource::from_process()) as Box<dyn Source>,
                Box::new(EnvSource::from_process("")),
            ]
        } else {
            settings.sources
        };

        let mut defaults = settings.defaults;
        if let Some(handler) = settings.on_deprecated_key {
            defaults.on_deprecated_key = Some(handler);
        }

        Self { sources, defaults }
    }

    /// Reader over the process flags and environment, with default options.
    pub fn from_process() -> Self {
        Self::new(ReaderSettings::default())
    }

    /// Start a read of `key` with per-call options.
    pub fn read<'a>(&'a self, key: &'a str) -> Query<'a> {
        Query {
            reader: self,
            key,
            overrides: ReadOverrides::default(),
        }
    }

    pub fn sources(&self) -> &[Box<dyn Source>] {
        &self.sources
    }

    /// Normalized value, `None` when absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.read(key).get()
    }

    /// Normalized value, empty when absent.
    pub fn string(&self, key: &str) -> String {
        self.read(key).string()
    }

    pub fn csv(&self, key: &str) -> Option<Vec<String>> {
        self.read(key).csv()
    }

    /// Typed value, `T::default()` when absent.
    pub fn parse<T: SettingValue + Default>(&self, key: &str) -> ReadResult<T> {
        self.read(key).parse()
    }

    /// Typed value, `None` when absent.
    pub fn parse_opt<T: SettingValue>(&self, key: &str) -> ReadResult<Option<T>> {
        self.read(key).parse_opt()
    }

    pub fn parse_or<T: SettingValue>(&self, key: &str, default: T) -> ReadResult<T> {
        self.read(key).parse_or(default)
    }

    pub fn parse_csv<T: SettingValue>(&self, key: &str) -> ReadResult<Option<Vec<T>>> {
        self.read(key).parse_csv()
    }

    /// Boolean from `enabled`/`yes`/`on`/`true` or their negations.
    pub fn bool(&self, key: &str) -> ReadResult<Option<bool>> {
        self.read(key).parse_opt()
    }

    /// First of `keys` that any source sets, checking every source for a
    /// key before moving to the next key. Empty values count as set.
    pub fn first_key_set(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .find(|key| {
                self.sources
                    .iter()
                    .any(|source| source.get(&source.transform_key(key)).is_some())
            })
            .map(|key| key.to_string())
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Reader")
            .field("sources", &names)
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// A single read with per-call options layered over the reader defaults.
#[must_use]
pub struct Query<'a> {
    reader: &'a Reader,
    key: &'a str,
    overrides: ReadOverrides,
}

impl<'a> Query<'a> {
    /// Apply a whole set of overrides at once.
    pub fn with(mut self, overrides: &ReadOverrides) -> Self {
        self.overrides = self.overrides.layer(overrides);
        self
    }

    pub fn deprecated_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides = self.overrides.deprecated_keys(keys);
        self
    }

    pub fn current_key(mut self, key: impl Into<String>) -> Self {
        self.overrides = self.overrides.current_key(key);
        self
    }

    pub fn accept_empty(mut self, accept: bool) -> Self {
        self.overrides = self.overrides.accept_empty(accept);
        self
    }

    pub fn force_lowercase(mut self, lowercase: bool) -> Self {
        self.overrides = self.overrides.force_lowercase(lowercase);
        self
    }

    pub fn trim_line_endings(mut self, trim: bool) -> Self {
        self.overrides = self.overrides.trim_line_endings(trim);
        self
    }

    pub fn trim_space(mut self, trim: bool) -> Self {
        self.overrides = self.overrides.trim_space(trim);
        self
    }

    pub fn trim_quotes(mut self, trim: bool) -> Self {
        self.overrides = self.overrides.trim_quotes(trim);
        self
    }

    /// Clear the key from the source it was read from.
    pub fn unset(mut self, unset: bool) -> Self {
        self.overrides = self.overrides.unset(unset);
        self
    }

    fn options(&self) -> ReadOptions {
        self.reader.defaults.layer(&self.overrides).resolve()
    }

    fn sources(&self) -> &'a [Box<dyn Source>] {
        &self.reader.sources
    }

    /// Normalized value with provenance.
    pub fn lookup(&self) -> Option<Sourced<String>> {
        resolve::get(self.sources(), self.key, &self.options())
    }

    pub fn get(&self) -> Option<String> {
        self.lookup().map(|found| found.value)
    }

    pub fn string(&self) -> String {
        self.get().unwrap_or_default()
    }

    pub fn csv(&self) -> Option<Vec<String>> {
        csv::csv(self.sources(), self.key, &self.options())
    }

    pub fn parse<T: SettingValue + Default>(&self) -> ReadResult<T> {
        parse::parse(self.sources(), self.key, &self.options())
    }

    pub fn parse_opt<T: SettingValue>(&self) -> ReadResult<Option<T>> {
        parse::parse_opt(self.sources(), self.key, &self.options())
    }

    pub fn parse_or<T: SettingValue>(&self, default: T) -> ReadResult<T> {
        Ok(self.parse_opt()?.unwrap_or(default))
    }

    pub fn parse_sourced<T: SettingValue>(&self) -> ReadResult<Option<Sourced<T>>> {
        parse::parse_sourced(self.sources(), self.key, &self.options())
    }

    pub fn parse_with<T, F>(&self, parse: F) -> ReadResult<Option<T>>
    where
        F: Fn(&str) -> Result<T, ValueError>,
    {
        parse::parse_opt_with(self.sources(), self.key, parse, &self.options())
    }

    pub fn parse_csv<T: SettingValue>(&self) -> ReadResult<Option<Vec<T>>> {
        csv::parse_csv(self.sources(), self.key, &self.options())
    }

    pub fn parse_csv_sourced<T: SettingValue>(&self) -> ReadResult<Option<Sourced<Vec<T>>>> {
        csv::parse_csv_sourced_with(self.sources(), self.key, T::parse_setting, &self.options())
    }

    pub fn parse_csv_with<T, F>(&self, parse: F) -> ReadResult<Option<Vec<T>>>
    where
        F: Fn(&str) -> Result<T, ValueError>,
    {
        csv::parse_csv_with(self.sources(), self.key, parse, &self.options())
    }
}

/// Wrap a closure as a [`DeprecationHandler`].
pub fn deprecation_handler<F>(handler: F) -> DeprecationHandler
where
    F: Fn(&str, &str, &str) + Send + Sync + 'static,
{
    Arc::new(handler)
}
