//! Key-value sources settings are read from.
//!
//! A [`Source`] is a named provider with its own key naming convention.
//! Generic keys (e.g. `SERVER_ADDRESS`) are mapped to the source's form with
//! [`Source::transform_key`] before every lookup:
//! - [`EnvSource`]: `SERVER_ADDRESS`, optionally prefixed
//! - [`FlagSource`]: `server-address`
//! - [`MapSource`]: unchanged

mod env;
mod flag;
mod map;

pub use env::{EnvSettings, EnvSource};
pub use flag::FlagSource;
pub use map::MapSource;

/// A named key-value source.
pub trait Source: Send + Sync {
    /// Singular display name used in messages, e.g. `environment variable`
    /// or `flag`, so that `"{name} {key}"` reads naturally.
    fn name(&self) -> &str;

    /// Value stored at an already transformed key, `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Map a generic key to this source's key form.
    fn transform_key(&self, key: &str) -> String;

    /// Clear an already transformed key. No-op for sources that cannot.
    fn unset(&self, _key: &str) {}
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn transform_key(&self, key: &str) -> String {
        (**self).transform_key(key)
    }

    fn unset(&self, key: &str) {
        (**self).unset(key)
    }
}

impl<S: Source + ?Sized> Source for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn transform_key(&self, key: &str) -> String {
        (**self).transform_key(key)
    }

    fn unset(&self, key: &str) {
        (**self).unset(key)
    }
}

/// Split a `KEY=value` line, ignoring lines without `=`.
pub(crate) fn split_key_value(line: &str) -> Option<(&str, &str)> {
    line.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("A=B"), Some(("A", "B")));
        assert_eq!(split_key_value("A=B=C"), Some(("A", "B=C")));
        assert_eq!(split_key_value("A="), Some(("A", "")));
        assert_eq!(split_key_value("A"), None);
    }

    #[test]
    fn test_boxed_and_shared_sources_delegate() {
        let map = MapSource::new("map", [("key", "value")]);
        let shared: Arc<dyn Source> = Arc::new(map);
        let boxed: Box<dyn Source> = Box::new(Arc::clone(&shared));

        assert_eq!(boxed.name(), "map");
        assert_eq!(boxed.get("key"), Some("value".to_string()));
        boxed.unset("key");
        assert_eq!(shared.get("key"), None);
    }
}
