//! In-memory source backed by a map.

use super::Source;
use std::collections::HashMap;
use std::sync::RwLock;

/// A source holding a fixed set of key-value pairs.
///
/// Keys are used as given; [`Source::transform_key`] is the identity.
#[derive(Debug)]
pub struct MapSource {
    name: String,
    values: RwLock<HashMap<String, String>>,
}

impl MapSource {
    /// Create a map source with a display name and initial pairs.
    pub fn new<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: RwLock::new(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Set a key, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value.into());
    }
}

impl Source for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn transform_key(&self, key: &str) -> String {
        key.to_string()
    }

    fn unset(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}
