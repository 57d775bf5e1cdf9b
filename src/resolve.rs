//! Key resolution across ordered sources.
//!
//! Candidate keys are the deprecated aliases (oldest first) followed by the
//! key itself. For each candidate, every source is consulted in order; the
//! first source holding a value that passes the emptiness policy wins.
//!
//! The current key is tried last: a deployment may ship a default under the
//! new name (e.g. in a container image) and must not shadow what the user
//! configured under an older one.

use crate::normalize::normalize;
use crate::options::ReadOptions;
use crate::source::Source;
use tracing::{debug, trace};

/// A value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    /// Display name of the source, e.g. `flag`.
    pub source_name: String,
    /// Key the value was found under, in the source's key form.
    pub key: String,
}

impl<T> Sourced<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source_name: self.source_name,
            key: self.key,
        }
    }
}

/// Find the raw value for `key`.
///
/// Emits the deprecation notice and performs the optional unset on the
/// winning source. Returns `None` when no candidate key is set, or when every
/// set value is empty and empty values are not accepted.
pub fn resolve<S: Source>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> Option<Sourced<String>> {
    let candidates = options
        .deprecated_keys
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(key));

    for candidate in candidates {
        for source in sources {
            let source_key = source.transform_key(candidate);
            let Some(value) = source.get(&source_key) else {
                trace!(source = source.name(), key = %source_key, "key not set");
                continue;
            };
            if value.is_empty() && !options.accept_empty {
                trace!(source = source.name(), key = %source_key, "key set to empty value, skipping");
                continue;
            }

            debug!(source = source.name(), key = %source_key, "resolved setting");

            if options.unset {
                source.unset(&source_key);
            }

            match &options.current_key {
                Some(current_key) => {
                    (options.on_deprecated_key)(source.name(), &source_key, current_key)
                }
                None => {
                    let current_key = source.transform_key(key);
                    if source_key != current_key {
                        (options.on_deprecated_key)(source.name(), &source_key, &current_key);
                    }
                }
            }

            return Some(Sourced {
                value,
                source_name: source.name().to_string(),
                key: source_key,
            });
        }
    }

    None
}

/// Find and normalize the value for `key`.
pub fn get<S: Source>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> Option<Sourced<String>> {
    resolve(sources, key, options).map(|found| found.map(|raw| normalize(&raw, options)))
}
