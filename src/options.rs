//! Read options and their layering.
//!
//! Options come in two shapes:
//! - [`ReadOverrides`]: a partial set where every field is optional. Reader
//!   defaults and per-call options are both expressed this way.
//! - [`ReadOptions`]: the complete, immutable set used for one read, built by
//!   layering overrides (later layers win field by field) over the built-in
//!   defaults.

use std::fmt;
use std::sync::Arc;

/// Callback invoked when a value was found under a deprecated key.
///
/// Arguments are the source name, the key that was used and the current key,
/// both in the source's own key form.
pub type DeprecationHandler = Arc<dyn Fn(&str, &str, &str) + Send + Sync>;

/// Default handler: emit a tracing warning.
pub fn warn_deprecated_key() -> DeprecationHandler {
    Arc::new(|source, deprecated_key, current_key| {
        crate::logging::log_deprecated_key(source, deprecated_key, current_key)
    })
}

/// Complete options for a single read.
#[derive(Clone)]
pub struct ReadOptions {
    /// Trim `\r` and `\n` from both ends of the value.
    pub trim_line_endings: bool,
    /// Trim latin whitespace from both ends of the value.
    pub trim_space: bool,
    /// Repeatedly strip one layer of surrounding quote characters.
    pub trim_quotes: bool,
    /// Lowercase the value before any trimming.
    pub force_lowercase: bool,
    /// Treat a key set to the empty string as set.
    pub accept_empty: bool,
    /// Clear the key from the winning source once read.
    pub unset: bool,
    /// Deprecated aliases, oldest first. They are tried before the key itself.
    pub deprecated_keys: Vec<String>,
    /// When set, every key given is an alias and this is the current key.
    pub current_key: Option<String>,
    pub on_deprecated_key: DeprecationHandler,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            trim_line_endings: true,
            trim_space: true,
            trim_quotes: true,
            force_lowercase: true,
            accept_empty: false,
            unset: false,
            deprecated_keys: Vec::new(),
            current_key: None,
            on_deprecated_key: warn_deprecated_key(),
        }
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("trim_line_endings", &self.trim_line_endings)
            .field("trim_space", &self.trim_space)
            .field("trim_quotes", &self.trim_quotes)
            .field("force_lowercase", &self.force_lowercase)
            .field("accept_empty", &self.accept_empty)
            .field("unset", &self.unset)
            .field("deprecated_keys", &self.deprecated_keys)
            .field("current_key", &self.current_key)
            .finish_non_exhaustive()
    }
}

/// Partial options. Unset fields fall through to the layer below.
#[derive(Clone, Default)]
pub struct ReadOverrides {
    pub trim_line_endings: Option<bool>,
    pub trim_space: Option<bool>,
    pub trim_quotes: Option<bool>,
    pub force_lowercase: Option<bool>,
    pub accept_empty: Option<bool>,
    pub unset: Option<bool>,
    pub deprecated_keys: Option<Vec<String>>,
    pub current_key: Option<String>,
    pub on_deprecated_key: Option<DeprecationHandler>,
}

impl ReadOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim_line_endings(mut self, trim: bool) -> Self {
        self.trim_line_endings = Some(trim);
        self
    }

    pub fn trim_space(mut self, trim: bool) -> Self {
        self.trim_space = Some(trim);
        self
    }

    pub fn trim_quotes(mut self, trim: bool) -> Self {
        self.trim_quotes = Some(trim);
        self
    }

    pub fn force_lowercase(mut self, lowercase: bool) -> Self {
        self.force_lowercase = Some(lowercase);
        self
    }

    pub fn accept_empty(mut self, accept: bool) -> Self {
        self.accept_empty = Some(accept);
        self
    }

    pub fn unset(mut self, unset: bool) -> Self {
        self.unset = Some(unset);
        self
    }

    /// Deprecated aliases for the key being read, oldest first.
    ///
    /// The oldest key is checked first so that a value a user configured long
    /// ago is not shadowed by a default shipped under a newer name.
    pub fn deprecated_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deprecated_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Mark every key given to the read as deprecated in favour of `key`.
    pub fn current_key(mut self, key: impl Into<String>) -> Self {
        self.current_key = Some(key.into());
        self
    }

    pub fn on_deprecated_key<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &str, &str) + Send + Sync + 'static,
    {
        self.on_deprecated_key = Some(Arc::new(handler));
        self
    }

    /// Layer `over` on top of `self`: every field set in `over` wins.
    pub fn layer(&self, over: &ReadOverrides) -> ReadOverrides {
        ReadOverrides {
            trim_line_endings: over.trim_line_endings.or(self.trim_line_endings),
            trim_space: over.trim_space.or(self.trim_space),
            trim_quotes: over.trim_quotes.or(self.trim_quotes),
            force_lowercase: over.force_lowercase.or(self.force_lowercase),
            accept_empty: over.accept_empty.or(self.accept_empty),
            unset: over.unset.or(self.unset),
            deprecated_keys: over
                .deprecated_keys
                .clone()
                .or_else(|| self.deprecated_keys.clone()),
            current_key: over.current_key.clone().or_else(|| self.current_key.clone()),
            on_deprecated_key: over
                .on_deprecated_key
                .clone()
                .or_else(|| self.on_deprecated_key.clone()),
        }
    }

    /// Fill the remaining gaps with built-in defaults.
    pub fn resolve(&self) -> ReadOptions {
        let defaults = ReadOptions::default();
        ReadOptions {
            trim_line_endings: self.trim_line_endings.unwrap_or(defaults.trim_line_endings),
            trim_space: self.trim_space.unwrap_or(defaults.trim_space),
            trim_quotes: self.trim_quotes.unwrap_or(defaults.trim_quotes),
            force_lowercase: self.force_lowercase.unwrap_or(defaults.force_lowercase),
            accept_empty: self.accept_empty.unwrap_or(defaults.accept_empty),
            unset: self.unset.unwrap_or(defaults.unset),
            deprecated_keys: self.deprecated_keys.clone().unwrap_or_default(),
            current_key: self.current_key.clone().filter(|key| !key.is_empty()),
            on_deprecated_key: self
                .on_deprecated_key
                .clone()
                .unwrap_or(defaults.on_deprecated_key),
        }
    }
}

impl fmt::Debug for ReadOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOverrides")
            .field("trim_line_endings", &self.trim_line_endings)
            .field("trim_space", &self.trim_space)
            .field("trim_quotes", &self.trim_quotes)
            .field("force_lowercase", &self.force_lowercase)
            .field("accept_empty", &self.accept_empty)
            .field("unset", &self.unset)
            .field("deprecated_keys", &self.deprecated_keys)
            .field("current_key", &self.current_key)
            .field("on_deprecated_key", &self.on_deprecated_key.is_some())
            .finish()
    }
}
