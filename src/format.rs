//! Output formatting for resolution reports, as text or JSON.

use crate::error::{ErrorCode, ReadError};
use crate::logging::deprecation_message;
use crate::resolve::Sourced;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `name: value` line per field
    #[default]
    Text,
    Json,
}

/// A deprecated key that was used during the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deprecation {
    pub source: String,
    pub deprecated_key: String,
    pub current_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<usize>,
    pub message: String,
}

/// Outcome of reading one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub key: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_key: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deprecations: Vec<Deprecation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl Report {
    pub fn found(key: &str, found: Sourced<Value>) -> Self {
        Self {
            key: key.to_string(),
            found: true,
            value: Some(found.value),
            source: Some(found.source_name),
            used_key: Some(found.key),
            deprecations: Vec::new(),
            error: None,
        }
    }

    pub fn absent(key: &str) -> Self {
        Self {
            key: key.to_string(),
            found: false,
            value: None,
            source: None,
            used_key: None,
            deprecations: Vec::new(),
            error: None,
        }
    }

    /// The value was found but could not be parsed.
    pub fn failed(key: &str, err: &ReadError) -> Self {
        Self {
            key: key.to_string(),
            found: true,
            value: None,
            source: Some(err.source_name.clone()),
            used_key: Some(err.key.clone()),
            deprecations: Vec::new(),
            error: Some(ErrorReport {
                code: err.code(),
                element: err.index,
                message: err.to_string(),
            }),
        }
    }

    pub fn with_deprecations(mut self, deprecations: Vec<Deprecation>) -> Self {
        self.deprecations = deprecations;
        self
    }

    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        for d in &self.deprecations {
            out.push_str(&format!(
                "warning: {}\n",
                deprecation_message(&d.source, &d.deprecated_key, &d.current_key)
            ));
        }

        if !self.found {
            out.push_str(&format!("{}: not set\n", self.key));
            return out;
        }

        if let Some(ref value) = self.value {
            out.push_str(&format!("value: {}\n", text_value(value)));
        }
        if let Some(ref source) = self.source {
            out.push_str(&format!("source: {}\n", source));
        }
        if let Some(ref used_key) = self.used_key {
            out.push_str(&format!("key: {}\n", used_key));
        }
        if let Some(ref error) = self.error {
            out.push_str(&format!("error: {} ({})\n", error.message, error.code.as_str()));
        }

        out
    }
}

/// Strings unquoted, lists comma separated, everything else as JSON.
fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
