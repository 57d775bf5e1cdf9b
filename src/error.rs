//! Structured error types for typed setting reads.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Parsing errors
    MalformedValue,
    OutOfRange,
    NotOneOf,

    // Validation errors
    NoChoices,
    RegexMismatch,
    FileNotFound,
    PathIsDirectory,
    FileUnreadable,
    PrivilegedPort,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedValue => "MALFORMED_VALUE",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::NotOneOf => "NOT_ONE_OF",
            ErrorCode::NoChoices => "NO_CHOICES",
            ErrorCode::RegexMismatch => "REGEX_MISMATCH",
            ErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ErrorCode::PathIsDirectory => "PATH_IS_DIRECTORY",
            ErrorCode::FileUnreadable => "FILE_UNREADABLE",
            ErrorCode::PrivilegedPort => "PRIVILEGED_PORT",
        }
    }
}

/// Why a single string could not be turned into the requested value.
///
/// Carries no key or source context; see [`ReadError`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The string does not lexically parse as the target type.
    #[error("malformed value: {value:?} is not a valid {expected}: {reason}")]
    Malformed {
        value: String,
        expected: &'static str,
        reason: String,
    },

    /// The string parses but lies outside the representable bounds.
    #[error("value is not in range: {value} is not between {min} and {max}")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    /// The string is not a member of an enumerated token set.
    #[error("value is not one of the possible choices: {value} must be one of {}", or_list(.choices))]
    NotOneOf { value: String, choices: Vec<String> },

    #[error("one or more values is set but there is no possible value available")]
    NoChoices,

    #[error("value does not match regular expression: {value:?} does not match {pattern}")]
    RegexMismatch { value: String, pattern: String },

    #[error("file does not exist: {path}")]
    FileNotFound { path: String },

    #[error("filepath is a directory: {path}")]
    PathIsDirectory { path: String },

    #[error("failed reading file {path}: {reason}")]
    FileUnreadable { path: String, reason: String },

    /// The port needs privileges the process does not have.
    #[error(
        "listening on privileged port is not allowed: port {port} (user id {uid}{})",
        start_detail(.unprivileged_start)
    )]
    PrivilegedPort {
        port: u16,
        uid: i64,
        unprivileged_start: u16,
    },
}

/// Mention the unprivileged port start only when it is not the usual 1024.
fn start_detail(start: &u16) -> String {
    if *start == 1024 {
        String::new()
    } else {
        format!(", unprivileged start port {start}")
    }
}

impl ValueError {
    pub fn malformed(
        value: impl Into<String>,
        expected: &'static str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::Malformed {
            value: value.into(),
            expected,
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(
        value: impl fmt::Display,
        min: impl fmt::Display,
        max: impl fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn not_one_of<T: fmt::Display>(value: impl fmt::Display, choices: &[T]) -> Self {
        Self::NotOneOf {
            value: value.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ValueError::Malformed { .. } => ErrorCode::MalformedValue,
            ValueError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValueError::NotOneOf { .. } => ErrorCode::NotOneOf,
            ValueError::NoChoices => ErrorCode::NoChoices,
            ValueError::RegexMismatch { .. } => ErrorCode::RegexMismatch,
            ValueError::FileNotFound { .. } => ErrorCode::FileNotFound,
            ValueError::PathIsDirectory { .. } => ErrorCode::PathIsDirectory,
            ValueError::FileUnreadable { .. } => ErrorCode::FileUnreadable,
            ValueError::PrivilegedPort { .. } => ErrorCode::PrivilegedPort,
        }
    }
}

/// A value was found for a key but could not be interpreted.
///
/// The message names the source and the source-specific key, e.g.
/// `environment variable PORT: value is not in range: 99999 is not between 0 and 65535`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub source_name: String,
    pub key: String,
    /// Position of the failing element for comma separated values.
    pub index: Option<usize>,
    pub error: ValueError,
}

impl ReadError {
    pub fn new(source_name: impl Into<String>, key: impl Into<String>, error: ValueError) -> Self {
        Self {
            source_name: source_name.into(),
            key: key.into(),
            index: None,
            error,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code()
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: ", self.source_name, self.key)?;
        if let Some(index) = self.index {
            write!(f, "element {}: ", index)?;
        }
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result type for typed reads.
pub type ReadResult<T> = std::result::Result<T, ReadError>;

/// Join items as `a, b, c or d`.
pub(crate) fn or_list<T: fmt::Display>(items: &[T]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|i| i.to_string()).collect();
            format!("{} or {}", head.join(", "), last)
        }
    }
}
