//! Settings Reader Library
//!
//! Reads typed configuration values from an ordered list of sources, such as
//! command line flags and environment variables, with deprecated key aliases,
//! value normalization and comma separated lists.

pub mod cli;
pub mod csv;
pub mod error;
pub mod format;
pub mod logging;
pub mod normalize;
pub mod options;
pub mod parse;
pub mod reader;
pub mod resolve;
pub mod source;
pub mod validate;

pub use error::{ErrorCode, ReadError, ReadResult, ValueError};
pub use options::{DeprecationHandler, ReadOptions, ReadOverrides};
pub use parse::SettingValue;
pub use reader::{Query, Reader, ReaderSettings};
pub use resolve::Sourced;
pub use source::{EnvSettings, EnvSource, FlagSource, MapSource, Source};
