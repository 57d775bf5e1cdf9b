//! Typed reads built on key resolution and normalization.
//!
//! Every typed read comes in three flavours:
//! - [`parse_opt`]: `None` when the key is absent.
//! - [`parse`]: `T::default()` when the key is absent.
//! - [`parse_sourced`]: like `parse_opt`, keeping where the value came from.
//!
//! A key is absent when no source sets it, or when it is only set to the
//! empty string and empty values are not accepted. Parse failures are
//! reported as [`ReadError`] carrying the source name and key.

mod boolean;
mod net;
mod number;
mod time;

pub use boolean::{FALSE_TOKENS, TRUE_TOKENS, parse_bool};
pub use number::{Float, Integer, integer_bounds, parse_float, parse_integer};

use crate::error::{ReadError, ReadResult, ValueError};
use crate::options::ReadOptions;
use crate::resolve::{Sourced, get};
use crate::source::Source;

/// A type that can be read from a normalized setting string.
pub trait SettingValue: Sized {
    fn parse_setting(value: &str) -> Result<Self, ValueError>;
}

impl SettingValue for String {
    fn parse_setting(value: &str) -> Result<Self, ValueError> {
        Ok(value.to_string())
    }
}

/// Read `key` and parse it with `parse`, keeping its provenance.
pub fn parse_sourced_with<S, T, F>(
    sources: &[S],
    key: &str,
    parse: F,
    options: &ReadOptions,
) -> ReadResult<Option<Sourced<T>>>
where
    S: Source,
    F: Fn(&str) -> Result<T, ValueError>,
{
    let Some(found) = get(sources, key, options) else {
        return Ok(None);
    };

    match parse(&found.value) {
        Ok(value) => Ok(Some(found.map(|_| value))),
        Err(error) => Err(ReadError::new(found.source_name, found.key, error)),
    }
}

/// Read `key` and parse it with `parse`; `None` when absent.
pub fn parse_opt_with<S, T, F>(
    sources: &[S],
    key: &str,
    parse: F,
    options: &ReadOptions,
) -> ReadResult<Option<T>>
where
    S: Source,
    F: Fn(&str) -> Result<T, ValueError>,
{
    Ok(parse_sourced_with(sources, key, parse, options)?.map(|found| found.value))
}

/// Read `key` and parse it with `parse`; `T::default()` when absent.
pub fn parse_with<S, T, F>(
    sources: &[S],
    key: &str,
    parse: F,
    options: &ReadOptions,
) -> ReadResult<T>
where
    S: Source,
    T: Default,
    F: Fn(&str) -> Result<T, ValueError>,
{
    Ok(parse_opt_with(sources, key, parse, options)?.unwrap_or_default())
}

pub fn parse_sourced<S: Source, T: SettingValue>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> ReadResult<Option<Sourced<T>>> {
    parse_sourced_with(sources, key, T::parse_setting, options)
}

pub fn parse_opt<S: Source, T: SettingValue>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> ReadResult<Option<T>> {
    parse_opt_with(sources, key, T::parse_setting, options)
}

pub fn parse<S: Source, T: SettingValue + Default>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> ReadResult<T> {
    parse_with(sources, key, T::parse_setting, options)
}
