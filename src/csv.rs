//! Comma separated values.
//!
//! The whole value is resolved and normalized once, then split on every
//! comma. There is no escaping, so elements cannot contain commas.
//!
//! Absent keys give `None`. An accepted empty value gives an empty list.

use crate::error::{ReadError, ReadResult, ValueError};
use crate::options::ReadOptions;
use crate::parse::SettingValue;
use crate::resolve::{Sourced, get};
use crate::source::Source;

/// Split a normalized value into its elements.
pub fn split(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').collect()
}

/// Read `key` as comma separated values parsed with `parse`, keeping provenance.
///
/// The first element that fails aborts the read; the error carries its index.
pub fn parse_csv_sourced_with<S, T, F>(
    sources: &[S],
    key: &str,
    parse: F,
    options: &ReadOptions,
) -> ReadResult<Option<Sourced<Vec<T>>>>
where
    S: Source,
    F: Fn(&str) -> Result<T, ValueError>,
{
    let Some(found) = get(sources, key, options) else {
        return Ok(None);
    };

    let values = split(&found.value)
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            parse(element).map_err(|error| {
                ReadError::new(found.source_name.as_str(), found.key.as_str(), error)
                    .with_index(index)
            })
        })
        .collect::<ReadResult<Vec<T>>>()?;

    Ok(Some(found.map(|_| values)))
}

pub fn parse_csv_with<S, T, F>(
    sources: &[S],
    key: &str,
    parse: F,
    options: &ReadOptions,
) -> ReadResult<Option<Vec<T>>>
where
    S: Source,
    F: Fn(&str) -> Result<T, ValueError>,
{
    Ok(parse_csv_sourced_with(sources, key, parse, options)?.map(|found| found.value))
}

pub fn parse_csv<S: Source, T: SettingValue>(
    sources: &[S],
    key: &str,
    options: &ReadOptions,
) -> ReadResult<Option<Vec<T>>> {
    parse_csv_with(sources, key, T::parse_setting, options)
}

/// Comma separated strings; `None` when absent.
pub fn csv<S: Source>(sources: &[S], key: &str, options: &ReadOptions) -> Option<Vec<String>> {
    get(sources, key, options)
        .map(|found| split(&found.value).into_iter().map(str::to_string).collect())
}
