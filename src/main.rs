//! settings-reader
//!
//! Resolves one setting the way an application built on this crate would and
//! reports the value, the source and key it came from, and any deprecated
//! keys that were used.

use anyhow::Result;
use clap::Parser;
use serde_json::{Value, json};
use settings_reader::cli::{Cli, ValueType};
use settings_reader::error::ReadResult;
use settings_reader::format::{Deprecation, OutputFormat, Report};
use settings_reader::logging::{self, LogOutput};
use settings_reader::options::DeprecationHandler;
use settings_reader::parse::SettingValue;
use settings_reader::reader::{Query, Reader, ReaderSettings};
use settings_reader::resolve::Sourced;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{Level, debug};

/// Read the query as `T`, rendering the result to JSON.
fn lookup<T, F>(query: &Query<'_>, csv: bool, to_json: F) -> ReadResult<Option<Sourced<Value>>>
where
    T: SettingValue,
    F: Fn(&T) -> Value,
{
    if csv {
        Ok(query
            .parse_csv_sourced::<T>()?
            .map(|found| found.map(|values| Value::Array(values.iter().map(&to_json).collect()))))
    } else {
        Ok(query
            .parse_sourced::<T>()?
            .map(|found| found.map(|value| to_json(&value))))
    }
}

fn read_value(
    query: &Query<'_>,
    value_type: ValueType,
    csv: bool,
) -> ReadResult<Option<Sourced<Value>>> {
    match value_type {
        ValueType::String => lookup::<String, _>(query, csv, |v| json!(v)),
        ValueType::Bool => lookup::<bool, _>(query, csv, |v| json!(v)),
        ValueType::I8 => lookup::<i8, _>(query, csv, |v| json!(v)),
        ValueType::I16 => lookup::<i16, _>(query, csv, |v| json!(v)),
        ValueType::I32 => lookup::<i32, _>(query, csv, |v| json!(v)),
        ValueType::I64 => lookup::<i64, _>(query, csv, |v| json!(v)),
        ValueType::U8 => lookup::<u8, _>(query, csv, |v| json!(v)),
        ValueType::U16 => lookup::<u16, _>(query, csv, |v| json!(v)),
        ValueType::U32 => lookup::<u32, _>(query, csv, |v| json!(v)),
        ValueType::U64 => lookup::<u64, _>(query, csv, |v| json!(v)),
        ValueType::F32 => lookup::<f32, _>(query, csv, |v| json!(v)),
        ValueType::F64 => lookup::<f64, _>(query, csv, |v| json!(v)),
        ValueType::Duration => lookup::<Duration, _>(query, csv, |v| {
            json!(humantime::format_duration(*v).to_string())
        }),
        ValueType::Ip => lookup::<IpAddr, _>(query, csv, |v| json!(v.to_string())),
        ValueType::Socket => lookup::<SocketAddr, _>(query, csv, |v| json!(v.to_string())),
        ValueType::Prefix => lookup::<ipnet::IpNet, _>(query, csv, |v| json!(v.to_string())),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    logging::init(level, &LogOutput::parse(&cli.log))?;

    // Collect notices for the report and still log them.
    let notices: Arc<Mutex<Vec<Deprecation>>> = Arc::default();
    let handler: DeprecationHandler = {
        let notices = Arc::clone(&notices);
        Arc::new(move |source: &str, deprecated: &str, current: &str| {
            logging::log_deprecated_key(source, deprecated, current);
            notices
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Deprecation {
                    source: source.to_string(),
                    deprecated_key: deprecated.to_string(),
                    current_key: current.to_string(),
                });
        })
    };

    let reader = Reader::new(ReaderSettings {
        sources: cli.sources(),
        defaults: cli.overrides(),
        on_deprecated_key: Some(handler),
    });
    debug!(?reader, key = %cli.key, "Reading setting");

    let query = reader.read(&cli.key);
    let result = read_value(&query, cli.value_type, cli.csv);

    let (report, status) = match result {
        Ok(Some(found)) => (Report::found(&cli.key, found), ExitCode::SUCCESS),
        Ok(None) => (Report::absent(&cli.key), ExitCode::SUCCESS),
        Err(err) => (Report::failed(&cli.key, &err), ExitCode::FAILURE),
    };

    let notices = std::mem::take(&mut *notices.lock().unwrap_or_else(PoisonError::into_inner));
    let report = report.with_deprecations(notices);

    print!("{}", report.render(cli.format)?);
    if cli.format == OutputFormat::Json {
        println!();
    }

    Ok(status)
}
