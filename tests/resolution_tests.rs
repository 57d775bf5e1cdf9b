//! Integration tests for key resolution across sources.
//!
//! These tests verify source precedence, deprecated key fallback, the order
//! in which sources are consulted and unsetting of the winning source.

use settings_reader::options::ReadOverrides;
use settings_reader::reader::{Reader, ReaderSettings, deprecation_handler};
use settings_reader::source::{EnvSource, FlagSource, MapSource, Source};
use std::sync::{Arc, Mutex};

type Notices = Arc<Mutex<Vec<String>>>;

/// Helper to build a reader over the given sources that records notices.
fn reader_with(sources: Vec<Box<dyn Source>>) -> (Reader, Notices) {
    let notices: Notices = Arc::default();
    let recorded = Arc::clone(&notices);
    let reader = Reader::new(ReaderSettings {
        sources,
        on_deprecated_key: Some(deprecation_handler(move |source, used, current| {
            recorded
                .lock()
                .unwrap()
                .push(format!("{source} {used} -> {current}"));
        })),
        ..Default::default()
    });
    (reader, notices)
}

fn flags(args: &[&str]) -> Box<dyn Source> {
    Box::new(FlagSource::from_flags(args.iter().copied()))
}

fn env(environ: &[&str]) -> Box<dyn Source> {
    Box::new(EnvSource::from_environ(environ.iter().copied(), ""))
}

/// A source that records every call made to it.
struct RecordingSource {
    name: String,
    values: Vec<(String, String)>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Source for RecordingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.get({key})", self.name));
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn transform_key(&self, key: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.transform({key})", self.name));
        key.to_string()
    }

    fn unset(&self, key: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}.unset({key})", self.name));
    }
}

fn recording(
    name: &str,
    values: &[(&str, &str)],
    calls: &Arc<Mutex<Vec<String>>>,
) -> Box<dyn Source> {
    Box::new(RecordingSource {
        name: name.to_string(),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        calls: Arc::clone(calls),
    })
}

#[test]
fn flag_takes_precedence_over_environment() {
    let (reader, _) = reader_with(vec![flags(&["--port=8080"]), env(&["PORT=9090"])]);
    assert_eq!(reader.parse::<u16>("PORT").unwrap(), 8080);

    let (reader, _) = reader_with(vec![env(&["PORT=9090"])]);
    assert_eq!(reader.parse::<u16>("PORT").unwrap(), 9090);
}

#[test]
fn empty_flag_falls_through_to_environment() {
    let (reader, _) = reader_with(vec![flags(&["--port="]), env(&["PORT=9090"])]);
    assert_eq!(reader.parse::<u16>("PORT").unwrap(), 9090);

    let found = reader.read("PORT").accept_empty(true).lookup().unwrap();
    assert_eq!(found.source_name, "flag");
    assert_eq!(found.value, "");
}

#[test]
fn deprecated_key_fallback_fires_notice_once() {
    let (reader, notices) = reader_with(vec![env(&["OLD_TIMEOUT=30s"])]);
    let timeout = reader
        .read("TIMEOUT")
        .deprecated_keys(["OLD_TIMEOUT"])
        .parse::<std::time::Duration>()
        .unwrap();
    assert_eq!(timeout.as_secs(), 30);
    assert_eq!(
        *notices.lock().unwrap(),
        vec!["environment variable OLD_TIMEOUT -> TIMEOUT".to_string()]
    );
}

#[test]
fn deprecated_key_wins_over_current_key() {
    // Oldest key first, across every source
    let (reader, notices) = reader_with(vec![
        flags(&["--listen=:80"]),
        env(&["LEGACY_LISTEN=:8080"]),
    ]);
    let found = reader
        .read("LISTEN")
        .deprecated_keys(["LEGACY_LISTEN"])
        .lookup()
        .unwrap();
    assert_eq!(found.source_name, "environment variable");
    assert_eq!(found.value, ":8080");
    assert_eq!(notices.lock().unwrap().len(), 1);
}

#[test]
fn current_key_marks_every_hit_deprecated() {
    let (reader, notices) = reader_with(vec![flags(&["--verbose"])]);
    let verbose = reader
        .read("VERBOSE")
        .current_key("LOG_LEVEL")
        .parse_opt::<bool>()
        .unwrap();
    assert_eq!(verbose, Some(true));
    assert_eq!(
        *notices.lock().unwrap(),
        vec!["flag verbose -> LOG_LEVEL".to_string()]
    );
}

#[test]
fn no_notice_for_current_key() {
    let (reader, notices) = reader_with(vec![env(&["PORT=1"])]);
    reader
        .read("PORT")
        .deprecated_keys(["OLD_PORT"])
        .parse::<u16>()
        .unwrap();
    assert!(notices.lock().unwrap().is_empty());
}

#[test]
fn sources_are_consulted_in_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (reader, _) = reader_with(vec![
        recording("first", &[], &calls),
        recording("second", &[("NEW", "1")], &calls),
    ]);

    let value = reader.read("NEW").deprecated_keys(["OLD"]).unset(true).get();
    assert_eq!(value, Some("1".to_string()));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "first.transform(OLD)",
            "first.get(OLD)",
            "second.transform(OLD)",
            "second.get(OLD)",
            "first.transform(NEW)",
            "first.get(NEW)",
            "second.transform(NEW)",
            "second.get(NEW)",
            "second.unset(NEW)",
            "second.transform(NEW)",
        ]
    );
}

#[test]
fn unset_clears_winning_source_only() {
    let first = Arc::new(MapSource::new("first", [("TOKEN", "secret")]));
    let second = Arc::new(MapSource::new("second", [("TOKEN", "other")]));
    let (reader, _) = reader_with(vec![
        Box::new(Arc::clone(&first)) as Box<dyn Source>,
        Box::new(Arc::clone(&second)),
    ]);

    let token = reader.read("TOKEN").unset(true).force_lowercase(false).get();
    assert_eq!(token, Some("secret".to_string()));
    assert_eq!(first.get("TOKEN"), None);
    assert_eq!(second.get("TOKEN"), Some("other".to_string()));

    // The next read falls through to the second source
    assert_eq!(reader.get("TOKEN"), Some("other".to_string()));
}

#[test]
fn reader_defaults_apply_to_every_read() {
    let reader = Reader::new(ReaderSettings {
        sources: vec![env(&["NAME=Alice", "EMPTY="])],
        defaults: ReadOverrides::new().force_lowercase(false).accept_empty(true),
        ..Default::default()
    });
    assert_eq!(reader.string("NAME"), "Alice");
    assert_eq!(reader.get("EMPTY"), Some(String::new()));
    // Per-call options win over reader defaults
    assert_eq!(reader.read("NAME").force_lowercase(true).string(), "alice");
}
