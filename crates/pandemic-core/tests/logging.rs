//! Stages report through whichever tracing subscriber the caller installs.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use pandemic_core::{impute, validate_observations};
use polars::prelude::{Column, DataFrame};

use common::{covid_frame, names};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("lock")).into_owned()
    }
}

fn captured<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, capture.contents())
}

#[test]
fn duplicate_removal_is_logged() {
    let raw = covid_frame(&[
        ("X", "2021-01-01", Some(10.0), None),
        ("X", "2021-01-01", Some(12.0), None),
    ]);

    let (result, logs) = captured(|| {
        validate_observations(&raw, "covid_compact_raw", &names(&["country", "date"]))
    });

    assert_eq!(result.expect("validate").height(), 1);
    assert!(logs.contains("dropped duplicate observations"), "{logs}");
    assert!(logs.contains("removed=1"), "{logs}");
}

#[test]
fn unfillable_median_column_is_warned_about() {
    let df = DataFrame::new(vec![Column::new("median_age".into(), [None::<f64>])]).expect("df");

    let (_, logs) = captured(|| impute(&df, "covid", &[], &["median_age"]));

    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("median_age"), "{logs}");
}
