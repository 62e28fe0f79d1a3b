#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use bugsnag_tracing::{
    error_class, BugsnagLayer, BugsnagOptions, Metadata, Notify, NotifyError, Severity,
};
use tracing_subscriber::prelude::*;

pub const API_KEY: &str = "0123456789abcdef0123456789abcdef";

/// A report as it reached the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub error_class: String,
    pub message: String,
    pub sources: Vec<String>,
    pub severity: Severity,
    pub metadata: Option<Metadata>,
}

/// Collects reports instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingClient {
    reports: Mutex<Vec<Report>>,
}

impl RecordingClient {
    pub fn new() -> Arc<RecordingClient> {
        Arc::new(RecordingClient::default())
    }

    /// Fetches and clears the collected reports.
    pub fn fetch_and_clear_reports(&self) -> Vec<Report> {
        std::mem::take(&mut *self.reports.lock().unwrap())
    }
}

impl Notify for RecordingClient {
    fn notify(
        &self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&Metadata>,
    ) -> Result<(), NotifyError> {
        let mut sources = Vec::new();
        let mut source = error.source();
        while let Some(err) = source {
            sources.push(err.to_string());
            source = err.source();
        }

        self.reports.lock().unwrap().push(Report {
            error_class: error_class(error),
            message: error.to_string(),
            sources,
            severity,
            metadata: metadata.cloned(),
        });
        Ok(())
    }
}

pub fn options() -> BugsnagOptions {
    BugsnagOptions::new(API_KEY, "test")
}

/// Runs `f` with a subscriber carrying a layer built from `options` and
/// returns what was reported.
pub fn with_captured_reports_options<F: FnOnce()>(options: BugsnagOptions, f: F) -> Vec<Report> {
    let client = RecordingClient::new();
    let layer = BugsnagLayer::with_client(client.clone(), &options).unwrap();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    client.fetch_and_clear_reports()
}

/// Runs `f` with the default test options and returns what was reported.
pub fn with_captured_reports<F: FnOnce()>(f: F) -> Vec<Report> {
    with_captured_reports_options(options(), f)
}
