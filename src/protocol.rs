//! The Bugsnag error reporting payload (version 5).

use std::error::Error;

use serde::Serialize;
use tracing::Level;

use crate::error::ForwardError;
use crate::exception::error_class;
use crate::metadata::Metadata;

/// The payload version this crate speaks.
pub const PAYLOAD_VERSION: &str = "5";

/// Severity of a report, as understood by Bugsnag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The event represents an error.
    Error,
    /// The event represents a warning.
    Warning,
    /// The event is informational.
    Info,
}

impl TryFrom<Level> for Severity {
    type Error = ForwardError;

    fn try_from(level: Level) -> Result<Self, ForwardError> {
        match level {
            Level::ERROR => Ok(Severity::Error),
            Level::WARN => Ok(Severity::Warning),
            Level::INFO => Ok(Severity::Info),
            _ => Err(ForwardError::UnhandledSeverity(level)),
        }
    }
}

/// Identifies the library sending the report.
#[derive(Debug, Clone, Serialize)]
pub struct Notifier {
    /// Library name.
    pub name: &'static str,
    /// Library version.
    pub version: &'static str,
    /// Where to read about the library.
    pub url: &'static str,
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            url: "https://docs.rs/bugsnag-tracing",
        }
    }
}

/// The body POSTed to the notify endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload<'a> {
    /// Project API key.
    pub api_key: &'a str,
    /// Always [`PAYLOAD_VERSION`].
    pub payload_version: &'static str,
    /// The sending library.
    pub notifier: Notifier,
    /// Reported events, one per notify call.
    pub events: Vec<Event<'a>>,
}

/// A single reported error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<'a> {
    /// The error chain, outermost first.
    pub exceptions: Vec<Exception>,
    /// How bad it is.
    pub severity: Severity,
    /// Logged errors are always handled.
    pub unhandled: bool,
    /// Why the severity was chosen.
    pub severity_reason: SeverityReason,
    /// Application state.
    pub app: App<'a>,
    /// Host information.
    pub device: Device,
    /// Tabs of extra key/value data.
    #[serde(rename = "metaData", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Metadata>,
}

/// One link of an error chain, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exception {
    /// Grouping class, usually the Rust type name.
    pub error_class: String,
    /// The `Display` text.
    pub message: String,
    /// Left empty; logged errors carry no frames.
    pub stacktrace: Vec<serde_json::Value>,
    /// Stack trace flavour.
    #[serde(rename = "type")]
    pub ty: &'static str,
}

/// Why an event has its severity.
#[derive(Debug, Clone, Serialize)]
pub struct SeverityReason {
    /// Always `"log"` for this crate.
    #[serde(rename = "type")]
    pub ty: &'static str,
}

/// Application section of an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App<'a> {
    /// Deployment environment, e.g. `production`.
    pub release_stage: &'a str,
    /// Application version, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
}

/// Device section of an event.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Host name, when it can be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Target operating system.
    pub os_name: &'static str,
}

impl Device {
    pub(crate) fn current() -> Self {
        Device {
            hostname: hostname::get()
                .ok()
                .and_then(|name| name.into_string().ok()),
            os_name: std::env::consts::OS,
        }
    }
}

/// Converts an error and its `source()` chain into Bugsnag exceptions.
pub fn exceptions_from_error(err: &(dyn Error + 'static)) -> Vec<Exception> {
    let mut exceptions = vec![exception_from_error(err)];

    let mut source = err.source();
    while let Some(err) = source {
        exceptions.push(exception_from_error(err));
        source = err.source();
    }

    exceptions
}

fn exception_from_error(err: &(dyn Error + 'static)) -> Exception {
    Exception {
        error_class: error_class(err),
        message: err.to_string(),
        stacktrace: Vec::new(),
        ty: "rust",
    }
}

impl<'a> Event<'a> {
    /// Builds a handled, log-originated event.
    pub fn new(
        err: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&'a Metadata>,
        app: App<'a>,
        device: Device,
    ) -> Self {
        Event {
            exceptions: exceptions_from_error(err),
            severity,
            unhandled: false,
            severity_reason: SeverityReason { ty: "log" },
            app,
            device,
            metadata,
        }
    }
}
