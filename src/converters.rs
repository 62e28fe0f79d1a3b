use std::error::Error;
use std::fmt;

use tracing::field::{Field, Visit};

use crate::error::ForwardError;
use crate::exception::CapturedError;
use crate::metadata::Parameters;
use crate::protocol::Severity;

/// Converts a [`tracing::Level`] to a Bugsnag [`Severity`].
///
/// `DEBUG` and `TRACE` have no counterpart and fail with
/// [`ForwardError::UnhandledSeverity`].
pub fn convert_tracing_level(level: &tracing::Level) -> Result<Severity, ForwardError> {
    Severity::try_from(*level)
}

/// The parts of a tracing event a report is built from.
#[derive(Debug, Default)]
pub struct EventFields {
    /// The `message` field.
    pub message: Option<String>,
    /// The first error recorded on the event.
    pub exception: Option<CapturedError>,
    /// Every other field, by name, in recording order.
    pub fields: Vec<(String, String)>,
}

impl EventFields {
    /// Shapes the remaining fields into [`Parameters`].
    ///
    /// Fields named `tab.key` are filed under their own tab. When any field
    /// is named that way the result is triple shaped and the plain fields go
    /// to `tab_name`; otherwise the result is pair shaped. Returns `None` if
    /// there are no fields.
    pub fn parameters(&self, tab_name: &str) -> Option<Parameters> {
        if self.fields.is_empty() {
            return None;
        }

        if self.fields.iter().any(|(name, _)| split_tab(name).is_some()) {
            let triples = self
                .fields
                .iter()
                .map(|(name, value)| match split_tab(name) {
                    Some((tab, key)) => (tab.to_owned(), key.to_owned(), value.clone()),
                    None => (tab_name.to_owned(), name.clone(), value.clone()),
                })
                .collect();
            Some(Parameters::Triples(triples))
        } else {
            Some(Parameters::Pairs(self.fields.clone()))
        }
    }
}

fn split_tab(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
        .filter(|(tab, key)| !tab.is_empty() && !key.is_empty())
}

struct FieldVisitor {
    fields: EventFields,
    strip_ansi_escapes: bool,
}

impl FieldVisitor {
    fn clean(&self, value: String) -> String {
        if self.strip_ansi_escapes {
            strip_ansi_escapes::strip_str(value)
        } else {
            value
        }
    }

    fn record_value(&mut self, field: &Field, value: String) {
        let name = field.name();
        // normalized metadata added by tracing-log
        if name.starts_with("log.") {
            return;
        }
        let value = self.clean(value);
        if name == "message" {
            self.fields.message = Some(value);
        } else {
            self.fields.fields.push((name.to_owned(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.fields.exception.is_none() {
            self.fields.exception = Some(CapturedError::capture(value));
        } else {
            self.record_value(field, value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

/// Extracts the message, error and remaining fields of a tracing event.
///
/// Strings are taken verbatim and other values through their `Debug`
/// output. If `strip_ansi_escapes` is set, escape sequences are removed.
pub fn extract_event_fields(event: &tracing::Event<'_>, strip_ansi_escapes: bool) -> EventFields {
    let mut visitor = FieldVisitor {
        fields: EventFields::default(),
        strip_ansi_escapes,
    };
    event.record(&mut visitor);
    visitor.fields
}
