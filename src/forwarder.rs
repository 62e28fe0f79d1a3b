use std::error::Error;

use tracing::Level;

use crate::client::Notify;
use crate::error::ForwardError;
use crate::exception::SyntheticException;
use crate::metadata::{metadata_from_parameters, Parameters, DEFAULT_TAB_NAME};
use crate::protocol::Severity;

/// A log record as seen by the [`Forwarder`].
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    /// Level the record was logged at.
    pub level: Level,
    /// The formatted message, if any.
    pub message: Option<&'a str>,
    /// An error attached to the record.
    pub exception: Option<&'a (dyn Error + 'static)>,
    /// Extra key/value data.
    pub parameters: Option<&'a Parameters>,
}

impl<'a> LogEvent<'a> {
    /// Creates an event with nothing attached.
    pub fn new(level: Level) -> Self {
        LogEvent {
            level,
            message: None,
            exception: None,
            parameters: None,
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// Attaches an error.
    pub fn with_exception(mut self, exception: &'a (dyn Error + 'static)) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Attaches parameters.
    pub fn with_parameters(mut self, parameters: &'a Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Turns log events into reports and hands them to a [`Notify`] client.
///
/// The client is owned for the forwarder's whole life and shared by every
/// thread that writes through it.
#[derive(Debug)]
pub struct Forwarder<C> {
    client: C,
    tab_name: String,
}

impl<C: Notify> Forwarder<C> {
    /// Creates a forwarder around an already constructed client.
    ///
    /// A blank `metadata_tab` falls back to `"Extra Information"`.
    pub fn new(client: C, metadata_tab: Option<&str>) -> Self {
        let tab_name = match metadata_tab {
            Some(tab) if !tab.trim().is_empty() => tab,
            _ => DEFAULT_TAB_NAME,
        };
        Forwarder {
            client,
            tab_name: tab_name.to_owned(),
        }
    }

    /// The client reports are sent through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The tab pair-shaped parameters are filed under.
    pub fn tab_name(&self) -> &str {
        &self.tab_name
    }

    /// Reports a single log event.
    ///
    /// An attached error is reported as is. Otherwise a non-blank message is
    /// wrapped in a [`SyntheticException`] matching the event's severity.
    /// Events with neither are dropped without contacting the client.
    pub fn write(&self, event: &LogEvent<'_>) -> Result<(), ForwardError> {
        let metadata = event
            .parameters
            .and_then(|parameters| metadata_from_parameters(parameters, &self.tab_name));

        if let Some(exception) = event.exception {
            let severity = Severity::try_from(event.level)?;
            self.client.notify(exception, severity, metadata.as_ref())?;
        } else if let Some(message) = event.message.filter(|m| !m.trim().is_empty()) {
            let exception = SyntheticException::from_level(event.level, message)?;
            self.client
                .notify(&exception, exception.severity(), metadata.as_ref())?;
        }

        Ok(())
    }
}
