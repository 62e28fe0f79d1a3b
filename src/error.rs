use thiserror::Error;

/// Errors raised while validating [`BugsnagOptions`](crate::BugsnagOptions)
/// or constructing the reporting client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `api_key` is empty or only whitespace.
    #[error("`api_key` must be set")]
    MissingApiKey,
    /// `release_stage` is empty or only whitespace.
    #[error("`release_stage` must be set")]
    MissingReleaseStage,
    /// The API key is not a 32 digit hexadecimal string.
    #[error("invalid API key: expected 32 hexadecimal digits")]
    InvalidApiKey,
    /// The notify endpoint could not be parsed.
    #[error("invalid endpoint `{endpoint}`")]
    InvalidEndpoint {
        /// The rejected value.
        endpoint: String,
        /// Why it was rejected.
        #[source]
        source: url::ParseError,
    },
    /// The event filter directive could not be parsed.
    #[error("invalid event filter `{filter}`")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Why it was rejected.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Errors raised while forwarding a single log event.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// A metadata derivation function was handed no parameter collection at all.
    #[error("parameter collection must not be missing")]
    MissingParameters,
    /// The event's level has no Bugsnag severity.
    #[error("unhandled severity for level {0}")]
    UnhandledSeverity(tracing::Level),
    /// The reporting client failed to deliver the report.
    #[error("failed to notify bugsnag: {0}")]
    Notify(#[from] NotifyError),
}

/// Errors raised by a [`Notify`](crate::Notify) implementation.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The payload could not be encoded as JSON.
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[source] Box<ureq::Transport>),
    /// The endpoint answered with a non-success status.
    #[error("notify endpoint responded with status {0}")]
    Status(u16),
}

impl From<ureq::Error> for NotifyError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => NotifyError::Status(code),
            ureq::Error::Transport(transport) => NotifyError::Transport(Box::new(transport)),
        }
    }
}
