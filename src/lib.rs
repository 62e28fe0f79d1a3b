//! Reports `tracing` events to Bugsnag.
//!
//! [`BugsnagLayer`] turns events into Bugsnag error reports. An event that
//! records an error (`error = &err as &dyn Error`) is reported as that error,
//! including its chain of sources. An event with only a message is reported as
//! a `LoggedError`, `LoggedWarning` or `LoggedInfo`, matching its level. All other
//! fields are attached as metadata: plain fields go to the "Extra Information"
//! tab (or the configured `metadata_tab`), and fields named `tab.key` go to a tab
//! of their own.
//!
//! Only `ERROR`, `WARN` and `INFO` have Bugsnag severities. By default the
//! layer reports everything at `info` and above.
//!
//! # Examples
//!
//! ```no_run
//! use tracing_subscriber::prelude::*;
//!
//! let options = bugsnag_tracing::BugsnagOptions::new(
//!     "0123456789abcdef0123456789abcdef",
//!     "production",
//! );
//! let layer = bugsnag_tracing::layer(options).expect("invalid bugsnag options");
//! tracing_subscriber::registry().with(layer).init();
//!
//! tracing::warn!(user.id = 42, "Password reset requested twice");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod client;
mod converters;
mod error;
mod exception;
mod forwarder;
mod layer;
mod metadata;
mod options;
pub mod protocol;

pub use client::{BugsnagClient, Notify, DEFAULT_ENDPOINT};
pub use converters::{convert_tracing_level, extract_event_fields, EventFields};
pub use error::{ConfigError, ForwardError, NotifyError};
pub use exception::{error_class, CapturedError, SyntheticException};
pub use forwarder::{Forwarder, LogEvent};
pub use layer::BugsnagLayer;
pub use metadata::{
    metadata_from_pairs, metadata_from_parameters, metadata_from_triples, Metadata, Parameters,
    DEFAULT_TAB_NAME,
};
pub use options::BugsnagOptions;
pub use protocol::Severity;

/// Creates a [`BugsnagLayer`] reporting through a [`BugsnagClient`].
///
/// Fails if a required option is missing or the client rejects the API key
/// or endpoint.
pub fn layer(options: BugsnagOptions) -> Result<BugsnagLayer, ConfigError> {
    BugsnagLayer::new(options)
}
