use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use ureq::Agent;
use url::Url;

use crate::error::{ConfigError, NotifyError};
use crate::metadata::Metadata;
use crate::options::BugsnagOptions;
use crate::protocol::{App, Device, Event, Notifier, Payload, Severity, PAYLOAD_VERSION};

/// Where reports go unless an endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://notify.bugsnag.com";

/// Delivers a single report to a crash reporting service.
///
/// Implementations must be safe to call from whatever threads dispatch
/// tracing events.
pub trait Notify: Send + Sync {
    /// Reports `error` with the given severity and optional metadata.
    fn notify(
        &self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&Metadata>,
    ) -> Result<(), NotifyError>;
}

impl<T: Notify + ?Sized> Notify for Arc<T> {
    fn notify(
        &self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&Metadata>,
    ) -> Result<(), NotifyError> {
        (**self).notify(error, severity, metadata)
    }
}

impl<T: Notify + ?Sized> Notify for Box<T> {
    fn notify(
        &self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&Metadata>,
    ) -> Result<(), NotifyError> {
        (**self).notify(error, severity, metadata)
    }
}

/// A blocking client for the Bugsnag notify API.
///
/// Every call performs exactly one HTTP request on the calling thread.
/// Nothing is queued or retried.
#[derive(Debug)]
pub struct BugsnagClient {
    api_key: String,
    release_stage: String,
    app_version: Option<String>,
    endpoint: Url,
    device: Device,
    agent: Agent,
}

impl BugsnagClient {
    /// Creates a client from validated options.
    pub fn new(options: &BugsnagOptions) -> Result<Self, ConfigError> {
        options.validate()?;

        let api_key = options.api_key.trim();
        if !is_valid_api_key(api_key) {
            return Err(ConfigError::InvalidApiKey);
        }

        let endpoint = match options.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => {
                Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                    endpoint: endpoint.to_owned(),
                    source,
                })?
            }
            _ => Url::parse(DEFAULT_ENDPOINT).map_err(|source| ConfigError::InvalidEndpoint {
                endpoint: DEFAULT_ENDPOINT.to_owned(),
                source,
            })?,
        };

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build();

        Ok(BugsnagClient {
            api_key: api_key.to_owned(),
            release_stage: options.release_stage.trim().to_owned(),
            app_version: options.app_version.clone(),
            endpoint,
            device: Device::current(),
            agent,
        })
    }

    /// The endpoint reports are POSTed to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The release stage every report is tagged with.
    pub fn release_stage(&self) -> &str {
        &self.release_stage
    }

    /// Builds the payload for a single report without sending it.
    pub fn payload<'a>(
        &'a self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&'a Metadata>,
    ) -> Payload<'a> {
        let app = App {
            release_stage: &self.release_stage,
            version: self.app_version.as_deref(),
        };

        Payload {
            api_key: &self.api_key,
            payload_version: PAYLOAD_VERSION,
            notifier: Notifier::default(),
            events: vec![Event::new(error, severity, metadata, app, self.device.clone())],
        }
    }
}

impl Notify for BugsnagClient {
    fn notify(
        &self,
        error: &(dyn Error + 'static),
        severity: Severity,
        metadata: Option<&Metadata>,
    ) -> Result<(), NotifyError> {
        let body = serde_json::to_value(self.payload(error, severity, metadata))?;
        let sent_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        self.agent
            .post(self.endpoint.as_str())
            .set("Bugsnag-Api-Key", &self.api_key)
            .set("Bugsnag-Payload-Version", PAYLOAD_VERSION)
            .set("Bugsnag-Sent-At", &sent_at)
            .send_json(body)?;

        Ok(())
    }
}

fn is_valid_api_key(api_key: &str) -> bool {
    api_key.len() == 32 && api_key.chars().all(|c| c.is_ascii_hexdigit())
}
