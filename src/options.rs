use serde::Deserialize;
use tracing_subscriber::filter::Targets;

use crate::error::ConfigError;
use crate::metadata::DEFAULT_TAB_NAME;

/// Options for [`BugsnagLayer`](crate::BugsnagLayer) and its client.
///
/// `api_key` and `release_stage` are required; everything else has a
/// default. The struct deserializes with every field optional, so it can be
/// embedded in a host application's config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BugsnagOptions {
    /// The project's notifier API key.
    pub api_key: String,
    /// Deployment environment reports are tagged with.
    pub release_stage: String,
    /// Tab that key/value event fields are filed under.
    /// Defaults to `"Extra Information"`.
    pub metadata_tab: Option<String>,
    /// Notify endpoint, for on-premise installations.
    pub endpoint: Option<String>,
    /// Application version reported with every event.
    pub app_version: Option<String>,
    /// Directive selecting which events are reported (defaults to `info`).
    pub filter: String,
    /// If set to `true`, ansi escape sequences will be stripped from
    /// messages and field values (defaults to `true`).
    pub strip_ansi_escapes: bool,
    /// Request timeout in seconds (defaults to 10).
    pub timeout_secs: u64,
    /// Print diagnostics about dropped or failed reports to stderr.
    pub debug: bool,
}

impl Default for BugsnagOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            release_stage: String::new(),
            metadata_tab: None,
            endpoint: None,
            app_version: None,
            filter: "info".to_owned(),
            strip_ansi_escapes: true,
            timeout_secs: 10,
            debug: false,
        }
    }
}

impl BugsnagOptions {
    /// Creates options with the two required settings.
    pub fn new(api_key: impl Into<String>, release_stage: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            release_stage: release_stage.into(),
            ..Default::default()
        }
    }

    /// Reads options from `BUGSNAG_*` environment variables.
    ///
    /// Unset variables keep their defaults; call [`validate`](Self::validate)
    /// (or build a layer) to find out whether anything required is missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(api_key) = lookup("BUGSNAG_API_KEY") {
            options.api_key = api_key;
        }
        if let Some(release_stage) = lookup("BUGSNAG_RELEASE_STAGE") {
            options.release_stage = release_stage;
        }
        options.metadata_tab = lookup("BUGSNAG_METADATA_TAB");
        options.endpoint = lookup("BUGSNAG_ENDPOINT");
        options.app_version = lookup("BUGSNAG_APP_VERSION");
        options
    }

    /// Checks the required settings and the event filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.release_stage.trim().is_empty() {
            return Err(ConfigError::MissingReleaseStage);
        }
        self.event_filter()?;
        Ok(())
    }

    /// The tab pair-shaped parameters are filed under.
    pub fn tab_name(&self) -> &str {
        match self.metadata_tab.as_deref() {
            Some(tab) if !tab.trim().is_empty() => tab,
            _ => DEFAULT_TAB_NAME,
        }
    }

    pub(crate) fn event_filter(&self) -> Result<Targets, ConfigError> {
        self.filter
            .parse()
            .map_err(|source| ConfigError::InvalidFilter {
                filter: self.filter.clone(),
                source,
            })
    }
}
