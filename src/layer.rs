use std::cell::Cell;

use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{layer::Context, Layer};

use crate::client::{BugsnagClient, Notify};
use crate::converters::extract_event_fields;
use crate::error::{ConfigError, ForwardError};
use crate::forwarder::{Forwarder, LogEvent};
use crate::options::BugsnagOptions;

thread_local! {
    static NOTIFYING: Cell<bool> = const { Cell::new(false) };
}

/// Provides a tracing layer that reports events to Bugsnag.
///
/// The client is built when the layer is, so a bad key or endpoint is
/// reported at setup rather than on the first event.
#[derive(Debug)]
pub struct BugsnagLayer<C = BugsnagClient> {
    forwarder: Forwarder<C>,
    filter: Targets,
    strip_ansi_escapes: bool,
    debug: bool,
}

impl BugsnagLayer<BugsnagClient> {
    /// Creates a layer reporting through a [`BugsnagClient`].
    pub fn new(options: BugsnagOptions) -> Result<Self, ConfigError> {
        let client = BugsnagClient::new(&options)?;
        Self::with_client(client, &options)
    }
}

impl<C: Notify> BugsnagLayer<C> {
    /// Creates a layer reporting through a custom client.
    pub fn with_client(client: C, options: &BugsnagOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(BugsnagLayer {
            forwarder: Forwarder::new(client, Some(options.tab_name())),
            filter: options.event_filter()?,
            strip_ansi_escapes: options.strip_ansi_escapes,
            debug: options.debug,
        })
    }

    /// The forwarder events are written through.
    pub fn forwarder(&self) -> &Forwarder<C> {
        &self.forwarder
    }

    fn report(&self, event: &Event<'_>) -> Result<(), ForwardError> {
        let fields = extract_event_fields(event, self.strip_ansi_escapes);
        let parameters = fields.parameters(self.forwarder.tab_name());

        let mut log_event = LogEvent::new(*event.metadata().level());
        log_event.message = fields.message.as_deref();
        log_event.parameters = parameters.as_ref();
        if let Some(exception) = &fields.exception {
            log_event = log_event.with_exception(exception);
        }

        let _guard = NotifyGuard::enter();
        self.forwarder.write(&log_event)
    }
}

impl<S: Subscriber, C: Notify + 'static> Layer<S> for BugsnagLayer<C> {
    /// Notifies this layer that an event has occurred.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.filter.would_enable(metadata.target(), metadata.level()) {
            return;
        }
        if NOTIFYING.with(Cell::get) {
            bugsnag_debug!(
                self.debug,
                "skipping event from `{}` raised while notifying",
                metadata.target()
            );
            return;
        }

        if let Err(err) = self.report(event) {
            eprintln!(
                "[bugsnag] Tracing event from `{}` was not reported: {}",
                metadata.target(),
                err
            );
        }
    }
}

/// Marks the current thread as busy notifying until dropped.
struct NotifyGuard;

impl NotifyGuard {
    fn enter() -> Self {
        NOTIFYING.with(|flag| flag.set(true));
        NotifyGuard
    }
}

impl Drop for NotifyGuard {
    fn drop(&mut self) {
        NOTIFYING.with(|flag| flag.set(false));
    }
}
