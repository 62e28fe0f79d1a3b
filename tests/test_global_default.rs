use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};

use bugsnag_tracing::{BugsnagLayer, BugsnagOptions, Metadata, Notify, NotifyError, Severity};
use tracing_subscriber::prelude::*;

static NOTIFY_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Logs from inside `notify`, the way an HTTP stack would.
struct ChattyClient;

impl Notify for ChattyClient {
    fn notify(
        &self,
        _: &(dyn Error + 'static),
        _: Severity,
        _: Option<&Metadata>,
    ) -> Result<(), NotifyError> {
        // bounded so a regression fails the assertion instead of the stack
        if NOTIFY_CALLS.fetch_add(1, Ordering::SeqCst) < 5 {
            tracing::warn!("connection pool exhausted");
        }
        Ok(())
    }
}

#[test]
fn logging_while_notifying_is_not_reported() {
    let layer = BugsnagLayer::with_client(ChattyClient, &BugsnagOptions::new("key", "test"))
        .unwrap();
    tracing_subscriber::registry().with(layer).init();

    tracing::error!("outer");
    assert_eq!(NOTIFY_CALLS.load(Ordering::SeqCst), 1);

    tracing::error!("second");
    assert_eq!(NOTIFY_CALLS.load(Ordering::SeqCst), 2);
}
