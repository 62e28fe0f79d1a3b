mod common;

use std::error::Error;

use bugsnag_tracing::{BugsnagOptions, Severity};
use common::{options, with_captured_reports, with_captured_reports_options};

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct ConnectError;

#[derive(Debug, thiserror::Error)]
#[error("failed to load profile")]
struct ProfileError(#[source] ConnectError);

#[test]
fn test_message_events() {
    let reports = with_captured_reports(|| {
        tracing::error!("Shit's on fire yo");
        tracing::warn!("Running low on disk");
        tracing::info!("Cache warmed up in {}ms", 12);
        tracing::debug!("Not reported");
    });

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].error_class, "LoggedError");
    assert_eq!(reports[0].message, "Shit's on fire yo");
    assert_eq!(reports[0].severity, Severity::Error);
    assert_eq!(reports[1].error_class, "LoggedWarning");
    assert_eq!(reports[1].severity, Severity::Warning);
    assert_eq!(reports[2].error_class, "LoggedInfo");
    assert_eq!(reports[2].message, "Cache warmed up in 12ms");
    assert!(reports.iter().all(|r| r.metadata.is_none()));
}

#[test]
fn test_error_events() {
    let reports = with_captured_reports(|| {
        let err = ProfileError(ConnectError);
        tracing::error!(error = &err as &(dyn Error + 'static), "Login failed");
    });

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.error_class, "ProfileError");
    assert_eq!(report.message, "failed to load profile");
    assert_eq!(report.sources, ["connection refused"]);
    assert_eq!(report.severity, Severity::Error);
}

#[test]
fn test_empty_events_are_dropped() {
    let reports = with_captured_reports(|| {
        tracing::error!(user = "42");
        tracing::error!("   ");
    });
    assert!(reports.is_empty());
}

#[test]
fn test_fields_become_metadata() {
    let reports = with_captured_reports(|| {
        tracing::warn!(user = "42", attempts = 3, "Password reset requested twice");
    });

    let metadata = reports[0].metadata.as_ref().unwrap();
    assert_eq!(metadata.tab_names().collect::<Vec<_>>(), ["Extra Information"]);
    let tab = metadata.tab("Extra Information").unwrap();
    assert_eq!(tab["user"], "42");
    assert_eq!(tab["attempts"], "3");
}

#[test]
fn test_metadata_tab_override() {
    let options = BugsnagOptions {
        metadata_tab: Some("Custom".into()),
        ..options()
    };
    let reports = with_captured_reports_options(options, || {
        tracing::error!(k1 = "v1", k2 = "v2", "boom");
    });

    let metadata = reports[0].metadata.as_ref().unwrap();
    assert_eq!(metadata.tab_names().collect::<Vec<_>>(), ["Custom"]);
    assert_eq!(metadata.tab("Custom").unwrap()["k2"], "v2");
}

#[test]
fn test_tabbed_fields() {
    let options = BugsnagOptions {
        metadata_tab: Some("Custom".into()),
        ..options()
    };
    let reports = with_captured_reports_options(options, || {
        tracing::error!(request.id = "abc", user.id = 7, "boom");
    });

    let metadata = reports[0].metadata.as_ref().unwrap();
    assert_eq!(metadata.tab_names().collect::<Vec<_>>(), ["request", "user"]);
    assert_eq!(metadata.tab("request").unwrap()["id"], "abc");
    assert_eq!(metadata.tab("user").unwrap()["id"], "7");
}

#[test]
fn test_event_filter() {
    let options = BugsnagOptions {
        filter: "error,payments=warn".into(),
        ..options()
    };
    let reports = with_captured_reports_options(options, || {
        tracing::warn!(target: "payments::stripe", "Card declined");
        tracing::warn!(target: "http", "Slow request");
        tracing::error!(target: "http", "Request failed");
    });

    let messages: Vec<_> = reports.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["Card declined", "Request failed"]);
}

#[test]
fn test_debug_filter_reports_failure_not_panic() {
    let options = BugsnagOptions {
        filter: "debug".into(),
        ..options()
    };
    let reports = with_captured_reports_options(options, || {
        tracing::debug!("Has no severity");
        tracing::info!("Has a severity");
    });

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message, "Has a severity");
}

#[test]
fn test_ansi_escapes() {
    let reports = with_captured_reports(|| {
        tracing::error!(status = "\x1b[31mdown\x1b[0m", "\x1b[1mDatabase\x1b[0m unreachable");
    });
    assert_eq!(reports[0].message, "Database unreachable");
    assert_eq!(
        reports[0].metadata.as_ref().unwrap().tab("Extra Information").unwrap()["status"],
        "down"
    );

    let options = BugsnagOptions {
        strip_ansi_escapes: false,
        ..options()
    };
    let reports = with_captured_reports_options(options, || {
        tracing::error!("\x1b[1mDatabase\x1b[0m unreachable");
    });
    assert_eq!(reports[0].message, "\x1b[1mDatabase\x1b[0m unreachable");
}
