use std::error::Error;
use std::fmt;

use tracing::Level;

use crate::error::ForwardError;
use crate::protocol::Severity;

/// An error-like stand-in for log events that carry a message but no error.
///
/// The variant always matches the severity the event was reported with, and
/// the message is the only payload: there is no source and no stack trace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntheticException {
    /// Built for events at [`Severity::Error`].
    #[error("{0}")]
    Error(String),
    /// Built for events at [`Severity::Warning`].
    #[error("{0}")]
    Warning(String),
    /// Built for events at [`Severity::Info`].
    #[error("{0}")]
    Info(String),
}

impl SyntheticException {
    /// Creates the variant matching `severity`.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        let message = message.into();
        match severity {
            Severity::Error => SyntheticException::Error(message),
            Severity::Warning => SyntheticException::Warning(message),
            Severity::Info => SyntheticException::Info(message),
        }
    }

    /// Creates the variant for a tracing level.
    ///
    /// Fails with [`ForwardError::UnhandledSeverity`] for `DEBUG` and `TRACE`,
    /// which have no Bugsnag counterpart.
    pub fn from_level(level: Level, message: impl Into<String>) -> Result<Self, ForwardError> {
        let severity = Severity::try_from(level)?;
        Ok(Self::new(severity, message))
    }

    /// The severity this exception stands for.
    pub fn severity(&self) -> Severity {
        match self {
            SyntheticException::Error(_) => Severity::Error,
            SyntheticException::Warning(_) => Severity::Warning,
            SyntheticException::Info(_) => Severity::Info,
        }
    }

    /// The logged message.
    pub fn message(&self) -> &str {
        match self {
            SyntheticException::Error(message)
            | SyntheticException::Warning(message)
            | SyntheticException::Info(message) => message,
        }
    }

    /// The error class reported to Bugsnag.
    pub fn error_class(&self) -> &'static str {
        match self {
            SyntheticException::Error(_) => "LoggedError",
            SyntheticException::Warning(_) => "LoggedWarning",
            SyntheticException::Info(_) => "LoggedInfo",
        }
    }
}

/// An owned copy of an error recorded on a tracing event.
///
/// Tracing only lends errors to a visitor for the duration of the visit, so
/// the type name, message and the whole `source()` chain are copied out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    ty: String,
    message: String,
    source: Option<Box<CapturedError>>,
}

impl CapturedError {
    /// Copies `err` and its chain of sources.
    pub fn capture(err: &(dyn Error + 'static)) -> Self {
        CapturedError {
            ty: error_class(err),
            message: err.to_string(),
            source: err.source().map(|source| Box::new(Self::capture(source))),
        }
    }

    /// The type name of the original error.
    pub fn type_name(&self) -> &str {
        &self.ty
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for CapturedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|source| source as &(dyn Error + 'static))
    }
}

/// Returns the error class Bugsnag groups `err` under.
///
/// Synthetic and captured errors know their class. For anything else the
/// type name is parsed from the `Debug` output.
pub fn error_class(err: &(dyn Error + 'static)) -> String {
    if let Some(synthetic) = err.downcast_ref::<SyntheticException>() {
        synthetic.error_class().to_owned()
    } else if let Some(captured) = err.downcast_ref::<CapturedError>() {
        captured.ty.clone()
    } else {
        parse_type_from_debug(err)
    }
}

/// Parse the type name from `Debug` output.
fn parse_type_from_debug<D: fmt::Debug + ?Sized>(d: &D) -> String {
    let dbg = format!("{:#?}", d);

    dbg.split(&[' ', '(', '{', '\r', '\n'][..])
        .next()
        .unwrap_or(&dbg)
        .trim()
        .to_owned()
}
