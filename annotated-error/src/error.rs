//! The error record

use std::fmt;

use serde_json::{Map, Value};

use crate::{format, stack, ErrorValue};

/// Annotation bag of a record.
pub type Annotations = Map<String, Value>;

/// A structured error record.
///
/// A record carries:
/// - `kind`: a caller-chosen category (empty means uncategorized)
/// - `message`: human-readable description
/// - `annotations`: key/value facts attached after creation
/// - `stacktrace`: the call stack where the record was built
/// - `parent`: the wrapped cause (if any)
///
/// Only the annotations change after construction.
///
/// # Example
///
/// ```rust
/// use annotated_error::Error;
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
/// let err = Error::wrap("upstream", io_err)
///     .with_annotation("host", "db-1")
///     .with_annotation("attempt", 3);
///
/// assert_eq!(err.kind(), "upstream");
/// assert_eq!(err.message(), "read timed out");
/// assert_eq!(err.annotation("attempt"), Some(&serde_json::json!(3)));
/// assert!(err.parent().is_some());
/// ```
pub struct Error {
    kind: String,
    message: String,
    annotations: Annotations,
    stacktrace: String,
    parent: Option<ErrorValue>,
}

impl Error {
    /// Create a root error with the given kind and message.
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            annotations: Annotations::new(),
            stacktrace: stack::capture(),
            parent: None,
        }
    }

    /// Wrap `parent`, copying its text as the message.
    ///
    /// The stacktrace is captured here, at the wrap site, not copied from
    /// the parent.
    #[track_caller]
    pub fn wrap(kind: impl Into<String>, parent: impl Into<ErrorValue>) -> Self {
        let parent = parent.into();
        Self {
            kind: kind.into(),
            message: parent.to_string(),
            annotations: Annotations::new(),
            stacktrace: stack::capture(),
            parent: Some(parent),
        }
    }

    #[track_caller]
    fn lift(foreign: anyhow::Error) -> Self {
        tracing::trace!(error = %foreign, "lifting foreign error into a record");
        Self::wrap("", ErrorValue::Foreign(foreign))
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all annotations
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Get a single annotation
    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.annotations.get(key)
    }

    /// Get the captured stacktrace
    pub fn stacktrace(&self) -> &str {
        &self.stacktrace
    }

    /// Get the wrapped cause (if any)
    pub fn parent(&self) -> Option<&ErrorValue> {
        self.parent.as_ref()
    }

    // =========================================================================
    // Annotation
    // =========================================================================

    /// Set `key` to `value`, replacing any previous value for `key`.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`Error::annotate`].
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.annotate(key, value);
        self
    }
}

/// Annotate an error that may be absent.
///
/// - `None` stays `None`.
/// - One of our records is annotated and handed back.
/// - A foreign error is wrapped in a new record (empty kind, the foreign
///   error as parent, stack captured here) which receives the annotation.
///   The foreign error itself is left untouched, so use the returned value.
///
/// ```rust
/// use annotated_error::{annotate, Error};
///
/// let err = annotate(Some(Error::new("auth", "token expired")), "user", "alice");
/// assert_eq!(err.and_then(|e| e.annotation("user").cloned()), Some("alice".into()));
///
/// assert!(annotate(None::<Error>, "user", "alice").is_none());
/// ```
#[track_caller]
pub fn annotate<E>(err: Option<E>, key: impl Into<String>, value: impl Into<Value>) -> Option<Error>
where
    E: Into<ErrorValue>,
{
    Some(annotate_value(err?.into(), key, value))
}

#[track_caller]
fn annotate_value(err: ErrorValue, key: impl Into<String>, value: impl Into<Value>) -> Error {
    let mut record = match err {
        ErrorValue::Ours(record) => *record,
        ErrorValue::Foreign(foreign) => Error::lift(foreign),
    };
    record.annotate(key, value);
    record
}

/// Annotate the error side of a `Result`.
pub trait ResultExt<T> {
    /// Turn the error into a record (if it is not one yet) and annotate it.
    fn annotate(self, key: impl Into<String>, value: impl Into<Value>) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ErrorValue>,
{
    #[track_caller]
    fn annotate(self, key: impl Into<String>, value: impl Into<Value>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(err) => Err(annotate_value(err.into(), key, value)),
        }
    }
}

// =============================================================================
// Display - plain message, `{:#}` for the full structured form
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            format::write_verbose(self, f)
        } else {
            f.write_str(&self.message)
        }
    }
}

// =============================================================================
// Debug - verbose, multi-line structured form
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::write_verbose(self, f)
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.parent.as_ref().map(ErrorValue::as_dyn)
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Error::wrap("io", err)
    }
}
