//! The error-or-foreign-error tag accepted by `wrap` and `annotate`.

use std::fmt;

use crate::chain::Joined;
use crate::Error;

/// An error handed to this crate: either one of our records or any other
/// error, kept opaque.
///
/// Absence is modelled with `Option<ErrorValue>`, not as a variant.
pub enum ErrorValue {
    /// A record built by this crate.
    Ours(Box<Error>),
    /// An error from elsewhere.
    Foreign(anyhow::Error),
}

impl ErrorValue {
    /// Tag an arbitrary error as foreign.
    pub fn foreign<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ErrorValue::Foreign(anyhow::Error::new(err))
    }

    /// Our record, if this is one.
    pub fn as_record(&self) -> Option<&Error> {
        match self {
            ErrorValue::Ours(err) => Some(err),
            ErrorValue::Foreign(_) => None,
        }
    }

    /// View as a standard error, for chain inspection.
    pub fn as_dyn(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            ErrorValue::Ours(err) => &**err,
            ErrorValue::Foreign(err) => err.as_ref(),
        }
    }
}

impl From<Error> for ErrorValue {
    fn from(err: Error) -> Self {
        ErrorValue::Ours(Box::new(err))
    }
}

/// Records that went through `anyhow` come back as ours.
impl From<anyhow::Error> for ErrorValue {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(ours) => ErrorValue::Ours(Box::new(ours)),
            Err(foreign) => ErrorValue::Foreign(foreign),
        }
    }
}

impl From<std::io::Error> for ErrorValue {
    fn from(err: std::io::Error) -> Self {
        ErrorValue::foreign(err)
    }
}

impl From<Joined> for ErrorValue {
    fn from(err: Joined) -> Self {
        ErrorValue::foreign(err)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorValue::Ours(err) => fmt::Display::fmt(err, f),
            ErrorValue::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorValue::Ours(err) => f.debug_tuple("Ours").field(err).finish(),
            ErrorValue::Foreign(err) => f.debug_tuple("Foreign").field(err).finish(),
        }
    }
}
