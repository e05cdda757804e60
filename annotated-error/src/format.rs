//! Structured and textual renderings of a record.
//!
//! The structured form is a `serde_json` object:
//!
//! | key           | content                                   | omitted when |
//! |---------------|-------------------------------------------|--------------|
//! | `kind`        | the category                              | empty        |
//! | `message`     | the message                               | never        |
//! | `annotations` | the annotation object, values as-is       | empty        |
//! | `stacktrace`  | the captured stack                        | empty        |
//! | `parent`      | the parent's text, one level only         | no parent    |

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Error;

/// Textual rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// The message verbatim.
    #[default]
    Plain,
    /// The message quoted and escaped.
    Quoted,
    /// The whole structured form, pretty-printed.
    Verbose,
}

impl Error {
    /// Build the structured form of this record.
    ///
    /// ```rust
    /// use annotated_error::Error;
    ///
    /// let err = Error::new("server-side", "an internal server error occurred")
    ///     .with_annotation("current_user", "demo-user@example.com");
    /// let tree = err.to_structured();
    ///
    /// assert_eq!(tree["kind"], "server-side");
    /// assert_eq!(tree["annotations"]["current_user"], "demo-user@example.com");
    /// assert!(tree.get("parent").is_none());
    /// ```
    pub fn to_structured(&self) -> Value {
        let mut map = Map::new();
        if !self.kind().is_empty() {
            map.insert("kind".to_string(), Value::from(self.kind()));
        }
        map.insert("message".to_string(), Value::from(self.message()));
        if !self.annotations().is_empty() {
            map.insert(
                "annotations".to_string(),
                Value::Object(self.annotations().clone()),
            );
        }
        if !self.stacktrace().is_empty() {
            map.insert("stacktrace".to_string(), Value::from(self.stacktrace()));
        }
        if let Some(parent) = self.parent() {
            map.insert("parent".to_string(), Value::from(parent.to_string()));
        }
        Value::Object(map)
    }

    /// Render this record in the given textual mode.
    pub fn display(&self, format: Format) -> Formatted<'_> {
        Formatted { error: self, format }
    }

    /// Structured view for log sinks and serde.
    pub fn structured(&self) -> Structured<'_> {
        Structured(self)
    }

    /// The record as a `tracing` field value.
    ///
    /// The field renders as the structured form in compact JSON:
    ///
    /// ```rust
    /// use annotated_error::Error;
    ///
    /// let err = Error::new("server-side", "an internal server error occurred");
    /// tracing::error!(err = err.as_field(), "request failed");
    /// ```
    ///
    /// For a nested object instead of JSON text, enable the `valuable`
    /// feature and log `Error::to_tree` through `tracing::field::valuable`.
    pub fn as_field(&self) -> tracing::field::DisplayValue<Structured<'_>> {
        tracing::field::display(self.structured())
    }
}

/// Writes the pretty structured form. Encoding cannot fail for
/// `serde_json::Value`, so an error here only comes from the formatter.
pub(crate) fn write_verbose(err: &Error, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = serde_json::to_string_pretty(&err.to_structured()).map_err(|_| fmt::Error)?;
    f.write_str(&text)
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_structured().serialize(serializer)
    }
}

/// A record rendered in one [`Format`].
pub struct Formatted<'a> {
    error: &'a Error,
    format: Format,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Format::Plain => f.write_str(self.error.message()),
            Format::Quoted => write!(f, "{:?}", self.error.message()),
            Format::Verbose => write_verbose(self.error, f),
        }
    }
}

/// Structured view of a record: serializes to the structured form and
/// displays as compact JSON.
#[derive(Clone, Copy)]
pub struct Structured<'a>(&'a Error);

impl Serialize for Structured<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl fmt::Display for Structured<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `Value`'s Display is its compact JSON encoding.
        fmt::Display::fmt(&self.0.to_structured(), f)
    }
}

impl fmt::Debug for Structured<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
