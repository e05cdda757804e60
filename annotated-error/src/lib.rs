//! # annotated-error
//!
//! Structured errors that carry their own context.
//!
//! ## Design Philosophy
//!
//! - **Kind**: a caller-chosen category string (empty means uncategorized)
//! - **Message**: what went wrong, copied from the cause when wrapping
//! - **Annotations**: key/value facts attached as the error travels up
//! - **Stacktrace**: captured where the record is built, starting at the caller
//! - **Parent**: the wrapped cause, exposed through `std::error::Error::source`
//!
//! ## Usage
//!
//! ```rust
//! use annotated_error::{annotate, Error, ResultExt};
//!
//! fn load(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path)
//!         .annotate("path", path)
//! }
//!
//! fn handle() -> Result<(), Error> {
//!     let _config = load("/nonexistent/app.toml")
//!         .map_err(|e| Error::wrap("config", e).with_annotation("stage", "startup"))?;
//!     Ok(())
//! }
//!
//! let err = handle().unwrap_err();
//! assert_eq!(err.kind(), "config");
//! assert!(err.parent().is_some());
//!
//! let err = annotate(Some(err), "request_id", "r-17");
//! assert!(err.is_some());
//! ```
//!
//! ## Rendering
//!
//! - `{}` prints the message, `{:#}` and `{:?}` the full structured form
//! - [`Error::display`] selects a [`Format`] explicitly
//! - [`Error::to_structured`] and the `Serialize` impl produce a `serde_json`
//!   tree for log sinks, [`Error::as_field`] hands it to `tracing` as compact
//!   JSON text
//! - With the `valuable` feature, `Error::to_tree` gives a `valuable` view
//!   that `tracing` (under `--cfg tracing_unstable`) records as a nested object
//!
//! ## Principles
//!
//! - Wrapping and annotating never lose the original text: it is copied into
//!   the message or kept as the parent
//! - Annotation values are `serde_json::Value`, so every record serializes
//! - Chain inspection goes through `source()`; see [`chain`]

pub mod chain;
mod error;
mod format;
mod stack;
#[cfg(feature = "valuable")]
mod tree;
mod value;

pub use chain::Joined;
pub use error::{annotate, Annotations, Error, ResultExt};
pub use format::{Format, Formatted, Structured};
pub use serde_json::Value;
pub use stack::MAX_FRAMES;
#[cfg(feature = "valuable")]
pub use tree::Tree;
pub use value::ErrorValue;

/// Result type alias using the annotated Error
pub type Result<T> = std::result::Result<T, Error>;
