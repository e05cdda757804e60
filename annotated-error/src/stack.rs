//! Stack capture for error records.
//!
//! Each record gets its own capture at the point it was built. The rendering
//! starts at the caller of the public constructor: the frame matching
//! [`Location::caller`] is located in the symbolized backtrace, so the
//! library's own frames never show up at the top.

use std::fmt::Write as _;
use std::panic::Location;
use std::path::PathBuf;

/// Maximum number of frames kept in a rendered stacktrace.
pub const MAX_FRAMES: usize = 32;

/// Frames inspected while looking for the caller. Bounds the unwinding work.
#[cfg(feature = "backtrace")]
const MAX_SCAN: usize = MAX_FRAMES + 64;

/// Symbols that belong to capture and construction internals.
const INTERNAL_SYMBOLS: &[&str] = &[
    "annotated_error::stack::",
    "annotated_error::error::Error::new",
    "annotated_error::error::Error::wrap",
    "annotated_error::error::Error::lift",
    "annotated_error::error::annotate",
    "annotated_error::error::ResultExt",
    "annotated_error::error::Error as core::convert::From",
];

/// One resolved symbol of the call stack.
#[derive(Debug, Clone)]
struct Frame {
    function: String,
    file: Option<PathBuf>,
    line: Option<u32>,
}

impl Frame {
    fn is_internal(&self) -> bool {
        self.function.starts_with("backtrace::")
            || self.function.starts_with("<backtrace::")
            || INTERNAL_SYMBOLS.iter().any(|s| self.function.contains(s))
    }

    fn is_at(&self, location: &Location<'_>) -> bool {
        self.line == Some(location.line())
            && self
                .file
                .as_deref()
                .is_some_and(|file| file.ends_with(location.file()))
    }
}

/// Capture the stack of whoever called the `#[track_caller]` chain that
/// ends here.
#[track_caller]
pub(crate) fn capture() -> String {
    let caller = Location::caller();
    let frames = resolve();

    let start = match frames.iter().position(|f| f.is_at(caller)) {
        Some(idx) => idx,
        None => {
            tracing::trace!(
                file = caller.file(),
                line = caller.line(),
                "caller frame not found, skipping internal frames"
            );
            caller_after_internals(&frames)
        }
    };

    if start < frames.len() {
        render(&frames[start..])
    } else {
        render(&[Frame {
            function: "<unknown>".to_string(),
            file: Some(PathBuf::from(caller.file())),
            line: Some(caller.line()),
        }])
    }
}

/// Index of the first frame below the outermost internal one. Unwinder
/// shims above the internals carry no recognisable prefix, so the search
/// runs from the bottom.
fn caller_after_internals(frames: &[Frame]) -> usize {
    frames
        .iter()
        .rposition(Frame::is_internal)
        .map_or(0, |idx| idx + 1)
}

#[cfg(feature = "backtrace")]
fn resolve() -> Vec<Frame> {
    let mut frames = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            frames.push(Frame {
                function: symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_else(|| "<unknown>".to_string()),
                file: symbol.filename().map(PathBuf::from),
                line: symbol.lineno(),
            });
        });
        frames.len() < MAX_SCAN
    });
    frames
}

#[cfg(not(feature = "backtrace"))]
fn resolve() -> Vec<Frame> {
    Vec::new()
}

fn render(frames: &[Frame]) -> String {
    let mut out = String::new();
    for frame in frames.iter().take(MAX_FRAMES) {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", frame.function);
        let _ = match (&frame.file, frame.line) {
            (Some(file), Some(line)) => writeln!(out, "\t{}:{}", file.display(), line),
            (Some(file), None) => writeln!(out, "\t{}", file.display()),
            _ => writeln!(out, "\t<unknown>"),
        };
    }
    out
}
