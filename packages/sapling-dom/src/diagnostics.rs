//! Non-fatal diagnostics raised while parsing markup or accessing element properties.
//!
//! By default a diagnostic is emitted as a `tracing` warning. While capture mode is enabled
//! (see [`set_error_capture_mode`]) diagnostics are collected into a buffer instead, where they
//! can be inspected with [`take_captured`] or thrown away.
//!
//! The capture mode and buffer are per thread. A [`BaseDocument`](crate::BaseDocument) is only
//! ever mutated from one thread at a time, so this behaves like the single global switch of
//! a non-thread-safe document engine.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::Location;

thread_local! {
    static CAPTURE_MODE: Cell<bool> = const { Cell::new(false) };
    static CAPTURED: RefCell<Vec<Diagnostic>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A parse error reported by the html or xml parser
    Parse,
    /// A property other than `innerHTML` was accessed through the generic accessors
    UndefinedProperty,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Source location of the caller that triggered the diagnostic (if known)
    pub location: Option<&'static Location<'static>>,
}

impl Diagnostic {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Parse,
            message: message.into(),
            location: None,
        }
    }

    #[track_caller]
    pub fn undefined_property(accessor: &str, name: &str) -> Self {
        Self {
            kind: DiagnosticKind::UndefinedProperty,
            message: format!("Undefined property via {accessor}(): {name}"),
            location: Some(Location::caller()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(
                f,
                "{} in {} on line {}",
                self.message,
                location.file(),
                location.line()
            ),
            None => f.write_str(&self.message),
        }
    }
}

/// Restores the previous capture mode when dropped.
///
/// Dropping the guard also discards every diagnostic captured so far on this thread.
#[must_use = "capture mode is restored as soon as the guard is dropped"]
pub struct ErrorCaptureGuard {
    previous: bool,
}

impl ErrorCaptureGuard {
    /// The capture mode that was active before this guard was created
    pub fn previous_mode(&self) -> bool {
        self.previous
    }
}

impl Drop for ErrorCaptureGuard {
    fn drop(&mut self) {
        clear_captured();
        CAPTURE_MODE.with(|mode| mode.set(self.previous));
    }
}

/// Switch capture mode on or off for the current thread until the returned guard is dropped.
pub fn set_error_capture_mode(enabled: bool) -> ErrorCaptureGuard {
    let previous = CAPTURE_MODE.with(|mode| mode.replace(enabled));
    ErrorCaptureGuard { previous }
}

pub fn is_capturing() -> bool {
    CAPTURE_MODE.with(Cell::get)
}

/// Report a diagnostic: buffer it while capturing, otherwise log it as a warning.
pub fn report(diagnostic: Diagnostic) {
    if is_capturing() {
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = ?diagnostic.kind, "captured: {diagnostic}");
        CAPTURED.with(|captured| captured.borrow_mut().push(diagnostic));
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(kind = ?diagnostic.kind, "{diagnostic}");
        #[cfg(not(feature = "tracing"))]
        let _ = diagnostic;
    }
}

/// Remove and return the diagnostics captured on this thread.
pub fn take_captured() -> Vec<Diagnostic> {
    CAPTURED.with(|captured| std::mem::take(&mut *captured.borrow_mut()))
}

pub fn clear_captured() {
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}
