// SPDX-License-Identifier: MIT
//
// Errors that end a runtime session.
//
// Every variant is fatal: the loop stops, the terminal is restored, and the
// error is handed back to the caller. Bounds violations and undecodable
// input never get here; they are absorbed where they happen.

use kontra_term::TermError;

/// Error type application callbacks may return.
pub type AppError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Entering raw mode, reading input, or writing a frame failed.
    #[error(transparent)]
    Terminal(#[from] TermError),

    /// The application's event callback returned an error.
    #[error("application error: {0}")]
    App(#[source] AppError),

    /// The callback or a node's render panicked.
    #[error("panic: {0}")]
    Panic(String),
}

impl RuntimeError {
    /// Whether the session failed before the first frame.
    #[must_use]
    pub const fn is_startup(&self) -> bool {
        matches!(self, Self::Terminal(e) if e.is_startup())
    }

    /// Message for a caught panic payload.
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| String::from("non-string panic payload"));
        Self::Panic(msg)
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
