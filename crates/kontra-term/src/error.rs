// SPDX-License-Identifier: MIT
//
// Error type for terminal control.
//
// Only real I/O with the terminal can fail. Layout overflow and malformed
// input bytes are absorbed where they happen and never surface here.

use std::io;

/// Failures while driving the terminal.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// A capability could not be set up while entering raw mode.
    ///
    /// `step` names what was being attempted (`"tcgetattr"`, `"enable mouse"`).
    #[error("terminal startup failed during {step}: {source}")]
    Startup {
        step: &'static str,
        #[source]
        source: io::Error,
    },

    /// Reading input or writing output failed mid-session.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Registering the interrupt handlers failed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] io::Error),
}

impl TermError {
    /// Wrap an I/O error raised while performing a startup `step`.
    #[must_use]
    pub const fn startup(step: &'static str, source: io::Error) -> Self {
        Self::Startup { step, source }
    }

    /// Whether this error happened before the session was usable.
    #[must_use]
    pub const fn is_startup(&self) -> bool {
        matches!(self, Self::Startup { .. } | Self::Signal(_))
    }
}

pub type Result<T> = std::result::Result<T, TermError>;
