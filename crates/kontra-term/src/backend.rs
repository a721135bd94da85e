// SPDX-License-Identifier: MIT
//
// The seam between the runtime loop and a terminal.
//
// The runtime only needs five things from a terminal: switch it into the
// interactive mode and back, drain pending input, report the size, and
// accept a frame's bytes. `Terminal` implements this over a real TTY;
// `testing::ScriptedBackend` implements it in memory so the loop can be
// driven deterministically in tests.

use crate::error::Result;
use crate::input::Event;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }
}

impl Default for Size {
    /// The classic 80×24 fallback.
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// A terminal the runtime loop can drive.
///
/// Lifecycle: `initialize` once, any number of reads and writes, then
/// `shutdown`. Implementations must make `shutdown` idempotent: the runtime
/// calls it on every exit path and a `Drop` impl may call it again.
pub trait Backend {
    /// Enter interactive mode (raw input, mouse reporting, hidden cursor).
    ///
    /// # Errors
    ///
    /// [`TermError::Startup`](crate::TermError::Startup) when a capability
    /// cannot be enabled.
    fn initialize(&mut self) -> Result<()>;

    /// Restore the terminal to the state captured by `initialize`.
    ///
    /// Safe to call when not initialized or already shut down.
    ///
    /// # Errors
    ///
    /// Returns the first failure, after attempting every restore step.
    fn shutdown(&mut self) -> Result<()>;

    /// Append every event decodable from currently pending input to `out`.
    ///
    /// Never blocks. Returns immediately when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns an error when reading from the terminal fails.
    fn read_input_events(&mut self, out: &mut Vec<Event>) -> Result<()>;

    /// Current terminal size.
    fn size(&mut self) -> Size;

    /// Write one frame's bytes and flush them.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal rejects the write.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Whether an interrupt (`SIGINT`/`SIGTERM`) has been received.
    fn interrupted(&mut self) -> bool {
        false
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }

    fn read_input_events(&mut self, out: &mut Vec<Event>) -> Result<()> {
        (**self).read_input_events(out)
    }

    fn size(&mut self) -> Size {
        (**self).size()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn interrupted(&mut self) -> bool {
        (**self).interrupted()
    }
}
