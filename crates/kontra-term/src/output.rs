// SPDX-License-Identifier: MIT
//
// Output buffering and pen tracking.
//
//   OutputBuffer: accumulates every byte of a frame in memory so the whole
//   flush reaches the terminal in one write. Many small writes interleaved
//   with a terminal's own parsing cause visible tearing.
//
//   CellWriter: emits one changed cell: a cursor position, then the style
//   (only when it differs from the pen, the last style emitted this flush),
//   then the grapheme. Styles are opaque strings, so the pen is simply the
//   last string written and comparison is byte equality.

use std::io::{self, Write};

use compact_str::CompactString;

use crate::ansi;
use crate::cell::Cell;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer collecting one frame's worth of terminal output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with 16 KB of capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a string verbatim.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Drop the contents, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated bytes to `w`, flush it, and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to or flushing `w`. The buffer keeps
    /// its contents on error.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OutputBuffer({} bytes)", self.buf.len())
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Emits changed cells while remembering the current pen.
///
/// Every cell gets its own cursor position, so a flush of `k` cells always
/// contains exactly `k` positioning sequences. A style change writes
/// [`ansi::RESET`] followed by the new style string, so attributes of an
/// earlier style never bleed into the next one.
#[derive(Debug, Default)]
pub struct CellWriter {
    pen: Option<CompactString>,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pen: None }
    }

    /// Forget the pen. Call at the start of every flush: the terminal's
    /// actual SGR state is unknown until something is emitted.
    pub fn reset_state(&mut self) {
        self.pen = None;
    }

    /// The last style emitted, if any.
    #[must_use]
    pub fn pen(&self) -> Option<&str> {
        self.pen.as_deref()
    }

    /// Emit one cell at `(x, y)`.
    ///
    /// Returns `true` when a style sequence was written.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) -> bool {
        // Writes into a Vec never fail.
        let _ = ansi::cursor_to(out, x, y);

        let changed = self.pen.as_deref() != Some(cell.style.as_str());
        if changed {
            out.push_str(ansi::RESET);
            out.push_str(&cell.style);
            self.pen = Some(cell.style.clone());
        }

        // The owning wide grapheme already covers a continuation column.
        if !cell.is_continuation() {
            out.push_str(&cell.character);
        }
        changed
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
