// SPDX-License-Identifier: MIT
//
// Differential renderer: double-buffered grid with a diff flush.
//
// The renderer owns two grid buffers of identical size:
//
//   current:  the frame being rendered this iteration.
//   previous: what the terminal shows right now.
//
// The pipeline per frame:
//
//   1. `begin_frame` clears `current`.
//   2. The node tree renders into `current_mut()`.
//   3. `flush` scans row-major and hands every cell that differs from
//      `previous` to the CellWriter, which positions the cursor, switches the
//      pen when the style changed, and prints the grapheme. One reset ends
//      the frame. Output accumulates in an OutputBuffer.
//   4. The buffers swap roles. The old `previous` becomes next frame's
//      backing storage, so steady state allocates nothing.
//
// Flush cost is proportional to the number of changed cells. Unchanged rows
// are skipped with a single slice comparison.
//
// Resizing (or `force_redraw`) sets a full-repaint flag: the next flush
// treats every cell as changed regardless of what `previous` holds.

use tracing::trace;

use crate::ansi;
use crate::buffer::GridBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed and were emitted.
    pub cells_rendered: usize,
    /// Cells that matched the previous frame.
    pub cells_skipped: usize,
    /// Style sequences emitted (pen switches).
    pub style_changes: usize,
    /// Bytes of output produced.
    pub bytes_written: usize,
}

impl RenderStats {
    /// Cells examined: rendered plus skipped.
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Double-buffered grid that emits bytes only for changed cells.
///
/// ```
/// use kontra_term::ansi;
/// use kontra_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new(10, 2);
/// renderer.flush(); // first flush paints everything
///
/// renderer.begin_frame();
/// renderer.current_mut().set_cell(3, 1, "x", ansi::BOLD);
/// let stats = renderer.flush();
/// assert_eq!(stats.cells_rendered, 1);
/// ```
pub struct DiffRenderer {
    current: GridBuffer,
    previous: GridBuffer,
    output: OutputBuffer,
    writer: CellWriter,
    full_repaint: bool,
}

impl DiffRenderer {
    /// Create a renderer. The first flush is a full repaint.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            current: GridBuffer::new(width, height),
            previous: GridBuffer::new(width, height),
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            full_repaint: true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.current.width()
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.current.height()
    }

    /// The frame being built.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> &GridBuffer {
        &self.current
    }

    /// Mutable access to the frame being built. Nodes render here.
    #[inline]
    pub const fn current_mut(&mut self) -> &mut GridBuffer {
        &mut self.current
    }

    /// The frame the terminal is showing.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> &GridBuffer {
        &self.previous
    }

    /// Whether the next flush repaints every cell.
    #[inline]
    #[must_use]
    pub const fn needs_full_repaint(&self) -> bool {
        self.full_repaint
    }

    /// Clear `current` before rendering a new frame.
    pub fn begin_frame(&mut self) {
        self.current.clear();
    }

    /// Resize both buffers together and schedule a full repaint.
    ///
    /// All prior diff state is discarded, even when the size is unchanged.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width, height);
        self.previous.resize(width, height);
        self.full_repaint = true;
    }

    /// Repaint every cell on the next flush without resizing.
    pub const fn force_redraw(&mut self) {
        self.full_repaint = true;
    }

    /// Diff `current` against `previous` into the output buffer, then swap.
    ///
    /// Any output left over from an earlier flush is discarded first. When
    /// nothing changed the output stays empty; otherwise it ends with a
    /// single [`ansi::RESET`].
    pub fn flush(&mut self) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let mut stats = RenderStats::default();
        let full = self.full_repaint;
        let width = self.current.width();
        let w = usize::from(width);

        for y in 0..self.current.height() {
            let start = usize::from(y) * w;
            let row = &self.current.cells()[start..start + w];
            let prev = &self.previous.cells()[start..start + w];

            if !full && row == prev {
                stats.cells_skipped += w;
                continue;
            }

            for (x, (cell, old)) in (0..width).zip(row.iter().zip(prev)) {
                if full || cell != old {
                    if self.writer.render_cell(&mut self.output, x, y, cell) {
                        stats.style_changes += 1;
                    }
                    stats.cells_rendered += 1;
                } else {
                    stats.cells_skipped += 1;
                }
            }
        }

        if stats.cells_rendered > 0 {
            self.output.push_str(ansi::RESET);
        }
        stats.bytes_written = self.output.len();

        std::mem::swap(&mut self.current, &mut self.previous);
        self.full_repaint = false;

        trace!(
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            styles = stats.style_changes,
            bytes = stats.bytes_written,
            full,
            "flush"
        );
        stats
    }

    /// Bytes produced by the last flush.
    #[inline]
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Discard the bytes produced by the last flush.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Write the last flush's bytes to `w` and clear them.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn write_to(&mut self, w: &mut impl std::io::Write) -> std::io::Result<()> {
        self.output.flush_to(w)
    }
}

impl std::fmt::Debug for DiffRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffRenderer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("full_repaint", &self.full_repaint)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use pretty_assertions::assert_eq;

    fn output(r: &DiffRenderer) -> String {
        String::from_utf8(r.output_bytes().to_vec()).unwrap()
    }

    /// Count CUP sequences (`ESC [ row ; col H`) in the output.
    fn cursor_moves(s: &str) -> usize {
        s.split("\x1b[")
            .skip(1)
            .filter(|seq| {
                let Some(end) = seq.find('H') else {
                    return false;
                };
                let params = &seq[..end];
                params.contains(';') && params.chars().all(|c| c.is_ascii_digit() || c == ';')
            })
            .count()
    }

    /// A renderer that already flushed one blank frame.
    fn settled(w: u16, h: u16) -> DiffRenderer {
        let mut r = DiffRenderer::new(w, h);
        r.flush();
        r.begin_frame();
        r
    }

    // ── First flush ─────────────────────────────────────────────────────

    #[test]
    fn first_flush_paints_every_cell() {
        let mut r = DiffRenderer::new(10, 5);
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 50);
        assert_eq!(stats.cells_skipped, 0);
        assert_eq!(cursor_moves(&output(&r)), 50);
        assert_eq!(stats.style_changes, 1);
    }

    #[test]
    fn flush_ends_with_single_reset() {
        let mut r = DiffRenderer::new(3, 1);
        r.current_mut().set_cell(0, 0, "a", ansi::BOLD);
        r.flush();
        let out = output(&r);
        assert!(out.ends_with(" \x1b[0m"));
        assert_eq!(out.matches("\x1b[0m").count(), 4);
        assert!(!out.contains("\x1b[2J"));
    }

    // ── Steady state ────────────────────────────────────────────────────

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut r = settled(10, 5);
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 50);
        assert!(r.output_bytes().is_empty());
    }

    #[test]
    fn single_change_emits_one_cell() {
        let mut r = settled(10, 5);
        r.current_mut().set_cell(4, 2, "X", ansi::RESET);
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(output(&r), "\x1b[3;5H\x1b[0m\x1b[0mX\x1b[0m");
    }

    #[test]
    fn same_style_run_switches_pen_once() {
        let mut r = settled(10, 1);
        r.current_mut().put_str(0, 0, "abc", ansi::FG_RED, 10);
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 3);
        assert_eq!(stats.style_changes, 1);
        assert_eq!(
            output(&r),
            "\x1b[1;1H\x1b[0m\x1b[31ma\x1b[1;2Hb\x1b[1;3Hc\x1b[0m"
        );
    }

    #[test]
    fn alternating_styles_switch_every_cell() {
        let mut r = settled(4, 1);
        let styles = [ansi::FG_RED, ansi::FG_BLUE, ansi::FG_RED, ansi::FG_BLUE];
        for (x, s) in (0..).zip(styles) {
            r.current_mut().set_cell(x, 0, "#", s);
        }
        let stats = r.flush();
        assert_eq!(stats.style_changes, 4);
        assert_eq!(cursor_moves(&output(&r)), 4);
    }

    #[test]
    fn style_only_change_is_detected() {
        let mut r = settled(2, 1);
        r.current_mut().set_cell(0, 0, " ", ansi::BG_BLUE);
        assert_eq!(r.flush().cells_rendered, 1);
    }

    #[test]
    fn reverting_a_cell_emits_it_again() {
        let mut r = settled(4, 1);
        r.current_mut().set_cell(1, 0, "X", ansi::RESET);
        r.flush();
        r.begin_frame();
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 1);
        assert!(output(&r).contains("\x1b[1;2H"));
    }

    #[test]
    fn buffers_swap_after_flush() {
        let mut r = settled(4, 1);
        r.current_mut().set_cell(0, 0, "Q", ansi::RESET);
        r.flush();
        assert_eq!(r.previous().get_cell(0, 0), &Cell::new("Q", ansi::RESET));
    }

    #[test]
    fn new_flush_discards_stale_output() {
        let mut r = DiffRenderer::new(2, 1);
        r.flush();
        r.begin_frame();
        r.flush();
        assert!(r.output_bytes().is_empty());
    }

    // ── Wide graphemes ──────────────────────────────────────────────────

    #[test]
    fn continuation_cell_prints_no_glyph() {
        let mut r = settled(4, 1);
        r.current_mut().put_str(0, 0, "中", ansi::RESET, 4);
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 2);
        assert_eq!(output(&r), "\x1b[1;1H\x1b[0m\x1b[0m中\x1b[1;2H\x1b[0m");
    }

    // ── Invalidation ────────────────────────────────────────────────────

    #[test]
    fn resize_forces_full_repaint() {
        let mut r = settled(10, 5);
        r.resize(6, 3);
        assert!(r.needs_full_repaint());
        let stats = r.flush();
        assert_eq!(stats.cells_rendered, 18);
        assert_eq!((r.previous().width(), r.previous().height()), (6, 3));
        assert!(!r.needs_full_repaint());
    }

    #[test]
    fn force_redraw_repaints_without_resize() {
        let mut r = settled(3, 2);
        r.force_redraw();
        assert_eq!(r.flush().cells_rendered, 6);
    }

    #[test]
    fn zero_size_renders_nothing() {
        let mut r = DiffRenderer::new(0, 0);
        let stats = r.flush();
        assert_eq!(stats.total_cells(), 0);
        assert!(r.output_bytes().is_empty());
    }

    // ── Output ──────────────────────────────────────────────────────────

    #[test]
    fn write_to_drains_output() {
        let mut r = DiffRenderer::new(1, 1);
        let stats = r.flush();
        let mut sink = Vec::new();
        r.write_to(&mut sink).unwrap();
        assert_eq!(sink.len(), stats.bytes_written);
        assert!(r.output_bytes().is_empty());
    }
}
