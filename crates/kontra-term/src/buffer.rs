// SPDX-License-Identifier: MIT
//
// GridBuffer: the 2D cell grid that every node renders into.
//
// One buffer models one frame of the terminal. The diff renderer keeps two
// of them (the frame just rendered and the frame the terminal currently
// shows) and compares them cell by cell.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are contiguous,
//     so the renderer's left-to-right scan is a linear walk.
//
//   - Writes take signed coordinates. Layout arithmetic routinely produces
//     negative or overflowing positions while subdividing rectangles, and
//     those writes are silently dropped instead of being treated as errors.
//
//   - Wide graphemes occupy two columns: the grapheme in the first cell and
//     an empty continuation cell in the second. Overwriting either half of a
//     wide grapheme breaks it so the terminal never receives half a glyph.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::cell::Cell;

// ─── Rect ──────────────────────────────────────────────────────────────────

/// A layout rectangle.
///
/// All four fields are signed. Containers subtract gaps, padding and borders
/// from the space they receive, so a child may be handed a rectangle with a
/// zero or negative extent. Such a rectangle is empty and renders nothing.
///
/// # Examples
///
/// ```
/// use kontra_term::buffer::Rect;
///
/// let r = Rect::new(10, 5, 80, 24);
/// assert!(r.contains(10, 5));
/// assert!(r.contains(89, 28));
/// assert!(!r.contains(90, 5));
/// assert!(Rect::new(0, 0, 3, -1).is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether this rectangle covers no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether the 0-based point `(px, py)` lies inside.
    ///
    /// An empty rectangle contains nothing.
    #[inline]
    #[must_use]
    pub const fn contains(self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// The overlap of two rectangles, or `None` if they don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Self::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Shrink by `margin` on every side.
    ///
    /// The result may have a negative extent; callers treat that as empty.
    #[inline]
    #[must_use]
    pub const fn shrink(self, margin: i32) -> Self {
        Self {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            width: self.width.saturating_sub(margin.saturating_mul(2)),
            height: self.height.saturating_sub(margin.saturating_mul(2)),
        }
    }
}

// ─── GridBuffer ────────────────────────────────────────────────────────────

/// A `width × height` matrix of [`Cell`]s addressed by 0-based column/row.
///
/// # Examples
///
/// ```
/// use kontra_term::buffer::GridBuffer;
/// use kontra_term::ansi;
///
/// let mut buf = GridBuffer::new(80, 24);
/// buf.set_cell(5, 3, "X", ansi::BOLD);
/// assert_eq!(buf.get_cell(5, 3).character, "X");
///
/// // Out of bounds writes are ignored.
/// buf.set_cell(-1, 3, "X", ansi::BOLD);
/// buf.set_cell(80, 3, "X", ansi::BOLD);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct GridBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl GridBuffer {
    /// Create a buffer of blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::blank(); size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a [`Rect`] at the origin.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, i32::from(self.width), i32::from(self.height))
    }

    /// Whether the signed point `(x, y)` lies on the grid.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.width) && y < i32::from(self.height)
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Flat index of a signed point, or `None` when off the grid.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    #[inline]
    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        // Casts are safe: in_bounds guarantees 0 <= x < width <= u16::MAX.
        self.in_bounds(x, y).then(|| self.index(x as u16, y as u16))
    }

    /// The stored cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Unchecked by contract: panics if `(x, y)` is off the grid. Layout code
    /// is responsible for clamping; use [`get`](Self::get) when unsure.
    #[inline]
    #[must_use]
    pub fn get_cell(&self, x: u16, y: u16) -> &Cell {
        assert!(
            x < self.width && y < self.height,
            "get_cell({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[self.index(x, y)]
    }

    /// The cell at `(x, y)`, or `None` when off the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.checked_index(x, y).map(|i| &self.cells[i])
    }

    /// All cells in row-major order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row as a slice, or `None` past the last row.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        (y < self.height).then(|| {
            let start = self.index(0, y);
            &self.cells[start..start + usize::from(self.width)]
        })
    }

    /// The characters of one row concatenated, continuation cells skipped.
    ///
    /// Mostly useful in tests and debugging output.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.character.as_str()).collect())
            .unwrap_or_default()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Reset every cell to blank. Dimensions are unchanged.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    /// Reallocate to new dimensions. All content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::blank());
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Write one cell. Off-grid coordinates are a silent no-op.
    ///
    /// If `(x, y)` is part of a wide grapheme, that grapheme is broken so no
    /// orphaned half survives.
    pub fn set_cell(&mut self, x: i32, y: i32, ch: &str, style: &str) {
        let Some(idx) = self.checked_index(x, y) else {
            return;
        };
        self.break_wide_at(idx);
        self.cells[idx].assign(ch, style);
    }

    /// Write text starting at `(x, y)`, one grapheme per cell.
    ///
    /// Wide graphemes take two columns. A wide grapheme that would straddle
    /// `max_width` is replaced by a space. Zero-width graphemes are dropped.
    /// Columns outside the grid still advance the pen, so text starting at a
    /// negative `x` is clipped rather than shifted.
    ///
    /// Returns the number of columns consumed, at most `max_width`.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, style: &str, max_width: i32) -> i32 {
        let mut used = 0;

        for g in text.graphemes(true) {
            if used >= max_width {
                break;
            }
            let w = grapheme_width(g);
            if w == 0 {
                continue;
            }

            let col = x.saturating_add(used);
            if w == 2 {
                if used + 1 >= max_width {
                    self.set_cell(col, y, " ", style);
                    used += 1;
                    break;
                }
                let next = col.saturating_add(1);
                if self.in_bounds(col, y) && self.in_bounds(next, y) {
                    self.set_cell(col, y, g, style);
                    self.set_continuation(next, y, style);
                } else {
                    // Half of it is off the grid: blank whichever half is on it.
                    self.set_cell(col, y, " ", style);
                    self.set_cell(next, y, " ", style);
                }
                used += 2;
            } else {
                self.set_cell(col, y, g, style);
                used += 1;
            }
        }

        used
    }

    /// Fill the part of `rect` that lies on the grid.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn fill(&mut self, rect: Rect, ch: &str, style: &str) {
        let Some(area) = rect.intersect(self.bounds()) else {
            return;
        };
        // Intersection with bounds at the origin keeps every edge in 0..=u16::MAX.
        let (x1, x2) = (area.x as u16, area.right() as u16);
        for y in area.y as u16..area.bottom() as u16 {
            let start = self.index(x1, y);
            let end = self.index(x2, y);
            self.break_wide_at(start);
            self.break_wide_at(end - 1);
            for cell in &mut self.cells[start..end] {
                cell.assign(ch, style);
            }
        }
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    /// Copy the part of `rect` that lies on the grid.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn snapshot(&self, rect: Rect) -> Snapshot {
        let Some(area) = rect.intersect(self.bounds()) else {
            return Snapshot::default();
        };
        let (x1, x2) = (area.x as u16, area.right() as u16);
        let mut cells = Vec::with_capacity(area.width as usize * area.height as usize);
        for y in area.y as u16..area.bottom() as u16 {
            cells.extend_from_slice(&self.cells[self.index(x1, y)..self.index(x2, y)]);
        }
        Snapshot { area, cells }
    }

    /// Put a snapshot back cell for cell, wide graphemes included.
    ///
    /// A snapshot that no longer fits the grid (taken before a resize) is
    /// ignored.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn restore(&mut self, snapshot: &Snapshot) {
        let area = snapshot.area;
        if area.is_empty() || area.intersect(self.bounds()) != Some(area) {
            return;
        }
        let w = area.width as usize;
        for (row, y) in (area.y as u16..area.bottom() as u16).enumerate() {
            let start = self.index(area.x as u16, y);
            self.cells[start..start + w].clone_from_slice(&snapshot.cells[row * w..(row + 1) * w]);
        }
    }

    // ─── Wide Grapheme Cleanup ───────────────────────────────────────────

    /// The second half of a wide grapheme written by `put_str`.
    fn set_continuation(&mut self, x: i32, y: i32, style: &str) {
        let Some(idx) = self.checked_index(x, y) else {
            return;
        };
        self.break_wide_at(idx);
        self.cells[idx].assign("", style);
    }

    /// Break any wide grapheme touching the cell at `idx`.
    ///
    /// A continuation at `idx` loses its owner to the left; a continuation
    /// right after `idx` is orphaned and reset. Never crosses a row edge.
    fn break_wide_at(&mut self, idx: usize) {
        let w = usize::from(self.width);
        let col = idx % w.max(1);

        if self.cells[idx].is_continuation() && col > 0 {
            let owner = &mut self.cells[idx - 1];
            let style = owner.style.clone();
            owner.assign(" ", &style);
        }
        if col + 1 < w && self.cells[idx + 1].is_continuation() {
            self.cells[idx + 1].reset();
        }
    }
}

/// Cells copied out of a region of a [`GridBuffer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    area: Rect,
    cells: Vec<Cell>,
}

impl Snapshot {
    /// The on-grid region the cells came from.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl std::fmt::Debug for GridBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GridBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ────────────────────────────────────────────────────────────

/// Display width of one grapheme cluster: 0, 1 or 2 columns.
///
/// Control characters count as zero.
///
/// ```
/// use kontra_term::buffer::grapheme_width;
///
/// assert_eq!(grapheme_width("a"), 1);
/// assert_eq!(grapheme_width("中"), 2);
/// assert_eq!(grapheme_width("\t"), 0);
/// ```
#[must_use]
pub fn grapheme_width(g: &str) -> usize {
    if g.chars().next().is_none_or(char::is_control) {
        return 0;
    }
    g.width().min(2)
}

/// Display width of a string in columns, summed per grapheme.
///
/// ```
/// use kontra_term::buffer::string_width;
///
/// assert_eq!(string_width("hello"), 5);
/// assert_eq!(string_width("a中b"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

// ─── Tests ─────────────────────────────────────────────────────────────────
