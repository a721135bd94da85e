//! Preferred-size stacking container with vertical scrolling.
//!
//! A [`List`] walks its children top to bottom, asks each for its preferred
//! height at the available width, and places it. Children entirely outside
//! the viewport are hidden behind an empty rectangle. A child that straddles
//! the top or bottom edge is drawn clipped: rows of the buffer outside the
//! viewport are saved before it renders and put back afterwards.
//!
//! # Scrolling
//!
//! The scroll offset shifts the content up by that many rows. It is clamped
//! on every render to `0..=max_scroll`, where `max_scroll` is the content
//! height minus the viewport height. Scrolling before the first render is
//! clamped against 0.
//!
//! When the content is taller than the viewport, the rightmost inner column
//! is reserved for a scrollbar and children are measured one column
//! narrower. The thumb is `max(1, viewport² / content)` rows tall and sits
//! at `offset × (viewport − thumb) / max_scroll`.

use compact_str::CompactString;
use kontra_term::ansi;
use kontra_term::buffer::{GridBuffer, Rect};
use kontra_term::input::{MouseEvent, MouseEventKind};

use crate::node::{LastRendered, Node};

// ─── Scrollbar Geometry ──────────────────────────────────────────────────────

/// Thumb size and position, both in rows from the top of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarMetrics {
    pub thumb_size: i32,
    pub thumb_pos: i32,
}

/// Compute the scrollbar thumb for a viewport over taller content.
///
/// Returns `None` when everything fits and no scrollbar is needed.
///
/// ```
/// use kontra_layout::list::scrollbar_metrics;
///
/// let m = scrollbar_metrics(10, 50, 0).unwrap();
/// assert_eq!(m.thumb_size, 2);
/// assert_eq!(m.thumb_pos, 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn scrollbar_metrics(viewport: i32, content: i32, offset: i32) -> Option<ScrollbarMetrics> {
    if viewport <= 0 || content <= viewport {
        return None;
    }
    let (v, total) = (i64::from(viewport), i64::from(content));
    // Both results are bounded by `viewport`, so they fit back in i32.
    let thumb = (v * v / total).max(1);
    let max_scroll = total - v;
    let offset = i64::from(offset).clamp(0, max_scroll);
    let pos = offset * (v - thumb) / max_scroll;
    Some(ScrollbarMetrics { thumb_size: thumb as i32, thumb_pos: pos as i32 })
}

// ─── List ────────────────────────────────────────────────────────────────────

/// A vertical stack of children sized by their preferred heights.
pub struct List {
    children: Vec<Box<dyn Node>>,
    gap: i32,
    padding: i32,
    scroll_offset: i32,
    max_scroll: i32,
    scrollbar: bool,
    track: CompactString,
    thumb: CompactString,
    track_style: CompactString,
    thumb_style: CompactString,
    last: LastRendered,
}

impl List {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            gap: 0,
            padding: 0,
            scroll_offset: 0,
            max_scroll: 0,
            scrollbar: true,
            track: CompactString::const_new("│"),
            thumb: CompactString::const_new("█"),
            track_style: CompactString::const_new(ansi::FG_BRIGHT_BLACK),
            thumb_style: CompactString::const_new(ansi::FG_WHITE),
            last: LastRendered::default(),
        }
    }

    /// Rows between neighbouring children. Negative values count as 0.
    #[must_use]
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    /// Space on every side. Negative values count as 0.
    #[must_use]
    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding.max(0);
        self
    }

    /// Draw a scrollbar when the content overflows. On by default.
    #[must_use]
    pub const fn with_scrollbar(mut self, enabled: bool) -> Self {
        self.scrollbar = enabled;
        self
    }

    /// Glyphs for the scrollbar track and thumb.
    #[must_use]
    pub fn with_scrollbar_chars(mut self, track: &str, thumb: &str) -> Self {
        self.track = CompactString::from(track);
        self.thumb = CompactString::from(thumb);
        self
    }

    /// Styles for the scrollbar track and thumb.
    #[must_use]
    pub fn with_scrollbar_styles(mut self, track: &str, thumb: &str) -> Self {
        self.track_style = CompactString::from(track);
        self.thumb_style = CompactString::from(thumb);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Node) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: impl Node) {
        self.children.push(Box::new(child));
    }

    pub fn push_boxed(&mut self, child: Box<dyn Node>) {
        self.children.push(child);
    }

    /// Remove every child and scroll back to the top.
    pub fn clear(&mut self) {
        self.children.clear();
        self.scroll_offset = 0;
        self.max_scroll = 0;
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
    }

    #[must_use]
    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    // ── Scrolling ───────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    /// Largest offset allowed by the last render.
    #[inline]
    #[must_use]
    pub const fn max_scroll(&self) -> i32 {
        self.max_scroll
    }

    pub fn scroll_to(&mut self, offset: i32) {
        self.scroll_offset = offset.clamp(0, self.max_scroll);
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_to(self.scroll_offset.saturating_add(delta));
    }

    pub fn scroll_up(&mut self) {
        self.scroll_by(-1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_by(1);
    }

    /// Scroll one row if `event` is a wheel event over this list.
    ///
    /// Returns whether the event was consumed.
    pub fn handle_scroll(&mut self, event: &MouseEvent) -> bool {
        if !self.contains(i32::from(event.column), i32::from(event.row)) {
            return false;
        }
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_up(),
            MouseEventKind::ScrollDown => self.scroll_down(),
            MouseEventKind::Press => return false,
        }
        true
    }

    // ── Measurement ─────────────────────────────────────────────────

    /// Sum of preferred heights at `width` plus the gaps between them.
    fn content_height(&self, width: i32) -> i32 {
        let n = i32::try_from(self.children.len()).unwrap_or(i32::MAX);
        let gaps = self.gap.saturating_mul(n.saturating_sub(1).max(0));
        self.children
            .iter()
            .fold(gaps, |acc, c| acc.saturating_add(c.preferred_height(width)))
    }

    fn draw_scrollbar(&self, buf: &mut GridBuffer, track: Rect, metrics: ScrollbarMetrics) {
        for row in 0..track.height {
            let on_thumb = row >= metrics.thumb_pos && row < metrics.thumb_pos + metrics.thumb_size;
            let (ch, style) = if on_thumb {
                (&self.thumb, &self.thumb_style)
            } else {
                (&self.track, &self.track_style)
            };
            buf.set_cell(track.x, track.y + row, ch, style);
        }
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for List {
    fn preferred_height(&self, width: i32) -> i32 {
        let pad = self.padding.saturating_mul(2);
        let inner_w = if width <= pad { 0 } else { width - pad };
        self.content_height(inner_w).saturating_add(pad)
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        let inner = area.shrink(self.padding);
        if area.is_empty() || inner.is_empty() {
            for child in &mut self.children {
                child.render(buf, Rect::new(inner.x, inner.y, 0, 0));
            }
            return;
        }

        let viewport = inner.height;
        let mut width = inner.width;
        let mut content = self.content_height(width);
        let reserve = self.scrollbar && content > viewport && width > 1;
        if reserve {
            width -= 1;
            content = self.content_height(width);
        }

        self.max_scroll = content.saturating_sub(viewport).max(0);
        self.scroll_offset = self.scroll_offset.clamp(0, self.max_scroll);

        let (top, bottom) = (inner.y, inner.bottom());
        let mut y = top.saturating_sub(self.scroll_offset);
        for child in &mut self.children {
            let h = child.preferred_height(width).max(0);
            let end = y.saturating_add(h);
            if h == 0 || end <= top || y >= bottom {
                // Hidden: an empty rectangle keeps its hit-test false.
                child.render(buf, Rect::new(inner.x, y, width, 0));
            } else if y >= top && end <= bottom {
                child.render(buf, Rect::new(inner.x, y, width, h));
            } else {
                let above = buf.snapshot(Rect::new(inner.x, y, width, top - y));
                let below = buf.snapshot(Rect::new(inner.x, bottom, width, end - bottom));
                child.render(buf, Rect::new(inner.x, y, width, h));
                buf.restore(&above);
                buf.restore(&below);
            }
            y = end.saturating_add(self.gap);
        }

        if !reserve {
            return;
        }
        if let Some(m) = scrollbar_metrics(viewport, content, self.scroll_offset) {
            let track = Rect::new(inner.right() - 1, inner.y, 1, viewport);
            self.draw_scrollbar(buf, track, m);
        }
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

impl std::fmt::Debug for List {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("List")
            .field("children", &self.children.len())
            .field("gap", &self.gap)
            .field("padding", &self.padding)
            .field("scroll_offset", &self.scroll_offset)
            .field("max_scroll", &self.max_scroll)
            .field("scrollbar", &self.scrollbar)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
