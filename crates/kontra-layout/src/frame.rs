//! Border container.
//!
//! A [`Frame`] draws a one-cell outline around its rectangle, optionally
//! fills the whole rectangle first, and renders its child inside the outline
//! with extra padding. A title sits in the top edge, wrapped in one space on
//! each side; it is dropped entirely when it is wider than `width - 4`.
//!
//! Rectangles narrower or shorter than 2 cells draw nothing. Whenever there
//! is no room inside the outline the child is rendered into an empty
//! rectangle, so it stops hit-testing where it used to be.

use compact_str::{format_compact, CompactString};
use kontra_term::ansi::{self, BoxChars};
use kontra_term::buffer::{string_width, GridBuffer, Rect};

use crate::node::{LastRendered, Node};

/// Where the title sits on the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleAlignment {
    /// Two cells in from the left corner.
    #[default]
    Left,
    Center,
    /// Two cells in from the right corner, or one when the title fills the
    /// top edge.
    Right,
}

/// An outlined box around one child.
pub struct Frame {
    child: Option<Box<dyn Node>>,
    title: CompactString,
    alignment: TitleAlignment,
    chars: BoxChars,
    style: CompactString,
    fill: Option<CompactString>,
    padding: i32,
    last: LastRendered,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self {
            child: None,
            title: CompactString::default(),
            alignment: TitleAlignment::Left,
            chars: BoxChars::SINGLE,
            style: CompactString::const_new(ansi::RESET),
            fill: None,
            padding: 0,
            last: LastRendered::default(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Node) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = CompactString::from(title);
        self
    }

    #[must_use]
    pub const fn with_alignment(mut self, alignment: TitleAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub const fn with_chars(mut self, chars: BoxChars) -> Self {
        self.chars = chars;
        self
    }

    /// Style of the outline and title.
    #[must_use]
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = CompactString::from(style);
        self
    }

    /// Fill the whole rectangle with spaces in `style` before drawing.
    ///
    /// The fill style is also appended to the outline style, so the border
    /// sits on the same background.
    #[must_use]
    pub fn with_fill(mut self, style: &str) -> Self {
        self.fill = Some(CompactString::from(style));
        self
    }

    /// Space between the outline and the child. Negative values count as 0.
    #[must_use]
    pub fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding.max(0);
        self
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = CompactString::from(title);
    }

    pub fn set_child(&mut self, child: impl Node) {
        self.child = Some(Box::new(child));
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn child_mut(&mut self) -> Option<&mut (dyn Node + 'static)> {
        self.child.as_deref_mut()
    }

    #[must_use]
    pub fn child(&self) -> Option<&(dyn Node + 'static)> {
        self.child.as_deref()
    }

    /// The rectangle the child gets inside `area`.
    #[inline]
    #[must_use]
    pub const fn inner(&self, area: Rect) -> Rect {
        area.shrink(1 + self.padding)
    }

    fn full_style(&self) -> CompactString {
        match &self.fill {
            Some(fill) => format_compact!("{}{}", self.style, fill),
            None => self.style.clone(),
        }
    }

    /// Render the child into an empty rectangle so it stops hit-testing.
    fn hide_child(&mut self, buf: &mut GridBuffer, at: Rect) {
        if let Some(child) = self.child.as_mut() {
            child.render(buf, Rect::new(at.x, at.y, 0, 0));
        }
    }

    fn draw_outline(&self, buf: &mut GridBuffer, area: Rect, style: &str) {
        let c = self.chars;
        let (left, top) = (area.x, area.y);
        let (right, bottom) = (area.right() - 1, area.bottom() - 1);

        for y in top + 1..bottom {
            buf.set_cell(left, y, c.vertical, style);
            buf.set_cell(right, y, c.vertical, style);
        }
        for x in left + 1..right {
            buf.set_cell(x, bottom, c.horizontal, style);
        }

        let title_w = i32::try_from(string_width(&self.title)).unwrap_or(i32::MAX);
        if self.title.is_empty() || title_w > area.width - 4 {
            for x in left + 1..right {
                buf.set_cell(x, top, c.horizontal, style);
            }
        } else {
            let label = format_compact!(" {} ", self.title);
            let len = title_w + 2;
            let start = match self.alignment {
                TitleAlignment::Left => 2,
                TitleAlignment::Center => (area.width - len) / 2,
                TitleAlignment::Right => (area.width - len - 2).max(1),
            };
            for x in left + 1..left + start {
                buf.set_cell(x, top, c.horizontal, style);
            }
            buf.put_str(left + start, top, &label, style, len);
            for x in left + start + len..right {
                buf.set_cell(x, top, c.horizontal, style);
            }
        }

        buf.set_cell(left, top, c.top_left, style);
        buf.set_cell(right, top, c.top_right, style);
        buf.set_cell(left, bottom, c.bottom_left, style);
        buf.set_cell(right, bottom, c.bottom_right, style);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Frame {
    fn preferred_height(&self, width: i32) -> i32 {
        let chrome = 2 + self.padding.saturating_mul(2);
        let inner_w = if width <= 2 { 0 } else { width.saturating_sub(chrome).max(0) };
        let content = self.child.as_ref().map_or(0, |c| c.preferred_height(inner_w));
        content.saturating_add(chrome)
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        if area.width < 2 || area.height < 2 {
            self.hide_child(buf, area);
            return;
        }

        let style = self.full_style();
        if self.fill.is_some() {
            buf.fill(area, " ", &style);
        }
        self.draw_outline(buf, area, &style);

        let inner = self.inner(area);
        if inner.is_empty() {
            self.hide_child(buf, inner);
            return;
        }
        if let Some(child) = self.child.as_mut() {
            child.render(buf, inner);
        }
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("title", &self.title)
            .field("alignment", &self.alignment)
            .field("padding", &self.padding)
            .field("has_child", &self.child.is_some())
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Text;
    use pretty_assertions::assert_eq;

    fn draw(frame: &mut Frame, w: u16, h: u16) -> GridBuffer {
        let mut buf = GridBuffer::new(w, h);
        frame.render(&mut buf, Rect::new(0, 0, i32::from(w), i32::from(h)));
        buf
    }

    fn rows(buf: &GridBuffer) -> Vec<String> {
        (0..buf.height()).map(|y| buf.row_text(y)).collect()
    }

    // ── Outline ─────────────────────────────────────────────────────

    #[test]
    fn plain_outline() {
        let buf = draw(&mut Frame::new(), 5, 3);
        assert_eq!(rows(&buf), vec!["+---+", "|   |", "+---+"]);
    }

    #[test]
    fn too_small_draws_nothing() {
        assert_eq!(draw(&mut Frame::new(), 1, 4), GridBuffer::new(1, 4));
        assert_eq!(draw(&mut Frame::new(), 6, 1), GridBuffer::new(6, 1));
    }

    #[test]
    fn two_by_two_is_corners_only() {
        let buf = draw(&mut Frame::new().with_chars(BoxChars::ROUNDED), 2, 2);
        assert_eq!(rows(&buf), vec!["╭╮", "╰╯"]);
    }

    // ── Titles ──────────────────────────────────────────────────────

    #[test]
    fn title_alignments() {
        let mut left = Frame::new().with_title("ab");
        assert_eq!(rows(&draw(&mut left, 10, 2))[0], "+- ab ---+");

        let mut center = Frame::new().with_title("ab").with_alignment(TitleAlignment::Center);
        assert_eq!(rows(&draw(&mut center, 10, 2))[0], "+-- ab --+");

        let mut right = Frame::new().with_title("ab").with_alignment(TitleAlignment::Right);
        assert_eq!(rows(&draw(&mut right, 10, 2))[0], "+--- ab -+");
    }

    #[test]
    fn right_title_filling_the_top_keeps_its_leading_space() {
        let mut frame = Frame::new().with_title("abcdef").with_alignment(TitleAlignment::Right);
        assert_eq!(rows(&draw(&mut frame, 10, 2))[0], "+ abcdef +");
    }

    #[test]
    fn title_dropped_when_too_wide() {
        let mut frame = Frame::new().with_title("abcdefg");
        assert_eq!(rows(&draw(&mut frame, 10, 2))[0], "+--------+");

        let mut fits = Frame::new().with_title("abcdef");
        assert_eq!(rows(&draw(&mut fits, 10, 2))[0], "+- abcdef+");
    }

    // ── Child and styles ────────────────────────────────────────────

    #[test]
    fn child_sits_inside_padding() {
        let mut frame = Frame::new().with_padding(1).with_child(Text::new("hi"));
        let buf = draw(&mut frame, 7, 5);
        assert_eq!(rows(&buf)[2], "| hi  |");
        assert_eq!(frame.child().and_then(|c| c.last_rendered()), Some(Rect::new(2, 2, 3, 1)));
    }

    #[test]
    fn child_hidden_when_inner_is_empty() {
        let mut frame = Frame::new().with_padding(1).with_child(Text::new("x"));
        let buf = draw(&mut frame, 4, 4);
        assert_eq!(frame.child().and_then(|c| c.last_rendered()), Some(Rect::new(2, 2, 0, 0)));
        assert_eq!(rows(&buf)[1], "|  |");
    }

    #[test]
    fn shrinking_frame_hides_child_from_earlier_frames() {
        let mut frame = Frame::new().with_child(Text::new("x"));
        let mut buf = GridBuffer::new(10, 3);
        frame.render(&mut buf, Rect::new(0, 0, 10, 3));
        assert!(frame.child().is_some_and(|c| c.contains(2, 2)));

        frame.render(&mut buf, Rect::new(0, 0, 1, 1));
        assert!(frame.child().is_some_and(|c| !c.contains(2, 2)));

        frame.render(&mut buf, Rect::new(0, 0, 10, 3));
        frame.render(&mut buf, Rect::new(0, 0, 2, 2));
        assert!(frame.child().is_some_and(|c| !c.contains(2, 2)));
    }

    #[test]
    fn fill_covers_area_and_styles_border() {
        let mut frame = Frame::new().with_style(ansi::FG_RED).with_fill(ansi::BG_BLUE);
        let buf = draw(&mut frame, 4, 3);
        let full = format!("{}{}", ansi::FG_RED, ansi::BG_BLUE);
        assert_eq!(buf.get_cell(0, 0).style, full);
        assert_eq!(buf.get_cell(1, 1).style, full);
        assert_eq!(buf.get_cell(1, 1).character, " ");
    }

    #[test]
    fn no_fill_leaves_interior_alone() {
        let mut buf = GridBuffer::new(4, 3);
        buf.set_cell(1, 1, "z", ansi::BOLD);
        Frame::new().render(&mut buf, Rect::new(0, 0, 4, 3));
        assert_eq!(buf.get_cell(1, 1).character, "z");
    }

    // ── Preferred height ────────────────────────────────────────────

    #[test]
    fn preferred_height_adds_chrome() {
        let frame = Frame::new().with_padding(1).with_child(Text::new("abcdef"));
        // Inner width 10 - 4 = 6 fits one line.
        assert_eq!(frame.preferred_height(10), 1 + 4);
        // Inner width 3 wraps into 2 lines.
        assert_eq!(frame.preferred_height(7), 2 + 4);
        assert_eq!(Frame::new().preferred_height(10), 2);
    }
}
