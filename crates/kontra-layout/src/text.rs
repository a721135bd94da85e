//! A wrapped run of styled text.
//!
//! The smallest leaf node. Content comes from a [`ContentProvider`], is
//! split on `\n`, and each line is wrapped by grapheme at the available
//! width. Lines that do not fit in the rectangle are cut off.

use compact_str::CompactString;
use kontra_term::ansi;
use kontra_term::buffer::{grapheme_width, GridBuffer, Rect};
use unicode_segmentation::UnicodeSegmentation;

use crate::content::ContentProvider;
use crate::node::{LastRendered, Node};

/// A text leaf.
///
/// ```
/// use kontra_layout::node::Node;
/// use kontra_layout::text::Text;
///
/// let text = Text::new("hello world");
/// assert_eq!(text.preferred_height(5), 3);
/// ```
#[derive(Debug)]
pub struct Text {
    content: ContentProvider,
    style: CompactString,
    last: LastRendered,
}

impl Text {
    pub fn new(content: impl Into<ContentProvider>) -> Self {
        Self {
            content: content.into(),
            style: CompactString::const_new(ansi::RESET),
            last: LastRendered::default(),
        }
    }

    /// A text leaf whose content is recomputed every frame.
    pub fn dynamic(f: impl Fn() -> String + 'static) -> Self {
        Self::new(ContentProvider::dynamic(f))
    }

    #[must_use]
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = CompactString::from(style);
        self
    }

    pub fn set_content(&mut self, content: impl Into<ContentProvider>) {
        self.content = content.into();
    }

    #[inline]
    #[must_use]
    pub const fn content(&self) -> &ContentProvider {
        &self.content
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }
}

impl Node for Text {
    fn preferred_height(&self, width: i32) -> i32 {
        let text = self.content.fetch();
        i32::try_from(wrap(&text, width).len()).unwrap_or(i32::MAX).max(1)
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        if area.is_empty() {
            return;
        }
        let text = self.content.fetch();
        for (y, line) in (area.y..area.bottom()).zip(wrap(&text, area.width)) {
            buf.put_str(area.x, y, line, &self.style, area.width);
        }
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

/// Break `text` into lines no wider than `width` columns.
///
/// Hard breaks on `\n` are kept, including empty lines. A grapheme wider
/// than `width` gets a line of its own. A non-positive width yields one
/// line per hard break, unwrapped.
#[must_use]
pub fn wrap(text: &str, width: i32) -> Vec<&str> {
    let limit = usize::try_from(width).unwrap_or(0);
    let mut lines = Vec::new();

    for hard in text.split('\n') {
        if limit == 0 {
            lines.push(hard);
            continue;
        }
        let mut start = 0;
        let mut used = 0;
        for (i, g) in hard.grapheme_indices(true) {
            let w = grapheme_width(g);
            if used > 0 && used + w > limit {
                lines.push(&hard[start..i]);
                start = i;
                used = 0;
            }
            used += w;
        }
        lines.push(&hard[start..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── Wrapping ────────────────────────────────────────────────────

    #[test]
    fn wrap_breaks_at_width() {
        assert_eq!(wrap("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap("abc", 3), vec!["abc"]);
    }

    #[test]
    fn wrap_keeps_hard_breaks() {
        assert_eq!(wrap("ab\n\ncd", 10), vec!["ab", "", "cd"]);
    }

    #[test]
    fn wrap_moves_wide_grapheme_to_next_line() {
        assert_eq!(wrap("ab中", 3), vec!["ab", "中"]);
        assert_eq!(wrap("中", 1), vec!["中"]);
    }

    #[test]
    fn wrap_non_positive_width() {
        assert_eq!(wrap("abc\nd", 0), vec!["abc", "d"]);
        assert_eq!(wrap("abc", -3), vec!["abc"]);
    }

    #[test]
    fn wrap_empty_is_one_empty_line() {
        assert_eq!(wrap("", 5), vec![""]);
    }

    // ── Node contract ───────────────────────────────────────────────

    #[test]
    fn preferred_height_counts_wrapped_lines() {
        let t = Text::new("hello world");
        assert_eq!(t.preferred_height(20), 1);
        assert_eq!(t.preferred_height(5), 3);
        assert_eq!(Text::new("").preferred_height(5), 1);
    }

    #[test]
    fn render_draws_and_clips() {
        let mut buf = GridBuffer::new(6, 3);
        let mut t = Text::new("abcdefghij").with_style(ansi::BOLD);
        t.render(&mut buf, Rect::new(1, 0, 4, 2));

        assert_eq!(buf.row_text(0), " abcd ");
        assert_eq!(buf.row_text(1), " efgh ");
        assert_eq!(buf.row_text(2), "      ");
        assert_eq!(buf.get_cell(1, 0).style, ansi::BOLD);
    }

    #[test]
    fn style_defaults_to_reset() {
        assert_eq!(Text::new("a").style(), ansi::RESET);
        assert_eq!(Text::new("a").with_style(ansi::DIM).style(), ansi::DIM);
    }

    #[test]
    fn render_empty_area_draws_nothing() {
        let mut buf = GridBuffer::new(4, 2);
        let mut t = Text::new("xyz");
        t.render(&mut buf, Rect::new(0, 0, 0, 2));
        assert_eq!(buf, GridBuffer::new(4, 2));
        assert!(!t.contains(1, 1));
    }

    #[test]
    fn render_is_idempotent() {
        let mut t = Text::new("repeat me");
        let mut a = GridBuffer::new(5, 3);
        t.render(&mut a, Rect::new(0, 0, 5, 3));
        let mut b = a.clone();
        t.render(&mut b, Rect::new(0, 0, 5, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn dynamic_content_follows_state() {
        let name = Rc::new(RefCell::new(String::from("one")));
        let shared = Rc::clone(&name);
        let mut t = Text::dynamic(move || shared.borrow().clone());

        let mut buf = GridBuffer::new(5, 1);
        let area = buf.bounds();
        t.render(&mut buf, area);
        assert_eq!(buf.row_text(0), "one  ");

        *name.borrow_mut() = String::from("three");
        buf.clear();
        t.render(&mut buf, area);
        assert_eq!(buf.row_text(0), "three");
    }

    #[test]
    fn set_content_replaces_snapshot() {
        let mut t = Text::new("old");
        t.set_content(String::from("new"));
        assert_eq!(t.content().fetch(), "new");
    }
}
