//! Equal-division container.
//!
//! A [`Flex`] lays its children out along one axis and gives each the same
//! extent: the available space, minus padding on both sides and one gap
//! between neighbours, divided by the child count. Integer division
//! truncates and the remainder stays empty at the far end, so 3 children
//! with a gap of 1 in 21 columns each get 6 columns and column 20 is never
//! drawn.
//!
//! The cross axis is passed through whole (minus padding).

use kontra_term::buffer::{GridBuffer, Rect};

use crate::node::{equal_share, LastRendered, Node};

/// The axis children are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Side by side, left to right.
    #[default]
    Row,
    /// Stacked, top to bottom.
    Column,
}

/// A container that splits its rectangle equally among its children.
pub struct Flex {
    direction: Direction,
    children: Vec<Box<dyn Node>>,
    gap: i32,
    padding: i32,
    last: LastRendered,
}

impl Flex {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            children: Vec::new(),
            gap: 0,
            padding: 0,
            last: LastRendered::default(),
        }
    }

    #[must_use]
    pub fn row() -> Self {
        Self::new(Direction::Row)
    }

    #[must_use]
    pub fn column() -> Self {
        Self::new(Direction::Column)
    }

    /// Space between neighbouring children. Negative values count as 0.
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

    pub fn clear(&mut self) {
        self.children.clear();
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

    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    #[must_use]
    pub const fn gap(&self) -> i32 {
        self.gap
    }

    #[inline]
    #[must_use]
    pub const fn padding(&self) -> i32 {
        self.padding
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
    }

    #[must_use]
    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }

    /// The rectangle each child would get inside `area`, in order.
    #[must_use]
    pub fn child_rects(&self, area: Rect) -> Vec<Rect> {
        let inner = area.shrink(self.padding);
        let n = self.children.len();
        let along = match self.direction {
            Direction::Row => inner.width,
            Direction::Column => inner.height,
        };
        let each = equal_share(along, n, self.gap);

        let mut offset = 0_i32;
        let mut rects = Vec::with_capacity(n);
        for _ in 0..n {
            rects.push(match self.direction {
                Direction::Row => Rect::new(inner.x.saturating_add(offset), inner.y, each, inner.height),
                Direction::Column => Rect::new(inner.x, inner.y.saturating_add(offset), inner.width, each),
            });
            offset = offset.saturating_add(each).saturating_add(self.gap);
        }
        rects
    }
}

impl Default for Flex {
    fn default() -> Self {
        Self::row()
    }
}

impl Node for Flex {
    fn preferred_height(&self, width: i32) -> i32 {
        let pad = self.padding.saturating_mul(2);
        let inner_w = width.saturating_sub(pad).max(0);
        let n = self.children.len();

        let content = match self.direction {
            Direction::Row => {
                let each = equal_share(inner_w, n, self.gap);
                self.children
                    .iter()
                    .map(|c| c.preferred_height(each))
                    .max()
                    .unwrap_or(0)
            }
            Direction::Column => {
                let gaps = self.gap.saturating_mul(i32::try_from(n.saturating_sub(1)).unwrap_or(i32::MAX));
                self.children
                    .iter()
                    .fold(gaps, |acc, c| acc.saturating_add(c.preferred_height(inner_w)))
            }
        };

        content.saturating_add(pad)
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        if area.is_empty() {
            for child in &mut self.children {
                child.render(buf, Rect::new(area.x, area.y, 0, 0));
            }
            return;
        }
        let rects = self.child_rects(area);
        for (child, rect) in self.children.iter_mut().zip(rects) {
            child.render(buf, rect);
        }
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

impl std::fmt::Debug for Flex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flex")
            .field("direction", &self.direction)
            .field("children", &self.children.len())
            .field("gap", &self.gap)
            .field("padding", &self.padding)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Text;
    use pretty_assertions::assert_eq;

    fn three_letters(direction: Direction) -> Flex {
        Flex::new(direction)
            .with_child(Text::new("aaaaaaaaaa"))
            .with_child(Text::new("bbbbbbbbbb"))
            .with_child(Text::new("cccccccccc"))
    }

    // ── Division ────────────────────────────────────────────────────

    #[test]
    fn row_truncates_remainder() {
        let flex = three_letters(Direction::Row).with_gap(1);
        let rects = flex.child_rects(Rect::new(0, 0, 21, 1));
        assert_eq!(
            rects,
            vec![Rect::new(0, 0, 6, 1), Rect::new(7, 0, 6, 1), Rect::new(14, 0, 6, 1)]
        );
    }

    #[test]
    fn row_leaves_last_column_undrawn() {
        let mut flex = Flex::row()
            .with_gap(1)
            .with_child(Text::new("xxxxxxxxxx"))
            .with_child(Text::new("xxxxxxxxxx"))
            .with_child(Text::new("xxxxxxxxxx"));
        let mut buf = GridBuffer::new(21, 1);
        flex.render(&mut buf, Rect::new(0, 0, 21, 1));
        assert_eq!(buf.row_text(0), "xxxxxx xxxxxx xxxxxx ");
    }

    #[test]
    fn column_divides_height() {
        let flex = three_letters(Direction::Column).with_padding(1);
        let rects = flex.child_rects(Rect::new(0, 0, 10, 11));
        assert_eq!(
            rects,
            vec![Rect::new(1, 1, 8, 3), Rect::new(1, 4, 8, 3), Rect::new(1, 7, 8, 3)]
        );
    }

    #[test]
    fn too_small_gives_empty_children() {
        let mut flex = three_letters(Direction::Row).with_gap(4);
        let mut buf = GridBuffer::new(6, 1);
        flex.render(&mut buf, Rect::new(0, 0, 6, 1));
        assert_eq!(buf, GridBuffer::new(6, 1));
        assert!(flex.children().iter().all(|c| !c.contains(1, 1)));
        assert!(flex.contains(1, 1));
    }

    #[test]
    fn no_children_renders_nothing() {
        let mut flex = Flex::column();
        let mut buf = GridBuffer::new(4, 4);
        flex.render(&mut buf, Rect::new(0, 0, 4, 4));
        assert_eq!(buf, GridBuffer::new(4, 4));
        assert!(flex.is_empty());
    }

    #[test]
    fn empty_area_hides_children_from_earlier_frames() {
        let mut flex = Flex::row().with_child(Text::new("x"));
        let mut buf = GridBuffer::new(10, 3);
        flex.render(&mut buf, Rect::new(0, 0, 10, 3));
        assert!(flex.children()[0].contains(1, 1));

        flex.render(&mut buf, Rect::new(0, 0, 0, 0));
        assert!(!flex.contains(1, 1));
        assert!(!flex.children()[0].contains(1, 1));
    }

    // ── Preferred height ────────────────────────────────────────────

    #[test]
    fn row_prefers_tallest_child() {
        let flex = Flex::row()
            .with_gap(1)
            .with_child(Text::new("ab"))
            .with_child(Text::new("abcdefghij"));
        // Each child gets (9 - 1) / 2 = 4 columns; the second wraps to 3 lines.
        assert_eq!(flex.preferred_height(9), 3);
        assert_eq!(flex.with_padding(1).preferred_height(11), 5);
    }

    #[test]
    fn column_sums_children() {
        let flex = Flex::column()
            .with_gap(2)
            .with_child(Text::new("a"))
            .with_child(Text::new("b\nc"));
        assert_eq!(flex.preferred_height(10), 1 + 2 + 2);
    }

    // ── Hit-testing ─────────────────────────────────────────────────

    #[test]
    fn children_hit_test_their_share() {
        let mut flex = three_letters(Direction::Row);
        let mut buf = GridBuffer::new(9, 1);
        flex.render(&mut buf, Rect::new(0, 0, 9, 1));

        let hits: Vec<bool> = flex.children().iter().map(|c| c.contains(5, 1)).collect();
        assert_eq!(hits, vec![false, true, false]);
    }
}
