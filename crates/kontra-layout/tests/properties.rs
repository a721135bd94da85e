//! Property tests for the layout containers.
//!
//! 1. Equal division: every child gets `(extent - gaps) / n`, the remainder
//!    stays unused, and neighbours never overlap.
//! 2. Preferred-height summation in the stacking container.
//! 3. Scrollbar thumb stays inside the track and is at least one row.
//! 4. Hit-testing: false before render, then true iff the 0-based point lies
//!    inside the last rectangle.
//! 5. Rendering never writes outside the rectangle it was given.

use kontra_layout::flex::Flex;
use kontra_layout::frame::Frame;
use kontra_layout::list::{scrollbar_metrics, List};
use kontra_layout::node::{LastRendered, Node};
use kontra_layout::text::Text;
use kontra_term::buffer::{GridBuffer, Rect};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// A leaf with a fixed preferred height that fills whatever it is given.
struct Block {
    height: i32,
    last: LastRendered,
}

impl Block {
    fn new(height: i32) -> Self {
        Self { height, last: LastRendered::default() }
    }
}

impl Node for Block {
    fn preferred_height(&self, _width: i32) -> i32 {
        self.height
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        buf.fill(area, "#", "");
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-5i32..30, -5i32..30, -3i32..40, -3i32..40).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Equal division
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn three_children_in_twenty_one_columns_get_six_each() {
    let flex = Flex::row()
        .with_gap(1)
        .with_child(Block::new(1))
        .with_child(Block::new(1))
        .with_child(Block::new(1));
    let widths: Vec<i32> = flex.child_rects(Rect::new(0, 0, 21, 1)).iter().map(|r| r.width).collect();
    assert_eq!(widths, vec![6, 6, 6]);
}

proptest! {
    #[test]
    fn equal_division_truncates_and_never_overlaps(
        n in 1usize..8,
        width in 0i32..120,
        gap in 0i32..4,
        padding in 0i32..3,
    ) {
        let mut flex = Flex::row().with_gap(gap).with_padding(padding);
        for _ in 0..n {
            flex.push(Block::new(1));
        }
        let area = Rect::new(0, 0, width, 3);
        let rects = flex.child_rects(area);

        let inner = (width - 2 * padding).max(0);
        let gaps = gap * (i32::try_from(n).unwrap() - 1);
        let expected = (inner - gaps).max(0) / i32::try_from(n).unwrap();

        prop_assert_eq!(rects.len(), n);
        for pair in rects.windows(2) {
            prop_assert!(pair[0].right() + gap == pair[1].x);
        }
        for r in &rects {
            prop_assert_eq!(r.width, expected);
        }
        if expected > 0 {
            prop_assert!(rects[n - 1].right() <= width - padding);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Preferred-height summation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn one_two_three_with_gap_one_is_eight() {
    let list = List::new()
        .with_gap(1)
        .with_child(Block::new(1))
        .with_child(Block::new(2))
        .with_child(Block::new(3));
    assert_eq!(list.preferred_height(20), 8);
}

proptest! {
    #[test]
    fn list_height_is_sum_plus_gaps_plus_padding(
        heights in prop::collection::vec(0i32..10, 0..10),
        gap in 0i32..4,
        padding in 0i32..4,
        width in 0i32..80,
    ) {
        let mut list = List::new().with_gap(gap).with_padding(padding);
        for &h in &heights {
            list.push(Block::new(h));
        }
        let n = i32::try_from(heights.len()).unwrap();
        let expected = heights.iter().sum::<i32>() + gap * (n - 1).max(0) + 2 * padding;
        prop_assert_eq!(list.preferred_height(width), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Scrollbar sizing
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn viewport_ten_over_fifty_gives_thumb_two() {
    assert_eq!(scrollbar_metrics(10, 50, 0).map(|m| m.thumb_size), Some(2));
}

proptest! {
    #[test]
    fn thumb_stays_in_track(viewport in 1i32..200, extra in 1i32..2000, offset in -50i32..3000) {
        let content = viewport + extra;
        let m = scrollbar_metrics(viewport, content, offset).unwrap();
        prop_assert!(m.thumb_size >= 1);
        prop_assert!(m.thumb_size <= viewport);
        prop_assert!(m.thumb_pos >= 0);
        prop_assert!(m.thumb_pos + m.thumb_size <= viewport);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Hit-testing lifecycle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn contains_tracks_last_render(
        first in rect_strategy(),
        second in rect_strategy(),
        mx in -5i32..50,
        my in -5i32..50,
    ) {
        let mut text = Text::new("hit");
        prop_assert!(!text.contains(mx, my));

        let mut buf = GridBuffer::new(30, 30);
        text.render(&mut buf, first);
        text.render(&mut buf, second);
        prop_assert_eq!(text.contains(mx, my), second.contains(mx - 1, my - 1));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Rendering stays inside its rectangle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn containers_draw_only_inside_area(area in rect_strategy(), heights in prop::collection::vec(1i32..4, 1..6)) {
        let mut list = List::new().with_gap(1);
        for &h in &heights {
            list.push(Block::new(h));
        }
        let mut root = Frame::new().with_title("t").with_child(list);

        let mut buf = GridBuffer::new(30, 30);
        root.render(&mut buf, area);

        for y in 0..30u16 {
            for x in 0..30u16 {
                if !area.contains(i32::from(x), i32::from(y)) {
                    prop_assert!(buf.get_cell(x, y).is_blank(), "stray write at ({}, {})", x, y);
                }
            }
        }
    }
}
