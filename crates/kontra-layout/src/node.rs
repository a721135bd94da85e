//! The render contract every visual node implements.
//!
//! A node knows two things: how tall it would like to be at a given width,
//! and how to draw itself into a rectangle of a [`GridBuffer`]. Containers
//! are nodes too; they split the rectangle they receive and hand the pieces
//! to their children.
//!
//! # Ownership
//!
//! Trees are strictly single-owner: a container holds its children as
//! `Box<dyn Node>`, so one node instance can never sit under two parents.
//! Applications reach into the tree through `children_mut()` and
//! [`downcast_mut`].
//!
//! # Hit-testing
//!
//! Every `render` records the rectangle it was given. [`Node::contains`]
//! compares a 1-based mouse position against that rectangle, and returns
//! `false` until the first render.

use std::any::Any;

use kontra_term::buffer::{GridBuffer, Rect};

/// A visual node in the layout tree.
///
/// Implementations must keep `preferred_height` free of side effects and
/// stable within a frame. `render` must draw nothing when `area` is empty
/// (zero or negative extent) and must leave the buffer identical when called
/// twice with the same area and state.
pub trait Node: Any {
    /// Height this node would like at `width`. Never negative.
    fn preferred_height(&self, _width: i32) -> i32 {
        1
    }

    /// Draw into `area` of `buf` and remember `area` for hit-testing.
    fn render(&mut self, buf: &mut GridBuffer, area: Rect);

    /// The rectangle passed to the most recent `render`, if any.
    fn last_rendered(&self) -> Option<Rect>;

    /// Whether the 1-based mouse position `(mouse_x, mouse_y)` falls inside
    /// the last rendered rectangle.
    fn contains(&self, mouse_x: i32, mouse_y: i32) -> bool {
        self.last_rendered()
            .is_some_and(|r| r.contains(mouse_x - 1, mouse_y - 1))
    }
}

/// Reach the concrete type behind a `dyn Node`.
///
/// ```
/// use kontra_layout::node::{downcast_mut, Node};
/// use kontra_layout::text::Text;
///
/// let mut node: Box<dyn Node> = Box::new(Text::new("hi"));
/// assert!(downcast_mut::<Text>(node.as_mut()).is_some());
/// ```
pub fn downcast_mut<'a, T: Node>(node: &'a mut (dyn Node + 'static)) -> Option<&'a mut T> {
    let any: &'a mut (dyn Any + 'static) = node;
    any.downcast_mut()
}

/// Shared-reference counterpart of [`downcast_mut`].
pub fn downcast_ref<'a, T: Node>(node: &'a (dyn Node + 'static)) -> Option<&'a T> {
    let any: &'a (dyn Any + 'static) = node;
    any.downcast_ref()
}

/// The last rectangle a node was rendered into.
///
/// Every node embeds one and calls [`record`](Self::record) at the top of
/// `render`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastRendered(Option<Rect>);

impl LastRendered {
    #[inline]
    pub const fn record(&mut self, area: Rect) {
        self.0 = Some(area);
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> Option<Rect> {
        self.0
    }

    /// Forget the rectangle, as if never rendered.
    #[inline]
    pub const fn clear(&mut self) {
        self.0 = None;
    }
}

/// Split `total` into `count` equal parts separated by `gap`.
///
/// Returns the size of one part. The remainder of the integer division is
/// left unused. Never negative.
#[must_use]
pub fn equal_share(total: i32, count: usize, gap: i32) -> i32 {
    let Ok(n) = i32::try_from(count) else {
        return 0;
    };
    if n == 0 {
        return 0;
    }
    let gaps = gap.saturating_mul(n - 1);
    (total.saturating_sub(gaps)).max(0) / n
}
