//! Fixed-size container.
//!
//! A [`FixedBox`] clamps the rectangle its child receives to a fixed width
//! and/or height. An unset dimension passes the available size through. The
//! child never gets more than the space actually available.

use kontra_term::buffer::{GridBuffer, Rect};

use crate::node::{LastRendered, Node};

/// Caps the size of one child.
pub struct FixedBox {
    child: Box<dyn Node>,
    width: Option<i32>,
    height: Option<i32>,
    last: LastRendered,
}

impl FixedBox {
    pub fn new(child: impl Node) -> Self {
        Self {
            child: Box::new(child),
            width: None,
            height: None,
            last: LastRendered::default(),
        }
    }

    /// Negative values count as 0.
    #[must_use]
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width.max(0));
        self
    }

    /// Negative values count as 0.
    #[must_use]
    pub fn with_height(mut self, height: i32) -> Self {
        self.height = Some(height.max(0));
        self
    }

    #[inline]
    #[must_use]
    pub const fn fixed_width(&self) -> Option<i32> {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn fixed_height(&self) -> Option<i32> {
        self.height
    }

    pub fn child_mut(&mut self) -> &mut (dyn Node + 'static) {
        self.child.as_mut()
    }

    #[must_use]
    pub fn child(&self) -> &(dyn Node + 'static) {
        self.child.as_ref()
    }

    /// The rectangle the child gets inside `area`.
    #[must_use]
    pub fn clamp(&self, area: Rect) -> Rect {
        Rect::new(
            area.x,
            area.y,
            self.width.map_or(area.width, |w| w.min(area.width)),
            self.height.map_or(area.height, |h| h.min(area.height)),
        )
    }
}

impl Node for FixedBox {
    fn preferred_height(&self, width: i32) -> i32 {
        match self.height {
            Some(h) => h,
            None => self.child.preferred_height(self.width.unwrap_or(width)).max(0),
        }
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        let inner = self.clamp(area);
        self.child.render(buf, inner);
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

impl std::fmt::Debug for FixedBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedBox")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
