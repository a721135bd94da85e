//! Root overlay container.
//!
//! A [`Screen`] renders every child into the same rectangle, in insertion
//! order, so later children draw over earlier ones. It is the usual root
//! handed to the runtime.

use kontra_term::buffer::{GridBuffer, Rect};

use crate::node::{LastRendered, Node};

/// Layers of nodes sharing one rectangle.
#[derive(Default)]
pub struct Screen {
    children: Vec<Box<dyn Node>>,
    last: LastRendered,
}

impl Screen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    pub fn children_mut(&mut self) -> &mut [Box<dyn Node>] {
        &mut self.children
    }

    #[must_use]
    pub fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

impl Node for Screen {
    /// The tallest layer.
    fn preferred_height(&self, width: i32) -> i32 {
        self.children
            .iter()
            .map(|c| c.preferred_height(width))
            .max()
            .unwrap_or(0)
    }

    fn render(&mut self, buf: &mut GridBuffer, area: Rect) {
        self.last.record(area);
        for child in &mut self.children {
            child.render(buf, area);
        }
    }

    fn last_rendered(&self) -> Option<Rect> {
        self.last.get()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("children", &self.children.len())
            .field("last", &self.last)
            .finish()
    }
}
