//! Pull-based content for text leaves.
//!
//! A [`ContentProvider`] is asked for its text once per frame, during
//! render and preferred-height queries. Static text and owned snapshots
//! cover most cases. A closure covers text that tracks application state;
//! the closure must own (or share through `Rc`/`Arc`) whatever it reads,
//! since nodes are `'static`.

use std::borrow::Cow;
use std::fmt;

/// Where a text leaf gets its content.
pub enum ContentProvider {
    /// A string literal.
    Static(&'static str),
    /// An owned snapshot, replaced explicitly by the application.
    Owned(String),
    /// Recomputed on every fetch.
    Dynamic(Box<dyn Fn() -> String>),
}

impl ContentProvider {
    /// Build a provider from a closure.
    pub fn dynamic(f: impl Fn() -> String + 'static) -> Self {
        Self::Dynamic(Box::new(f))
    }

    /// The current content.
    #[must_use]
    pub fn fetch(&self) -> Cow<'_, str> {
        match self {
            Self::Static(s) => Cow::Borrowed(s),
            Self::Owned(s) => Cow::Borrowed(s.as_str()),
            Self::Dynamic(f) => Cow::Owned(f()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl Default for ContentProvider {
    fn default() -> Self {
        Self::Static("")
    }
}

impl From<&'static str> for ContentProvider {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for ContentProvider {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl fmt::Debug for ContentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Self::Owned(s) => f.debug_tuple("Owned").field(s).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
