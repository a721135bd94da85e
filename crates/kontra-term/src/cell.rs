// SPDX-License-Identifier: MIT
//
// Cell: the atomic unit of terminal rendering.
//
// Every character position on screen is a Cell: the grapheme to print and
// the style string to apply before printing it. The style is opaque to the
// engine. It is a sequence of control codes (usually SGR escapes built from
// `ansi` constants) and it is order-sensitive, so two cells are only
// considered the same style when their strings match byte for byte.
//
// Both fields are `CompactString`s. A grapheme and a typical SGR string fit
// in the 24-byte inline representation, so cells never touch the heap in
// the common case and a cleared grid is a flat memset-like fill.
//
// Wide graphemes (CJK, some emoji) occupy two columns. The first cell holds
// the grapheme; the second is a continuation cell with an empty character.
// The renderer positions the cursor for a continuation cell but prints
// nothing there.

use compact_str::CompactString;

use crate::ansi;

/// The character of a default cell.
const SPACE: &str = " ";

/// A single terminal cell: one grapheme plus the style to print it with.
///
/// Equality is structural: two cells are equal when both the character and
/// the style string match. The diff renderer relies on this.
///
/// ```
/// use kontra_term::cell::Cell;
/// use kontra_term::ansi;
///
/// let a = Cell::new("A", ansi::FG_RED);
/// assert_eq!(a, Cell::new("A", ansi::FG_RED));
/// assert_ne!(a, Cell::new("A", ansi::FG_BLUE));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The grapheme to print. Empty for continuation cells.
    pub character: CompactString,
    /// Control codes applied before printing `character`.
    pub style: CompactString,
}

impl Cell {
    /// Create a cell from a grapheme and a style string.
    #[must_use]
    pub fn new(character: &str, style: &str) -> Self {
        Self {
            character: CompactString::new(character),
            style: CompactString::new(style),
        }
    }

    /// A blank cell: a space in the reset style.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(SPACE, ansi::RESET)
    }

    /// The trailing half of a wide grapheme.
    #[must_use]
    pub fn continuation(style: &str) -> Self {
        Self::new("", style)
    }

    /// Whether this is a continuation cell (second column of a wide grapheme).
    #[inline]
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.character.is_empty()
    }

    /// Whether this cell is identical to [`Cell::blank`].
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.character == SPACE && self.style == ansi::RESET
    }

    /// Whether two cells share the same style string, regardless of character.
    #[inline]
    #[must_use]
    pub fn same_style(&self, other: &Self) -> bool {
        self.style == other.style
    }

    /// Reset this cell to blank in place.
    ///
    /// Reuses the existing inline storage instead of building a new cell.
    pub fn reset(&mut self) {
        self.character.clear();
        self.character.push_str(SPACE);
        self.style.clear();
        self.style.push_str(ansi::RESET);
    }

    /// Overwrite character and style in place.
    pub fn assign(&mut self, character: &str, style: &str) {
        self.character.clear();
        self.character.push_str(character);
        self.style.clear();
        self.style.push_str(style);
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::blank()
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            return write!(f, "Cell(continuation)");
        }
        write!(f, "Cell({:?}", self.character.as_str())?;
        if self.style != ansi::RESET {
            write!(f, ", style={:?}", self.style.as_str())?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Default ─────────────────────────────────────────────────────────

    #[test]
    fn default_cell_is_space_in_reset_style() {
        let cell = Cell::default();
        assert_eq!(cell.character, " ");
        assert_eq!(cell.style, ansi::RESET);
        assert!(cell.is_blank());
    }

    #[test]
    fn styled_cell_is_not_blank() {
        assert!(!Cell::new(" ", ansi::BG_BLUE).is_blank());
        assert!(!Cell::new("x", ansi::RESET).is_blank());
    }

    // ── Equality ────────────────────────────────────────────────────────

    #[test]
    fn equality_requires_character_and_style() {
        let a = Cell::new("A", ansi::BOLD);
        assert_eq!(a, Cell::new("A", ansi::BOLD));
        assert_ne!(a, Cell::new("B", ansi::BOLD));
        assert_ne!(a, Cell::new("A", ansi::ITALIC));
    }

    #[test]
    fn style_is_order_sensitive() {
        let a = Cell::new("A", "\x1b[1m\x1b[31m");
        let b = Cell::new("A", "\x1b[31m\x1b[1m");
        assert_ne!(a, b);
        assert!(!a.same_style(&b));
    }

    #[test]
    fn same_style_ignores_character() {
        let a = Cell::new("A", ansi::FG_RED);
        let b = Cell::new("B", ansi::FG_RED);
        assert!(a.same_style(&b));
        assert_ne!(a, b);
    }

    // ── Graphemes ───────────────────────────────────────────────────────

    #[test]
    fn multi_codepoint_grapheme_is_one_cell() {
        let cell = Cell::new("e\u{301}", ansi::RESET);
        assert_eq!(cell.character.as_str(), "e\u{301}");
    }

    #[test]
    fn continuation_has_empty_character() {
        let cell = Cell::continuation(ansi::FG_GREEN);
        assert!(cell.is_continuation());
        assert_eq!(cell.style, ansi::FG_GREEN);
    }

    // ── Mutation ────────────────────────────────────────────────────────

    #[test]
    fn reset_restores_blank() {
        let mut cell = Cell::new("Z", ansi::INVERSE);
        cell.reset();
        assert_eq!(cell, Cell::blank());
    }

    #[test]
    fn assign_overwrites_both_fields() {
        let mut cell = Cell::blank();
        cell.assign("#", ansi::FG_CYAN);
        assert_eq!(cell, Cell::new("#", ansi::FG_CYAN));
    }

    // ── Debug ───────────────────────────────────────────────────────────

    #[test]
    fn debug_blank_omits_style() {
        assert_eq!(format!("{:?}", Cell::blank()), "Cell(\" \")");
    }

    #[test]
    fn debug_styled_includes_style() {
        let dbg = format!("{:?}", Cell::new("A", ansi::BOLD));
        assert!(dbg.contains("\"A\""));
        assert!(dbg.contains("style="));
    }

    #[test]
    fn debug_continuation() {
        assert_eq!(format!("{:?}", Cell::continuation("")), "Cell(continuation)");
    }
}
