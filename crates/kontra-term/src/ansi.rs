// SPDX-License-Identifier: MIT
//
// ANSI escape sequence catalog.
//
// Two halves:
//
//   - String constants for every control sequence a node may embed in a
//     cell's style (colors, intensity, underline) or that the engine sends
//     around a frame (clear, cursor visibility, mouse reporting). Styles are
//     opaque strings to the grid buffer, so nodes build them by
//     concatenating these constants.
//
//   - Writer functions that put the parameterized sequences (cursor moves)
//     and the mode toggles onto any `impl Write`. No state, no decisions
//     about when to emit; the diff renderer owns that.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// on the wire (the ANSI standard uses 1-based coordinates).
use std::io::{self, Write};

// ─── Cursor & Screen ─────────────────────────────────────────────────────────

/// Erase the whole display (ED 2). Does not move the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J";
/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Save cursor position (SCP).
pub const SAVE_CURSOR: &str = "\x1b[s";
/// Restore cursor position (RCP).
pub const RESTORE_CURSOR: &str = "\x1b[u";
/// Hide the cursor (DECTCEM reset).
pub const HIDE_CURSOR: &str = "\x1b[?25l";
/// Show the cursor (DECTCEM set).
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Erase from the cursor to the end of the screen.
pub const CLEAR_TO_END: &str = "\x1b[J";
/// Erase from the start of the screen to the cursor.
pub const CLEAR_TO_START: &str = "\x1b[1J";
/// Erase from the cursor to the end of the line.
pub const CLEAR_LINE: &str = "\x1b[K";
/// Erase from the start of the line to the cursor.
pub const CLEAR_LINE_TO_START: &str = "\x1b[1K";
/// Erase the entire current line.
pub const CLEAR_ENTIRE_LINE: &str = "\x1b[2K";

// ─── Mouse Reporting ─────────────────────────────────────────────────────────

/// Report every mouse event including motion (DEC 1003).
pub const MOUSE_ALL_MOTION_ON: &str = "\x1b[?1003h";
/// Stop reporting mouse motion.
pub const MOUSE_ALL_MOTION_OFF: &str = "\x1b[?1003l";
/// SGR extended mouse encoding (DEC 1006): `ESC [ < btn ; col ; row M/m`.
pub const MOUSE_SGR_ON: &str = "\x1b[?1006h";
/// Back to the legacy X10 mouse encoding.
pub const MOUSE_SGR_OFF: &str = "\x1b[?1006l";

// ─── Text Styles (SGR) ───────────────────────────────────────────────────────

/// Reset every SGR attribute to the terminal default.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const ITALIC: &str = "\x1b[3m";
pub const UNDERLINE: &str = "\x1b[4m";
pub const INVERSE: &str = "\x1b[7m";
pub const STRIKETHROUGH: &str = "\x1b[9m";

// ─── Foreground Colors ───────────────────────────────────────────────────────

pub const FG_BLACK: &str = "\x1b[30m";
pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_YELLOW: &str = "\x1b[33m";
pub const FG_BLUE: &str = "\x1b[34m";
pub const FG_MAGENTA: &str = "\x1b[35m";
pub const FG_CYAN: &str = "\x1b[36m";
pub const FG_WHITE: &str = "\x1b[37m";

pub const FG_BRIGHT_BLACK: &str = "\x1b[90m";
pub const FG_BRIGHT_RED: &str = "\x1b[91m";
pub const FG_BRIGHT_GREEN: &str = "\x1b[92m";
pub const FG_BRIGHT_YELLOW: &str = "\x1b[93m";
pub const FG_BRIGHT_BLUE: &str = "\x1b[94m";
pub const FG_BRIGHT_MAGENTA: &str = "\x1b[95m";
pub const FG_BRIGHT_CYAN: &str = "\x1b[96m";
pub const FG_BRIGHT_WHITE: &str = "\x1b[97m";

/// Terminal default foreground.
pub const FG_DEFAULT: &str = "\x1b[39m";

// ─── Background Colors ───────────────────────────────────────────────────────

pub const BG_BLACK: &str = "\x1b[40m";
pub const BG_RED: &str = "\x1b[41m";
pub const BG_GREEN: &str = "\x1b[42m";
pub const BG_YELLOW: &str = "\x1b[43m";
pub const BG_BLUE: &str = "\x1b[44m";
pub const BG_MAGENTA: &str = "\x1b[45m";
pub const BG_CYAN: &str = "\x1b[46m";
pub const BG_WHITE: &str = "\x1b[47m";

pub const BG_BRIGHT_BLACK: &str = "\x1b[100m";
pub const BG_BRIGHT_RED: &str = "\x1b[101m";
pub const BG_BRIGHT_GREEN: &str = "\x1b[102m";
pub const BG_BRIGHT_YELLOW: &str = "\x1b[103m";
pub const BG_BRIGHT_BLUE: &str = "\x1b[104m";
pub const BG_BRIGHT_MAGENTA: &str = "\x1b[105m";
pub const BG_BRIGHT_CYAN: &str = "\x1b[106m";
pub const BG_BRIGHT_WHITE: &str = "\x1b[107m";

/// Terminal default background.
pub const BG_DEFAULT: &str = "\x1b[49m";

// ─── Box Drawing ─────────────────────────────────────────────────────────────

/// The six glyphs needed to draw a rectangle outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub top_left: &'static str,
    pub top_right: &'static str,
    pub bottom_left: &'static str,
    pub bottom_right: &'static str,
    pub horizontal: &'static str,
    pub vertical: &'static str,
}

impl BoxChars {
    /// Default outline. ASCII-safe so it renders on every terminal font.
    pub const SINGLE: Self = Self::ASCII;

    /// Double-line outline.
    pub const DOUBLE: Self = Self {
        top_left: "╔",
        top_right: "╗",
        bottom_left: "╚",
        bottom_right: "╝",
        horizontal: "═",
        vertical: "║",
    };

    /// Light outline with rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: "╭",
        top_right: "╮",
        bottom_left: "╰",
        bottom_right: "╯",
        horizontal: "─",
        vertical: "│",
    };

    /// Plain ASCII: `+`, `-`, `|`.
    pub const ASCII: Self = Self {
        top_left: "+",
        top_right: "+",
        bottom_left: "+",
        bottom_right: "+",
        horizontal: "-",
        vertical: "|",
    };
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::SINGLE
    }
}

// ─── Writers ─────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor up `n` rows (CUU).
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD).
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}B")
}

/// Move the cursor right `n` columns (CUF).
#[inline]
pub fn cursor_right(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}C")
}

/// Move the cursor left `n` columns (CUB).
#[inline]
pub fn cursor_left(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}D")
}

/// Hide the cursor.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(HIDE_CURSOR.as_bytes())
}

/// Show the cursor.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(SHOW_CURSOR.as_bytes())
}

/// Clear the entire screen and home the cursor.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_SCREEN.as_bytes())?;
    w.write_all(CURSOR_HOME.as_bytes())
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(RESET.as_bytes())
}

/// Enable all-motion mouse tracking with SGR encoding.
///
/// 1003 is enabled before 1006 so the terminal never reports a single
/// event in the legacy encoding.
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MOUSE_ALL_MOTION_ON.as_bytes())?;
    w.write_all(MOUSE_SGR_ON.as_bytes())
}

/// Disable mouse tracking (reverse order of [`enable_mouse`]).
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MOUSE_ALL_MOTION_OFF.as_bytes())?;
    w.write_all(MOUSE_SGR_OFF.as_bytes())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_is_row_then_column() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn relative_moves() {
        assert_eq!(emit(|w| cursor_up(w, 2)), "\x1b[2A");
        assert_eq!(emit(|w| cursor_down(w, 3)), "\x1b[3B");
        assert_eq!(emit(|w| cursor_right(w, 4)), "\x1b[4C");
        assert_eq!(emit(|w| cursor_left(w, 5)), "\x1b[5D");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_screen_homes_cursor() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J\x1b[H");
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Mouse ───────────────────────────────────────────────────────────

    #[test]
    fn enable_mouse_turns_on_motion_then_sgr() {
        assert_eq!(emit(|w| enable_mouse(w)), "\x1b[?1003h\x1b[?1006h");
    }

    #[test]
    fn disable_mouse_turns_off_both_modes() {
        assert_eq!(emit(|w| disable_mouse(w)), "\x1b[?1003l\x1b[?1006l");
    }

    // ── Catalog ─────────────────────────────────────────────────────────

    #[test]
    fn style_constants_are_sgr() {
        for s in [RESET, BOLD, DIM, ITALIC, UNDERLINE, INVERSE, STRIKETHROUGH] {
            assert!(s.starts_with("\x1b[") && s.ends_with('m'), "{s:?}");
        }
    }

    #[test]
    fn bright_colors_use_aixterm_range() {
        assert_eq!(FG_BRIGHT_RED, "\x1b[91m");
        assert_eq!(BG_BRIGHT_RED, "\x1b[101m");
    }

    #[test]
    fn single_box_is_ascii() {
        let b = BoxChars::default();
        assert_eq!(b, BoxChars::ASCII);
        assert!(b.horizontal.is_ascii() && b.vertical.is_ascii());
    }

    #[test]
    fn double_box_glyphs() {
        assert_eq!(BoxChars::DOUBLE.top_left, "╔");
        assert_eq!(BoxChars::DOUBLE.vertical, "║");
    }
}
