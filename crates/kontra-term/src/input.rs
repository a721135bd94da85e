// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns the raw bytes of one non-blocking read into structured events:
// keys, arrows and SGR mouse reports. Grammar, applied left to right with
// the longest valid match first:
//
//   0x0A / 0x0D            Enter
//   0x08 / 0x7F            Backspace
//   0x09                   Tab
//   other C0 bytes         Char(control char), so Ctrl+Q (0x11) reaches
//                          the runtime's quit check
//   ESC [ A|B|C|D          Up / Down / Right / Left
//   ESC [ < b ; x ; y M|m  SGR mouse report
//   ESC anything else      Escape (only the ESC byte is consumed)
//   printable ASCII        Char
//   UTF-8 sequence         Char of the decoded scalar
//
// # Design
//
// The decoder is stateless. Each read is decoded on its own and nothing is
// carried over, so a sequence split across two reads degrades into an
// Escape followed by literal keys instead of stalling the loop. Malformed
// input never raises and never blocks: whatever does not parse becomes
// individual key presses.

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(Key),
    Mouse(MouseEvent),
}

/// Identity of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character, including C0 control characters other than the named keys.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

/// A mouse report. `column` and `row` are 1-based, as sent by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
}

/// The mouse actions the engine models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Primary button (button code 0).
    Press,
    /// Wheel up (button code 64).
    ScrollUp,
    /// Wheel down (button code 65).
    ScrollDown,
}

impl Event {
    /// Shorthand for `Event::Key(Key::Char(c))`.
    #[inline]
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::Key(Key::Char(c))
    }

    /// The character of a `Key::Char` event.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Key(Key::Char(c)) => Some(*c),
            _ => None,
        }
    }

    /// The mouse report, if this is one.
    #[must_use]
    pub const fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Self::Mouse(m) => Some(m),
            Self::Key(_) => None,
        }
    }
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, column: u16, row: u16) -> Self {
        Self { kind, column, row }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Decode `bytes` and append the events to `out`, in input order.
///
/// ```
/// use kontra_term::input::{decode, Event, Key, MouseEvent, MouseEventKind};
///
/// let mut events = Vec::new();
/// decode(b"a\x1b[A\x1b[<0;10;5M", &mut events);
/// assert_eq!(events, vec![
///     Event::char('a'),
///     Event::Key(Key::Up),
///     Event::Mouse(MouseEvent::new(MouseEventKind::Press, 10, 5)),
/// ]);
/// ```
pub fn decode(bytes: &[u8], out: &mut Vec<Event>) {
    let mut pos = 0;
    while pos < bytes.len() {
        match decode_one(&bytes[pos..]) {
            Parsed::Event(event, consumed) => {
                out.push(event);
                pos += consumed;
            }
            Parsed::Skip(consumed) => pos += consumed,
        }
    }
}

/// Decode `bytes` into a fresh vector.
#[must_use]
pub fn decode_all(bytes: &[u8]) -> Vec<Event> {
    let mut out = Vec::new();
    decode(bytes, &mut out);
    out
}

/// Outcome of decoding at one position. Both arms consume at least one byte.
enum Parsed {
    Event(Event, usize),
    Skip(usize),
}

const ESC: u8 = 0x1B;

fn decode_one(buf: &[u8]) -> Parsed {
    match buf[0] {
        ESC => decode_escape(buf),
        b'\n' | b'\r' => key(Key::Enter, 1),
        0x08 | 0x7F => key(Key::Backspace, 1),
        b'\t' => key(Key::Tab, 1),
        b @ 0x00..=0x7E => key(Key::Char(char::from(b)), 1),
        _ => decode_utf8(buf),
    }
}

fn decode_escape(buf: &[u8]) -> Parsed {
    if buf.get(1) != Some(&b'[') {
        return key(Key::Escape, 1);
    }
    match buf.get(2) {
        Some(b'A') => key(Key::Up, 3),
        Some(b'B') => key(Key::Down, 3),
        Some(b'C') => key(Key::Right, 3),
        Some(b'D') => key(Key::Left, 3),
        Some(b'<') => decode_sgr_mouse(buf).unwrap_or_else(|| key(Key::Escape, 1)),
        _ => key(Key::Escape, 1),
    }
}

/// `ESC [ < btn ; col ; row (M|m)`.
///
/// Returns `None` when the report is malformed or unterminated, so the
/// caller can fall back to literal keys.
fn decode_sgr_mouse(buf: &[u8]) -> Option<Parsed> {
    const START: usize = 3;

    let end = START
        + buf[START..]
            .iter()
            .position(|&b| b == b'M' || b == b'm')?;
    let params = &buf[START..end];
    if !params.iter().all(|&b| b.is_ascii_digit() || b == b';') {
        return None;
    }

    let mut fields = params.split(|&b| b == b';').map(parse_u16);
    let (Some(Some(btn)), Some(Some(column)), Some(Some(row)), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    let consumed = end + 1;
    let kind = match btn {
        0 => MouseEventKind::Press,
        64 => MouseEventKind::ScrollUp,
        65 => MouseEventKind::ScrollDown,
        // Well-formed but unmodeled: motion, other buttons, releases.
        _ => return Some(Parsed::Skip(consumed)),
    };
    Some(Parsed::Event(
        Event::Mouse(MouseEvent::new(kind, column, row)),
        consumed,
    ))
}

/// A complete UTF-8 scalar, or the lead byte alone as a Latin-1 key press.
fn decode_utf8(buf: &[u8]) -> Parsed {
    let lead = buf[0];
    let expected = match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return key(Key::Char(char::from(lead)), 1),
    };
    buf.get(..expected)
        .and_then(|seq| std::str::from_utf8(seq).ok())
        .and_then(|s| s.chars().next())
        .map_or_else(
            || key(Key::Char(char::from(lead)), 1),
            |ch| key(Key::Char(ch), expected),
        )
}

#[inline]
const fn key(k: Key, consumed: usize) -> Parsed {
    Parsed::Event(Event::Key(k), consumed)
}

/// A non-empty run of ASCII digits that fits in `u16`.
fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u16::from(d - b'0'))
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
