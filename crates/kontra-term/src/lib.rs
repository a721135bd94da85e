// SPDX-License-Identifier: MIT
//
// kontra-term: terminal rendering engine for kontra.
//
// The bottom layer of the UI stack: a cell grid that nodes render into, a
// diff flush that turns two grids into the fewest cursor moves and style
// switches, a decoder for keyboard and SGR mouse bytes, and raw-mode control
// of the real terminal with restoration on every exit path.
//
// No TUI framework underneath. Every byte sent to the terminal comes from
// `ansi` and is accounted for by the diff renderer.

pub mod ansi;
pub mod backend;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod error;
pub mod input;
pub mod output;
pub mod terminal;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use backend::{Backend, Size};
pub use buffer::{GridBuffer, Rect, Snapshot};
pub use cell::Cell;
pub use diff::{DiffRenderer, RenderStats};
pub use error::{Result, TermError};
pub use input::{Event, Key, MouseEvent, MouseEventKind};
pub use terminal::{Terminal, TerminalConfig};
