// SPDX-License-Identifier: MIT
//
// kontra: a small terminal UI runtime.
//
// Three layers, bottom up:
//
//   kontra-term    cell grid, diff flush, input decoding, raw-mode terminal
//   kontra-layout  the Node render contract and its containers
//   kontra         the runtime loop that ties them together (this crate)
//
// Both member crates are re-exported as `term` and `layout`, so an
// application needs only this one dependency.

pub mod error;
pub mod runtime;

pub use kontra_layout as layout;
pub use kontra_term as term;

pub use error::{AppError, Result, RuntimeError};
pub use runtime::{App, Control, Runtime, RuntimeConfig, QUIT_KEY};
