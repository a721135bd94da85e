//! # kontra-layout: Layout and render contract for kontra
//!
//! Everything that draws into a [`GridBuffer`](kontra_term::buffer::GridBuffer)
//! implements [`Node`]. This crate holds that contract and the containers
//! built on it:
//!
//! - **[`node`]**: the `Node` trait, last-rendered tracking, hit-testing, downcasting
//! - **[`content`]**: `ContentProvider`, the per-frame source of text
//! - **[`text`]**: `Text`, a wrapped styled text leaf
//! - **[`flex`]**: `Flex`, equal division along a row or column
//! - **[`list`]**: `List`, preferred-height stacking with scroll and scrollbar
//! - **[`frame`]**: `Frame`, an outline with optional title, fill and padding
//! - **[`sized`]**: `FixedBox`, caps a child to a fixed width and height
//! - **[`screen`]**: `Screen`, the root that layers children over one rectangle
//!
//! Trees are single-owner: each container owns its children as
//! `Box<dyn Node>`.

pub mod content;
pub mod flex;
pub mod frame;
pub mod list;
pub mod node;
pub mod screen;
pub mod sized;
pub mod text;

pub use content::ContentProvider;
pub use flex::{Direction, Flex};
pub use frame::{Frame, TitleAlignment};
pub use list::{scrollbar_metrics, List, ScrollbarMetrics};
pub use node::{downcast_mut, downcast_ref, LastRendered, Node};
pub use screen::Screen;
pub use sized::FixedBox;
pub use text::Text;
