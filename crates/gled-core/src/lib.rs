//! # gled-core — Editor core for gled
//!
//! This crate holds everything the editor knows about text, independent of
//! the terminal:
//!
//! - **[`gap_buffer`]** — `GapBuffer`, the cursor-split char store
//! - **[`editor`]** — `Editor`, a gap buffer plus row/column tracking and
//!   line-wise motion
//! - **[`position`]** — `Position` snapshot (1-based row, 0-based columns)
//! - **[`options`]** — `EditorOptions` (tab stop, quit confirmations,
//!   initial capacity)
//! - **[`document`]** — `Document`, an editor bound to a file
//! - **[`search`]** — literal substring search with wrap-around

pub mod document;
pub mod editor;
pub mod gap_buffer;
pub mod options;
pub mod position;
pub mod search;

pub use document::{Document, DocumentError};
pub use editor::Editor;
pub use gap_buffer::GapBuffer;
pub use options::{EditorOptions, OptionsError};
pub use position::Position;
pub use search::SearchSession;
