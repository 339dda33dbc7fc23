// SPDX-License-Identifier: MIT
//
// gled-term — Terminal layer for gled.
//
// Direct terminal control through ANSI escape sequences and raw termios,
// with no TUI framework in between: raw mode and the alternate screen
// (`terminal`), escape encoding (`ansi`), a cell grid (`frame`) rendered
// row-by-row against the previous frame (`diff`), key parsing (`input`),
// a background stdin thread (`reader`), and the loop tying them together
// (`event_loop`).

pub mod ansi;
pub mod diff;
pub mod event_loop;
pub mod frame;
pub mod input;
pub mod reader;
pub mod terminal;
