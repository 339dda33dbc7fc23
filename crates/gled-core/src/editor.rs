//! Editor — a gap buffer plus the cursor coordinates derived from it.
//!
//! The [`Editor`] owns one [`GapBuffer`] and keeps four counters in step
//! with it:
//!
//! | Field        | Meaning                                           |
//! |--------------|---------------------------------------------------|
//! | `row`        | 1 + newlines before the cursor                    |
//! | `col`        | chars since the last newline before the cursor    |
//! | `render_col` | `col` with every tab widened to the next tab stop |
//! | `num_rows`   | 1 + newlines in the whole document                |
//!
//! Moving or editing across an ordinary character adjusts the counters by
//! one. Crossing a newline or a tab *backwards* loses the previous line's
//! width, so `col` and `render_col` are rescanned from the buffer in that
//! case. [`Editor::is_consistent`] compares every counter against a full
//! scan and is asserted after each operation in debug builds.
//!
//! # Vertical motion
//!
//! [`up`](Editor::up) and [`down`](Editor::down) are built entirely from
//! single-character steps. Moving down to a shorter line clamps the column
//! to that line's end; the original column is not remembered across
//! successive moves.
//!
//! # Boundaries
//!
//! Unlike the raw buffer primitives, every editor operation is a silent
//! no-op at a document boundary.

use crate::gap_buffer::{GapBuffer, next_tab_stop};
use crate::options::EditorOptions;
use crate::position::Position;

/// Editing state for one document.
#[derive(Clone)]
pub struct Editor {
    buffer: GapBuffer,

    row: usize,
    col: usize,
    render_col: usize,
    num_rows: usize,

    /// Modification counter. Zero means unmodified since load or save.
    dirty: u64,

    /// Remaining close requests to ignore while the document is dirty.
    /// Refilled to `options.quit_times()` by every edit or motion.
    quit_warnings: u32,

    options: EditorOptions,
}

impl Editor {
    // -- Construction -------------------------------------------------------

    /// Empty editor with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Empty editor with the given options.
    #[must_use]
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            buffer: GapBuffer::new(options.initial_capacity()),
            row: 1,
            col: 0,
            render_col: 0,
            num_rows: 1,
            dirty: 0,
            quit_warnings: options.quit_times(),
            options,
        }
    }

    /// Bulk-load `text` at the cursor, leaving the cursor where the text
    /// begins and the editor clean. Returns the number of chars loaded.
    ///
    /// Every char goes through [`insert`](Self::insert), then the cursor is
    /// stepped back once per char, so the derived counters stay exact.
    pub fn load(&mut self, text: &str) -> usize {
        let mut count = 0;
        for ch in text.chars() {
            self.insert(ch);
            count += 1;
        }
        for _ in 0..count {
            self.backward();
        }
        self.mark_saved();
        count
    }

    // -- Accessors ----------------------------------------------------------

    /// 1-based cursor row.
    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// 0-based cursor column in chars.
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// 0-based cursor column in screen cells.
    #[inline]
    #[must_use]
    pub const fn render_col(&self) -> usize {
        self.render_col
    }

    /// Number of rows in the document.
    #[inline]
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col, self.render_col)
    }

    #[inline]
    #[must_use]
    pub fn is_at_left(&self) -> bool {
        self.buffer.at_left()
    }

    #[inline]
    #[must_use]
    pub fn is_at_right(&self) -> bool {
        self.buffer.at_right()
    }

    /// Char offset of the cursor from the start of the document.
    #[inline]
    #[must_use]
    pub fn cursor_offset(&self) -> usize {
        self.buffer.front_len()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The whole document as a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.contents()
    }

    /// The whole document, char by char.
    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.buffer.chars()
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    // -- Dirty / quit bookkeeping -------------------------------------------

    /// Number of edits since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> u64 {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Forget pending modifications after the text was written out.
    pub const fn mark_saved(&mut self) {
        self.dirty = 0;
    }

    #[inline]
    #[must_use]
    pub const fn quit_warnings(&self) -> u32 {
        self.quit_warnings
    }

    /// Ask to discard this document.
    ///
    /// Returns `Some(n)` when the request must be refused: the document is
    /// dirty and `n` more requests are still needed. The counter drops by one
    /// each time. Returns `None` once closing is allowed.
    pub const fn consume_quit_warning(&mut self) -> Option<u32> {
        if self.dirty > 0 && self.quit_warnings > 0 {
            let remaining = self.quit_warnings;
            self.quit_warnings -= 1;
            Some(remaining)
        } else {
            None
        }
    }

    const fn touch(&mut self) {
        self.quit_warnings = self.options.quit_times();
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` left of the cursor.
    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(ch);
        if ch == '\n' {
            self.num_rows += 1;
        }
        self.step_over(ch);
        self.dirty += 1;
        self.touch();
        self.check();
    }

    /// Delete the char left of the cursor. No-op at the start.
    pub fn delete(&mut self) {
        if self.buffer.at_left() {
            return;
        }
        let ch = self.buffer.delete();
        if ch == '\n' {
            self.num_rows -= 1;
        }
        self.step_back_over(ch);
        self.dirty += 1;
        self.touch();
        self.check();
    }

    /// Delete the char right of the cursor. No-op at the end.
    pub fn delete_forward(&mut self) {
        if self.buffer.at_right() {
            return;
        }
        self.forward();
        self.delete();
    }

    // -- Horizontal motion --------------------------------------------------

    /// Move one char right. No-op at the end.
    pub fn forward(&mut self) {
        if self.buffer.at_right() {
            return;
        }
        let ch = self.buffer.forward();
        self.step_over(ch);
        self.touch();
        self.check();
    }

    /// Move one char left. No-op at the start.
    pub fn backward(&mut self) {
        if self.buffer.at_left() {
            return;
        }
        let ch = self.buffer.backward();
        self.step_back_over(ch);
        self.touch();
        self.check();
    }

    /// Move to the first char of the current line.
    pub fn line_start(&mut self) {
        while self.buffer.char_before().is_some_and(|ch| ch != '\n') {
            self.backward();
        }
        self.touch();
    }

    /// Move past the last char of the current line, before its newline.
    pub fn line_end(&mut self) {
        while self.buffer.char_after().is_some_and(|ch| ch != '\n') {
            self.forward();
        }
        self.touch();
    }

    /// Move the cursor to char offset `offset`, clamped to the document
    /// length.
    pub fn move_to_offset(&mut self, offset: usize) {
        let target = offset.min(self.buffer.len());
        while self.buffer.front_len() > target {
            self.backward();
        }
        while self.buffer.front_len() < target {
            self.forward();
        }
        self.touch();
    }

    // -- Vertical motion ----------------------------------------------------

    /// Move to the previous row, at the same column or that row's end if it
    /// is shorter. On row 1, move to the start of the document.
    pub fn up(&mut self) {
        if self.row == 1 {
            while !self.buffer.at_left() {
                self.backward();
            }
        } else {
            let (orig_row, orig_col) = (self.row, self.col);
            while self.row >= orig_row || self.col > orig_col {
                self.backward();
            }
        }
        self.touch();
    }

    /// Move to the next row, at the same column or that row's end if it is
    /// shorter. On the last row, move to the end of the document.
    pub fn down(&mut self) {
        if self.row == self.num_rows {
            while !self.buffer.at_right() {
                self.forward();
            }
        } else {
            let (orig_row, orig_col) = (self.row, self.col);
            while self.row == orig_row {
                self.forward();
            }
            while self.col < orig_col && self.buffer.char_after().is_some_and(|ch| ch != '\n') {
                self.forward();
            }
        }
        self.touch();
    }

    // -- Counter updates ----------------------------------------------------

    /// Counters after `ch` moved from the right of the cursor to its left.
    fn step_over(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.row += 1;
                self.col = 0;
                self.render_col = 0;
            }
            '\t' => {
                self.col += 1;
                self.render_col = next_tab_stop(self.render_col, self.options.tab_stop());
            }
            _ => {
                self.col += 1;
                self.render_col += 1;
            }
        }
    }

    /// Counters after `ch` left the left side of the cursor.
    fn step_back_over(&mut self, ch: char) {
        match ch {
            '\n' => {
                self.row -= 1;
                self.col = self.buffer.col();
                self.render_col = self.buffer.render_col(self.options.tab_stop());
            }
            '\t' => {
                self.col -= 1;
                self.render_col = self.buffer.render_col(self.options.tab_stop());
            }
            _ => {
                self.col -= 1;
                self.render_col -= 1;
            }
        }
    }

    // -- Invariant ----------------------------------------------------------

    /// True when every derived counter matches a fresh scan of the buffer
    /// and the buffer itself is structurally valid.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.buffer.is_valid()
            && self.row == self.buffer.row()
            && self.col == self.buffer.col()
            && self.render_col == self.buffer.render_col(self.options.tab_stop())
            && self.num_rows == self.buffer.num_rows()
    }

    #[inline]
    fn check(&self) {
        debug_assert!(self.is_consistent(), "editor counters out of step: {self:?}");
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("pos", &self.position())
            .field("num_rows", &self.num_rows)
            .field("dirty", &self.dirty)
            .field("quit_warnings", &self.quit_warnings)
            .field("buffer", &self.buffer)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
