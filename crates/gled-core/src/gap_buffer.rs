//! Gap buffer — the character store behind every document.
//!
//! The text is split at the cursor into two stacks:
//!
//! - `front` holds everything before the cursor, in document order.
//! - `back` holds everything after the cursor, in **reverse** document order,
//!   so the character immediately right of the cursor is `back`'s last
//!   element.
//!
//! Moving the cursor one step pops from one stack and pushes onto the other,
//! and inserting or deleting at the cursor touches only the end of `front`.
//! All of these are amortized O(1).
//!
//! # Capacity
//!
//! Both stacks share one logical `capacity`. A stack that is about to receive
//! a character must keep at least two free slots; when it would not, **both**
//! stacks are regrown together to `capacity × GROWTH_FACTOR`. The resulting
//! invariant, checked by [`GapBuffer::is_valid`], is
//!
//! ```text
//! front.len() < capacity  &&  back.len() < capacity
//! ```
//!
//! # Position scans
//!
//! [`row`](GapBuffer::row), [`col`](GapBuffer::col),
//! [`render_col`](GapBuffer::render_col) and
//! [`num_rows`](GapBuffer::num_rows) recompute cursor coordinates from
//! scratch. They cost O(length of the scanned side) and exist so the editor
//! layer can resynchronize after crossing a newline or a tab.

use std::fmt::{self, Write as _};

/// Factor by which both stacks grow when either one runs out of room.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity used by [`GapBuffer::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Free slots a stack must have before it accepts another character.
const MIN_FREE: usize = 2;

/// The render column reached after a tab typed at `render_col`.
///
/// A tab advances to the next multiple of `tab_stop`, so a tab at column 0
/// lands on `tab_stop` and a tab at column 3 (with stop 8) lands on 8.
///
/// # Panics
///
/// Panics if `tab_stop` is zero.
#[inline]
#[must_use]
pub const fn next_tab_stop(render_col: usize, tab_stop: usize) -> usize {
    render_col + tab_stop - render_col % tab_stop
}

/// A cursor-split character buffer.
///
/// Cursor primitives ([`forward`](Self::forward),
/// [`backward`](Self::backward), [`delete`](Self::delete),
/// [`delete_right`](Self::delete_right)) have preconditions the caller must
/// check with [`at_left`](Self::at_left) / [`at_right`](Self::at_right).
/// Violating them is a programmer error and panics.
#[derive(Clone)]
pub struct GapBuffer {
    front: Vec<char>,
    back: Vec<char>,
    capacity: usize,
}

impl GapBuffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with the cursor at position 0.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity` is zero.
    #[must_use]
    pub fn new(initial_capacity: usize) -> Self {
        assert!(initial_capacity > 0, "gap buffer capacity must be positive");
        Self {
            front: Vec::with_capacity(initial_capacity),
            back: Vec::with_capacity(initial_capacity),
            capacity: initial_capacity,
        }
    }

    // -- Cursor queries -----------------------------------------------------

    /// True when the cursor is at the start of the document.
    #[inline]
    #[must_use]
    pub fn at_left(&self) -> bool {
        self.front.is_empty()
    }

    /// True when the cursor is at the end of the document.
    #[inline]
    #[must_use]
    pub fn at_right(&self) -> bool {
        self.back.is_empty()
    }

    /// The character immediately left of the cursor.
    #[inline]
    #[must_use]
    pub fn char_before(&self) -> Option<char> {
        self.front.last().copied()
    }

    /// The character immediately right of the cursor.
    #[inline]
    #[must_use]
    pub fn char_after(&self) -> Option<char> {
        self.back.last().copied()
    }

    /// Characters before the cursor. Equal to the cursor's char offset.
    #[inline]
    #[must_use]
    pub fn front_len(&self) -> usize {
        self.front.len()
    }

    /// Characters after the cursor.
    #[inline]
    #[must_use]
    pub fn back_len(&self) -> usize {
        self.back.len()
    }

    /// Total characters in the document.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    /// True when the document holds no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// The logical capacity shared by both stacks.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    // -- Cursor motion ------------------------------------------------------

    /// Move the cursor one character right and return the character crossed.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the right end.
    pub fn forward(&mut self) -> char {
        assert!(!self.at_right(), "forward() at the right end of the buffer");
        self.reserve_for(self.front.len());
        let ch = self.back.pop().expect("back is non-empty");
        self.front.push(ch);
        ch
    }

    /// Move the cursor one character left and return the character crossed.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the left end.
    pub fn backward(&mut self) -> char {
        assert!(!self.at_left(), "backward() at the left end of the buffer");
        self.reserve_for(self.back.len());
        let ch = self.front.pop().expect("front is non-empty");
        self.back.push(ch);
        ch
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` immediately left of the cursor.
    pub fn insert(&mut self, ch: char) {
        self.reserve_for(self.front.len());
        self.front.push(ch);
    }

    /// Remove and return the character immediately left of the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the left end.
    pub fn delete(&mut self) -> char {
        self.front
            .pop()
            .expect("delete() at the left end of the buffer")
    }

    /// Remove and return the character immediately right of the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the right end.
    pub fn delete_right(&mut self) -> char {
        self.forward();
        self.delete()
    }

    // -- Growth -------------------------------------------------------------

    /// Regrow both stacks if the side currently holding `side_len`
    /// characters is about to drop below [`MIN_FREE`] free slots.
    fn reserve_for(&mut self, side_len: usize) {
        if self.needs_room(side_len) {
            self.grow();
        }
    }

    #[inline]
    const fn needs_room(&self, side_len: usize) -> bool {
        side_len + MIN_FREE > self.capacity
    }

    /// Grow both stacks to the same new capacity.
    ///
    /// `reserve_exact` performs the copy; the split point is untouched
    /// because neither stack changes length.
    fn grow(&mut self) {
        let new_capacity = self
            .capacity
            .checked_mul(GROWTH_FACTOR)
            .expect("gap buffer capacity overflow");
        self.front.reserve_exact(new_capacity - self.front.len());
        self.back.reserve_exact(new_capacity - self.back.len());
        tracing::trace!(from = self.capacity, to = new_capacity, "gap buffer grew");
        self.capacity = new_capacity;
    }

    // -- Position scans -----------------------------------------------------

    /// 1-based row of the cursor: one plus the newlines before it.
    #[must_use]
    pub fn row(&self) -> usize {
        1 + count_newlines(&self.front)
    }

    /// 0-based column of the cursor: characters since the last newline.
    #[must_use]
    pub fn col(&self) -> usize {
        self.front.len() - self.line_start()
    }

    /// 0-based on-screen column of the cursor with tabs expanded.
    ///
    /// # Panics
    ///
    /// Panics if `tab_stop` is zero.
    #[must_use]
    pub fn render_col(&self, tab_stop: usize) -> usize {
        self.front[self.line_start()..]
            .iter()
            .fold(0, |rc, &ch| {
                if ch == '\t' {
                    next_tab_stop(rc, tab_stop)
                } else {
                    rc + 1
                }
            })
    }

    /// Total number of rows: one plus every newline in the document.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        1 + count_newlines(&self.front) + count_newlines(&self.back)
    }

    /// Index into `front` where the cursor's line begins.
    fn line_start(&self) -> usize {
        self.front
            .iter()
            .rposition(|&ch| ch == '\n')
            .map_or(0, |i| i + 1)
    }

    // -- Text access --------------------------------------------------------

    /// Iterate over the whole document in order without materializing it.
    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.front
            .iter()
            .chain(self.back.iter().rev())
            .copied()
    }

    /// Collect the whole document into a `String`. O(n), does not move the
    /// cursor.
    #[must_use]
    pub fn contents(&self) -> String {
        self.chars().collect()
    }

    // -- Invariant ----------------------------------------------------------

    /// Structural representation invariant.
    ///
    /// Both stacks stay strictly below the shared logical capacity and both
    /// have at least that much storage reserved.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.capacity > 0
            && self.front.len() < self.capacity
            && self.back.len() < self.capacity
            && self.front.capacity() >= self.capacity
            && self.back.capacity() >= self.capacity
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapBuffer")
            .field("front_len", &self.front.len())
            .field("back_len", &self.back.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

fn count_newlines(chars: &[char]) -> usize {
    chars.iter().filter(|&&ch| ch == '\n').count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled(capacity: usize, text: &str) -> GapBuffer {
        let mut gb = GapBuffer::new(capacity);
        for ch in text.chars() {
            gb.insert(ch);
        }
        gb
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_is_empty() {
        let gb = GapBuffer::new(10);
        assert!(gb.is_valid());
        assert!(gb.at_left());
        assert!(gb.at_right());
        assert!(gb.is_empty());
        assert_eq!(gb.row(), 1);
        assert_eq!(gb.col(), 0);
        assert_eq!(gb.num_rows(), 1);
        assert_eq!(gb.contents(), "");
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn zero_capacity_panics() {
        let _ = GapBuffer::new(0);
    }

    #[test]
    fn default_uses_default_capacity() {
        assert_eq!(GapBuffer::default().capacity(), DEFAULT_CAPACITY);
    }

    // -- Insert / motion ----------------------------------------------------

    #[test]
    fn insert_appends_left_of_cursor() {
        let gb = filled(10, "apple");
        assert!(gb.is_valid());
        assert!(!gb.at_left());
        assert!(gb.at_right());
        assert_eq!(gb.row(), 1);
        assert_eq!(gb.col(), 5);
        assert_eq!(gb.contents(), "apple");
    }

    #[test]
    fn backward_moves_into_back() {
        let mut gb = filled(10, "apple");
        assert_eq!(gb.backward(), 'e');
        assert!(gb.is_valid());
        assert!(!gb.at_left());
        assert!(!gb.at_right());
        assert_eq!(gb.col(), 4);
        assert_eq!(gb.char_after(), Some('e'));
        assert_eq!(gb.char_before(), Some('l'));

        for _ in 0..4 {
            gb.backward();
        }
        assert!(gb.at_left());
        assert_eq!(gb.col(), 0);
        assert_eq!(gb.contents(), "apple");
    }

    #[test]
    fn forward_returns_crossed_char() {
        let mut gb = filled(10, "ab");
        gb.backward();
        gb.backward();
        assert_eq!(gb.forward(), 'a');
        assert_eq!(gb.forward(), 'b');
        assert!(gb.at_right());
    }

    #[test]
    fn insert_in_middle() {
        let mut gb = filled(10, "ac");
        gb.backward();
        gb.insert('b');
        assert_eq!(gb.contents(), "abc");
        assert_eq!(gb.front_len(), 2);
        assert_eq!(gb.back_len(), 1);
    }

    #[test]
    #[should_panic(expected = "right end")]
    fn forward_at_right_panics() {
        let mut gb = GapBuffer::new(4);
        gb.forward();
    }

    #[test]
    #[should_panic(expected = "left end")]
    fn backward_at_left_panics() {
        let mut gb = GapBuffer::new(4);
        gb.backward();
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn delete_pops_left_char() {
        let mut gb = filled(10, "pie");
        assert_eq!(gb.delete(), 'e');
        assert_eq!(gb.contents(), "pi");
    }

    #[test]
    fn delete_right_removes_char_after_cursor() {
        let mut gb = filled(10, "pie");
        gb.backward();
        gb.backward();
        assert_eq!(gb.delete_right(), 'i');
        assert_eq!(gb.contents(), "pe");
        assert_eq!(gb.col(), 1);
    }

    #[test]
    #[should_panic(expected = "left end")]
    fn delete_at_left_panics() {
        let mut gb = GapBuffer::new(4);
        gb.delete();
    }

    // -- Growth -------------------------------------------------------------

    #[test]
    fn small_capacity_grows() {
        let gb = filled(3, "apple");
        assert!(gb.is_valid());
        assert!(gb.capacity() > 5);
        assert_eq!(gb.col(), 5);
        assert_eq!(gb.contents(), "apple");
    }

    #[test]
    fn capacity_one_grows_and_tracks_rows() {
        let mut gb = filled(1, "APPLE\n");
        assert!(gb.is_valid());
        assert!(!gb.at_left());
        assert!(gb.at_right());
        assert_eq!(gb.row(), 2);
        assert_eq!(gb.col(), 0);

        gb.backward();
        assert_eq!(gb.row(), 1);
        assert_eq!(gb.col(), 5);
    }

    #[test]
    fn growth_is_by_factor() {
        let mut gb = GapBuffer::new(4);
        gb.insert('a');
        gb.insert('b');
        assert_eq!(gb.capacity(), 4);
        // Two free slots remain after 'c'.
        gb.insert('c');
        assert_eq!(gb.capacity(), 4);
        gb.insert('d');
        assert_eq!(gb.capacity(), 4 * GROWTH_FACTOR);
        assert_eq!(gb.contents(), "abcd");
    }

    #[test]
    fn backward_grows_back_side() {
        let mut gb = filled(4, "abc");
        for _ in 0..3 {
            gb.backward();
        }
        for ch in "xyz".chars() {
            gb.insert(ch);
        }
        // Six chars in a capacity of four, split three and three.
        assert_eq!(gb.capacity(), 4);
        assert_eq!((gb.front_len(), gb.back_len()), (3, 3));

        gb.backward();
        assert_eq!(gb.capacity(), 4 * GROWTH_FACTOR);
        assert_eq!(gb.back_len(), 4);
        assert!(gb.is_valid());
        assert_eq!(gb.contents(), "xyzabc");
    }

    #[test]
    fn both_sides_stay_under_capacity() {
        let mut gb = GapBuffer::new(1);
        for i in 0..200 {
            gb.insert(if i % 7 == 0 { '\n' } else { 'x' });
            if i % 3 == 0 {
                gb.backward();
            }
            assert!(gb.is_valid());
        }
        assert_eq!(gb.len(), 200);
    }

    // -- Scans --------------------------------------------------------------

    #[test]
    fn num_rows_counts_both_sides() {
        let mut gb = filled(10, "a\nb\nc");
        assert_eq!(gb.num_rows(), 3);
        while !gb.at_left() {
            gb.backward();
        }
        assert_eq!(gb.num_rows(), 3);
        assert_eq!(gb.row(), 1);
    }

    #[test]
    fn render_col_expands_tabs() {
        let gb = filled(10, "a\tb");
        assert_eq!(gb.col(), 3);
        assert_eq!(gb.render_col(8), 9);
        assert_eq!(gb.render_col(4), 5);
    }

    #[test]
    fn render_col_only_scans_current_line() {
        let gb = filled(10, "\t\t\n\tx");
        assert_eq!(gb.render_col(8), 9);
    }

    #[test]
    fn next_tab_stop_lands_on_multiple() {
        assert_eq!(next_tab_stop(0, 8), 8);
        assert_eq!(next_tab_stop(3, 8), 8);
        assert_eq!(next_tab_stop(7, 8), 8);
        assert_eq!(next_tab_stop(8, 8), 16);
        assert_eq!(next_tab_stop(5, 1), 6);
    }

    // -- Text access --------------------------------------------------------

    #[test]
    fn display_matches_contents() {
        let mut gb = filled(2, "hello\nworld");
        gb.backward();
        gb.backward();
        assert_eq!(gb.to_string(), "hello\nworld");
        assert_eq!(gb.contents(), gb.to_string());
    }

    #[test]
    fn chars_iterates_in_document_order() {
        let mut gb = filled(8, "abc");
        gb.backward();
        let collected: String = gb.chars().rev().collect();
        assert_eq!(collected, "cba");
    }

    #[test]
    fn debug_format_hides_text() {
        let gb = filled(10, "secret");
        let debug = format!("{gb:?}");
        assert!(debug.contains("front_len: 6"));
        assert!(!debug.contains("secret"));
    }
}
