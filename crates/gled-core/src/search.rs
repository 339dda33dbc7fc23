//! Search — literal substring search with wrap-around.
//!
//! All offsets are **char** offsets into the document, the same unit as
//! [`Editor::cursor_offset`](crate::editor::Editor::cursor_offset), so a
//! match can be handed straight to
//! [`Editor::move_to_offset`](crate::editor::Editor::move_to_offset).
//!
//! # Session flow
//!
//! 1. The user starts a search: a [`SearchSession`] remembers the cursor.
//! 2. Each typed char extends the query; the next match is searched from the
//!    top of the document.
//! 3. "Next" continues just past the previous match, wrapping at the end.
//! 4. Enter keeps the cursor where it is; Escape returns the saved offset.

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// First occurrence of `query` at or after char offset `from`.
///
/// Returns `None` for an empty query or when `from` is past the end.
#[must_use]
pub fn find_from(text: &str, query: &str, from: usize) -> Option<usize> {
    if query.is_empty() {
        return None;
    }
    let start = char_to_byte(text, from)?;
    let found = text[start..].find(query)?;
    Some(from + text[start..start + found].chars().count())
}

/// Next occurrence after `last_match`, wrapping to the top.
///
/// With no previous match the search begins at offset 0. Otherwise it
/// begins just past the previous match, so matches never overlap.
#[must_use]
pub fn find_next(text: &str, query: &str, last_match: Option<usize>) -> Option<usize> {
    let from = last_match.map_or(0, |m| m + query.chars().count());
    find_from(text, query, from).or_else(|| find_from(text, query, 0))
}

/// Byte index of char offset `char_idx`, or `None` past the end.
fn char_to_byte(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte_idx, _)| byte_idx)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

// ---------------------------------------------------------------------------
// SearchSession
// ---------------------------------------------------------------------------

/// State of one interactive search prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    query: String,
    /// Cursor offset before the search started (for Escape restore).
    saved_offset: usize,
    last_match: Option<usize>,
}

impl SearchSession {
    #[must_use]
    pub const fn new(saved_offset: usize) -> Self {
        Self {
            query: String::new(),
            saved_offset,
            last_match: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[inline]
    #[must_use]
    pub const fn saved_offset(&self) -> usize {
        self.saved_offset
    }

    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Extend the query. The next search restarts from the top.
    pub fn push(&mut self, ch: char) {
        self.query.push(ch);
        self.last_match = None;
    }

    /// Drop the last query char. Returns `false` if the query was empty.
    pub fn pop(&mut self) -> bool {
        self.last_match = None;
        self.query.pop().is_some()
    }

    /// Search for the next match in `text` and remember it.
    ///
    /// Returns the match offset, or `None` if the query does not occur.
    pub fn advance(&mut self, text: &str) -> Option<usize> {
        let found = find_next(text, &self.query, self.last_match);
        if found.is_some() {
            self.last_match = found;
        }
        found
    }

    /// Abandon the search. Returns the offset to restore the cursor to.
    #[must_use]
    pub fn cancel(self) -> usize {
        self.saved_offset
    }

    /// Accept the search. Returns the final query.
    #[must_use]
    pub fn confirm(self) -> String {
        self.query
    }
}
