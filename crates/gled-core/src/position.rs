//! Cursor position snapshot.
//!
//! Rows are **1-based** (the first line is row 1), columns are **0-based**.
//! This is the coordinate system the editor tracks internally and shows on
//! the status bar, so no conversion is needed between the two.
//!
//! `col` counts chars; `render_col` counts screen cells with tabs expanded
//! to the next tab stop. One char is one cell otherwise.

use std::fmt;

/// Where the cursor sits: row, logical column and rendered column.
///
/// # Ordering
///
/// Positions order by row, then by column. `render_col` is derived from the
/// other two and does not take part in the comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub render_col: usize,
}

impl Position {
    /// Start of an empty document.
    pub const ORIGIN: Self = Self {
        row: 1,
        col: 0,
        render_col: 0,
    };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize, render_col: usize) -> Self {
        Self {
            row,
            col,
            render_col,
        }
    }

    /// True at row 1, column 0.
    #[inline]
    #[must_use]
    pub const fn is_origin(self) -> bool {
        self.row == 1 && self.col == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{}/{})", self.row, self.col, self.render_col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}
