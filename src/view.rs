// SPDX-License-Identifier: MIT
//
// View — painting documents into a frame.
//
// A `Viewport` is the scroll state of one document: the first visible row
// (1-based, like `Editor::row`) and the first visible render column. It
// owns nothing else; the editor is passed in when scrolling or painting.
//
// The paint functions each fill one band of the screen:
//
//   ┌─────────────────────────────────┐
//   │ [ a.txt ] [ b.txt ]             │  ← file bar
//   ├─────────────────────────────────┤
//   │ text area (tabs expanded)       │
//   │ ~                               │
//   ├─────────────────────────────────┤
//   │ a.txt - 2 lines  Position (1,0) │  ← status bar (INVERSE)
//   ├─────────────────────────────────┤
//   │ message / prompt                │
//   └─────────────────────────────────┘

use gled_core::gap_buffer::next_tab_stop;
use gled_core::{Document, Editor};
use gled_term::frame::{Attr, Frame};

/// Rows taken by the file bar, status bar and message bar together.
pub const CHROME_ROWS: u16 = 3;

/// Longest file name shown in the status bar.
const STATUS_NAME_WIDTH: usize = 20;

// ─── Viewport ───────────────────────────────────────────────────────────────

/// Scroll state of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    row_off: usize,
    col_off: usize,
}

impl Viewport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            row_off: 1,
            col_off: 0,
        }
    }

    /// First visible row (1-based).
    #[inline]
    #[must_use]
    pub const fn row_off(&self) -> usize {
        self.row_off
    }

    /// First visible render column.
    #[inline]
    #[must_use]
    pub const fn col_off(&self) -> usize {
        self.col_off
    }

    /// Adjust the offsets so the cursor lies inside a `rows` × `cols` area.
    pub const fn scroll(&mut self, editor: &Editor, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            return;
        }

        let row = editor.row();
        if row < self.row_off {
            self.row_off = row;
        }
        if row >= self.row_off + rows {
            self.row_off = row - rows + 1;
        }

        let render_col = editor.render_col();
        if render_col < self.col_off {
            self.col_off = render_col;
        }
        if render_col >= self.col_off + cols {
            self.col_off = render_col - cols + 1;
        }
    }

    /// Cursor position relative to the top-left of the text area. Only
    /// meaningful after [`scroll`](Self::scroll).
    #[must_use]
    pub const fn cursor_in_area(&self, editor: &Editor) -> (usize, usize) {
        (
            editor.render_col().saturating_sub(self.col_off),
            editor.row().saturating_sub(self.row_off),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Line extraction ────────────────────────────────────────────────────────

/// Rows `first..first + count` of the editor's text with tabs expanded to
/// spaces. Returns fewer lines when the document ends first.
#[must_use]
pub fn visible_lines(editor: &Editor, first: usize, count: usize) -> Vec<String> {
    let tab_stop = editor.options().tab_stop();
    let end = first + count;
    let mut lines = Vec::with_capacity(count);
    let mut line = String::new();
    let mut width = 0;
    let mut row = 1;

    for ch in editor.chars() {
        if row >= end {
            break;
        }
        if ch == '\n' {
            if row >= first {
                lines.push(std::mem::take(&mut line));
            }
            row += 1;
            width = 0;
            continue;
        }
        if row < first {
            continue;
        }
        if ch == '\t' {
            let stop = next_tab_stop(width, tab_stop);
            line.extend(std::iter::repeat_n(' ', stop - width));
            width = stop;
        } else {
            line.push(ch);
            width += 1;
        }
    }

    if row >= first && row < end {
        lines.push(line);
    }
    lines
}

// ─── Painting ───────────────────────────────────────────────────────────────

/// One `[ name ]` tab per document; the active one inverse, the rest
/// shaded.
pub fn paint_file_bar<'a>(
    frame: &mut Frame,
    y: u16,
    documents: impl IntoIterator<Item = &'a Document>,
    active: usize,
) {
    let mut x = 0;
    for (i, doc) in documents.into_iter().enumerate() {
        let attr = if i == active {
            Attr::INVERSE
        } else {
            Attr::SHADED
        };
        let label = format!("[ {} ]", doc.display_name());
        x += frame.paint_text(x, y, &label, attr);
        x += frame.paint_text(x, y, " ", Attr::empty());
    }
}

/// The text area: `height` rows starting at `y`, `~` past the end of the
/// document.
pub fn paint_text_area(frame: &mut Frame, y: u16, height: u16, editor: &Editor, view: &Viewport) {
    let lines = visible_lines(editor, view.row_off(), usize::from(height));
    for i in 0..height {
        match lines.get(usize::from(i)) {
            Some(line) => {
                let shown: String = line.chars().skip(view.col_off()).collect();
                frame.paint_text(0, y + i, &shown, Attr::empty());
            }
            None => {
                frame.paint_text(0, y + i, "~", Attr::DIM);
            }
        }
    }
}

/// Left part of the status bar: name, line count and modified flag.
#[must_use]
pub fn status_left(doc: &Document) -> String {
    let editor = doc.editor();
    let modified = if editor.is_dirty() { " (modified)" } else { "" };
    format!(
        "{:.width$} - {} lines{modified}",
        doc.display_name(),
        editor.num_rows(),
        width = STATUS_NAME_WIDTH,
    )
}

/// Right part of the status bar.
#[must_use]
pub fn status_right(editor: &Editor) -> String {
    format!("Position ({},{})", editor.row(), editor.col())
}

pub fn paint_status_bar(frame: &mut Frame, y: u16, doc: &Document) {
    frame.fill_row_attr(y, Attr::INVERSE);

    let left = status_left(doc);
    let used = frame.paint_text(0, y, &left, Attr::INVERSE);

    let right = status_right(doc.editor());
    let right_len = u16::try_from(right.chars().count()).unwrap_or(u16::MAX);
    let width = frame.width();
    if used.saturating_add(right_len) < width {
        frame.paint_text(width - right_len, y, &right, Attr::INVERSE);
    }
}

pub fn paint_message_bar(frame: &mut Frame, y: u16, text: &str) {
    frame.paint_text(0, y, text, Attr::empty());
}

// ─── Tests ──────────────────────────────────────────────────────────────────
