// SPDX-License-Identifier: MIT
//
// Frame — the grid of cells one paint produces.
//
// The app paints a full `Frame` every cycle; the diff renderer compares it
// with the previous one and only sends rows that changed. Cells are a char
// plus attribute flags. gled counts one column per char, so there is no
// wide-character bookkeeping here.
//
// Storage is a flat `Vec<Cell>`, row-major: `index = y * width + x`.

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes, one bit per SGR effect.
    ///
    /// ```
    /// use gled_term::frame::Attr;
    ///
    /// let bar = Attr::INVERSE | Attr::BOLD;
    /// assert!(bar.contains(Attr::INVERSE));
    /// assert!(!bar.contains(Attr::SHADED));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD    = 1 << 0;
        /// SGR 2.
        const DIM     = 1 << 1;
        /// SGR 7 — swap foreground and background.
        const INVERSE = 1 << 2;
        /// SGR 100 — bright-black background, used for inactive tabs.
        const SHADED  = 1 << 3;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub attr: Attr,
}

impl Cell {
    /// A blank: space, no attributes.
    pub const EMPTY: Self = Self {
        ch: ' ',
        attr: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            attr: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_attr(self, attr: Attr) -> Self {
        Self { attr, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Frame ───────────────────────────────────────────────────────────────────

/// A `width × height` grid of cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    // ─── Construction ────────────────────────────────────────────────────

    /// A frame filled with blank cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// One row as a slice, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The text of row `y` with attributes dropped. Handy in tests.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Write one cell. Returns `false` if `(x, y)` is out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Paint `text` from `(x, y)` rightwards, clipped at the frame edge.
    ///
    /// Control characters are shown as `?` so they cannot move the
    /// terminal's cursor. Returns the number of columns painted.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, attr: Attr) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let ch = if ch.is_control() { '?' } else { ch };
            self.set(col, y, Cell { ch, attr });
            col += 1;
        }
        col.saturating_sub(x)
    }

    /// Set `attr` on every cell of row `y` without touching the chars.
    pub fn fill_row_attr(&mut self, y: u16, attr: Attr) {
        if y >= self.height {
            return;
        }
        let start = self.index(0, y);
        for cell in &mut self.cells[start..start + usize::from(self.width)] {
            cell.attr = attr;
        }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({}x{})", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
