// SPDX-License-Identifier: MIT
//
// Differential renderer — rewrite only the rows that changed.
//
// The app paints a whole `Frame` per cycle. `DiffRenderer` keeps the frame
// it sent last time; each row of the new frame is compared against the
// stored one with a single slice comparison, and only rows that differ are
// redrawn. Typing a character touches the edited row and the status bar,
// so a keystroke costs two rows of output instead of a full screen.
//
// The pipeline per frame:
//
//   1. `render()` diffs and accumulates ANSI bytes in an internal Vec.
//   2. `flush()` sends them to stdout in one `write_all`.
//
// Every frame is wrapped in synchronized output (DEC 2026) so the terminal
// never shows a half-updated screen.

use std::io::{self, Write};

use crate::ansi;
use crate::frame::{Attr, Cell, Frame};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub rows_rendered: usize,
    pub rows_skipped: usize,
    pub bytes_written: usize,
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Row-level differential renderer.
///
/// ```no_run
/// use gled_term::diff::DiffRenderer;
/// use gled_term::frame::{Attr, Frame};
///
/// let mut renderer = DiffRenderer::new();
/// let mut frame = Frame::new(80, 24);
/// frame.paint_text(0, 0, "hello", Attr::empty());
///
/// let stats = renderer.render(&frame);
/// renderer.flush()?;
/// assert_eq!(stats.rows_rendered, 24);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<Frame>,
}

impl DiffRenderer {
    /// A renderer with no previous frame; the first render draws everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            output: Vec::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame and queue ANSI output.
    pub fn render(&mut self, current: &Frame) -> RenderStats {
        self.output.clear();
        let mut stats = RenderStats::default();

        let (width, height) = (current.width(), current.height());
        if width == 0 || height == 0 {
            self.previous = Some(current.clone());
            return stats;
        }

        // Writes into a Vec cannot fail.
        let out = &mut self.output;
        ansi::begin_sync(out).ok();

        let full_redraw = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != width || prev.height() != height);
        if full_redraw {
            ansi::reset(out).ok();
            ansi::clear_screen(out).ok();
        }

        for y in 0..height {
            let Some(row) = current.row(y) else { break };
            let unchanged = !full_redraw
                && self
                    .previous
                    .as_ref()
                    .and_then(|prev| prev.row(y))
                    .is_some_and(|prev_row| prev_row == row);
            if unchanged {
                stats.rows_skipped += 1;
                continue;
            }
            write_row(out, y, row).ok();
            stats.rows_rendered += 1;
        }

        ansi::reset(out).ok();
        ansi::end_sync(out).ok();
        stats.bytes_written = out.len();

        match &mut self.previous {
            Some(prev) if prev.width() == width && prev.height() == height => {
                prev.clone_from(current);
            }
            _ => self.previous = Some(current.clone()),
        }
        stats
    }

    /// The bytes queued by the last [`render`](Self::render).
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Send queued output to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Send queued output to `w` and clear the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(&self.output)?;
        w.flush()?;
        self.output.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Redraw one row from column 0, switching SGR state only where the
/// attribute changes.
fn write_row(w: &mut Vec<u8>, y: u16, row: &[Cell]) -> io::Result<()> {
    ansi::cursor_to(w, 0, y)?;
    ansi::reset(w)?;
    let mut current = Attr::empty();
    let mut utf8 = [0u8; 4];
    for cell in row {
        if cell.attr != current {
            ansi::reset(w)?;
            ansi::attrs(w, cell.attr)?;
            current = cell.attr;
        }
        w.extend_from_slice(cell.ch.encode_utf8(&mut utf8).as_bytes());
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn render_frame(renderer: &mut DiffRenderer, frame: &Frame) -> (RenderStats, String) {
        let stats = renderer.render(frame);
        let output = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        (stats, output)
    }

    // ── First render ────────────────────────────────────────────────────

    #[test]
    fn first_render_draws_all_rows() {
        let mut renderer = DiffRenderer::new();
        let (stats, out) = render_frame(&mut renderer, &Frame::new(10, 3));
        assert_eq!(stats.rows_rendered, 3);
        assert_eq!(stats.rows_skipped, 0);
        assert!(out.contains("\x1b[2J"));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
        assert_eq!(stats.bytes_written, out.len());
    }

    #[test]
    fn zero_size_frame_writes_nothing() {
        let mut renderer = DiffRenderer::new();
        let (stats, out) = render_frame(&mut renderer, &Frame::new(0, 0));
        assert_eq!(stats, RenderStats::default());
        assert!(out.is_empty());
    }

    // ── Incremental ─────────────────────────────────────────────────────

    #[test]
    fn identical_frame_skips_every_row() {
        let mut renderer = DiffRenderer::new();
        let frame = Frame::new(10, 4);
        renderer.render(&frame);
        let (stats, out) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.rows_rendered, 0);
        assert_eq!(stats.rows_skipped, 4);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn only_changed_row_is_redrawn() {
        let mut renderer = DiffRenderer::new();
        let mut frame = Frame::new(6, 3);
        renderer.render(&frame);

        frame.paint_text(0, 1, "abc", Attr::empty());
        let (stats, out) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.rows_rendered, 1);
        assert_eq!(stats.rows_skipped, 2);
        assert!(out.contains("\x1b[2;1H"));
        assert!(out.contains("abc   "));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&Frame::new(5, 2));
        let (stats, out) = render_frame(&mut renderer, &Frame::new(6, 2));
        assert_eq!(stats.rows_rendered, 2);
        assert!(out.contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_draws_everything() {
        let mut renderer = DiffRenderer::new();
        let frame = Frame::new(3, 2);
        renderer.render(&frame);
        renderer.force_redraw();
        let (stats, _) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.rows_rendered, 2);
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn attribute_changes_emit_sgr() {
        let mut renderer = DiffRenderer::new();
        let mut frame = Frame::new(4, 1);
        frame.paint_text(0, 0, "ab", Attr::INVERSE);
        let (_, out) = render_frame(&mut renderer, &frame);
        assert!(out.contains("\x1b[7mab\x1b[0m  "));
    }

    #[test]
    fn flush_to_drains_output() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&Frame::new(2, 1));
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(renderer.output_bytes().is_empty());
    }
}
