// SPDX-License-Identifier: MIT
//
// Window — the open documents and everything typed at them.
//
// `Window` implements gled-term's `App`. It holds a non-empty list of
// panes (a document plus its viewport) and the index of the active one.
// Keys go to whichever input owner is active, in this order:
//
//   1. a filename prompt (save as / open)
//   2. an incremental search
//   3. the active document
//
// Closing the last document quits. Closing a modified document takes
// `quit_times` extra presses of the same key; the countdown is the
// editor's, so any edit in between starts it over.

use std::path::Path;
use std::time::{Duration, Instant};

use gled_core::{Document, EditorOptions, SearchSession};
use gled_term::event_loop::{Action, App};
use gled_term::frame::Frame;
use gled_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use gled_term::terminal::Size;

use crate::view::{self, CHROME_ROWS, Viewport};

/// How long a message stays on the message bar.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown on startup.
pub const HELP_MESSAGE: &str =
    "HELP: ^S save | ^O open | ^F find | ^K/^J switch | ^X close | ^Q quit";

// ─── Panes and prompts ──────────────────────────────────────────────────────

#[derive(Debug)]
struct Pane {
    doc: Document,
    viewport: Viewport,
}

impl Pane {
    const fn new(doc: Document) -> Self {
        Self {
            doc,
            viewport: Viewport::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    SaveAs,
    Open,
}

impl PromptKind {
    const fn label(self) -> &'static str {
        match self {
            Self::SaveAs => "Save as: ",
            Self::Open => "Open file: ",
        }
    }
}

#[derive(Debug)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

/// Result of trying to close the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    /// Modified; the user was warned.
    Refused,
    Closed,
    /// It was the last document.
    Last,
}

// ─── Window ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Window {
    /// Never empty.
    panes: Vec<Pane>,
    active: usize,
    options: EditorOptions,

    prompt: Option<Prompt>,
    search: Option<SearchSession>,
    message: Option<(String, Instant)>,

    /// Height of the text area at the last paint or resize.
    text_rows: usize,
    cursor_screen: Option<(u16, u16)>,
}

impl Window {
    /// A window with one untitled document.
    #[must_use]
    pub fn new(options: EditorOptions) -> Self {
        Self {
            panes: vec![Pane::new(Document::new(options))],
            active: 0,
            options,
            prompt: None,
            search: None,
            message: None,
            text_rows: 0,
            cursor_screen: None,
        }
    }

    /// A window with `paths` opened in order. Files that fail to open are
    /// reported on the message bar.
    pub fn with_files<P: AsRef<Path>>(options: EditorOptions, paths: &[P]) -> Self {
        let mut window = Self::new(options);
        for path in paths {
            window.open(path.as_ref());
        }
        if window.message.is_none() {
            window.set_message(HELP_MESSAGE);
        }
        window
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub fn active_document(&self) -> &Document {
        &self.panes[self.active].doc
    }

    fn active_document_mut(&mut self) -> &mut Document {
        &mut self.panes[self.active].doc
    }

    #[inline]
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.panes.len()
    }

    /// The current message, if it has not expired.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now()));
    }

    // -- Documents ----------------------------------------------------------

    /// Open `path`, reusing the active document if it is an unmodified
    /// empty scratch buffer.
    pub fn open(&mut self, path: &Path) {
        let current = self.active_document();
        let reuse = current.is_untitled()
            && current.editor().is_empty()
            && !current.editor().is_dirty();

        let result = if reuse {
            self.panes[self.active].viewport = Viewport::new();
            self.active_document_mut().load(path).map(|_| ())
        } else {
            Document::open(path, self.options).map(|doc| {
                self.panes.push(Pane::new(doc));
                self.active = self.panes.len() - 1;
            })
        };

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "open failed");
            self.set_message(format!("Can't open! {e}"));
        }
    }

    /// Save the active document, asking for a name if it has none.
    fn save(&mut self) {
        if self.active_document().is_untitled() {
            self.prompt = Some(Prompt {
                kind: PromptKind::SaveAs,
                input: String::new(),
            });
            return;
        }
        let result = self.active_document_mut().save();
        self.report_save(result);
    }

    fn report_save(&mut self, result: Result<usize, gled_core::DocumentError>) {
        match result {
            Ok(bytes) => self.set_message(format!("{bytes} bytes written to disk")),
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.set_message(format!("Can't save! {e}"));
            }
        }
    }

    fn next_document(&mut self) {
        self.active = (self.active + 1) % self.panes.len();
    }

    fn previous_document(&mut self) {
        self.active = self
            .active
            .checked_sub(1)
            .unwrap_or(self.panes.len() - 1);
    }

    /// Close the active document unless it is modified and still has quit
    /// warnings left. `key` names the key in the warning.
    fn close_active(&mut self, key: char) -> Close {
        if let Some(remaining) = self.active_document_mut().editor_mut().consume_quit_warning() {
            self.set_message(format!(
                "WARNING!!! File has unsaved changes. Press ^{key} {remaining} more times to quit."
            ));
            return Close::Refused;
        }
        if self.panes.len() == 1 {
            return Close::Last;
        }

        let pane = self.panes.remove(self.active);
        tracing::info!(name = %pane.doc.display_name(), "closed");
        if self.active >= self.panes.len() {
            self.active = self.panes.len() - 1;
        }
        Close::Closed
    }

    // -- Key dispatch -------------------------------------------------------

    fn handle_key(&mut self, key: &KeyEvent) -> Action {
        if self.prompt.is_some() {
            self.handle_prompt(key);
            return Action::Continue;
        }
        if self.search.is_some() {
            self.handle_search(key);
            return Action::Continue;
        }

        if key.modifiers.contains(Modifiers::CTRL) {
            return self.handle_ctrl(key);
        }

        match key.code {
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            code => self.edit(code, key.modifiers),
        }
        Action::Continue
    }

    fn edit(&mut self, code: KeyCode, modifiers: Modifiers) {
        let editor = self.active_document_mut().editor_mut();
        match code {
            KeyCode::Char(ch) if !modifiers.contains(Modifiers::ALT) => editor.insert(ch),
            KeyCode::Enter => editor.insert('\n'),
            KeyCode::Tab => editor.insert('\t'),
            KeyCode::Backspace => editor.delete(),
            KeyCode::Delete => editor.delete_forward(),
            KeyCode::Left => editor.backward(),
            KeyCode::Right => editor.forward(),
            KeyCode::Up => editor.up(),
            KeyCode::Down => editor.down(),
            KeyCode::Home => editor.line_start(),
            KeyCode::End => editor.line_end(),
            _ => {}
        }
    }

    fn handle_ctrl(&mut self, key: &KeyEvent) -> Action {
        let KeyCode::Char(letter) = key.code else {
            return Action::Continue;
        };
        match letter {
            'a' => self.active_document_mut().editor_mut().line_start(),
            'e' => self.active_document_mut().editor_mut().line_end(),
            'h' => self.active_document_mut().editor_mut().delete(),
            'w' => self.page_up(),
            'd' => self.page_down(),
            's' => self.save(),
            'o' => {
                self.prompt = Some(Prompt {
                    kind: PromptKind::Open,
                    input: String::new(),
                });
            }
            'k' => self.next_document(),
            'j' => self.previous_document(),
            'f' => {
                let offset = self.active_document().editor().cursor_offset();
                self.search = Some(SearchSession::new(offset));
            }
            'x' => {
                if self.close_active('X') == Close::Last {
                    return Action::Quit;
                }
            }
            'q' => loop {
                match self.close_active('Q') {
                    Close::Refused => break,
                    Close::Closed if self.active_document().editor().is_dirty() => break,
                    Close::Closed => {}
                    Close::Last => return Action::Quit,
                }
            },
            _ => {}
        }
        Action::Continue
    }

    /// Move to the top of the screen, then a screenful minus two rows up.
    fn page_up(&mut self) {
        let rows = self.text_rows;
        let pane = &mut self.panes[self.active];
        let editor = pane.doc.editor_mut();
        while editor.row() > pane.viewport.row_off() {
            editor.up();
        }
        for _ in 0..rows.saturating_sub(2) {
            editor.up();
        }
    }

    /// Move to the bottom of the screen, then a screenful minus two rows
    /// down.
    fn page_down(&mut self) {
        let rows = self.text_rows;
        let pane = &mut self.panes[self.active];
        let bottom = pane.viewport.row_off() + rows.saturating_sub(1);
        let editor = pane.doc.editor_mut();
        while editor.row() < bottom && editor.row() < editor.num_rows() {
            editor.down();
        }
        for _ in 0..rows.saturating_sub(2) {
            editor.down();
        }
    }

    // -- Prompt -------------------------------------------------------------

    fn handle_prompt(&mut self, key: &KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Escape => {
                let kind = prompt.kind;
                self.prompt = None;
                self.set_message(match kind {
                    PromptKind::SaveAs => "Save aborted",
                    PromptKind::Open => "Open aborted",
                });
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char('h') if key.modifiers.contains(Modifiers::CTRL) => {
                prompt.input.pop();
            }
            KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT => {
                prompt.input.push(ch);
            }
            KeyCode::Enter if !prompt.input.is_empty() => {
                let Some(Prompt { kind, input }) = self.prompt.take() else {
                    return;
                };
                match kind {
                    PromptKind::SaveAs => {
                        let result = self.active_document_mut().save_as(&input);
                        self.report_save(result);
                    }
                    PromptKind::Open => self.open(Path::new(&input)),
                }
            }
            _ => {}
        }
    }

    // -- Incremental search -------------------------------------------------

    fn handle_search(&mut self, key: &KeyEvent) {
        let Some(session) = self.search.as_mut() else {
            return;
        };
        let editor = self.panes[self.active].doc.editor_mut();

        match key.code {
            KeyCode::Escape => {
                if let Some(session) = self.search.take() {
                    editor.move_to_offset(session.cancel());
                }
            }
            KeyCode::Enter => {
                if let Some(session) = self.search.take() {
                    tracing::debug!(query = %session.confirm(), "search accepted");
                }
            }
            KeyCode::Right | KeyCode::Down => {
                if let Some(offset) = session.advance(&editor.contents()) {
                    editor.move_to_offset(offset);
                }
            }
            KeyCode::Backspace => {
                session.pop();
                if session.query().is_empty() {
                    editor.move_to_offset(session.saved_offset());
                } else if let Some(offset) = session.advance(&editor.contents()) {
                    editor.move_to_offset(offset);
                }
            }
            KeyCode::Char(ch) if key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT => {
                session.push(ch);
                if let Some(offset) = session.advance(&editor.contents()) {
                    editor.move_to_offset(offset);
                }
            }
            _ => {}
        }
    }

    // -- Message bar --------------------------------------------------------

    /// What the bottom row shows, and whether the cursor belongs there.
    fn message_line(&self) -> (String, bool) {
        if let Some(prompt) = &self.prompt {
            return (format!("{}{}", prompt.kind.label(), prompt.input), true);
        }
        if let Some(session) = &self.search {
            return (
                format!("Search: {} (Use ESC/Arrows/Enter)", session.query()),
                false,
            );
        }
        (self.message().unwrap_or_default().to_string(), false)
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Window {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        self.text_rows = usize::from(size.rows.saturating_sub(CHROME_ROWS));
    }

    fn on_tick(&mut self) -> bool {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= MESSAGE_TIMEOUT);
        if expired {
            self.message = None;
        }
        expired
    }

    fn paint(&mut self, frame: &mut Frame) {
        let width = frame.width();
        let text_height = frame.height().saturating_sub(CHROME_ROWS);
        self.text_rows = usize::from(text_height);

        let status_y = 1 + text_height;
        let message_y = status_y + 1;

        view::paint_file_bar(frame, 0, self.panes.iter().map(|p| &p.doc), self.active_index());

        let pane = &mut self.panes[self.active];
        pane.viewport
            .scroll(pane.doc.editor(), self.text_rows, usize::from(width));
        view::paint_text_area(frame, 1, text_height, pane.doc.editor(), &pane.viewport);
        view::paint_status_bar(frame, status_y, &pane.doc);

        let (x, y) = pane.viewport.cursor_in_area(pane.doc.editor());
        self.cursor_screen = if text_height == 0 {
            None
        } else {
            u16::try_from(x)
                .ok()
                .zip(u16::try_from(y + 1).ok())
        };

        let (line, owns_cursor) = self.message_line();
        view::paint_message_bar(frame, message_y, &line);
        if owns_cursor {
            let len = u16::try_from(line.chars().count()).unwrap_or(u16::MAX);
            self.cursor_screen = Some((len.min(width.saturating_sub(1)), message_y));
        }
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor_screen
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, Modifiers::empty()))
    }

    fn press(ch: char) -> Event {
        key(KeyCode::Char(ch))
    }

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), Modifiers::CTRL))
    }

    fn feed(window: &mut Window, events: &[Event]) -> Action {
        let mut last = Action::Continue;
        for event in events {
            last = window.on_event(event);
        }
        last
    }

    fn type_text(window: &mut Window, text: &str) {
        for ch in text.chars() {
            let event = match ch {
                '\n' => key(KeyCode::Enter),
                '\t' => key(KeyCode::Tab),
                _ => press(ch),
            };
            window.on_event(&event);
        }
    }

    fn window() -> Window {
        Window::new(EditorOptions::default())
    }

    fn contents(window: &Window) -> String {
        window.active_document().editor().contents()
    }

    fn painted(window: &mut Window, width: u16, height: u16) -> Frame {
        let mut frame = Frame::new(width, height);
        window.paint(&mut frame);
        frame
    }

    // ── Editing ───────────────────────────────────────────────────────────

    #[test]
    fn typing_inserts_text() {
        let mut w = window();
        type_text(&mut w, "hello\n\tworld");
        assert_eq!(contents(&w), "hello\n\tworld");
        let editor = w.active_document().editor();
        assert_eq!((editor.row(), editor.col(), editor.render_col()), (2, 6, 13));
    }

    #[test]
    fn backspace_and_delete() {
        let mut w = window();
        type_text(&mut w, "abcd");
        feed(
            &mut w,
            &[
                key(KeyCode::Backspace),
                key(KeyCode::Left),
                key(KeyCode::Left),
                key(KeyCode::Delete),
                ctrl('h'),
            ],
        );
        assert_eq!(contents(&w), "c");
    }

    #[test]
    fn line_start_and_end_keys() {
        let mut w = window();
        type_text(&mut w, "abc\ndef");
        feed(&mut w, &[ctrl('a')]);
        assert_eq!(w.active_document().editor().col(), 0);
        feed(&mut w, &[key(KeyCode::Up), key(KeyCode::End)]);
        let editor = w.active_document().editor();
        assert_eq!((editor.row(), editor.col()), (1, 3));
        feed(&mut w, &[key(KeyCode::Home), ctrl('e')]);
        assert_eq!(w.active_document().editor().col(), 3);
    }

    #[test]
    fn ctrl_l_and_escape_are_ignored() {
        let mut w = window();
        type_text(&mut w, "x");
        feed(&mut w, &[ctrl('l'), key(KeyCode::Escape)]);
        assert_eq!(contents(&w), "x");
    }

    #[test]
    fn page_down_then_up() {
        let mut w = window();
        let text: Vec<String> = (1..=30).map(|n| n.to_string()).collect();
        w.active_document_mut().editor_mut().load(&text.join("\n"));
        // 13 rows minus 3 chrome rows.
        painted(&mut w, 20, 13);

        feed(&mut w, &[key(KeyCode::PageDown)]);
        assert_eq!(w.active_document().editor().row(), 18);

        painted(&mut w, 20, 13);
        feed(&mut w, &[ctrl('w')]);
        assert_eq!(w.active_document().editor().row(), 1);
    }

    // ── Closing ───────────────────────────────────────────────────────────

    #[test]
    fn closing_clean_last_document_quits() {
        let mut w = window();
        assert_eq!(feed(&mut w, &[ctrl('x')]), Action::Quit);
    }

    #[test]
    fn closing_modified_document_needs_confirmation() {
        let mut w = window();
        type_text(&mut w, "dirty");
        for remaining in (1..=3).rev() {
            assert_eq!(feed(&mut w, &[ctrl('x')]), Action::Continue);
            assert_eq!(
                w.message(),
                Some(
                    format!(
                        "WARNING!!! File has unsaved changes. Press ^X {remaining} more times to quit."
                    )
                    .as_str()
                )
            );
        }
        assert_eq!(feed(&mut w, &[ctrl('x')]), Action::Quit);
    }

    #[test]
    fn edit_between_close_attempts_restarts_countdown() {
        let mut w = window();
        type_text(&mut w, "a");
        feed(&mut w, &[ctrl('x'), ctrl('x')]);
        type_text(&mut w, "b");
        feed(&mut w, &[ctrl('x')]);
        assert!(w.message().unwrap().contains("Press ^X 3 more times"));
    }

    #[test]
    fn ctrl_q_stops_at_modified_document() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let mut w = Window::with_files(EditorOptions::default(), &[&a, &b]);
        assert_eq!(w.document_count(), 2);
        assert_eq!(w.active_index(), 1);
        type_text(&mut w, "!");

        // a.txt is active and clean; b.txt was modified.
        feed(&mut w, &[ctrl('j')]);
        assert_eq!(w.active_index(), 0);
        assert_eq!(feed(&mut w, &[ctrl('q')]), Action::Continue);
        assert_eq!(w.document_count(), 1);
        // Reaching the modified document ends the press without a warning.
        assert_eq!(w.message(), Some(HELP_MESSAGE));

        assert_eq!(feed(&mut w, &[ctrl('q')]), Action::Continue);
        assert!(w.message().unwrap().contains("Press ^Q 3 more times"));
        assert_eq!(feed(&mut w, &[ctrl('q'), ctrl('q')]), Action::Continue);
        assert_eq!(feed(&mut w, &[ctrl('q')]), Action::Quit);
    }

    // ── Documents ─────────────────────────────────────────────────────────

    #[test]
    fn open_reuses_empty_scratch_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "line one\nline two").unwrap();

        let mut w = window();
        feed(&mut w, &[ctrl('o')]);
        type_text(&mut w, path.to_str().unwrap());
        feed(&mut w, &[key(KeyCode::Enter)]);

        assert_eq!(w.document_count(), 1);
        assert_eq!(contents(&w), "line one\nline two");
        assert!(!w.active_document().is_untitled());
    }

    #[test]
    fn open_appends_when_active_has_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.txt");
        fs::write(&path, "other").unwrap();

        let mut w = window();
        type_text(&mut w, "scratch");
        w.open(&path);
        assert_eq!(w.document_count(), 2);
        assert_eq!(w.active_index(), 1);
        assert_eq!(contents(&w), "other");

        feed(&mut w, &[ctrl('k')]);
        assert_eq!(w.active_index(), 0);
        feed(&mut w, &[ctrl('j')]);
        assert_eq!(w.active_index(), 1);
    }

    #[test]
    fn open_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");
        let w = Window::with_files(EditorOptions::default(), &[&path]);
        assert!(path.exists());
        assert_eq!(w.message(), Some(HELP_MESSAGE));
    }

    #[test]
    fn open_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut w = window();
        w.open(dir.path());
        assert!(w.message().unwrap().starts_with("Can't open!"));
        assert_eq!(w.document_count(), 1);
    }

    #[test]
    fn open_prompt_can_be_aborted() {
        let mut w = window();
        feed(&mut w, &[ctrl('o'), press('x'), key(KeyCode::Escape)]);
        assert_eq!(w.message(), Some("Open aborted"));
        type_text(&mut w, "y");
        assert_eq!(contents(&w), "y");
    }

    #[test]
    fn save_untitled_prompts_for_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut w = window();
        type_text(&mut w, "saved text");
        feed(&mut w, &[ctrl('s')]);
        assert!(w.prompt.is_some());
        type_text(&mut w, path.to_str().unwrap());
        feed(&mut w, &[key(KeyCode::Enter)]);

        assert_eq!(fs::read_to_string(&path).unwrap(), "saved text");
        assert_eq!(w.message(), Some("10 bytes written to disk"));
        assert!(!w.active_document().editor().is_dirty());

        type_text(&mut w, "!");
        feed(&mut w, &[ctrl('s')]);
        assert!(w.prompt.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "saved text!");
    }

    // ── Search ────────────────────────────────────────────────────────────

    #[test]
    fn search_moves_to_matches_and_wraps() {
        let mut w = window();
        w.active_document_mut()
            .editor_mut()
            .load("apple\npie apple\napple pie");
        feed(&mut w, &[ctrl('f')]);
        type_text(&mut w, "pie");
        assert_eq!(w.active_document().editor().cursor_offset(), 6);

        feed(&mut w, &[key(KeyCode::Right)]);
        assert_eq!(w.active_document().editor().cursor_offset(), 22);
        feed(&mut w, &[key(KeyCode::Down)]);
        assert_eq!(w.active_document().editor().cursor_offset(), 6);

        feed(&mut w, &[key(KeyCode::Enter)]);
        assert!(w.search.is_none());
        let editor = w.active_document().editor();
        assert_eq!((editor.row(), editor.col()), (2, 0));
    }

    #[test]
    fn search_escape_restores_cursor() {
        let mut w = window();
        w.active_document_mut().editor_mut().load("one two three");
        feed(&mut w, &[key(KeyCode::Right), key(KeyCode::Right), ctrl('f')]);
        type_text(&mut w, "thr");
        assert_eq!(w.active_document().editor().cursor_offset(), 8);
        feed(&mut w, &[key(KeyCode::Escape)]);
        assert_eq!(w.active_document().editor().cursor_offset(), 2);
        assert_eq!(contents(&w), "one two three");
    }

    #[test]
    fn search_backspace_to_empty_returns_to_start() {
        let mut w = window();
        w.active_document_mut().editor_mut().load("abc xyz");
        feed(&mut w, &[ctrl('f'), press('x'), key(KeyCode::Backspace)]);
        assert_eq!(w.active_document().editor().cursor_offset(), 0);
    }

    // ── Painting ──────────────────────────────────────────────────────────

    #[test]
    fn paint_lays_out_bars_and_text() {
        let mut w = window();
        type_text(&mut w, "hi");
        w.set_message("hello");
        let frame = painted(&mut w, 40, 6);

        assert!(frame.row_text(0).starts_with("[ [Untitled] ]"));
        assert_eq!(frame.row_text(1).trim_end(), "hi");
        assert_eq!(frame.row_text(2).trim_end(), "~");
        assert_eq!(frame.row_text(3).trim_end(), "~");
        assert!(frame.row_text(4).starts_with("[Untitled] - 1 lines (modified)"));
        assert_eq!(frame.row_text(5).trim_end(), "hello");
        assert_eq!(w.cursor(), Some((2, 1)));
    }

    #[test]
    fn prompt_takes_the_cursor() {
        let mut w = window();
        feed(&mut w, &[ctrl('o'), press('a'), press('b')]);
        let frame = painted(&mut w, 40, 6);
        assert_eq!(frame.row_text(5).trim_end(), "Open file: ab");
        assert_eq!(w.cursor(), Some((13, 5)));
    }

    #[test]
    fn message_expires_on_tick() {
        let mut w = window();
        w.set_message("fresh");
        assert!(!w.on_tick());
        assert_eq!(w.message(), Some("fresh"));

        let old = Instant::now().checked_sub(MESSAGE_TIMEOUT * 2).unwrap();
        w.message = Some(("stale".to_string(), old));
        assert!(w.on_tick());
        assert_eq!(w.message(), None);
    }

    #[test]
    fn resize_updates_page_height() {
        let mut w = window();
        w.on_resize(Size { cols: 80, rows: 24 });
        assert_eq!(w.text_rows, 21);
    }
}
