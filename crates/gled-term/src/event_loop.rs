// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — stdin bytes in, frames out.
//
// Bytes from the background reader are parsed into key events, the app
// handles them and paints a frame, and the diff renderer sends only the
// rows that changed.
//
// # Timing
//
// The loop blocks on the reader channel with a short timeout (8.3ms by
// default). Keys are handled the moment they arrive; when nothing happens
// the thread sleeps in `recv_timeout`. Each timeout is also a tick: the app
// can expire status messages there, and a pending lone ESC is resolved as
// the Escape key. A frame is only painted when something changed.
//
// # SIGWINCH
//
// The resize handler sets an `AtomicBool`; the loop checks it every
// iteration, resizes the frame and forces a full redraw.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi;
use crate::diff::DiffRenderer;
use crate::frame::Frame;
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a SIGWINCH handler that only stores to an atomic, which is
/// async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// A terminal application driven by [`EventLoop`].
///
/// Per iteration the loop calls, in order:
///
/// 1. [`on_event`](App::on_event) for each parsed key
/// 2. [`on_resize`](App::on_resize) if the terminal size changed
/// 3. [`on_tick`](App::on_tick)
/// 4. [`paint`](App::paint) and then [`cursor`](App::cursor), only when
///    something changed
///
/// Only `paint` is required.
pub trait App {
    /// Handle one key. Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal was resized; the frame already has the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every iteration. Return `true` to request a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the whole UI. The frame has been cleared beforehand.
    fn paint(&mut self, frame: &mut Frame);

    /// Where to show the hardware cursor after painting, or `None` to hide
    /// it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Channel timeout in microseconds. Doubles as tick interval and as the
    /// lone-ESC timeout.
    pub tick_interval_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_us: 8333,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer.
///
/// ```no_run
/// use gled_term::event_loop::{Action, App, EventLoop};
/// use gled_term::frame::{Attr, Frame};
/// use gled_term::input::Event;
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_event(&mut self, event: &Event) -> Action {
///         let Event::Key(key) = event;
///         if key.is_ctrl('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, frame: &mut Frame) {
///         frame.paint_text(0, 0, "hello", Attr::BOLD);
///     }
/// }
///
/// EventLoop::new().run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the app returns [`Action::Quit`] or stdin closes. The
    /// terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if entering or leaving the terminal, spawning the
    /// reader, or writing a frame fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(e) => Err(e),
        };

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = Frame::new(size.cols, size.rows);
        let mut dirty = true;
        let timeout = Duration::from_micros(self.config.tick_interval_us);

        loop {
            // ── Input ────────────────────────────────────────────
            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };
            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            // ── Resize ───────────────────────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            // ── Tick ─────────────────────────────────────────────
            dirty |= app.on_tick();

            // ── Render ───────────────────────────────────────────
            if dirty {
                frame.clear();
                app.paint(&mut frame);
                self.renderer.render(&frame);
                self.renderer.flush()?;

                let stdout = io::stdout();
                let mut lock = stdout.lock();
                if let Some((x, y)) = app.cursor() {
                    ansi::cursor_to(&mut lock, x, y)?;
                    ansi::cursor_show(&mut lock)?;
                } else {
                    ansi::cursor_hide(&mut lock)?;
                }
                lock.flush()?;

                dirty = false;
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent, Modifiers};

    struct MinimalApp;

    impl App for MinimalApp {
        fn paint(&mut self, _frame: &mut Frame) {}
    }

    #[test]
    fn default_tick_is_120hz() {
        assert_eq!(LoopConfig::default().tick_interval_us, 8333);
    }

    #[test]
    fn custom_config_kept() {
        let lp = EventLoop::with_config(LoopConfig {
            tick_interval_us: 16667,
        });
        assert_eq!(lp.config.tick_interval_us, 16667);
        assert!(lp.size().cols > 0);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    #[test]
    fn app_defaults() {
        let mut app = MinimalApp;
        let event = Event::Key(KeyEvent::new(KeyCode::Char('x'), Modifiers::empty()));
        assert_eq!(app.on_event(&event), Action::Continue);
        assert!(!app.on_tick());
        app.on_resize(Size { cols: 100, rows: 50 });
        assert!(app.cursor().is_none());
    }
}
