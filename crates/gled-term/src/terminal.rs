// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, alternate screen, and RAII cleanup.
//
// Safety: tcgetattr, tcsetattr, ioctl(TIOCGWINSZ), isatty and the raw fd
// write in the panic hook have no safe wrapper in std. Each unsafe block
// holds exactly one call.
#![allow(unsafe_code)]
//
// Two layers:
//
//   RawMode   the saved termios of stdin; restores it when dropped
//   Terminal  RawMode plus the alternate screen and hidden cursor
//
// A panic cannot reach either value, so the saved termios is mirrored into
// a static and the panic hook restores from there after writing the
// emergency sequence straight to fd 1.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the real size cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Size of the terminal on stdout, or `None` when stdout is not a terminal.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    // SAFETY: winsize is plain data; ioctl only writes into it.
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── termios ────────────────────────────────────────────────────────────────

#[cfg(unix)]
fn read_termios(fd: libc::c_int) -> io::Result<libc::termios> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &raw mut termios) } == 0 {
        Ok(termios)
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn write_termios(fd: libc::c_int, termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Turn `termios` into raw mode: bytes arrive one at a time, unechoed and
/// untranslated. Ctrl-C, Ctrl-S, Ctrl-Q and Ctrl-V reach the editor as keys.
#[cfg(unix)]
fn make_raw(termios: &mut libc::termios) {
    let input_off = libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON;
    let local_off = libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN;

    termios.c_iflag &= !input_off;
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !local_off;
    termios.c_cflag = (termios.c_cflag & !(libc::CSIZE | libc::PARENB)) | libc::CS8;
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;
}

/// Copy of the cooked-mode termios for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn remember_termios(termios: Option<libc::termios>) {
    if let Ok(mut slot) = SAVED_TERMIOS.lock() {
        *slot = termios;
    }
}

/// Stdin switched to raw mode. Dropping it puts the saved mode back.
#[cfg(unix)]
struct RawMode {
    fd: libc::c_int,
    cooked: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// `Ok(None)` when stdin is not a terminal; there is nothing to switch.
    fn enable() -> io::Result<Option<Self>> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(None);
        }
        let fd = io::stdin().as_raw_fd();
        let cooked = read_termios(fd)?;
        let mut raw = cooked;
        make_raw(&mut raw);
        write_termios(fd, &raw)?;
        remember_termios(Some(cooked));
        Ok(Some(Self { fd, cooked }))
    }

    fn disable(self) -> io::Result<()> {
        let result = write_termios(self.fd, &self.cooked);
        remember_termios(None);
        std::mem::forget(self);
        result
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = write_termios(self.fd, &self.cooked);
        remember_termios(None);
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps)]
    fn disable(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

/// Stop synchronized output, reset attributes, show the cursor, and leave
/// the alternate screen last.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            previous(info);
        }));
    });
}

/// Bypasses the stdout lock, which the panicking thread may hold.
fn emergency_restore() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(slot) = SAVED_TERMIOS.lock() {
            if let Some(cooked) = slot.as_ref() {
                let _ = write_termios(libc::STDIN_FILENO, cooked);
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The editor's hold on the terminal.
///
/// ```no_run
/// use gled_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // draw, read keys
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Does not touch the terminal until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    /// Size as of construction or the last [`refresh_size`](Self::refresh_size).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, keeping the old value if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        self.size = get_size().unwrap_or(self.size);
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to raw mode and a cleared alternate screen with the cursor
    /// hidden. Does nothing if already entered.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios calls or the terminal write fail.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Does nothing if not entered.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal write or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }

        if let Some(raw) = self.raw.take() {
            raw.disable()?;
        }
        tracing::debug!("terminal restored");
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_80_by_24() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn queries_work_without_a_terminal() {
        let _ = get_size();
        let _ = is_tty();
    }

    #[test]
    fn emergency_sequence_leaves_alt_screen_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[?2026l"));
        assert!(s.contains("\x1b[0m"));
        assert!(s.contains("\x1b[?25h"));
        assert!(s.ends_with("\x1b[?1049l"));
    }

    #[cfg(unix)]
    #[test]
    fn make_raw_clears_line_discipline() {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = libc::ICRNL | libc::IXON | libc::IGNPAR;
        t.c_oflag = libc::OPOST;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG;
        t.c_cflag = libc::PARENB;
        make_raw(&mut t);

        assert_eq!(t.c_iflag & (libc::ICRNL | libc::IXON), 0);
        assert_ne!(t.c_iflag & libc::IGNPAR, 0);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
        assert_eq!(t.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG), 0);
        assert_eq!(t.c_cflag & libc::PARENB, 0);
        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(t.c_cc[libc::VMIN], 1);
        assert_eq!(t.c_cc[libc::VTIME], 0);
    }

    #[test]
    fn new_terminal_is_inactive() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0 && term.size().rows > 0);
    }

    #[test]
    fn enter_and_leave_are_idempotent() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.is_active());
        term.leave().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn drop_leaves_the_terminal() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        drop(term);
    }

    #[test]
    fn refresh_size_matches_cache() {
        let mut term = Terminal::new();
        let s = term.refresh_size();
        assert_eq!(s, term.size());
    }
}
