// SPDX-License-Identifier: MIT
//
// Terminal guard: quiet input, alternate screen, hidden cursor.
//
// A canvas game paints the whole screen with absolute positioning while
// keys are polled elsewhere, so typed characters must neither echo into the
// picture nor wait for Enter. Entering the guard clears ECHO and ICANON on
// stdin, switches to the alternate screen and hides the cursor. ISIG and
// OPOST stay on: Ctrl-C still ends the game and `\n` still returns the
// carriage.
//
// Leaving (or dropping) the guard undoes all of it. If the game panics
// first, a hook writes the undo sequence to fd 1 without taking the stdout
// lock and puts the saved termios back before the default hook reports.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::ansi;
use crate::config::ScreenConfig;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the window size cannot be read (pipes, CI).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };

    /// Whether a canvas with `config`'s fixed bounds fits on this terminal.
    #[must_use]
    pub fn fits(self, config: &ScreenConfig) -> bool {
        i32::from(self.cols) >= config.width && i32::from(self.rows) >= config.height
    }
}

/// Window size of the terminal on stdout, if there is one.
#[must_use]
pub fn window_size() -> Option<Size> {
    #[cfg(unix)]
    {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
        (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }
    #[cfg(not(unix))]
    {
        None
    }
}

// ─── Input mode ─────────────────────────────────────────────────────────────

/// Saved stdin termios while quiet mode is on.
#[cfg(unix)]
#[derive(Clone, Copy)]
struct Quiet(libc::termios);

/// Copy of the saved termios for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
impl Quiet {
    /// Turn off echo and line editing on stdin. `None` when stdin is not a
    /// terminal.
    fn engage() -> io::Result<Option<Self>> {
        let fd = libc::STDIN_FILENO;
        if unsafe { libc::isatty(fd) } == 0 {
            return Ok(None);
        }
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut quiet = saved;
        quiet.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON);
        quiet.c_cc[libc::VMIN] = 1;
        quiet.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const quiet) } != 0 {
            return Err(io::Error::last_os_error());
        }

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        Ok(Some(Self(saved)))
    }

    fn release(self) -> io::Result<()> {
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.0) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
#[derive(Clone, Copy)]
struct Quiet;

#[cfg(not(unix))]
impl Quiet {
    #[allow(clippy::unnecessary_wraps)]
    const fn engage() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps)]
    const fn release(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic restore ──────────────────────────────────────────────────────────

/// Attributes off, cursor on, primary screen back (in that order).
const UNDO: &[u8] = b"\x1b[0m\x1b[?25h\x1b[?1049l";

static HOOK: Once = Once::new();

fn install_panic_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            unsafe {
                let _ = libc::write(libc::STDOUT_FILENO, UNDO.as_ptr().cast(), UNDO.len());
                if let Ok(slot) = SAVED_TERMIOS.lock() {
                    if let Some(saved) = slot.as_ref() {
                        let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
                    }
                }
            }
            #[cfg(not(unix))]
            {
                let mut out = io::stdout();
                let _ = out.write_all(UNDO);
                let _ = out.flush();
            }
            previous(info);
        }));
    });
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// RAII guard over the controlling terminal.
///
/// Create it before the [`Screen`](crate::screen::Screen) so that it drops
/// after the screen's final flush.
///
/// ```no_run
/// use tcanvas_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... draw frames ...
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    out: Box<dyn Write>,
    manage_input: bool,
    quiet: Option<Quiet>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Guard over stdout and stdin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Box::new(io::stdout()),
            manage_input: true,
            quiet: None,
            size: window_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    /// Guard that writes its control sequences to `out` and leaves the
    /// input mode alone.
    #[must_use]
    pub fn with_output(out: Box<dyn Write>, size: Size) -> Self {
        Self {
            out,
            manage_input: false,
            quiet: None,
            size,
            active: false,
        }
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Switch to canvas mode. Calling it again while active does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        if self.manage_input {
            self.quiet = Quiet::engage()?;
        }

        ansi::enter_alt_screen(&mut self.out)?;
        ansi::cursor_hide(&mut self.out)?;
        ansi::clear_screen(&mut self.out)?;
        self.out.flush()?;

        self.active = true;
        debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Restore the terminal. Calling it while inactive does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        ansi::reset(&mut self.out)?;
        ansi::cursor_show(&mut self.out)?;
        ansi::exit_alt_screen(&mut self.out)?;
        self.out.flush()?;
        if let Some(quiet) = self.quiet.take() {
            quiet.release()?;
        }
        debug!("terminal left");
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
