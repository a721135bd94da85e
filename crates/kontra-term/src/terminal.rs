// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, mouse reporting, interrupts, and cleanup.
//
// Safety: This module uses `unsafe` for termios (tcgetattr, tcsetattr),
// ioctl (TIOCGWINSZ), isatty, poll, read, and raw fd writes. These are the
// POSIX interfaces for terminal control and have no safe counterpart in std.
#![allow(unsafe_code)]
//
// Lifecycle: Uninitialized → Active → Restored.
//
// `initialize` saves the original termios, switches off line buffering and
// echo, hides the cursor and turns on SGR mouse reporting. `shutdown` undoes
// all of it and is idempotent. `Drop` calls it too, so a forgotten shutdown
// still leaves a usable terminal.
//
// Two other exit paths are covered:
//
//   - Panics. A process-wide hook writes a prebuilt restore sequence straight
//     to fd 1 (no stdout lock, so no deadlock if the panic happened mid-write)
//     and restores the saved termios before the default hook prints. Inside
//     `catch_panics` the hook does neither: the caller is about to unwind to
//     its own `shutdown`, so the hook only keeps the report for
//     `take_deferred_panic` to hand out once the terminal is back.
//
//   - Interrupts. ISIG stays enabled, so Ctrl+C arrives as SIGINT. SIGINT and
//     SIGTERM set a flag the runtime polls once per iteration; it then shuts
//     down normally. A second interrupt while the flag is still set exits the
//     process at once, for a loop that has stopped polling.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::panic::UnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use tracing::{debug, info};

use crate::ansi;
use crate::backend::{Backend, Size};
use crate::error::{Result, TermError};
use crate::input::{self, Event};

// ─── Configuration ──────────────────────────────────────────────────────────

/// Which terminal features `initialize` turns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Enable all-motion SGR mouse reporting.
    pub mouse: bool,
    /// Hide the cursor while active.
    pub hide_cursor: bool,
    /// Route SIGINT/SIGTERM to [`Backend::interrupted`].
    pub handle_interrupt: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            hide_cursor: true,
            handle_interrupt: true,
        }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal or reports a zero size.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    (result == 0 && ws.ws_col > 0 && ws.ws_row > 0).then(|| Size::new(ws.ws_col, ws.ws_row))
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a TTY.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Copy of the original termios for the panic hook, which cannot reach the
/// `Terminal` that owns the primary copy.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Mouse off (both modes), SGR reset, cursor visible.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?1003l\x1b[?1006l\
    \x1b[0m\
    \x1b[?25h";

static PANIC_HOOK_INSTALLED: Once = Once::new();

thread_local! {
    /// Set while this thread runs inside [`catch_panics`].
    static DEFERRING: Cell<bool> = const { Cell::new(false) };
    /// Report of the last panic caught by [`catch_panics`].
    static DEFERRED: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Chain a terminal-restoring hook in front of the current panic hook.
/// Installed at most once per process.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if DEFERRING.with(Cell::get) {
                let report = info.to_string();
                DEFERRED.with(|slot| {
                    if let Ok(mut slot) = slot.try_borrow_mut() {
                        *slot = Some(report);
                    }
                });
                return;
            }
            if ACTIVE.load(Ordering::SeqCst) {
                emergency_restore();
                #[cfg(unix)]
                restore_termios_from_backup();
            }
            original(info);
        }));
    });
}

/// Run `f`, catching a panic, for callers that restore the terminal
/// themselves after unwinding.
///
/// A panic inside `f` skips the emergency restore and is not printed; its
/// report (location and message) is kept for [`take_deferred_panic`].
///
/// # Errors
///
/// The panic payload, as from [`std::panic::catch_unwind`].
pub fn catch_panics<R>(f: impl FnOnce() -> R + UnwindSafe) -> std::thread::Result<R> {
    install_panic_hook();
    let outer = DEFERRING.with(|d| d.replace(true));
    let result = std::panic::catch_unwind(f);
    DEFERRING.with(|d| d.set(outer));
    result
}

/// The report of the last panic caught by [`catch_panics`] on this thread,
/// if it has not been taken yet.
#[must_use]
pub fn take_deferred_panic() -> Option<String> {
    DEFERRED.with(|slot| slot.try_borrow_mut().ok().and_then(|mut s| s.take()))
}

/// Whether any `Terminal` is currently active. Gates the panic hook so
/// panics outside a session don't emit escape sequences.
static ACTIVE: AtomicBool = AtomicBool::new(false);

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Active,
    Restored,
}

/// The process's controlling terminal on stdin/stdout.
///
/// ```no_run
/// use kontra_term::backend::Backend;
/// use kontra_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.initialize()?;
/// // ... read events, write frames ...
/// term.shutdown()?;
/// # Ok::<(), kontra_term::TermError>(())
/// ```
pub struct Terminal {
    config: TerminalConfig,
    state: State,
    size: Size,
    /// Original termios saved by `initialize`. `None` when stdin is not a TTY.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
    interrupt: Arc<AtomicBool>,
    #[cfg(unix)]
    signal_ids: Vec<signal_hook::SigId>,
    read_buf: Vec<u8>,
}

const READ_CHUNK: usize = 4096;

impl Terminal {
    /// A terminal handle with default features. Nothing is changed until
    /// [`initialize`](Backend::initialize).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TerminalConfig::default())
    }

    #[must_use]
    pub fn with_config(config: TerminalConfig) -> Self {
        Self {
            config,
            state: State::Uninitialized,
            size: get_size().unwrap_or_default(),
            #[cfg(unix)]
            original_termios: None,
            interrupt: Arc::new(AtomicBool::new(false)),
            #[cfg(unix)]
            signal_ids: Vec::new(),
            read_buf: Vec::with_capacity(READ_CHUNK),
        }
    }

    #[must_use]
    pub const fn config(&self) -> TerminalConfig {
        self.config
    }

    /// Whether the terminal is in interactive mode.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> Result<()> {
        if !is_tty() {
            debug!("stdin is not a tty; leaving line discipline untouched");
            return Ok(());
        }

        let fd = libc::STDIN_FILENO;
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(TermError::startup("tcgetattr", io::Error::last_os_error()));
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // No echo, no line buffering. IXON off so Ctrl+Q reaches us
            // instead of the flow-control layer. ISIG stays on.
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN);
            termios.c_iflag &= !(libc::IXON | libc::ICRNL);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(TermError::startup("tcsetattr", io::Error::last_os_error()));
            }
        }
        info!("raw mode enabled");
        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original_termios = None;
            info!("raw mode disabled");
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    // ── Signals ─────────────────────────────────────────────────────

    #[cfg(unix)]
    fn register_signals(&mut self) -> Result<()> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};
        use signal_hook::flag;

        for sig in [SIGINT, SIGTERM] {
            // Registered first so it only fires once the flag is already set.
            let exit = flag::register_conditional_shutdown(sig, 128 + sig, Arc::clone(&self.interrupt))
                .map_err(TermError::Signal)?;
            self.signal_ids.push(exit);
            let id = flag::register(sig, Arc::clone(&self.interrupt)).map_err(TermError::Signal)?;
            self.signal_ids.push(id);
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn register_signals(&mut self) -> Result<()> {
        Ok(())
    }

    fn unregister_signals(&mut self) {
        #[cfg(unix)]
        for id in self.signal_ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }

    // ── Startup ─────────────────────────────────────────────────────

    /// Everything after raw mode. On failure the caller shuts down again.
    fn finish_startup(&mut self) -> Result<()> {
        if self.config.handle_interrupt {
            self.register_signals()?;
        }
        self.write_startup_sequences()
            .map_err(|e| TermError::startup("enable terminal features", e))?;
        if self.config.mouse {
            info!("mouse reporting enabled");
        }
        Ok(())
    }

    // ── Output ──────────────────────────────────────────────────────

    fn write_startup_sequences(&self) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        if self.config.hide_cursor {
            ansi::cursor_hide(&mut lock)?;
        }
        if self.config.mouse {
            ansi::enable_mouse(&mut lock)?;
        }
        lock.flush()
    }

    fn write_restore_sequences(&self) -> io::Result<()> {
        let mut lock = io::stdout().lock();
        if self.config.mouse {
            ansi::disable_mouse(&mut lock)?;
        }
        ansi::reset(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        lock.flush()
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Read everything stdin has pending right now into `read_buf`.
    #[cfg(unix)]
    fn drain_stdin(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            let ready = unsafe { libc::poll(&raw mut pfd, 1, 0) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    return Ok(());
                }
                return Err(err);
            }
            if ready == 0 || pfd.revents & libc::POLLIN == 0 {
                return Ok(());
            }

            let n = unsafe { libc::read(libc::STDIN_FILENO, chunk.as_mut_ptr().cast(), chunk.len()) };
            match n {
                0 => return Ok(()),
                n if n < 0 => {
                    let err = io::Error::last_os_error();
                    return match err.kind() {
                        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(()),
                        _ => Err(err),
                    };
                }
                #[allow(clippy::cast_sign_loss)]
                n => self.read_buf.extend_from_slice(&chunk[..n as usize]),
            }
        }
    }

    #[cfg(not(unix))]
    fn drain_stdin(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Terminal {
    fn initialize(&mut self) -> Result<()> {
        if self.state == State::Active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;
        ACTIVE.store(true, Ordering::SeqCst);
        self.state = State::Active;

        if let Err(err) = self.finish_startup() {
            let _ = self.shutdown();
            return Err(err);
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.state != State::Active {
            return Ok(());
        }
        self.state = State::Restored;

        // Every step runs even if an earlier one failed.
        let output = self.write_restore_sequences();
        let termios = self.disable_raw_mode();
        self.unregister_signals();
        ACTIVE.store(false, Ordering::SeqCst);
        if self.config.mouse {
            info!("mouse reporting disabled");
        }

        output?;
        termios?;
        Ok(())
    }

    fn read_input_events(&mut self, out: &mut Vec<Event>) -> Result<()> {
        self.read_buf.clear();
        self.drain_stdin()?;
        input::decode(&self.read_buf, out);
        Ok(())
    }

    fn size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut lock = io::stdout().lock();
        lock.write_all(bytes)?;
        lock.flush()?;
        Ok(())
    }

    fn interrupted(&mut self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
