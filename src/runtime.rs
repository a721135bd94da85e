// SPDX-License-Identifier: MIT
//
// Runtime loop: the heartbeat of a kontra application.
//
// One thread, one loop. Each iteration drains pending input without
// blocking, dispatches the decoded events in order, follows terminal
// resizes, renders the root node into a fresh grid, flushes the diff, and
// sleeps for one tick (16 ms by default).
//
// # Exit paths
//
// The loop ends on the reserved quit key (Ctrl+Q), on `Control::Quit`
// from the application, on SIGINT/SIGTERM, on an error from the
// application or the backend, and on a panic in the callback or in a
// node's render. Panics are caught at the loop boundary and reported after
// restoration rather than by the panic hook. Whatever the
// path, `Backend::shutdown` runs exactly once before `run_app` returns, so
// the terminal is never left in raw mode with mouse tracking on.
//
// # First frame
//
// The screen is cleared once at startup and the first flush repaints
// every cell. After that only changed cells are written.

use std::panic::AssertUnwindSafe;
use std::thread;
use std::time::Duration;

use kontra_layout::node::Node;
use kontra_term::ansi;
use kontra_term::backend::{Backend, Size};
use kontra_term::diff::{DiffRenderer, RenderStats};
use kontra_term::input::Event;
use kontra_term::terminal::{self, Terminal};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result, RuntimeError};

/// Byte 17, Ctrl+Q.
pub const QUIT_KEY: char = '\u{11}';

// ─── Config ──────────────────────────────────────────────────────────────────

/// Loop timing and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Sleep between iterations.
    pub tick: Duration,
    /// Key that always stops the loop, whatever the application says.
    pub quit_key: char,
    /// Log fatal errors and print them to stderr after restoration.
    pub report_errors: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
            quit_key: QUIT_KEY,
            report_errors: true,
        }
    }
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the loop does after an event has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    /// Stop cleanly after this event.
    Quit,
}

/// Application interface for the runtime loop.
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each
/// decoded event, [`on_resize`](App::on_resize) if the terminal changed
/// size, then renders [`root`](App::root) into the full screen.
pub trait App {
    /// Handle one input event. The reserved quit key never reaches here.
    ///
    /// # Errors
    ///
    /// Any error ends the session and is returned from
    /// [`Runtime::run_app`] as [`RuntimeError::App`].
    fn on_event(&mut self, _event: &Event) -> std::result::Result<Control, AppError> {
        Ok(Control::Continue)
    }

    /// The terminal changed size. The grid buffers are already resized.
    fn on_resize(&mut self, _size: Size) {}

    /// The node rendered into the whole screen each frame.
    fn root(&mut self) -> &mut dyn Node;
}

/// Adapts a root node plus a callback to [`App`].
struct FnApp<'a, N, F> {
    root: &'a mut N,
    callback: F,
}

impl<N, F> App for FnApp<'_, N, F>
where
    N: Node,
    F: FnMut(&mut N, &Event) -> std::result::Result<Control, AppError>,
{
    fn on_event(&mut self, event: &Event) -> std::result::Result<Control, AppError> {
        (self.callback)(&mut *self.root, event)
    }

    fn root(&mut self) -> &mut dyn Node {
        &mut *self.root
    }
}

// ─── Runtime ─────────────────────────────────────────────────────────────────

/// Owns the backend and the double buffer, and runs the loop.
///
/// # Example
///
/// ```no_run
/// use kontra::runtime::{Control, Runtime};
/// use kontra::layout::Text;
/// use kontra::term::Event;
///
/// let mut root = Text::new("press q or Ctrl+Q");
/// Runtime::new().run(&mut root, |_root, event| {
///     Ok(if event.as_char() == Some('q') { Control::Quit } else { Control::Continue })
/// })?;
/// # Ok::<(), kontra::RuntimeError>(())
/// ```
pub struct Runtime<B: Backend = Terminal> {
    backend: B,
    renderer: DiffRenderer,
    config: RuntimeConfig,
    size: Size,
    events: Vec<Event>,
    frames: u64,
    last_stats: RenderStats,
}

impl Runtime<Terminal> {
    /// A runtime on the real terminal with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Terminal::new())
    }
}

impl Default for Runtime<Terminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Runtime<B> {
    pub fn with_backend(backend: B) -> Self {
        let size = Size::default();
        Self {
            backend,
            renderer: DiffRenderer::new(size.cols, size.rows),
            config: RuntimeConfig::default(),
            size,
            events: Vec::new(),
            frames: 0,
            last_stats: RenderStats::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The double buffer; `previous()` holds the last flushed frame.
    #[inline]
    #[must_use]
    pub const fn renderer(&self) -> &DiffRenderer {
        &self.renderer
    }

    /// Frames rendered in the current or last session.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    #[must_use]
    pub const fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Run with a root node and an event callback.
    ///
    /// # Errors
    ///
    /// See [`run_app`](Self::run_app).
    pub fn run<N, F>(&mut self, root: &mut N, callback: F) -> Result<()>
    where
        N: Node,
        F: FnMut(&mut N, &Event) -> std::result::Result<Control, AppError>,
    {
        self.run_app(&mut FnApp { root, callback })
    }

    /// Run until a quit condition, then restore the terminal.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the session: a startup or I/O failure
    /// from the backend, an application error, or a caught panic. The
    /// terminal has been restored by the time this returns.
    pub fn run_app(&mut self, app: &mut impl App) -> Result<()> {
        let result = match self.backend.initialize() {
            Ok(()) => {
                info!("runtime started");
                match terminal::catch_panics(AssertUnwindSafe(|| self.drive(app))) {
                    Ok(r) => r,
                    Err(payload) => Err(RuntimeError::from_panic(payload.as_ref())),
                }
            }
            Err(e) => Err(e.into()),
        };

        let restored = self.backend.shutdown().map_err(RuntimeError::from);
        let result = result.and(restored);
        // Printed only now, with the terminal out of raw mode.
        let panic_report = terminal::take_deferred_panic();

        match &result {
            Ok(()) => info!(frames = self.frames, "runtime stopped"),
            Err(e) => self.report(e, panic_report.as_deref()),
        }
        result
    }

    fn report(&self, e: &RuntimeError, panic_report: Option<&str>) {
        if !self.config.report_errors {
            return;
        }
        error!(error = %e, "runtime stopped on error");
        if let Some(report) = panic_report {
            eprintln!("[kontra] {report}");
        }
        eprintln!("[kontra] runtime error: {e}");
    }

    // ── The loop ────────────────────────────────────────────────────

    fn drive(&mut self, app: &mut impl App) -> Result<()> {
        self.frames = 0;
        self.size = self.backend.size();
        self.renderer.resize(self.size.cols, self.size.rows);

        let mut clear = String::with_capacity(8);
        clear.push_str(ansi::CLEAR_SCREEN);
        clear.push_str(ansi::CURSOR_HOME);
        self.backend.write_all(clear.as_bytes())?;

        loop {
            self.events.clear();
            self.backend.read_input_events(&mut self.events)?;

            if self.backend.interrupted() {
                warn!("interrupt received, shutting down");
                return Ok(());
            }

            if self.dispatch(app)? == Control::Quit {
                return Ok(());
            }

            self.follow_resize(app);
            self.render_frame(app)?;

            thread::sleep(self.config.tick);
        }
    }

    /// Hand this iteration's events to the application, in order.
    fn dispatch(&mut self, app: &mut impl App) -> Result<Control> {
        for event in &self.events {
            if event.as_char() == Some(self.config.quit_key) {
                info!("quit key pressed");
                return Ok(Control::Quit);
            }
            if app.on_event(event).map_err(RuntimeError::App)? == Control::Quit {
                debug!("application requested quit");
                return Ok(Control::Quit);
            }
        }
        Ok(Control::Continue)
    }

    fn follow_resize(&mut self, app: &mut impl App) {
        let size = self.backend.size();
        if size == self.size {
            return;
        }
        debug!(cols = size.cols, rows = size.rows, "terminal resized");
        self.size = size;
        self.renderer.resize(size.cols, size.rows);
        app.on_resize(size);
    }

    fn render_frame(&mut self, app: &mut impl App) -> Result<()> {
        self.renderer.begin_frame();
        let area = self.renderer.current().bounds();
        app.root().render(self.renderer.current_mut(), area);

        self.last_stats = self.renderer.flush();
        self.frames += 1;

        let bytes = self.renderer.output_bytes();
        if !bytes.is_empty() {
            self.backend.write_all(bytes)?;
        }
        Ok(())
    }
}

impl<B: Backend + std::fmt::Debug> std::fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("size", &self.size)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
