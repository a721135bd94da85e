// SPDX-License-Identifier: MIT
//
// In-memory backend for driving the runtime loop in tests.
//
// A `ScriptedBackend` replays a queue of steps, one per input poll: raw
// bytes to decode, ready-made events, a resize, an interrupt, or an idle
// tick. Everything written to it is recorded per frame, and the lifecycle
// calls are counted so tests can assert that restoration happened exactly
// once on every exit path.
//
// When the script runs out, the backend feeds the quit key (Ctrl+Q) so a
// test loop always terminates. `keep_running` turns that off.

use std::collections::VecDeque;
use std::io;

use crate::backend::{Backend, Size};
use crate::error::{Result, TermError};
use crate::input::{self, Event};

/// One input poll's worth of scripted behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Raw bytes, decoded exactly like a real read.
    Bytes(Vec<u8>),
    /// Events delivered as-is.
    Events(Vec<Event>),
    /// The terminal reports a new size from now on.
    Resize(Size),
    /// SIGINT arrives.
    Interrupt,
    /// Nothing pending.
    Idle,
}

/// A [`Backend`] that replays a script and records output.
#[derive(Debug)]
pub struct ScriptedBackend {
    steps: VecDeque<Step>,
    size: Size,
    frames: Vec<Vec<u8>>,
    initialize_calls: usize,
    shutdown_calls: usize,
    restorations: usize,
    polls: usize,
    active: bool,
    interrupted: bool,
    quit_when_exhausted: bool,
    fail_initialize: Option<&'static str>,
    fail_writes: bool,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            steps: VecDeque::new(),
            size,
            frames: Vec::new(),
            initialize_calls: 0,
            shutdown_calls: 0,
            restorations: 0,
            polls: 0,
            active: false,
            interrupted: false,
            quit_when_exhausted: true,
            fail_initialize: None,
            fail_writes: false,
        }
    }

    // ── Script building ─────────────────────────────────────────────

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    /// Queue raw input bytes for one poll.
    #[must_use]
    pub fn bytes(self, bytes: impl AsRef<[u8]>) -> Self {
        self.step(Step::Bytes(bytes.as_ref().to_vec()))
    }

    /// Queue decoded events for one poll.
    #[must_use]
    pub fn events(self, events: impl IntoIterator<Item = Event>) -> Self {
        self.step(Step::Events(events.into_iter().collect()))
    }

    #[must_use]
    pub fn resize(self, cols: u16, rows: u16) -> Self {
        self.step(Step::Resize(Size::new(cols, rows)))
    }

    #[must_use]
    pub fn interrupt(self) -> Self {
        self.step(Step::Interrupt)
    }

    /// Queue `n` polls with no input.
    #[must_use]
    pub fn idle(mut self, n: usize) -> Self {
        self.steps.extend(std::iter::repeat_n(Step::Idle, n));
        self
    }

    /// Stop feeding Ctrl+Q once the script is exhausted.
    #[must_use]
    pub const fn keep_running(mut self) -> Self {
        self.quit_when_exhausted = false;
        self
    }

    /// Make `initialize` fail with a startup error naming `step`.
    #[must_use]
    pub const fn fail_initialize(mut self, step: &'static str) -> Self {
        self.fail_initialize = Some(step);
        self
    }

    /// Make every `write_all` fail.
    #[must_use]
    pub const fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    // ── Inspection ──────────────────────────────────────────────────

    #[must_use]
    pub const fn initialize_calls(&self) -> usize {
        self.initialize_calls
    }

    /// Every call to `shutdown`, including no-op repeats.
    #[must_use]
    pub const fn shutdown_calls(&self) -> usize {
        self.shutdown_calls
    }

    /// Calls to `shutdown` that actually restored an active terminal.
    #[must_use]
    pub const fn restorations(&self) -> usize {
        self.restorations
    }

    /// Number of `read_input_events` calls so far.
    #[must_use]
    pub const fn polls(&self) -> usize {
        self.polls
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The bytes of each `write_all` call, in order.
    #[must_use]
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Everything written, concatenated and decoded lossily.
    #[must_use]
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.frames.concat()).into_owned()
    }

    /// Steps not yet consumed.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }
}

impl Backend for ScriptedBackend {
    fn initialize(&mut self) -> Result<()> {
        self.initialize_calls += 1;
        if let Some(step) = self.fail_initialize {
            return Err(TermError::startup(step, io::Error::other("scripted failure")));
        }
        self.active = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.shutdown_calls += 1;
        if self.active {
            self.active = false;
            self.restorations += 1;
        }
        Ok(())
    }

    fn read_input_events(&mut self, out: &mut Vec<Event>) -> Result<()> {
        self.polls += 1;
        match self.steps.pop_front() {
            Some(Step::Bytes(bytes)) => input::decode(&bytes, out),
            Some(Step::Events(events)) => out.extend(events),
            Some(Step::Resize(size)) => self.size = size,
            Some(Step::Interrupt) => self.interrupted = true,
            Some(Step::Idle) => {}
            None if self.quit_when_exhausted => out.push(Event::char('\u{11}')),
            None => {}
        }
        Ok(())
    }

    fn size(&mut self) -> Size {
        self.size
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(TermError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted write failure",
            )));
        }
        self.frames.push(bytes.to_vec());
        Ok(())
    }

    fn interrupted(&mut self) -> bool {
        self.interrupted
    }
}
