// SPDX-License-Identifier: MIT
//
// kontra demo: a live event viewer built from the stock containers.
//
// A framed row holds a scrolling list of decoded events (newest first) and
// a stats panel whose text is pulled from shared state every frame. Press
// keys, click, scroll over the list, resize the terminal. Ctrl+Q quits.
//
// Usage:
//   cargo run --example events

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use kontra::layout::node::downcast_mut;
use kontra::layout::{Flex, Frame, List, Node, Text, TitleAlignment};
use kontra::term::ansi::{self, BoxChars};
use kontra::term::{Event, Key, MouseEventKind, Size};
use kontra::{App, AppError, Control, Runtime};

const MAX_LOG_ENTRIES: usize = 100;

struct Stats {
    events: Cell<u64>,
    size: Cell<Size>,
    start: Instant,
}

struct Viewer {
    root: Frame,
    log: VecDeque<String>,
    stats: Rc<Stats>,
}

impl Viewer {
    fn new() -> Self {
        let stats = Rc::new(Stats {
            events: Cell::new(0),
            size: Cell::new(Size::default()),
            start: Instant::now(),
        });

        let shared = Rc::clone(&stats);
        let panel = Frame::new()
            .with_title("stats")
            .with_chars(BoxChars::ROUNDED)
            .with_padding(1)
            .with_child(Text::dynamic(move || {
                let size = shared.size.get();
                format!(
                    "events: {}\nsize:   {}x{}\nuptime: {}s\n\nCtrl+Q quits",
                    shared.events.get(),
                    size.cols,
                    size.rows,
                    shared.start.elapsed().as_secs(),
                )
            }));

        let body = Flex::row()
            .with_gap(1)
            .with_child(List::new().with_scrollbar_styles(ansi::FG_BRIGHT_BLACK, ansi::FG_CYAN))
            .with_child(panel);

        let root = Frame::new()
            .with_title("kontra events")
            .with_alignment(TitleAlignment::Center)
            .with_chars(BoxChars::DOUBLE)
            .with_style(ansi::FG_CYAN)
            .with_padding(1)
            .with_child(body);

        Self { root, log: VecDeque::with_capacity(MAX_LOG_ENTRIES), stats }
    }

    fn list(&mut self) -> Option<&mut List> {
        let body = downcast_mut::<Flex>(self.root.child_mut()?)?;
        downcast_mut::<List>(body.children_mut().first_mut()?.as_mut())
    }

    fn push_log(&mut self, msg: String) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_back();
        }
        self.log.push_front(msg);

        let entries: Vec<String> = self.log.iter().cloned().collect();
        if let Some(list) = self.list() {
            list.clear();
            for entry in entries {
                list.push(Text::new(entry));
            }
        }
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::Key(Key::Char(c)) if c.is_control() => format!("key  ctrl 0x{:02x}", u32::from(*c)),
        Event::Key(Key::Char(c)) => format!("key  '{c}'"),
        Event::Key(key) => format!("key  {key:?}"),
        Event::Mouse(m) => format!("mouse {:?} at {},{}", m.kind, m.column, m.row),
    }
}

impl App for Viewer {
    fn on_event(&mut self, event: &Event) -> Result<Control, AppError> {
        self.stats.events.set(self.stats.events.get() + 1);

        if let Some(mouse) = event.as_mouse() {
            let wheel = mouse.kind != MouseEventKind::Press;
            if wheel && self.list().is_some_and(|list| list.handle_scroll(mouse)) {
                return Ok(Control::Continue);
            }
        }

        self.push_log(describe(event));
        Ok(Control::Continue)
    }

    fn on_resize(&mut self, size: Size) {
        self.stats.size.set(size);
        self.push_log(format!("resize {}x{}", size.cols, size.rows));
    }

    fn root(&mut self) -> &mut dyn Node {
        &mut self.root
    }
}

fn main() -> Result<(), kontra::RuntimeError> {
    let mut app = Viewer::new();
    let mut runtime = Runtime::new();
    if let Some(size) = kontra::term::terminal::get_size() {
        app.stats.size.set(size);
    }
    runtime.run_app(&mut app)
}
