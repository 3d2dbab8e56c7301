//! Output sinks.
//!
//! Everything the runtime prints goes through [`Terminal`]. Two sinks are
//! provided:
//!
//! - [`ScreenBuffer`] interprets the escape sequences the runtime emits into a
//!   grid of styled cells, which the UI renders.
//! - [`Transcript`] records raw writes for assertions.

use std::cell::{Cell as StdCell, RefCell};

use crate::config::screen::{COLS, ROWS, SCROLLBACK};
use crate::models::{Cell, Color, Span, Style};
use crate::utils::RingBuffer;
use crate::utils::ansi;

/// Output sink consumed by commands and the line editor.
///
/// Methods take `&self`; implementations use interior mutability since the
/// sink is shared between the session and running commands.
pub trait Terminal {
    fn write(&self, text: &str);

    fn writeln(&self, text: &str) {
        self.write(text);
        self.write("\r\n");
    }

    fn clear(&self);
}

// =============================================================================
// Transcript
// =============================================================================

/// Records every write verbatim.
#[derive(Default)]
pub struct Transcript {
    output: RefCell<String>,
    clears: StdCell<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, escape sequences included.
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    /// Everything written so far with escape sequences removed.
    pub fn plain(&self) -> String {
        ansi::strip(&self.output.borrow())
    }

    /// Return and forget the recorded output.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.output.borrow_mut())
    }

    /// How many times `clear` was called.
    pub fn clears(&self) -> usize {
        self.clears.get()
    }
}

impl Terminal for Transcript {
    fn write(&self, text: &str) {
        self.output.borrow_mut().push_str(text);
    }

    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
    }
}

// =============================================================================
// Screen Buffer
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Parse {
    Ground,
    Escape,
    Csi(String),
}

struct Screen {
    /// Rows oldest first; the last `ROWS` rows are the viewport.
    lines: RingBuffer<Vec<Cell>>,
    row: usize,
    col: usize,
    style: Style,
    /// Set after writing the last column; the next printable wraps first.
    pending_wrap: bool,
    parse: Parse,
    revision: u64,
}

impl Screen {
    fn new() -> Self {
        let mut lines = RingBuffer::new(SCROLLBACK);
        lines.push(Vec::new());
        Self {
            lines,
            row: 0,
            col: 0,
            style: Style::default(),
            pending_wrap: false,
            parse: Parse::Ground,
            revision: 0,
        }
    }

    fn viewport_top(&self) -> usize {
        self.lines.len().saturating_sub(ROWS)
    }

    fn feed(&mut self, text: &str) {
        for c in text.chars() {
            let state = std::mem::replace(&mut self.parse, Parse::Ground);
            self.parse = match state {
                Parse::Ground => self.ground(c),
                Parse::Escape if c == '[' => Parse::Csi(String::new()),
                Parse::Escape => Parse::Ground,
                Parse::Csi(mut params) => {
                    if ('@'..='~').contains(&c) {
                        self.csi(&params, c);
                        Parse::Ground
                    } else {
                        params.push(c);
                        Parse::Csi(params)
                    }
                }
            };
        }
        self.revision += 1;
    }

    fn ground(&mut self, c: char) -> Parse {
        match c {
            '\x1b' => return Parse::Escape,
            '\r' => self.carriage_return(),
            '\n' => {
                self.carriage_return();
                self.line_feed();
            }
            '\x08' => {
                self.col = self.col.saturating_sub(1);
                self.pending_wrap = false;
            }
            '\t' => {
                self.col = ((self.col / 8 + 1) * 8).min(COLS - 1);
            }
            c if c.is_control() => {}
            c => self.put(c),
        }
        Parse::Ground
    }

    fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }

    fn line_feed(&mut self) {
        self.pending_wrap = false;
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            return;
        }
        self.lines.push(Vec::new());
        self.row = self.lines.len() - 1;
    }

    fn put(&mut self, c: char) {
        if self.pending_wrap {
            self.carriage_return();
            self.line_feed();
        }
        let (col, style) = (self.col, self.style);
        if let Some(line) = self.lines.get_mut(self.row) {
            if line.len() <= col {
                line.resize(col + 1, Cell::BLANK);
            }
            line[col] = Cell { ch: c, style };
        }
        if self.col + 1 >= COLS {
            self.pending_wrap = true;
        } else {
            self.col += 1;
        }
    }

    fn csi(&mut self, params: &str, action: char) {
        let nums: Vec<usize> = params
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect();
        let count = nums.first().copied().filter(|&n| n > 0).unwrap_or(1);

        match action {
            'K' => {
                let col = self.col;
                if let Some(line) = self.lines.get_mut(self.row) {
                    line.truncate(col);
                }
                self.pending_wrap = false;
            }
            'C' => {
                self.col = (self.col + count).min(COLS - 1);
                self.pending_wrap = false;
            }
            'D' => {
                self.col = self.col.saturating_sub(count);
                self.pending_wrap = false;
            }
            'H' => {
                let row = nums.first().copied().unwrap_or(1).max(1) - 1;
                let col = nums.get(1).copied().unwrap_or(1).max(1) - 1;
                self.move_to(row, col);
            }
            'J' if nums.first() == Some(&2) => self.erase_viewport(),
            'm' => self.sgr(&nums),
            _ => {}
        }
    }

    fn move_to(&mut self, row: usize, col: usize) {
        let top = self.viewport_top();
        let target = top + row.min(ROWS - 1);
        while self.lines.len() <= target {
            self.lines.push(Vec::new());
        }
        self.row = target.min(self.lines.len() - 1);
        self.col = col.min(COLS - 1);
        self.pending_wrap = false;
    }

    /// Blank every viewport row; scrollback above is kept.
    fn erase_viewport(&mut self) {
        let top = self.viewport_top();
        for index in top..self.lines.len() {
            if let Some(line) = self.lines.get_mut(index) {
                line.clear();
            }
        }
    }

    fn sgr(&mut self, nums: &[usize]) {
        let mut iter = nums.iter().copied();
        while let Some(n) = iter.next() {
            match n {
                0 => self.style = Style::default(),
                1 => self.style.bold = true,
                2 => self.style.dim = true,
                3 => self.style.italic = true,
                22 => {
                    self.style.bold = false;
                    self.style.dim = false;
                }
                23 => self.style.italic = false,
                30..=37 => self.style.fg = Color::Ansi((n - 30) as u8),
                39 => self.style.fg = Color::Default,
                90..=97 => self.style.fg = Color::Ansi((n - 90 + 8) as u8),
                38 => {
                    if iter.next() == Some(5)
                        && let Some(index) = iter.next()
                    {
                        self.style.fg = Color::Indexed(index.min(255) as u8);
                    }
                }
                _ => {}
            }
        }
    }

    /// Forget everything, scrollback included.
    fn reset(&mut self) {
        let revision = self.revision + 1;
        *self = Self::new();
        self.revision = revision;
    }
}

/// In-memory terminal screen with bounded scrollback.
///
/// `\n` also returns to column 0. Escape sequences split across writes are
/// reassembled.
pub struct ScreenBuffer {
    screen: RefCell<Screen>,
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenBuffer {
    pub fn new() -> Self {
        Self {
            screen: RefCell::new(Screen::new()),
        }
    }

    /// All rows, scrollback first, as runs of equally styled text.
    pub fn rows(&self) -> Vec<Vec<Span>> {
        self.screen
            .borrow()
            .lines
            .iter()
            .map(|line| spans(line))
            .collect()
    }

    /// Rows as plain text with trailing blanks removed.
    pub fn plain_lines(&self) -> Vec<String> {
        self.screen
            .borrow()
            .lines
            .iter()
            .map(|line| {
                let text: String = line.iter().map(|c| c.ch).collect();
                text.trim_end().to_string()
            })
            .collect()
    }

    /// Cursor as `(row, column)`, with `row` indexing [`rows`](Self::rows).
    pub fn cursor(&self) -> (usize, usize) {
        let screen = self.screen.borrow();
        (screen.row, screen.col)
    }

    /// Bumped on every write; lets a view tell when to re-render.
    pub fn revision(&self) -> u64 {
        self.screen.borrow().revision
    }
}

impl Terminal for ScreenBuffer {
    fn write(&self, text: &str) {
        self.screen.borrow_mut().feed(text);
    }

    fn clear(&self) {
        self.screen.borrow_mut().reset();
    }
}

fn spans(line: &[Cell]) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::new();
    for cell in line {
        match out.last_mut() {
            Some(span) if span.style == cell.style => span.text.push(cell.ch),
            _ => out.push(Span {
                text: cell.ch.to_string(),
                style: cell.style,
            }),
        }
    }
    out
}
