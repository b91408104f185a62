//! Terminal writer abstraction.
//!
//! The renderer never talks to the terminal directly. It records an ordered
//! list of primitive commands which is flushed once per frame. Tests inspect the
//! list instead of parsing escape sequences.
//!
//! Design invariants:
//! * Commands preserve ordering; nothing is emitted until `flush_to`.
//! * Positions are absolute, (0,0) origin, `MoveTo(column, row)`.
//! * `ClearLine` wipes the row of the preceding `MoveTo`.

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
    /// Toggle the cursor-line background.
    Highlight(bool),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn highlight(&mut self, on: bool) {
        self.cmds.push(Command::Highlight(on));
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Rows that were cleared (and therefore rewritten), in emission order.
    pub fn cleared_rows(&self) -> Vec<u16> {
        let mut row = None;
        let mut out = Vec::new();
        for c in &self.cmds {
            match c {
                Command::MoveTo(_, y) => row = Some(*y),
                Command::ClearLine => out.extend(row),
                _ => {}
            }
        }
        out
    }

    /// Text printed on `row`, concatenated.
    pub fn printed_on(&self, row: u16) -> String {
        let mut current = None;
        let mut out = String::new();
        for c in &self.cmds {
            match c {
                Command::MoveTo(_, y) => current = Some(*y),
                Command::Print(s) if current == Some(row) => out.push_str(s),
                _ => {}
            }
        }
        out
    }

    /// Final cursor placement, if any.
    pub fn final_cursor(&self) -> Option<(u16, u16)> {
        self.cmds.iter().rev().find_map(|c| match c {
            Command::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> std::io::Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Highlight(true) => queue!(out, SetBackgroundColor(Color::Blue))?,
                Command::Highlight(false) => queue!(out, ResetColor)?,
            }
        }
        out.flush()
    }
}
