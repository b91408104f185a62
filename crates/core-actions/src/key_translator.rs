//! Default key table: crossterm key events to `Command`s.
//!
//! | Key | Command |
//! |---|---|
//! | arrows | character / line motion |
//! | Ctrl-Left / Ctrl-Right | word motion |
//! | Home / End | start / end of line |
//! | Ctrl-Home / Ctrl-End | start / end of file |
//! | PageUp / PageDown | screen motion |
//! | Enter, Tab, printable | insert `\n`, `\t`, the character's UTF-8 bytes |
//! | Backspace | delete backward |
//! | Ctrl-S, Ctrl-Q, Alt-Q, Ctrl-Z | write, quit, force quit, suspend |
//! | Alt-M, Alt-G | set mark, exchange mark |
//! | Alt-[, Alt-], Alt-C | selection start, end, clear |
//! | Alt-o, Alt-O | insert line after, before |
//!
//! Release and repeat-only events are ignored; unmapped keys yield `None`.

use crate::{Command, MarkOp, SelectionOp};
use core_text::{Motion, Placement};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn translate_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let cmd = match key.code {
        KeyCode::Left if ctrl => Command::Move(Motion::PrevWord),
        KeyCode::Right if ctrl => Command::Move(Motion::NextWord),
        KeyCode::Left => Command::Move(Motion::PrevChar),
        KeyCode::Right => Command::Move(Motion::NextChar),
        KeyCode::Up => Command::Move(Motion::PrevLine),
        KeyCode::Down => Command::Move(Motion::NextLine),
        KeyCode::Home if ctrl => Command::Move(Motion::StartOfFile),
        KeyCode::End if ctrl => Command::Move(Motion::EndOfFile),
        KeyCode::Home => Command::Move(Motion::StartOfLine),
        KeyCode::End => Command::Move(Motion::EndOfLine),
        KeyCode::PageUp => Command::Move(Motion::PrevScreen),
        KeyCode::PageDown => Command::Move(Motion::NextScreen),
        KeyCode::Enter => Command::insert(b"\n"),
        KeyCode::Tab => Command::insert(b"\t"),
        KeyCode::Backspace => Command::DeleteBackward,
        KeyCode::Char(c) if ctrl => control_key(c)?,
        KeyCode::Char(c) if alt => alt_key(c)?,
        KeyCode::Char(c) => {
            let mut utf8 = [0u8; 4];
            Command::insert(c.encode_utf8(&mut utf8).as_bytes())
        }
        _ => return None,
    };
    Some(cmd)
}

fn control_key(c: char) -> Option<Command> {
    Some(match c.to_ascii_lowercase() {
        's' => Command::Write,
        'q' => Command::Quit { force: false },
        'z' => Command::Suspend,
        _ => return None,
    })
}

fn alt_key(c: char) -> Option<Command> {
    Some(match c {
        'q' | 'Q' => Command::Quit { force: true },
        'm' | 'M' => Command::Mark(MarkOp::Set),
        'g' | 'G' => Command::Mark(MarkOp::Exchange),
        '[' => Command::Selection(SelectionOp::SetStart),
        ']' => Command::Selection(SelectionOp::SetEnd),
        'c' | 'C' => Command::Selection(SelectionOp::Clear),
        'o' => Command::InsertLine(Placement::After),
        'O' => Command::InsertLine(Placement::Before),
        _ => return None,
    })
}
