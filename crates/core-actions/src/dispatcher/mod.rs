//! Dispatcher applying `Command` to the editing session.
//!
//! Sub-modules:
//! * `motion`  - cursor movement
//! * `edit`    - text mutation (insert, backspace, line insertion)
//! * `mark`    - mark and selection anchors
//! * `command` - quit, write and suspend
//!
//! Buffer errors (allocation failure, stale cursor) are returned to the caller
//! and are fatal. Everything the user can cause (quitting with unsaved
//! changes, a failed write) becomes a status message instead.

use crate::Command;
use anyhow::Result;
use core_state::EditorSession;

mod command;
mod edit;
mod mark;
mod motion;

/// Result of dispatching a single `Command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Screen needs a redraw.
    pub dirty: bool,
    pub quit: bool,
    /// The main loop should hand the terminal back and stop the process.
    pub suspend: bool,
    /// The command was refused; the reason is in the status message.
    pub rejected: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            suspend: false,
            rejected: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            ..Self::dirty()
        }
    }
    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::dirty()
        }
    }
    pub fn suspend() -> Self {
        Self {
            suspend: true,
            ..Self::dirty()
        }
    }
    pub fn rejected() -> Self {
        Self {
            rejected: true,
            ..Self::dirty()
        }
    }
}

/// Apply a command to the session.
pub fn dispatch(command: Command, session: &mut EditorSession) -> Result<DispatchResult> {
    tracing::trace!(target: "dispatch", ?command, "dispatch");
    match command {
        Command::Move(m) => Ok(motion::handle_motion(m, session)),
        Command::InsertText(text) => edit::insert_text(&text, session),
        Command::DeleteBackward => edit::delete_backward(session),
        Command::InsertLine(placement) => edit::insert_line(placement, session),
        Command::Mark(op) => Ok(mark::handle_mark(op, session)),
        Command::Selection(op) => Ok(mark::handle_selection(op, session)),
        Command::Quit { force } => Ok(command::quit(force, session)),
        Command::Write => Ok(command::write(session)),
        Command::Suspend => Ok(DispatchResult::suspend()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MarkOp, SelectionOp};
    use core_text::{Buffer, Motion, Placement, Position};

    fn session(text: &str) -> EditorSession {
        EditorSession::new(Buffer::from_bytes(text.as_bytes()).unwrap())
    }

    #[test]
    fn motion_moves_cursor() {
        let mut s = session("hello world");
        let r = dispatch(Command::Move(Motion::NextWord), &mut s).unwrap();
        assert!(r.dirty);
        assert_eq!(s.cursor.offset, 5);
        let r = dispatch(Command::Move(Motion::StartOfFile), &mut s).unwrap();
        assert!(!r.quit && !r.rejected);
        assert_eq!(s.cursor.offset, 0);
    }

    #[test]
    fn no_op_motion_and_backspace_need_no_redraw() {
        let mut s = session("ab\ncd");
        let r = dispatch(Command::Move(Motion::PrevChar), &mut s).unwrap();
        assert!(!r.dirty);
        let r = dispatch(Command::Move(Motion::PrevLine), &mut s).unwrap();
        assert!(!r.dirty);
        let r = dispatch(Command::DeleteBackward, &mut s).unwrap();
        assert!(!r.dirty);
        assert!(!s.is_modified());

        // Screen motions before the first frame do not move.
        let r = dispatch(Command::Move(Motion::NextScreen), &mut s).unwrap();
        assert!(!r.dirty);

        let r = dispatch(Command::Move(Motion::NextLine), &mut s).unwrap();
        assert!(r.dirty);
        let r = dispatch(Command::DeleteBackward, &mut s).unwrap();
        assert!(r.dirty);
        assert_eq!(s.buffer.to_bytes(), b"abcd");
    }

    #[test]
    fn screen_motion_uses_last_text_height() {
        let text: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let mut s = session(&text.join("\n"));
        s.last_text_height = 10;
        dispatch(Command::Move(Motion::NextScreen), &mut s).unwrap();
        assert_eq!(s.buffer.index_of(s.cursor.line), Some(10));
        dispatch(Command::Move(Motion::PrevScreen), &mut s).unwrap();
        assert_eq!(s.buffer.index_of(s.cursor.line), Some(0));
    }

    #[test]
    fn insert_and_backspace() {
        let mut s = session("");
        dispatch(Command::insert(b"ab\ncd"), &mut s).unwrap();
        assert_eq!(s.buffer.to_bytes(), b"ab\ncd");
        assert!(s.is_modified());
        dispatch(Command::DeleteBackward, &mut s).unwrap();
        assert_eq!(s.buffer.to_bytes(), b"ab\nc");
    }

    #[test]
    fn quit_refuses_unsaved_changes_unless_forced() {
        let mut s = session("x");
        dispatch(Command::insert(b"y"), &mut s).unwrap();
        let r = dispatch(Command::Quit { force: false }, &mut s).unwrap();
        assert!(r.rejected);
        assert!(!r.quit);
        assert!(s.status_text().is_some_and(|m| m.contains("unsaved")));
        let r = dispatch(Command::Quit { force: true }, &mut s).unwrap();
        assert!(r.quit);
    }

    #[test]
    fn quit_clean_buffer() {
        let mut s = session("x");
        assert!(dispatch(Command::Quit { force: false }, &mut s).unwrap().quit);
    }

    #[test]
    fn suspend_is_a_request() {
        let mut s = session("x");
        let r = dispatch(Command::Suspend, &mut s).unwrap();
        assert!(r.suspend);
        assert!(!r.quit);
    }

    #[test]
    fn mark_and_selection_ops() {
        let mut s = session("one two");
        let first = s.buffer.first();
        dispatch(Command::Mark(MarkOp::Set), &mut s).unwrap();
        dispatch(Command::Selection(SelectionOp::SetStart), &mut s).unwrap();
        dispatch(Command::Move(Motion::EndOfLine), &mut s).unwrap();
        dispatch(Command::Selection(SelectionOp::SetEnd), &mut s).unwrap();
        assert_eq!(s.selection.start, Some(Position::new(first, 0)));
        assert_eq!(s.selection.end, Some(Position::new(first, 7)));
        dispatch(Command::Mark(MarkOp::Exchange), &mut s).unwrap();
        assert_eq!(s.cursor, Position::new(first, 0));
        assert_eq!(s.mark, Some(Position::new(first, 7)));
        dispatch(Command::Mark(MarkOp::Clear), &mut s).unwrap();
        dispatch(Command::Selection(SelectionOp::Clear), &mut s).unwrap();
        assert!(s.mark.is_none());
        assert!(!s.selection.is_set());
    }

    #[test]
    fn insert_line_before_keeps_current_line() {
        let mut s = session("body");
        dispatch(Command::InsertLine(Placement::Before), &mut s).unwrap();
        assert_eq!(s.buffer.to_bytes(), b"\nbody");
        assert_eq!(s.cursor, Position::new(s.buffer.first(), 0));
    }

    #[test]
    fn stale_cursor_is_an_error() {
        let mut s = session("ab\ncd");
        let gone = s.buffer.last();
        s.buffer.delete_backward(Position::new(gone, 0)).unwrap();
        s.cursor = Position::new(gone, 0);
        assert!(dispatch(Command::insert(b"x"), &mut s).is_err());
    }
}
