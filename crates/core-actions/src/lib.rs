//! Editor commands: the closed set of operations a key can trigger, their
//! dispatch against the session, and file I/O.

use core_text::{Motion, Placement};
use smallvec::SmallVec;

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::translate_key;

/// Bytes inserted by one command; a typed character fits inline.
pub type TextPayload = SmallVec<[u8; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOp {
    Set,
    /// Set the mark at the cursor and jump to the previous mark.
    Exchange,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    SetStart,
    SetEnd,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Motion),
    InsertText(TextPayload),
    DeleteBackward,
    Mark(MarkOp),
    Selection(SelectionOp),
    InsertLine(Placement),
    /// Leave the editor; without `force` a modified buffer refuses.
    Quit { force: bool },
    Write,
    Suspend,
}

impl Command {
    pub fn insert(text: &[u8]) -> Self {
        Command::InsertText(SmallVec::from_slice(text))
    }
}
