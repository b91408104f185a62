//! Text edit handling: insert, backspace and line insertion.
//!
//! All mutation goes through `EditorSession` so the mark and selection are
//! revalidated after each edit.

use super::DispatchResult;
use anyhow::{Context, Result};
use core_state::EditorSession;
use core_text::Placement;

pub(crate) fn insert_text(text: &[u8], session: &mut EditorSession) -> Result<DispatchResult> {
    let before = session.cursor;
    session.insert_at_cursor(text).context("insert text at cursor")?;
    tracing::trace!(
        target: "dispatch",
        op = "insert",
        bytes = text.len(),
        from = before.offset,
        to = session.cursor.offset,
        "edit"
    );
    Ok(DispatchResult::dirty())
}

pub(crate) fn delete_backward(session: &mut EditorSession) -> Result<DispatchResult> {
    let before = session.cursor;
    session.delete_backward().context("delete before cursor")?;
    tracing::trace!(
        target: "dispatch",
        op = "backspace",
        from = before.offset,
        to = session.cursor.offset,
        merged = before.line != session.cursor.line,
        "edit"
    );
    // Backspace at the start of the buffer changes nothing.
    if before == session.cursor {
        return Ok(DispatchResult::clean());
    }
    Ok(DispatchResult::dirty())
}

pub(crate) fn insert_line(
    placement: Placement,
    session: &mut EditorSession,
) -> Result<DispatchResult> {
    session.insert_line(placement).context("insert line")?;
    tracing::trace!(target: "dispatch", op = "insert_line", ?placement, "edit");
    Ok(DispatchResult::dirty())
}
