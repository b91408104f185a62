//! Cursor movement.
//!
//! Screen motions step by the text height of the last drawn frame. Before the
//! first frame that height is 0 and they do not move.
//!
//! A motion that leaves the cursor where it was needs no redraw.

use super::DispatchResult;
use core_state::EditorSession;
use core_text::Motion;

pub(crate) fn handle_motion(kind: Motion, session: &mut EditorSession) -> DispatchResult {
    let before = session.cursor;
    session.cursor = kind.apply(&session.buffer, before, session.last_text_height);
    let moved = before != session.cursor;
    tracing::trace!(
        target: "dispatch",
        ?kind,
        from = before.offset,
        to = session.cursor.offset,
        moved,
        "motion"
    );
    if moved {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
