use super::DispatchResult;
use crate::{MarkOp, SelectionOp};
use core_state::EditorSession;

pub(crate) fn handle_mark(op: MarkOp, session: &mut EditorSession) -> DispatchResult {
    match op {
        MarkOp::Set => {
            session.set_mark();
            session.set_ephemeral("mark set", core_state::STATUS_TTL);
        }
        MarkOp::Exchange => session.exchange_mark(),
        MarkOp::Clear => session.clear_mark(),
    }
    tracing::debug!(target: "dispatch", ?op, "mark");
    DispatchResult::dirty()
}

pub(crate) fn handle_selection(op: SelectionOp, session: &mut EditorSession) -> DispatchResult {
    match op {
        SelectionOp::SetStart => session.selection.start = Some(session.cursor),
        SelectionOp::SetEnd => session.selection.end = Some(session.cursor),
        SelectionOp::Clear => session.selection.clear(),
    }
    tracing::debug!(target: "dispatch", ?op, "selection");
    DispatchResult::dirty()
}
