//! Session-level commands: quit and write.

use super::DispatchResult;
use crate::io_ops::{WriteFileResult, write_file};
use core_state::{EditorSession, STATUS_TTL};

pub(crate) fn quit(force: bool, session: &mut EditorSession) -> DispatchResult {
    if session.is_modified() && !force {
        tracing::info!(target: "dispatch", "quit_rejected_unsaved");
        session.set_ephemeral("unsaved changes (Ctrl-S to write, Alt-Q to discard)", STATUS_TTL);
        return DispatchResult::rejected();
    }
    tracing::info!(target: "dispatch", force, "quit");
    DispatchResult::quit()
}

pub(crate) fn write(session: &mut EditorSession) -> DispatchResult {
    match write_file(session) {
        WriteFileResult::Success { lines } => {
            session.set_ephemeral(format!("wrote {lines} lines"), STATUS_TTL);
            DispatchResult::dirty()
        }
        WriteFileResult::NoFilename => {
            session.set_ephemeral("no file name", STATUS_TTL);
            DispatchResult::rejected()
        }
        WriteFileResult::Error(e) => {
            session.set_ephemeral(format!("write failed: {e}"), STATUS_TTL);
            DispatchResult::rejected()
        }
    }
}
