//! Frame rendering.
//!
//! A frame is the text area (all terminal rows but the last when the status
//! line is enabled) drawn by the [`Viewport`], then the status line. All
//! output is recorded in a [`Writer`] and flushed by the caller in one go.
//!
//! Components:
//! - `viewport`: scroll window, cursor location and dirty-row repaint.
//! - `status`: status line composition.
//! - `writer`: terminal command recording and crossterm emission.

use core_state::EditorSession;
use core_text::width::{display_text, visual_col};
use thiserror::Error;

pub mod status;
pub mod viewport;
pub mod writer;

pub use status::{StatusContext, build_status_line};
pub use viewport::{DrawOutcome, TextArea, Viewport};
pub use writer::{Command, Writer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The cursor line is not reachable from the buffer's first line.
    #[error("cursor line is not in the buffer")]
    CursorNotInBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub tab_stop: usize,
    pub highlight_cursor_line: bool,
    pub status_line: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            highlight_cursor_line: true,
            status_line: true,
        }
    }
}

impl RenderOptions {
    pub fn text_rows(&self, terminal_rows: u16) -> u16 {
        if self.status_line {
            terminal_rows.saturating_sub(1)
        } else {
            terminal_rows
        }
    }
}

/// Render one frame for a `cols` x `rows` terminal.
///
/// Records the text area size in `session.last_text_height` so screen motions
/// step by what is actually visible.
pub fn render_frame(
    viewport: &mut Viewport,
    session: &mut EditorSession,
    cols: u16,
    rows: u16,
    opts: &RenderOptions,
) -> Result<Writer, RenderError> {
    let mut out = Writer::new();
    let text_rows = opts.text_rows(rows);
    session.last_text_height = text_rows as usize;

    if opts.status_line && rows > 0 {
        // Walks the line list from the top: O(cursor line) per frame.
        let line = session
            .buffer
            .index_of(session.cursor.line)
            .ok_or(RenderError::CursorNotInBuffer)?;
        let col = session
            .buffer
            .line(session.cursor.line)
            .map(|l| visual_col(l.bytes(), session.cursor.offset, opts.tab_stop))
            .unwrap_or(1);
        let ctx = StatusContext {
            file_name: session.file_name.as_deref(),
            modified: session.is_modified(),
            line,
            col,
            message: session.status_text(),
        };
        let text = build_status_line(&ctx);
        out.move_to(0, rows - 1);
        out.clear_line();
        out.print(display_text(text.as_bytes(), 1, cols as usize));
    }

    let area = TextArea::new(cols, text_rows);
    let outcome = viewport.draw(
        &mut session.buffer,
        session.cursor,
        area,
        opts,
        &mut out,
    )?;
    tracing::trace!(
        target: "render",
        full = outcome.full_redraw,
        recentered = outcome.recentered,
        cursor_row = outcome.cursor_row,
        "frame"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rows_reserve_status_line() {
        let on = RenderOptions::default();
        assert_eq!(on.text_rows(24), 23);
        assert_eq!(on.text_rows(0), 0);
        let off = RenderOptions {
            status_line: false,
            ..RenderOptions::default()
        };
        assert_eq!(off.text_rows(24), 24);
    }
}
