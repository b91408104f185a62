//! Editing session: the buffer plus every position the editor tracks into it.
//!
//! There is exactly one session per process and it is passed explicitly to
//! dispatch and render calls. Buffer mutations go through the helpers here so
//! the mark and selection anchors are revalidated after each edit:
//! * An anchor on a line that was merged away is rebound onto the surviving line,
//!   shifted by that line's length before the merge.
//! * An anchor whose offset no longer fits its line (after a split) is clamped.
//! * An anchor on a line that vanished for any other reason is unset.
//!
//! The cursor itself is always the position returned by the buffer primitive.

use core_text::{Buffer, BufferError, LineId, Placement, Position};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long status messages stay visible.
pub const STATUS_TTL: Duration = Duration::from_secs(4);

/// Selection bounds. Either end may be unset; no ordering is implied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn is_set(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Merge {
    removed: LineId,
    into: LineId,
    join_at: usize,
}

pub struct EditorSession {
    pub buffer: Buffer,
    pub cursor: Position,
    pub mark: Option<Position>,
    pub selection: Selection,
    pub file_name: Option<PathBuf>,
    /// Text rows of the last drawn frame; screen motions step by this.
    pub last_text_height: usize,
    pub ephemeral_status: Option<EphemeralMessage>,
}

impl EditorSession {
    /// Session over `buffer` with the cursor at the start of the first line.
    pub fn new(buffer: Buffer) -> Self {
        let cursor = Position::new(buffer.first(), 0);
        Self {
            buffer,
            cursor,
            mark: None,
            selection: Selection::default(),
            file_name: None,
            last_text_height: 0,
            ephemeral_status: None,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop an expired status message; returns true if one was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        self.tick_ephemeral_at(Instant::now())
    }

    pub fn tick_ephemeral_at(&mut self, now: Instant) -> bool {
        if let Some(m) = &self.ephemeral_status
            && now >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn status_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }

    /// Insert `text` at the cursor and move the cursor after it.
    pub fn insert_at_cursor(&mut self, text: &[u8]) -> Result<(), BufferError> {
        self.cursor = self.buffer.insert(self.cursor, text)?;
        self.revalidate_anchors(None);
        Ok(())
    }

    /// Delete the byte before the cursor, joining lines at a line start.
    pub fn delete_backward(&mut self) -> Result<(), BufferError> {
        let merge = if self.cursor.offset == 0 {
            self.buffer.prev(self.cursor.line).and_then(|into| {
                self.buffer.line(into).map(|l| Merge {
                    removed: self.cursor.line,
                    into,
                    join_at: l.len(),
                })
            })
        } else {
            None
        };
        self.cursor = self.buffer.delete_backward(self.cursor)?;
        self.revalidate_anchors(merge);
        Ok(())
    }

    /// Open an empty line next to the cursor line and move the cursor onto it.
    pub fn insert_line(&mut self, placement: Placement) -> Result<(), BufferError> {
        self.cursor = self.buffer.insert_line(self.cursor.line, placement)?;
        Ok(())
    }

    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// Set the mark at the cursor and jump to the previous mark, if any.
    pub fn exchange_mark(&mut self) {
        let previous = self.mark.replace(self.cursor);
        if let Some(p) = previous {
            self.cursor = p;
        }
    }

    fn revalidate_anchors(&mut self, merge: Option<Merge>) {
        let buffer = &self.buffer;
        for anchor in [
            &mut self.mark,
            &mut self.selection.start,
            &mut self.selection.end,
        ] {
            revalidate(anchor, buffer, merge);
        }
    }
}

fn revalidate(anchor: &mut Option<Position>, buffer: &Buffer, merge: Option<Merge>) {
    let Some(p) = anchor.as_mut() else {
        return;
    };
    if let Some(m) = merge
        && p.line == m.removed
    {
        *p = Position::new(m.into, m.join_at + p.offset);
        return;
    }
    match buffer.line(p.line) {
        Some(line) => p.offset = p.offset.min(line.len()),
        None => {
            tracing::debug!(target: "state.anchor", "anchor_unset");
            *anchor = None;
        }
    }
}

/// Result of normalizing line endings of loaded bytes.
pub struct NormalizedText {
    /// LF-only content.
    pub normalized: Vec<u8>,
    pub had_trailing_newline: bool,
    /// True if both CRLF and bare LF endings were seen.
    pub mixed: bool,
}

/// Rewrite CRLF pairs to LF. Bare CR bytes are left alone; the buffer already
/// treats them as separators.
pub fn normalize_line_endings(input: &[u8]) -> NormalizedText {
    let mut out = Vec::with_capacity(input.len());
    let mut crlf = 0usize;
    let mut lf = 0usize;
    let mut i = 0usize;
    while i < input.len() {
        match input[i] {
            b'\r' if input.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                out.push(b'\n');
                i += 2;
            }
            b => {
                if b == b'\n' {
                    lf += 1;
                }
                out.push(b);
                i += 1;
            }
        }
    }
    NormalizedText {
        had_trailing_newline: matches!(out.last(), Some(b'\n' | b'\r')),
        normalized: out,
        mixed: crlf > 0 && lf > 0,
    }
}
