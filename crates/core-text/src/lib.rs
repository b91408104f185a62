//! Line-chain text buffer.
//!
//! The buffer is a doubly linked chain of [`Line`]s stored in a generational
//! arena. Links are [`LineId`] handles instead of pointers, so a [`Position`] that
//! outlives a merged line is detected (`contains` returns false) rather than
//! dangling.
//!
//! Invariants:
//! * Following `next` from `first` visits every live line exactly once and ends at `last`.
//! * An empty buffer is exactly one line of length 0.
//! * `line_count` equals the number of lines in the arena.
//!
//! Structural edits (split, merge, line insertion) set a pending full-redraw flag
//! because they shift the row of every line below the edit; the renderer consumes
//! it with [`Buffer::take_full_redraw`].

use slotmap::SlotMap;
use thiserror::Error;

pub mod line;
pub mod motion;
pub mod width;

pub use line::{LINE_BLOCK, Line};
pub use motion::Motion;

slotmap::new_key_type! {
    /// Stable handle to a line. A handle to a released line stays invalid even
    /// after its slot is reused.
    pub struct LineId;
}

/// A position inside a buffer expressed as (line handle, byte offset within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: LineId,
    pub offset: usize,
}

impl Position {
    pub fn new(line: LineId, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Where `insert_line` places the new empty line relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

#[derive(Debug, Error)]
pub enum BufferError {
    #[error("failed to grow line storage to {requested} bytes")]
    Alloc {
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
    #[error("position refers to a line that is no longer in the buffer")]
    StaleLine,
    #[error("offset {offset} is past the end of a {len} byte line")]
    OffsetOutOfRange { offset: usize, len: usize },
}

/// Bytes that end a line when inserted.
pub fn is_separator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

#[derive(Debug, Clone)]
pub struct Buffer {
    lines: SlotMap<LineId, Line>,
    first: LineId,
    last: LineId,
    modified: bool,
    full_redraw: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A buffer holding one empty line. Not marked modified.
    pub fn new() -> Self {
        let mut lines = SlotMap::with_key();
        let id = lines.insert(Line::empty());
        Self {
            lines,
            first: id,
            last: id,
            modified: false,
            full_redraw: true,
        }
    }

    /// Build a buffer from raw bytes (separators split lines). The result is not
    /// marked modified.
    pub fn from_bytes(text: &[u8]) -> Result<Self, BufferError> {
        let mut buf = Self::new();
        let start = Position::new(buf.first, 0);
        buf.insert(start, text)?;
        buf.modified = false;
        Ok(buf)
    }

    pub fn first(&self) -> LineId {
        self.first
    }

    pub fn last(&self) -> LineId {
        self.last
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Return and clear the pending structural-change flag.
    pub fn take_full_redraw(&mut self) -> bool {
        std::mem::take(&mut self.full_redraw)
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.line(id).is_some()
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Mutable access for redraw bookkeeping. `Line` exposes no content mutation
    /// publicly, so chain and content invariants stay inside this crate.
    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.get_mut(id)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.line(id).and_then(|l| l.next)
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.line(id).and_then(|l| l.prev)
    }

    /// Zero-based index of `id` in chain order (linear walk).
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.iter().position(|(l, _)| l == id)
    }

    /// Iterate lines in chain order.
    pub fn iter(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            next: Some(self.first),
        }
    }

    /// Whole content with lines joined by `\n` (no trailing separator).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, (_, line)) in self.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line.bytes());
        }
        out
    }

    fn check(&self, pos: Position) -> Result<&Line, BufferError> {
        let line = self.line(pos.line).ok_or(BufferError::StaleLine)?;
        if pos.offset > line.len() {
            return Err(BufferError::OffsetOutOfRange {
                offset: pos.offset,
                len: line.len(),
            });
        }
        Ok(line)
    }

    fn get_mut(&mut self, id: LineId) -> Result<&mut Line, BufferError> {
        self.line_mut(id).ok_or(BufferError::StaleLine)
    }

    fn release(&mut self, id: LineId) -> Result<Line, BufferError> {
        self.lines.remove(id).ok_or(BufferError::StaleLine)
    }

    /// Insert `text` at `pos` and return the position just after it.
    ///
    /// Each separator byte splits the current line: the tail moves into a new
    /// successor line and insertion continues there at offset 0. A single call
    /// may therefore create any number of lines.
    pub fn insert(&mut self, pos: Position, text: &[u8]) -> Result<Position, BufferError> {
        self.check(pos)?;
        if text.is_empty() {
            return Ok(pos);
        }
        let mut pos = pos;
        let mut rest = text;
        loop {
            let split = rest.iter().position(|b| is_separator(*b));
            let run = &rest[..split.unwrap_or(rest.len())];
            if !run.is_empty() {
                self.get_mut(pos.line)?.insert_run(pos.offset, run)?;
                pos.offset += run.len();
            }
            match split {
                Some(i) => {
                    pos = self.split_at(pos)?;
                    rest = &rest[i + 1..];
                }
                None => break,
            }
        }
        self.modified = true;
        Ok(pos)
    }

    fn split_at(&mut self, pos: Position) -> Result<Position, BufferError> {
        let current = self.get_mut(pos.line)?;
        let mut tail = current.split_tail(pos.offset)?;
        let old_next = current.next;
        tail.prev = Some(pos.line);
        tail.next = old_next;
        let tail_id = self.lines.insert(tail);
        match old_next {
            Some(n) => self.get_mut(n)?.prev = Some(tail_id),
            None => self.last = tail_id,
        }
        self.get_mut(pos.line)?.next = Some(tail_id);
        self.full_redraw = true;
        Ok(Position::new(tail_id, 0))
    }

    /// Delete the byte before `pos`.
    ///
    /// At offset 0 the line is merged onto its predecessor and released; the
    /// returned position sits at the join point. At the very start of the buffer
    /// this is a no-op.
    pub fn delete_backward(&mut self, pos: Position) -> Result<Position, BufferError> {
        let line = self.check(pos)?;
        if pos.offset > 0 {
            self.get_mut(pos.line)?.remove_byte(pos.offset - 1);
            self.modified = true;
            return Ok(Position::new(pos.line, pos.offset - 1));
        }
        let Some(prev_id) = line.prev else {
            return Ok(pos);
        };
        let tail_len = line.len();
        let prev = self.get_mut(prev_id)?;
        let join_at = prev.len();
        prev.reserve_for(join_at + tail_len)?;

        let removed = self.release(pos.line)?;
        let prev = self.get_mut(prev_id)?;
        prev.append(removed.bytes());
        prev.next = removed.next;
        match removed.next {
            Some(n) => self.get_mut(n)?.prev = Some(prev_id),
            None => self.last = prev_id,
        }
        self.modified = true;
        self.full_redraw = true;
        Ok(Position::new(prev_id, join_at))
    }

    /// Splice a new empty line before or after the line at `at`; returns its start.
    pub fn insert_line(&mut self, at: LineId, placement: Placement) -> Result<Position, BufferError> {
        let anchor = self.line(at).ok_or(BufferError::StaleLine)?;
        let (prev, next) = match placement {
            Placement::Before => (anchor.prev, Some(at)),
            Placement::After => (Some(at), anchor.next),
        };
        let mut line = Line::with_blocks(1)?;
        line.prev = prev;
        line.next = next;
        let id = self.lines.insert(line);
        match prev {
            Some(p) => self.get_mut(p)?.next = Some(id),
            None => self.first = id,
        }
        match next {
            Some(n) => self.get_mut(n)?.prev = Some(id),
            None => self.last = id,
        }
        self.modified = true;
        self.full_redraw = true;
        Ok(Position::new(id, 0))
    }
}

/// Chain-order iterator over `(LineId, &Line)`.
pub struct Lines<'a> {
    buffer: &'a Buffer,
    next: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let line = self.buffer.line(id)?;
        self.next = line.next;
        Some((id, line))
    }
}
