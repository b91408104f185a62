//! Single line storage.
//!
//! A `Line` owns its bytes and grows in fixed `LINE_BLOCK` increments. The block
//! count is tracked separately from `Vec::capacity` so growth is observable and
//! never shrinks, even when content is truncated by a split.
//!
//! Invariants:
//! * `len() <= capacity_bytes()`.
//! * Content never contains a line separator; line breaks live in the chain links.

use crate::{BufferError, LineId};

/// Size of one capacity block in bytes.
pub const LINE_BLOCK: usize = 80;

/// Number of blocks needed to hold `len` bytes (always at least one).
pub(crate) fn blocks_for(len: usize) -> usize {
    len.div_ceil(LINE_BLOCK).max(1)
}

#[derive(Debug, Clone)]
pub struct Line {
    content: Vec<u8>,
    blocks: usize,
    dirty: bool,
    pub(crate) prev: Option<LineId>,
    pub(crate) next: Option<LineId>,
}

impl Line {
    /// Allocate an empty, dirty line with room for at least `hint_blocks` blocks.
    pub fn with_blocks(hint_blocks: usize) -> Result<Self, BufferError> {
        let blocks = hint_blocks.max(1);
        let mut content = Vec::new();
        content
            .try_reserve_exact(blocks * LINE_BLOCK)
            .map_err(|source| BufferError::Alloc {
                requested: blocks * LINE_BLOCK,
                source,
            })?;
        Ok(Self {
            content,
            blocks,
            dirty: true,
            prev: None,
            next: None,
        })
    }

    /// One-block empty line for buffer construction.
    pub(crate) fn empty() -> Self {
        Self {
            content: Vec::with_capacity(LINE_BLOCK),
            blocks: 1,
            dirty: true,
            prev: None,
            next: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn capacity_bytes(&self) -> usize {
        self.blocks * LINE_BLOCK
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the redraw marker. Content is untouched.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn prev(&self) -> Option<LineId> {
        self.prev
    }

    pub fn next(&self) -> Option<LineId> {
        self.next
    }

    /// Grow one block at a time until `total` bytes fit.
    pub(crate) fn reserve_for(&mut self, total: usize) -> Result<(), BufferError> {
        if total <= self.capacity_bytes() {
            return Ok(());
        }
        let mut blocks = self.blocks;
        while blocks * LINE_BLOCK < total {
            blocks += 1;
        }
        let target = blocks * LINE_BLOCK;
        self.content
            .try_reserve_exact(target - self.content.len())
            .map_err(|source| BufferError::Alloc {
                requested: target,
                source,
            })?;
        tracing::trace!(target: "text.line", from = self.blocks, to = blocks, "line_grow");
        self.blocks = blocks;
        Ok(())
    }

    /// Insert `run` at `offset`, shifting the existing tail right in place.
    pub(crate) fn insert_run(&mut self, offset: usize, run: &[u8]) -> Result<(), BufferError> {
        self.reserve_for(self.content.len() + run.len())?;
        self.content.splice(offset..offset, run.iter().copied());
        self.dirty = true;
        Ok(())
    }

    /// Remove the byte at `offset`, shifting the tail left.
    pub(crate) fn remove_byte(&mut self, offset: usize) {
        self.content.remove(offset);
        self.dirty = true;
    }

    /// Cut everything at and after `offset` into a fresh line. Capacity of `self` is kept.
    pub(crate) fn split_tail(&mut self, offset: usize) -> Result<Line, BufferError> {
        let tail_len = self.content.len() - offset;
        let mut tail = Line::with_blocks(blocks_for(tail_len))?;
        tail.content.extend_from_slice(&self.content[offset..]);
        self.content.truncate(offset);
        self.dirty = true;
        Ok(tail)
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.content.extend_from_slice(bytes);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_line_has_one_block_minimum() {
        let l = Line::with_blocks(0).unwrap();
        assert_eq!(l.blocks(), 1);
        assert_eq!(l.capacity_bytes(), LINE_BLOCK);
        assert!(l.is_empty());
        assert!(l.is_dirty());
    }

    #[test]
    fn grows_one_block_at_a_time() {
        let mut l = Line::with_blocks(1).unwrap();
        l.insert_run(0, &[b'x'; LINE_BLOCK]).unwrap();
        assert_eq!(l.blocks(), 1);
        l.insert_run(0, b"y").unwrap();
        assert_eq!(l.blocks(), 2);
        assert!(l.len() <= l.capacity_bytes());
    }

    #[test]
    fn split_keeps_capacity_of_head() {
        let mut l = Line::with_blocks(3).unwrap();
        l.insert_run(0, b"hello world").unwrap();
        let tail = l.split_tail(5).unwrap();
        assert_eq!(l.bytes(), b"hello");
        assert_eq!(tail.bytes(), b" world");
        assert_eq!(l.blocks(), 3, "blocks never shrink");
        assert_eq!(tail.blocks(), 1);
    }

    #[test]
    fn blocks_for_rounds_up() {
        assert_eq!(blocks_for(0), 1);
        assert_eq!(blocks_for(LINE_BLOCK), 1);
        assert_eq!(blocks_for(LINE_BLOCK + 1), 2);
    }
}
