//! Cursor movement operators.
//!
//! Every operator is a pure function of the buffer and a position and returns the
//! new position. A position whose line is no longer in the buffer is returned
//! unchanged. Movement is byte based; only the space byte delimits words.
//!
//! Word boundaries: `prev_word` / `next_word` stop at a space byte, or at the first
//! step that no longer moves (buffer start or end). The byte "at" an end-of-line
//! offset does not exist and is never a space, so the scan crosses lines.

use crate::{Buffer, Position};

/// Named movement, applied with [`Motion::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    PrevChar,
    NextChar,
    PrevLine,
    NextLine,
    StartOfLine,
    EndOfLine,
    StartOfFile,
    EndOfFile,
    PrevWord,
    NextWord,
    PrevScreen,
    NextScreen,
}

impl Motion {
    /// `screen_rows` is only used by the screen motions.
    pub fn apply(self, buf: &Buffer, pos: Position, screen_rows: usize) -> Position {
        match self {
            Motion::PrevChar => prev_char(buf, pos),
            Motion::NextChar => next_char(buf, pos),
            Motion::PrevLine => prev_line(buf, pos),
            Motion::NextLine => next_line(buf, pos),
            Motion::StartOfLine => start_of_line(buf, pos),
            Motion::EndOfLine => end_of_line(buf, pos),
            Motion::StartOfFile => start_of_file(buf, pos),
            Motion::EndOfFile => end_of_file(buf, pos),
            Motion::PrevWord => prev_word(buf, pos),
            Motion::NextWord => next_word(buf, pos),
            Motion::PrevScreen => prev_screen(buf, pos, screen_rows),
            Motion::NextScreen => next_screen(buf, pos, screen_rows),
        }
    }
}

fn line_len(buf: &Buffer, pos: Position) -> Option<usize> {
    buf.line(pos.line).map(|l| l.len())
}

fn clamped(buf: &Buffer, line: crate::LineId, offset: usize) -> Position {
    let len = buf.line(line).map_or(0, |l| l.len());
    Position::new(line, offset.min(len))
}

fn byte_at(buf: &Buffer, pos: Position) -> Option<u8> {
    buf.line(pos.line)?.bytes().get(pos.offset).copied()
}

pub fn prev_char(buf: &Buffer, pos: Position) -> Position {
    let Some(len) = line_len(buf, pos) else {
        return pos;
    };
    if pos.offset > 0 {
        return Position::new(pos.line, pos.offset.min(len) - 1);
    }
    match buf.prev(pos.line) {
        Some(prev) => clamped(buf, prev, usize::MAX),
        None => Position::new(pos.line, 0),
    }
}

pub fn next_char(buf: &Buffer, pos: Position) -> Position {
    let Some(len) = line_len(buf, pos) else {
        return pos;
    };
    if pos.offset < len {
        return Position::new(pos.line, pos.offset + 1);
    }
    match buf.next(pos.line) {
        Some(next) => Position::new(next, 0),
        None => Position::new(pos.line, len),
    }
}

pub fn prev_line(buf: &Buffer, pos: Position) -> Position {
    match buf.prev(pos.line) {
        Some(prev) => clamped(buf, prev, pos.offset),
        None => pos,
    }
}

pub fn next_line(buf: &Buffer, pos: Position) -> Position {
    match buf.next(pos.line) {
        Some(next) => clamped(buf, next, pos.offset),
        None => pos,
    }
}

pub fn start_of_line(buf: &Buffer, pos: Position) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    Position::new(pos.line, 0)
}

pub fn end_of_line(buf: &Buffer, pos: Position) -> Position {
    match line_len(buf, pos) {
        Some(len) => Position::new(pos.line, len),
        None => pos,
    }
}

pub fn start_of_file(buf: &Buffer, pos: Position) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    Position::new(buf.first(), 0)
}

pub fn end_of_file(buf: &Buffer, pos: Position) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    clamped(buf, buf.last(), usize::MAX)
}

fn scan_to_space(buf: &Buffer, pos: Position, step: fn(&Buffer, Position) -> Position) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    let mut cur = step(buf, pos);
    loop {
        if byte_at(buf, cur) == Some(b' ') {
            return cur;
        }
        let stepped = step(buf, cur);
        if stepped == cur {
            return cur;
        }
        cur = stepped;
    }
}

pub fn prev_word(buf: &Buffer, pos: Position) -> Position {
    scan_to_space(buf, pos, prev_char)
}

pub fn next_word(buf: &Buffer, pos: Position) -> Position {
    scan_to_space(buf, pos, next_char)
}

pub fn prev_screen(buf: &Buffer, pos: Position, rows: usize) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    let mut line = pos.line;
    for _ in 0..rows {
        match buf.prev(line) {
            Some(p) => line = p,
            None => break,
        }
    }
    clamped(buf, line, pos.offset)
}

pub fn next_screen(buf: &Buffer, pos: Position, rows: usize) -> Position {
    if !buf.contains(pos.line) {
        return pos;
    }
    let mut line = pos.line;
    for _ in 0..rows {
        match buf.next(line) {
            Some(n) => line = n,
            None => break,
        }
    }
    clamped(buf, line, pos.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineId;

    fn buf(text: &str) -> Buffer {
        Buffer::from_bytes(text.as_bytes()).unwrap()
    }

    fn nth(b: &Buffer, n: usize) -> LineId {
        b.iter().nth(n).map(|(id, _)| id).unwrap()
    }

    #[test]
    fn char_moves_cross_line_boundaries() {
        let b = buf("ab\ncd");
        let second = nth(&b, 1);
        assert_eq!(prev_char(&b, Position::new(second, 0)), Position::new(b.first(), 2));
        assert_eq!(next_char(&b, Position::new(b.first(), 2)), Position::new(second, 0));
    }

    #[test]
    fn char_moves_stop_at_buffer_ends() {
        let b = buf("ab\ncd");
        let start = Position::new(b.first(), 0);
        let end = Position::new(b.last(), 2);
        assert_eq!(prev_char(&b, start), start);
        assert_eq!(next_char(&b, end), end);
    }

    #[test]
    fn prev_after_next_is_identity() {
        let b = buf("hello\n\nworld");
        for (id, line) in b.iter() {
            for off in 0..=line.len() {
                let p = Position::new(id, off);
                if p == Position::new(b.last(), b.line(b.last()).unwrap().len()) {
                    continue;
                }
                assert_eq!(prev_char(&b, next_char(&b, p)), p);
            }
        }
    }

    #[test]
    fn vertical_moves_clamp_offset() {
        let b = buf("long line\nab\nlonger line");
        let mid = nth(&b, 1);
        assert_eq!(next_line(&b, Position::new(b.first(), 7)), Position::new(mid, 2));
        assert_eq!(prev_line(&b, Position::new(mid, 1)), Position::new(b.first(), 1));
        let top = Position::new(b.first(), 3);
        assert_eq!(prev_line(&b, top), top);
        let bottom = Position::new(b.last(), 3);
        assert_eq!(next_line(&b, bottom), bottom);
    }

    #[test]
    fn line_and_file_ends() {
        let b = buf("one\ntwo\nthree");
        let mid = Position::new(nth(&b, 1), 1);
        assert_eq!(start_of_line(&b, mid).offset, 0);
        assert_eq!(end_of_line(&b, mid).offset, 3);
        assert_eq!(start_of_file(&b, mid), Position::new(b.first(), 0));
        assert_eq!(end_of_file(&b, mid), Position::new(b.last(), 5));
    }

    #[test]
    fn word_moves_land_on_spaces() {
        let b = buf("alpha beta gamma");
        let first = b.first();
        assert_eq!(next_word(&b, Position::new(first, 0)), Position::new(first, 5));
        assert_eq!(next_word(&b, Position::new(first, 5)), Position::new(first, 10));
        assert_eq!(prev_word(&b, Position::new(first, 16)), Position::new(first, 10));
    }

    #[test]
    fn word_moves_cross_lines() {
        let b = buf("ab\ncd ef");
        assert_eq!(next_word(&b, Position::new(b.first(), 0)), Position::new(b.last(), 2));
    }

    #[test]
    fn word_moves_stop_at_buffer_boundaries_without_space() {
        let b = buf("abc\ndef");
        assert_eq!(next_word(&b, Position::new(b.first(), 1)), Position::new(b.last(), 3));
        assert_eq!(prev_word(&b, Position::new(b.last(), 2)), Position::new(b.first(), 0));
        let start = Position::new(b.first(), 0);
        assert_eq!(prev_word(&b, start), start);
    }

    #[test]
    fn screen_moves_step_rows_and_clamp() {
        let b = buf("aaaa\nb\nc\nd\ne\nffff");
        let start = Position::new(b.first(), 3);
        let down = next_screen(&b, start, 3);
        assert_eq!(down, Position::new(nth(&b, 3), 1));
        assert_eq!(next_screen(&b, down, 10), Position::new(b.last(), 1));
        assert_eq!(prev_screen(&b, Position::new(b.last(), 4), 100), Position::new(b.first(), 4));
    }

    #[test]
    fn stale_position_is_identity_for_every_motion() {
        let mut b = buf("ab\ncd");
        let stale = Position::new(b.last(), 0);
        b.delete_backward(stale).unwrap();
        for m in [
            Motion::PrevChar,
            Motion::NextChar,
            Motion::PrevLine,
            Motion::NextLine,
            Motion::StartOfLine,
            Motion::EndOfLine,
            Motion::StartOfFile,
            Motion::EndOfFile,
            Motion::PrevWord,
            Motion::NextWord,
            Motion::PrevScreen,
            Motion::NextScreen,
        ] {
            assert_eq!(m.apply(&b, stale, 5), stale, "{m:?}");
        }
    }
}
