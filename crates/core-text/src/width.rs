//! Display width helpers.
//!
//! Editing is byte oriented; only rendering is multi-byte aware. Character
//! boundaries are found from the UTF-8 lead byte alone (including the historic
//! 5 and 6 byte forms), every character occupies one column and a tab occupies
//! a fixed `tab_stop` columns. Invalid sequences are shown with the replacement
//! character and still count as one column.

/// Byte length of the UTF-8 character starting with `lead`.
pub fn utf8_len(lead: u8) -> usize {
    match lead {
        0xFC..=0xFD => 6,
        0xF8..=0xFB => 5,
        0xF0..=0xF7 => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

/// Iterate `(byte_offset, char_bytes)` over `bytes`, clamping a truncated final sequence.
pub fn chars(bytes: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    let mut i = 0;
    std::iter::from_fn(move || {
        if i >= bytes.len() {
            return None;
        }
        let start = i;
        let end = (start + utf8_len(bytes[start])).min(bytes.len());
        i = end;
        Some((start, &bytes[start..end]))
    })
}

/// 1-based visual column of byte `offset` in `bytes`.
pub fn visual_col(bytes: &[u8], offset: usize, tab_stop: usize) -> usize {
    let mut col = 1;
    for (start, ch) in chars(bytes) {
        if start >= offset {
            break;
        }
        col += if ch == b"\t" { tab_stop } else { 1 };
    }
    col
}

/// Printable form of a line: tabs expanded to `tab_stop` spaces, cut at `width` columns.
pub fn display_text(bytes: &[u8], tab_stop: usize, width: usize) -> String {
    let mut out = String::with_capacity(bytes.len().min(width * 4));
    let mut col = 0;
    for (_, ch) in chars(bytes) {
        if col >= width {
            break;
        }
        if ch == b"\t" {
            let spaces = tab_stop.min(width - col);
            out.extend(std::iter::repeat_n(' ', spaces));
            col += spaces;
            continue;
        }
        match std::str::from_utf8(ch) {
            Ok(s) if !s.chars().any(char::is_control) => out.push_str(s),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
        col += 1;
    }
    out
}
