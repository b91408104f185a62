//! Status line composition.
//!
//! Format: `<name>[ [+]] Ln X, Col Y[  <message>]`
//! * `<name>` is the base file name or `[No Name]` when reading standard input.
//! * `[+]` appears only when the buffer has unsaved changes.
//! * The message is the session's ephemeral status text, separated by two spaces.
//!
//! Two stages: `compose_status` produces ordered segments, `format_status`
//! renders them into the final string.

use std::borrow::Cow;
use std::path::Path;

/// What we need to render a status line.
pub struct StatusContext<'a> {
    pub file_name: Option<&'a Path>,
    pub modified: bool,
    /// 0-based line index.
    pub line: usize,
    /// 1-based visual column.
    pub col: usize,
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    FileName(Cow<'a, str>),
    Modified,
    Position { line_1: usize, col_1: usize },
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'a, str> = match ctx.file_name {
        Some(p) => match p.file_name() {
            Some(n) => n.to_string_lossy(),
            None => p.to_string_lossy(),
        },
        None => Cow::Borrowed("[No Name]"),
    };
    let mut out = Vec::with_capacity(4);
    out.push(StatusSegment::FileName(name));
    if ctx.modified {
        out.push(StatusSegment::Modified);
    }
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        col_1: ctx.col,
    });
    if let Some(m) = ctx.message
        && !m.is_empty()
    {
        out.push(StatusSegment::Message(m));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::Modified => s.push_str(" [+]"),
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, " Ln {line_1}, Col {col_1}");
            }
            StatusSegment::Message(m) => {
                s.push_str("  ");
                s.push_str(m);
            }
        }
    }
    s
}

pub fn build_status_line(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(file: Option<&'a str>, modified: bool, message: Option<&'a str>) -> StatusContext<'a> {
        StatusContext {
            file_name: file.map(Path::new),
            modified,
            line: 2,
            col: 5,
            message,
        }
    }

    #[test]
    fn unnamed_clean() {
        assert_eq!(build_status_line(&ctx(None, false, None)), "[No Name] Ln 3, Col 5");
    }

    #[test]
    fn named_modified_with_message() {
        let s = build_status_line(&ctx(Some("dir/notes.txt"), true, Some("unsaved changes")));
        assert_eq!(s, "notes.txt [+] Ln 3, Col 5  unsaved changes");
    }

    #[test]
    fn empty_message_is_dropped() {
        let segs = compose_status(&ctx(Some("a.txt"), false, Some("")));
        assert_eq!(segs.len(), 2);
        assert!(!segs.iter().any(|s| matches!(s, StatusSegment::Message(_))));
    }
}
