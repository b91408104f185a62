//! File IO helpers.
//!
//! Loading normalizes CRLF to LF and drops a single trailing line separator, so
//! a file written by `write_file` (every line followed by `\n`) loads back to
//! the same buffer. A path that does not exist opens as an empty new file.

use anyhow::{Context, Result};
use core_state::{EditorSession, STATUS_TTL, normalize_line_endings};
use core_text::{Buffer, is_separator};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Where the initial buffer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Empty,
    Stdin,
    File(PathBuf),
}

impl Source {
    /// `-` selects standard input.
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            None => Source::Empty,
            Some(p) if p.as_os_str() == "-" => Source::Stdin,
            Some(p) => Source::File(p),
        }
    }
}

pub struct OpenSuccess {
    pub buffer: Buffer,
    pub file_name: Option<PathBuf>,
    /// The path did not exist; saving will create it.
    pub new_file: bool,
    pub mixed_line_endings: bool,
}

impl std::fmt::Debug for OpenSuccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSuccess")
            .field("file_name", &self.file_name)
            .field("lines", &self.buffer.line_count())
            .field("new_file", &self.new_file)
            .field("mixed_line_endings", &self.mixed_line_endings)
            .finish()
    }
}

/// Build a buffer from loaded bytes.
pub fn buffer_from_loaded(bytes: &[u8]) -> Result<(Buffer, bool)> {
    let norm = normalize_line_endings(bytes);
    let mut text = norm.normalized;
    if text.last().is_some_and(|b| is_separator(*b)) {
        text.pop();
    }
    let buffer = Buffer::from_bytes(&text).context("build buffer")?;
    Ok((buffer, norm.mixed))
}

pub fn open_file(path: &Path) -> Result<OpenSuccess> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let (buffer, mixed) = buffer_from_loaded(&bytes)?;
            tracing::info!(
                target: "io",
                path = %path.display(),
                bytes = bytes.len(),
                lines = buffer.line_count(),
                mixed,
                "file_opened"
            );
            Ok(OpenSuccess {
                buffer,
                file_name: Some(path.to_path_buf()),
                new_file: false,
                mixed_line_endings: mixed,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(target: "io", path = %path.display(), "file_not_found_new_file");
            Ok(OpenSuccess {
                buffer: Buffer::new(),
                file_name: Some(path.to_path_buf()),
                new_file: true,
                mixed_line_endings: false,
            })
        }
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

pub fn read_from<R: Read>(mut reader: R) -> Result<OpenSuccess> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("read standard input")?;
    let (buffer, mixed) = buffer_from_loaded(&bytes)?;
    tracing::info!(target: "io", bytes = bytes.len(), lines = buffer.line_count(), "stdin_read");
    Ok(OpenSuccess {
        buffer,
        file_name: None,
        new_file: false,
        mixed_line_endings: mixed,
    })
}

/// Create the session for `source`, including its startup status message.
pub fn open_session(source: &Source) -> Result<EditorSession> {
    let opened = match source {
        Source::Empty => OpenSuccess {
            buffer: Buffer::new(),
            file_name: None,
            new_file: false,
            mixed_line_endings: false,
        },
        Source::Stdin => read_from(io::stdin().lock())?,
        Source::File(p) => open_file(p)?,
    };
    let mut session = EditorSession::new(opened.buffer);
    session.file_name = opened.file_name;
    if opened.new_file {
        session.set_ephemeral("new file", STATUS_TTL);
    } else if opened.mixed_line_endings {
        session.set_ephemeral("mixed line endings converted to LF", STATUS_TTL);
    }
    Ok(session)
}

/// Result of a write attempt.
#[derive(Debug)]
pub enum WriteFileResult {
    Success { lines: usize },
    NoFilename,
    Error(io::Error),
}

fn serialize(buffer: &Buffer) -> Vec<u8> {
    let mut out = Vec::new();
    for (_, line) in buffer.iter() {
        out.extend_from_slice(line.bytes());
        out.push(b'\n');
    }
    out
}

/// Write every line followed by `\n` to the session's file; clears `modified` on success.
pub fn write_file(session: &mut EditorSession) -> WriteFileResult {
    let Some(path) = session.file_name.clone() else {
        tracing::error!(target: "io", "write_no_filename");
        return WriteFileResult::NoFilename;
    };
    let content = serialize(&session.buffer);
    let written = std::fs::File::create(&path).and_then(|mut f| {
        f.write_all(&content)?;
        f.flush()
    });
    match written {
        Ok(()) => {
            let lines = session.buffer.line_count();
            session.buffer.set_modified(false);
            tracing::info!(target: "io", path = %path.display(), lines, bytes = content.len(), "file_written");
            WriteFileResult::Success { lines }
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), error = %e, "file_write_error");
            WriteFileResult::Error(e)
        }
    }
}
