//! Configuration loading and parsing.
//!
//! Parses `buffalo.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_stop = 8              # 1..=16, out of range values are clamped
//!
//! [render]
//! status_line = true
//! highlight_cursor_line = true
//! ```
//!
//! A missing file yields defaults silently; a malformed one yields defaults
//! and a warning. Unknown fields are ignored.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, io, path::PathBuf};
use tracing::{info, warn};

pub const TAB_STOP_MIN: usize = 1;
pub const TAB_STOP_MAX: usize = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_stop")]
    pub tab_stop: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_stop() -> usize {
        8
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::enabled")]
    pub status_line: bool,
    #[serde(default = "RenderConfig::enabled")]
    pub highlight_cursor_line: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            status_line: true,
            highlight_cursor_line: true,
        }
    }
}

impl RenderConfig {
    const fn enabled() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file: ConfigFile,
    /// Tab stop after clamping into `TAB_STOP_MIN..=TAB_STOP_MAX`.
    pub effective_tab_stop: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

impl Config {
    fn from_file(file: ConfigFile) -> Self {
        let effective_tab_stop = clamp_tab_stop(file.editor.tab_stop);
        Self {
            file,
            effective_tab_stop,
        }
    }
}

fn clamp_tab_stop(raw: usize) -> usize {
    let clamped = raw.clamp(TAB_STOP_MIN, TAB_STOP_MAX);
    if clamped != raw {
        info!(
            target: "config",
            raw,
            clamped,
            min = TAB_STOP_MIN,
            max = TAB_STOP_MAX,
            "tab_stop_clamped"
        );
    }
    clamped
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("buffalo.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("buffalo").join("buffalo.toml");
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config unreadable, using defaults");
            return Ok(Config::default());
        }
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config loaded");
            Ok(Config::from_file(file))
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config malformed, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(level: Level, f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.effective_tab_stop, 8);
        assert!(cfg.file.render.status_line);
        assert!(cfg.file.render.highlight_cursor_line);
    }

    #[test]
    fn parses_all_fields() {
        let tmp = write_config(
            "[editor]\ntab_stop = 4\n[render]\nstatus_line = false\nhighlight_cursor_line = false\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_tab_stop, 4);
        assert!(!cfg.file.render.status_line);
        assert!(!cfg.file.render.highlight_cursor_line);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let tmp = write_config("[render]\nstatus_line = false\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_tab_stop, 8);
        assert!(!cfg.file.render.status_line);
        assert!(cfg.file.render.highlight_cursor_line);
    }

    #[test]
    fn tab_stop_clamped_both_ways() {
        let tmp = write_config("[editor]\ntab_stop = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_stop, 0);
        assert_eq!(cfg.effective_tab_stop, 1);

        let tmp = write_config("[editor]\ntab_stop = 99\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_tab_stop, 16);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[editor]\ntab_stop = 40\n");
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let log = capture(Level::INFO, || {
            cfg = Some(load_from(Some(path)).unwrap());
        });
        assert!(log.contains("INFO config:"));
        assert!(log.contains("tab_stop_clamped"));
        assert_eq!(cfg.map(|c| c.effective_tab_stop), Some(16));
    }

    #[test]
    fn malformed_file_falls_back_with_warning() {
        let tmp = write_config("[editor\ntab_stop = = 3\n");
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let log = capture(Level::WARN, || {
            cfg = Some(load_from(Some(path)).unwrap());
        });
        assert!(log.contains("WARN config:"));
        assert!(log.contains("config malformed"));
        assert_eq!(cfg.map(|c| c.effective_tab_stop), Some(8));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = write_config("[editor]\ntab_stop = 2\nfuture = true\n[plugins]\nx = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_tab_stop, 2);
    }
}
