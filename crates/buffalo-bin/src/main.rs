//! Buffalo entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::io_ops::{Source, open_session};
use core_actions::{dispatch, translate_key};
use core_config::Config;
use core_render::{RenderOptions, Viewport, render_frame};
use core_state::EditorSession;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::{execute, queue};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "buffalo.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "buffalo", version, about = "Buffalo text editor")]
struct Args {
    /// File to edit; `-` reads the buffer from standard input. Omit for an empty buffer.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `buffalo.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            // Leave the alternate screen first so the report is visible.
            let _ = execute!(stdout(), crossterm::terminal::LeaveAlternateScreen, Show);
            let _ = crossterm::terminal::disable_raw_mode();
            default_panic(info);
        }));
    });
}

fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        tab_stop: config.effective_tab_stop,
        highlight_cursor_line: config.file.render.highlight_cursor_line,
        status_line: config.file.render.status_line,
    }
}

struct EditorRuntime<'a> {
    session: EditorSession,
    viewport: Viewport,
    opts: RenderOptions,
    terminal: TerminalGuard<'a, CrosstermBackend>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        session: EditorSession,
        opts: RenderOptions,
        terminal: TerminalGuard<'a, CrosstermBackend>,
    ) -> Self {
        Self {
            session,
            viewport: Viewport::new(),
            opts,
            terminal,
        }
    }

    fn run(&mut self) -> Result<()> {
        self.draw()?;
        loop {
            match event::read().context("read terminal event")? {
                Event::Key(key) => {
                    let Some(command) = translate_key(&key) else {
                        continue;
                    };
                    let result = dispatch(command, &mut self.session)?;
                    if result.quit {
                        break;
                    }
                    if result.suspend {
                        self.suspend()?;
                    }
                    if !result.dirty {
                        continue;
                    }
                }
                Event::Resize(cols, rows) => {
                    debug!(target: "runtime", cols, rows, "resize");
                }
                _ => continue,
            }
            self.draw()?;
        }
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        info!(target: "runtime", "suspend_requested");
        self.terminal.backend().suspend()?;
        self.viewport.force_full_redraw();
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.session.tick_ephemeral();
        let (cols, rows) = self.terminal.backend().size()?;
        let frame = render_frame(&mut self.viewport, &mut self.session, cols, rows, &self.opts)?;
        let mut out = stdout().lock();
        queue!(out, Hide)?;
        frame.flush_to(&mut out).context("flush frame")?;
        execute!(out, Show)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let opts = render_options(&config);
    let source = Source::from_arg(args.path.clone());
    let session = open_session(&source).context("open initial buffer")?;
    info!(
        target: "runtime.startup",
        path = ?args.path,
        config_override = args.config.is_some(),
        tab_stop = opts.tab_stop,
        lines = session.buffer.line_count(),
        "bootstrap_complete"
    );

    let mut backend = CrosstermBackend::new();
    let result = {
        let guard = backend.enter_guard()?;
        EditorRuntime::new(session, opts, guard).run()
    };
    match &result {
        Ok(()) => info!(target: "runtime", "shutdown"),
        Err(e) => error!(target: "runtime", error = ?e, "fatal"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_accept_stdin_marker_and_config() {
        let a = Args::try_parse_from(["buffalo", "-", "--config", "x.toml"]).unwrap();
        assert_eq!(a.path, Some(PathBuf::from("-")));
        assert_eq!(a.config, Some(PathBuf::from("x.toml")));
        assert_eq!(Source::from_arg(a.path), Source::Stdin);
    }

    #[test]
    fn args_path_optional() {
        let a = Args::try_parse_from(["buffalo"]).unwrap();
        assert!(a.path.is_none());
        assert!(a.config.is_none());
    }

    #[test]
    fn render_options_follow_config() {
        let mut config = Config::default();
        config.effective_tab_stop = 4;
        config.file.render.status_line = false;
        let opts = render_options(&config);
        assert_eq!(opts.tab_stop, 4);
        assert!(!opts.status_line);
        assert!(opts.highlight_cursor_line);
    }
}
