//! Terminal backend abstraction and crossterm implementation.
//!
//! The editor owns the terminal for its whole run: raw mode, alternate screen
//! and a hidden cursor while drawing. `TerminalGuard` restores the terminal on
//! every exit path, including early returns and panics that unwind through it.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
    },
};
use std::io::stdout;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    /// Current size as `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;

    /// Enter and return a guard that will leave on drop.
    fn enter_guard(&mut self) -> Result<TerminalGuard<'_, Self>>
    where
        Self: Sized,
    {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }

    /// Hand the terminal back to the shell, stop the process, and take the
    /// terminal again once resumed.
    fn suspend(&mut self) -> Result<()>
    where
        Self: Sized,
    {
        self.suspend_with(stop_process)
    }

    fn suspend_with<F>(&mut self, stop: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
        Self: Sized,
    {
        self.leave()?;
        let stopped = stop();
        self.enter()?;
        stopped
    }
}

#[derive(Debug, Default)]
pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode().context("enable raw mode")?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
            tracing::debug!(target: "terminal", "entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode().context("disable raw mode")?;
            self.entered = false;
            tracing::debug!(target: "terminal", "left");
        }
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        size().context("query terminal size")
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

/// Stop the process the way the shell's job control expects.
#[cfg(unix)]
pub fn stop_process() -> Result<()> {
    tracing::info!(target: "terminal", "suspend");
    // SAFETY: raise only delivers a signal to the calling process.
    let rc = unsafe { libc::raise(libc::SIGTSTP) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error()).context("raise SIGTSTP");
    }
    tracing::info!(target: "terminal", "resumed");
    Ok(())
}

#[cfg(not(unix))]
pub fn stop_process() -> Result<()> {
    tracing::info!(target: "terminal", "suspend unsupported on this platform");
    Ok(())
}
