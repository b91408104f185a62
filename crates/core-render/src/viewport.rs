//! Viewport and scrolling renderer.
//!
//! The viewport remembers which buffer line sits on the top row plus the text
//! area size of the previous draw. Each draw locates the cursor line relative to
//! that window:
//! * on screen: render in place, row = distance from `screen_first`;
//! * below the window, or above it: recenter so the cursor line lands
//!   `height / 2` rows from the top (fewer when the buffer start is reached).
//!
//! Only rows whose line is dirty, or is the cursor line, are rewritten, unless a
//! full redraw is pending. A full redraw is forced by a size change, a recenter,
//! a structural buffer edit, or an explicit request (resume from suspend).
//!
//! The cursor line keeps its dirty flag after being drawn so the next frame
//! repaints it once the cursor has left (removing the highlight).

use crate::writer::Writer;
use crate::{RenderError, RenderOptions};
use core_text::width::{display_text, visual_col};
use core_text::{Buffer, LineId, Position};

/// Text area dimensions in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextArea {
    pub width: u16,
    pub height: u16,
}

impl TextArea {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// What a draw did; used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOutcome {
    pub cursor_row: u16,
    pub full_redraw: bool,
    pub recentered: bool,
}

#[derive(Debug, Clone, Copy)]
struct Located {
    first: LineId,
    row: usize,
    recentered: bool,
}

#[derive(Debug, Default)]
pub struct Viewport {
    screen_first: Option<LineId>,
    height: u16,
    width: u16,
    full_redraw: bool,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen_first(&self) -> Option<LineId> {
        self.screen_first
    }

    /// Rewrite every row on the next draw.
    pub fn force_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Draw one frame of the text area into `out`, ending with the cursor placement.
    pub fn draw(
        &mut self,
        buffer: &mut Buffer,
        cursor: Position,
        area: TextArea,
        opts: &RenderOptions,
        out: &mut Writer,
    ) -> Result<DrawOutcome, RenderError> {
        let first = match self.screen_first {
            Some(id) if buffer.contains(id) => id,
            Some(_) => {
                self.full_redraw = true;
                buffer.first()
            }
            None => buffer.first(),
        };
        if area.height != self.height || area.width != self.width {
            tracing::debug!(
                target: "render.viewport",
                old_width = self.width,
                old_height = self.height,
                width = area.width,
                height = area.height,
                "resize_full_redraw"
            );
            self.full_redraw = true;
            self.height = area.height;
            self.width = area.width;
        }
        if buffer.take_full_redraw() {
            self.full_redraw = true;
        }

        let cursor_line = buffer
            .line(cursor.line)
            .ok_or(RenderError::CursorNotInBuffer)?;
        let cursor_col = visual_col(cursor_line.bytes(), cursor.offset, opts.tab_stop);

        let height = area.height as usize;
        if height == 0 {
            self.screen_first = Some(first);
            return Ok(DrawOutcome {
                cursor_row: 0,
                full_redraw: self.full_redraw,
                recentered: false,
            });
        }

        let located = locate(buffer, first, cursor.line, height)?;
        if located.recentered {
            tracing::debug!(target: "render.viewport", row = located.row, "recenter");
            self.full_redraw = true;
        }
        self.screen_first = Some(located.first);
        let full = std::mem::take(&mut self.full_redraw);

        let width = area.width as usize;
        let mut line = Some(located.first);
        let mut rewritten = 0usize;
        for row in 0..area.height {
            let Some(id) = line else {
                out.move_to(0, row);
                out.clear_line();
                continue;
            };
            let Some(l) = buffer.line_mut(id) else {
                return Err(RenderError::CursorNotInBuffer);
            };
            let is_cursor = id == cursor.line;
            if full || is_cursor || l.is_dirty() {
                out.move_to(0, row);
                out.clear_line();
                let highlight = is_cursor && opts.highlight_cursor_line;
                if highlight {
                    out.highlight(true);
                }
                out.print(display_text(l.bytes(), opts.tab_stop, width));
                if highlight {
                    out.highlight(false);
                }
                l.set_dirty(is_cursor);
                rewritten += 1;
            }
            line = l.next();
        }

        let cursor_row = located.row as u16;
        let col = (cursor_col - 1).min(width.saturating_sub(1)) as u16;
        out.move_to(col, cursor_row);
        tracing::trace!(target: "render", full, rewritten, cursor_row, cursor_col, "draw");
        Ok(DrawOutcome {
            cursor_row,
            full_redraw: full,
            recentered: located.recentered,
        })
    }
}

/// Find the cursor line: on screen, below the window, or above it.
fn locate(
    buffer: &Buffer,
    first: LineId,
    target: LineId,
    height: usize,
) -> Result<Located, RenderError> {
    let mut line = Some(first);
    let mut row = 0;
    while row < height {
        let Some(id) = line else { break };
        if id == target {
            return Ok(Located {
                first,
                row,
                recentered: false,
            });
        }
        line = buffer.next(id);
        row += 1;
    }
    while let Some(id) = line {
        if id == target {
            return Ok(recenter(buffer, target, height));
        }
        line = buffer.next(id);
    }
    let mut line = Some(buffer.first());
    while let Some(id) = line {
        if id == first {
            break;
        }
        if id == target {
            return Ok(recenter(buffer, target, height));
        }
        line = buffer.next(id);
    }
    Err(RenderError::CursorNotInBuffer)
}

fn recenter(buffer: &Buffer, target: LineId, height: usize) -> Located {
    let mut top = target;
    let mut row = 0;
    while row < height / 2 {
        match buffer.prev(top) {
            Some(p) => {
                top = p;
                row += 1;
            }
            None => break,
        }
    }
    Located {
        first: top,
        row,
        recentered: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: usize) -> Buffer {
        let text: Vec<String> = (0..lines).map(|i| format!("l{i}")).collect();
        Buffer::from_bytes(text.join("\n").as_bytes()).unwrap()
    }

    fn nth(b: &Buffer, n: usize) -> LineId {
        b.iter().nth(n).map(|(id, _)| id).unwrap()
    }

    #[test]
    fn locate_on_screen() {
        let b = buf(20);
        let l = locate(&b, nth(&b, 5), nth(&b, 8), 10).unwrap();
        assert_eq!(l.first, nth(&b, 5));
        assert_eq!(l.row, 3);
        assert!(!l.recentered);
    }

    #[test]
    fn locate_below_recenters() {
        let b = buf(50);
        let l = locate(&b, b.first(), nth(&b, 30), 10).unwrap();
        assert_eq!(l.first, nth(&b, 25));
        assert_eq!(l.row, 5);
        assert!(l.recentered);
    }

    #[test]
    fn locate_above_recenters_and_stops_at_start() {
        let b = buf(50);
        let l = locate(&b, nth(&b, 40), nth(&b, 2), 10).unwrap();
        assert_eq!(l.first, b.first());
        assert_eq!(l.row, 2);
        assert!(l.recentered);
    }

    #[test]
    fn window_boundary_row_is_off_screen() {
        let b = buf(30);
        let l = locate(&b, b.first(), nth(&b, 10), 10).unwrap();
        assert!(l.recentered, "row == height is below the window");
    }
}
