use std::io::{self, Write};

use anyhow::Context as _;
use crossterm::{cursor, execute, queue, terminal};

use crate::{compose::Canvas, error::UnicornResult};

/// Where frames end up. The compositor only needs a pixel size and a place
/// to put each finished canvas.
pub trait Surface {
    /// Pixel dimensions of the drawable area.
    fn size(&self) -> (u32, u32);

    fn present(&mut self, canvas: &Canvas) -> UnicornResult<()>;
}

/// Presents frames as truecolor half-block cells, packing two vertical
/// pixels into every terminal row. Switches to the alternate screen with a
/// hidden cursor for the duration of the run and restores both on drop.
pub struct TerminalSurface {
    out: io::Stdout,
    cols: u16,
    rows: u16,
}

impl TerminalSurface {
    pub fn new() -> UnicornResult<Self> {
        let (cols, rows) = terminal::size().context("query terminal size")?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)
            .context("enter alternate screen")?;
        Ok(Self { out, cols, rows })
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.cols), u32::from(self.rows) * 2)
    }

    fn present(&mut self, canvas: &Canvas) -> UnicornResult<()> {
        let rows = canvas.height / 2;
        let mut frame = String::with_capacity(canvas.width as usize * rows as usize * 40);
        for row in 0..rows {
            for col in 0..canvas.width {
                let top = canvas.pixel(col, row * 2);
                let bottom = canvas.pixel(col, row * 2 + 1);
                // Upper half block: foreground is the top pixel, background
                // the bottom one.
                frame.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top[0], top[1], top[2], bottom[0], bottom[1], bottom[2],
                ));
            }
            frame.push_str("\x1b[0m");
            if row + 1 < rows {
                frame.push_str("\r\n");
            }
        }

        queue!(self.out, cursor::MoveTo(0, 0)).context("move cursor")?;
        self.out
            .write_all(frame.as_bytes())
            .context("write frame")?;
        self.out.flush().context("flush frame")?;
        Ok(())
    }
}

/// Fixed-size surface that discards every frame. Used by tests and as the
/// fallback when no terminal is attached.
#[derive(Clone, Copy, Debug)]
pub struct NullSurface {
    width: u32,
    height: u32,
}

impl NullSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Surface for NullSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, _canvas: &Canvas) -> UnicornResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_surface_reports_its_size_and_accepts_frames() {
        let mut surface = NullSurface::new(10, 6);
        assert_eq!(surface.size(), (10, 6));
        surface.present(&Canvas::new(10, 6)).unwrap();
    }
}
