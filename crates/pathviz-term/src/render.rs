//! Crossterm implementation of [`Surface`].
//!
//! Each cell is two terminal columns wide so the board looks square. The
//! status line sits one row below the grid.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::Point;

use crate::driver::{Command, Frame, Paint, Surface};

/// Background colour and two-character glyph for a paint.
fn style(paint: Paint) -> (Color, &'static str) {
    match paint {
        Paint::Empty => (Color::Rgb { r: 255, g: 255, b: 255 }, "  "),
        Paint::Wall => (Color::Rgb { r: 0, g: 0, b: 0 }, "  "),
        Paint::Open => (Color::Rgb { r: 0, g: 255, b: 0 }, "  "),
        Paint::Closed => (Color::Rgb { r: 255, g: 0, b: 0 }, "  "),
        Paint::Path => (Color::Rgb { r: 0, g: 0, b: 255 }, "  "),
        Paint::Start => (Color::Rgb { r: 0, g: 128, b: 0 }, "S "),
        Paint::End => (Color::Rgb { r: 128, g: 0, b: 0 }, "E "),
    }
}

fn to_command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('s') => Some(Command::Step),
        KeyCode::Char('r') => Some(Command::Regenerate),
        _ => None,
    }
}

/// Terminal position of a cell's left column, `None` past the `u16` range.
fn screen_pos(p: Point) -> Option<(u16, u16)> {
    let col = u16::try_from(p.x.checked_mul(2)?).ok()?;
    let row = u16::try_from(p.y).ok()?;
    Some((col, row))
}

/// Whether a `cols` x `rows` board plus its status line fits in `size`.
pub fn board_fits(cols: i32, rows: i32, (width, height): (u16, u16)) -> bool {
    i64::from(cols) * 2 <= i64::from(width) && i64::from(rows) + 2 <= i64::from(height)
}

fn status_line(frame: &Frame) -> String {
    let state = if frame.paused {
        format!("{} (paused)", frame.state)
    } else {
        frame.state.to_string()
    };
    format!(
        "{state} | expansions: {} | space pause  s step  r new  q quit",
        frame.expansions
    )
}

/// Draws frames to stdout using the alternate screen.
pub struct TerminalSurface {
    out: io::Stdout,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for TerminalSurface {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::debug!("terminal is {:?}", terminal::size()?);
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        for &(p, paint) in &frame.changes {
            let Some((col, row)) = screen_pos(p) else {
                continue;
            };
            let (bg, glyph) = style(paint);
            queue!(
                self.out,
                cursor::MoveTo(col, row),
                SetBackgroundColor(bg),
                SetForegroundColor(Color::White),
                Print(glyph)
            )?;
        }
        let status_row = u16::try_from(frame.rows.saturating_add(1)).unwrap_or(u16::MAX);
        queue!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, status_row),
            terminal::Clear(ClearType::CurrentLine),
            Print(status_line(frame))
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Option<Command>, Box<dyn std::error::Error>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let cmd = match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => to_command(code),
            // Clearing wipes the board; the driver repaints all of it.
            Event::Resize(..) => {
                execute!(self.out, terminal::Clear(ClearType::All))?;
                Some(Command::Redraw)
            }
            _ => None,
        };
        Ok(cmd)
    }

    fn close(&mut self) {
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
