//! Terminal preview of the panel.
//!
//! Panel pixels are mapped onto terminal cells at a fixed ratio, so a 800x480
//! layout becomes a 100x30 cell grid. Text keeps the panel's wrapping and line
//! spacing but is printed at the terminal's own glyph size.

use color_eyre::{eyre::eyre, Result};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::buffer::Buffer;
use ratatui::prelude::CrosstermBackend;
use ratatui::style::{Color, Style};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::ops::Range;

use super::{font, Canvas, Pen, Point, Rect};

/// Panel pixels per terminal cell, horizontally
pub const CELL_WIDTH: i32 = 8;

/// Panel pixels per terminal cell, vertically
pub const CELL_HEIGHT: i32 = 16;

pub struct TerminalCanvas {
  terminal: Terminal<CrosstermBackend<Stdout>>,
  /// Frame being composed; copied to the terminal on `update`
  buffer: Buffer,
  pen: Pen,
}

impl TerminalCanvas {
  /// Take over the terminal for a panel of `width` x `height` pixels.
  pub fn new(width: i32, height: i32) -> Result<Self> {
    enable_raw_mode().map_err(|e| eyre!("Failed to enable raw mode: {}", e))?;
    stdout()
      .execute(EnterAlternateScreen)
      .map_err(|e| eyre!("Failed to enter alternate screen: {}", e))?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let area = ratatui::layout::Rect::new(
      0,
      0,
      cell_span(0, width, CELL_WIDTH).end,
      cell_span(0, height, CELL_HEIGHT).end,
    );

    Ok(Self {
      terminal,
      buffer: Buffer::empty(area),
      pen: Pen::Black,
    })
  }

  fn style(&self) -> Style {
    Style::default().fg(pen_color(self.pen))
  }
}

impl Drop for TerminalCanvas {
  fn drop(&mut self) {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
  }
}

impl Canvas for TerminalCanvas {
  fn set_pen(&mut self, pen: Pen) {
    self.pen = pen;
  }

  fn clear(&mut self) {
    self.buffer.reset();
    let area = self.buffer.area;
    self
      .buffer
      .set_style(area, Style::default().bg(pen_color(self.pen)));
  }

  fn rectangle(&mut self, rect: Rect) {
    let area = self.buffer.area;
    let columns = clamp(cell_span(rect.x, rect.width, CELL_WIDTH), area.width);
    let rows = clamp(cell_span(rect.y, rect.height, CELL_HEIGHT), area.height);
    let color = pen_color(self.pen);

    for y in rows {
      for x in columns.clone() {
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
          cell.set_symbol(" ").set_bg(color);
        }
      }
    }
  }

  fn text(&mut self, text: &str, origin: Point, wrap: i32, scale: u8) {
    let area = self.buffer.area;
    let style = self.style();
    let max_cells = (wrap / CELL_WIDTH).max(1) as usize;

    for (i, line) in font::wrap(text, wrap, scale).iter().enumerate() {
      let y = origin.y + i as i32 * font::line_height(scale);
      if origin.x < 0 || y < 0 {
        continue;
      }

      let column = (origin.x / CELL_WIDTH) as u16;
      let row = (y / CELL_HEIGHT) as u16;
      if column >= area.width || row >= area.height {
        continue;
      }

      let room = usize::from(area.width - column).min(max_cells);
      self.buffer.set_stringn(column, row, line, room, style);
    }
  }

  fn update(&mut self) -> Result<()> {
    let frame_buffer = &self.buffer;

    self
      .terminal
      .draw(|frame| {
        let target = frame.buffer_mut();
        for y in 0..frame_buffer.area.height {
          for x in 0..frame_buffer.area.width {
            if let (Some(src), Some(dst)) = (frame_buffer.cell((x, y)), target.cell_mut((x, y))) {
              *dst = src.clone();
            }
          }
        }
      })
      .map_err(|e| eyre!("Failed to draw to terminal: {}", e))?;

    Ok(())
  }
}

/// Terminal color for a panel pen
pub fn pen_color(pen: Pen) -> Color {
  match pen {
    Pen::Black => Color::Black,
    Pen::White => Color::White,
    Pen::Blue => Color::Blue,
    Pen::Orange => Color::Rgb(255, 140, 0),
    Pen::Rgb(r, g, b) => Color::Rgb(r, g, b),
  }
}

/// Cells touched by the pixel span `[start, start + len)`. Anything drawn at
/// all covers at least one cell.
fn cell_span(start: i32, len: i32, cell: i32) -> Range<u16> {
  let first = start.max(0) / cell;
  let end = (start + len).max(0);
  let last = ((end + cell - 1) / cell).max(first + 1);
  to_u16(first)..to_u16(last)
}

fn clamp(range: Range<u16>, limit: u16) -> Range<u16> {
  range.start.min(limit)..range.end.min(limit)
}

fn to_u16(v: i32) -> u16 {
  u16::try_from(v).unwrap_or(u16::MAX)
}
