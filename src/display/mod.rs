//! Drawing capability for the e-paper panel.
//!
//! The layout code only talks to [`Canvas`]. Backends decide what a pen,
//! a rectangle or a line of text turns into, and what `update` flushes to.

pub mod font;
pub mod recording;
pub mod terminal;

use color_eyre::Result;

pub use recording::{DrawOp, RecordingCanvas};
pub use terminal::TerminalCanvas;

/// Panel inks, plus arbitrary RGB for backends that can show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pen {
  Black,
  White,
  Blue,
  Orange,
  Rgb(u8, u8, u8),
}

/// A position in panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// An axis-aligned box in panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

impl Rect {
  pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }
}

/// Primitive drawing operations a display backend provides.
pub trait Canvas {
  /// Set the color used by following draw calls
  fn set_pen(&mut self, pen: Pen);

  /// Fill the whole canvas with the active pen
  fn clear(&mut self);

  /// Fill a rectangle with the active pen
  fn rectangle(&mut self, rect: Rect);

  /// Draw text at `origin`, word-wrapped to `wrap` pixels, scaled by `scale`
  fn text(&mut self, text: &str, origin: Point, wrap: i32, scale: u8);

  /// Width in pixels of `text` drawn at `scale` on a single line
  fn measure_text(&self, text: &str, scale: u8) -> i32 {
    font::measure(text, scale)
  }

  /// Commit everything drawn so far to the physical display
  fn update(&mut self) -> Result<()>;
}
