//! Canvas that keeps an ordered display list instead of pixels.

use color_eyre::Result;
use std::io::Write;

use super::{font, Canvas, Pen, Point, Rect};

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
  SetPen(Pen),
  Clear,
  Rectangle(Rect),
  Text {
    text: String,
    origin: Point,
    wrap: i32,
    scale: u8,
    /// The text as the panel would lay it out
    lines: Vec<String>,
  },
  Update,
}

/// Records every call. With an echo sink, text ops are written out on
/// `update`, which gives a plain-text view of a frame.
#[derive(Default)]
pub struct RecordingCanvas {
  ops: Vec<DrawOp>,
  echo: Option<Box<dyn Write>>,
}

impl RecordingCanvas {
  /// Print each frame's text to `sink` when it is committed. Only the
  /// current frame is retained in this mode.
  pub fn with_echo(sink: Box<dyn Write>) -> Self {
    Self {
      ops: Vec::new(),
      echo: Some(sink),
    }
  }

  /// Ops since the last clear, i.e. the current frame.
  fn current_frame(&self) -> &[DrawOp] {
    let start = self
      .ops
      .iter()
      .rposition(|op| matches!(op, DrawOp::Clear))
      .unwrap_or(0);
    &self.ops[start..]
  }
}

#[cfg(test)]
impl RecordingCanvas {
  pub fn ops(&self) -> &[DrawOp] {
    &self.ops
  }

  /// Text ops as `(text, origin, scale)`, in draw order.
  pub fn texts(&self) -> Vec<(&str, Point, u8)> {
    self
      .ops
      .iter()
      .filter_map(|op| match op {
        DrawOp::Text {
          text,
          origin,
          scale,
          ..
        } => Some((text.as_str(), *origin, *scale)),
        _ => None,
      })
      .collect()
  }

  /// Filled rectangles with the pen active when each was drawn.
  pub fn rectangles(&self) -> Vec<(Pen, Rect)> {
    let mut pen = Pen::Black;
    let mut out = Vec::new();
    for op in &self.ops {
      match op {
        DrawOp::SetPen(p) => pen = *p,
        DrawOp::Rectangle(r) => out.push((pen, *r)),
        _ => {}
      }
    }
    out
  }
}

impl Canvas for RecordingCanvas {
  fn set_pen(&mut self, pen: Pen) {
    self.ops.push(DrawOp::SetPen(pen));
  }

  fn clear(&mut self) {
    if self.echo.is_some() {
      self.ops.clear();
    }
    self.ops.push(DrawOp::Clear);
  }

  fn rectangle(&mut self, rect: Rect) {
    self.ops.push(DrawOp::Rectangle(rect));
  }

  fn text(&mut self, text: &str, origin: Point, wrap: i32, scale: u8) {
    self.ops.push(DrawOp::Text {
      text: text.to_string(),
      origin,
      wrap,
      scale,
      lines: font::wrap(text, wrap, scale),
    });
  }

  fn update(&mut self) -> Result<()> {
    self.ops.push(DrawOp::Update);

    if let Some(mut sink) = self.echo.take() {
      for op in self.current_frame() {
        if let DrawOp::Text { origin, lines, .. } = op {
          for line in lines {
            writeln!(sink, "{:>4},{:<4} {}", origin.x, origin.y, line)?;
          }
        }
      }
      writeln!(sink)?;
      sink.flush()?;
      self.echo = Some(sink);
    }

    Ok(())
  }
}
