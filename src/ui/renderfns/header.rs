use crate::display::{Canvas, Pen, Point, Rect};
use crate::ui::layout::HEADER_HEIGHT;

const TITLE_SCALE: u8 = 4;

/// Draw the title band across the full width with the title centered
pub fn draw_header(canvas: &mut impl Canvas, width: i32, title: &str) {
  canvas.set_pen(Pen::Orange);
  canvas.rectangle(Rect::new(0, 0, width, HEADER_HEIGHT));

  canvas.set_pen(Pen::Black);
  let x = centered_x(width, canvas.measure_text(title, TITLE_SCALE));
  canvas.text(title, Point::new(x, 10), width, TITLE_SCALE);
}

fn centered_x(width: i32, text_width: i32) -> i32 {
  width / 2 - text_width / 2
}
