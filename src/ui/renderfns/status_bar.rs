use crate::display::{Canvas, Pen, Point};
use crate::feed::StatusLog;

/// Draw the status log as one wrapped line pinned near the bottom
pub fn draw_status_bar(canvas: &mut impl Canvas, width: i32, height: i32, status: &StatusLog) {
  canvas.set_pen(Pen::Black);
  canvas.text(
    &status.joined(),
    Point::new(10, height - 20),
    width - 75,
    1,
  );
}
