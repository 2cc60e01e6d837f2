use crate::display::{Canvas, Pen, Point};
use crate::feed::CalendarEvent;
use crate::ui::layout::{row_top, Column, HEADING_Y, ROWS_TOP};

pub const NO_EVENTS: &str = "No events today";

/// Width of the start-time sub-column
const START_WRAP: i32 = 50;
/// Offset from the start label to the event title
const TITLE_OFFSET: i32 = 60;

/// Draw the "Today" heading and every event, one row each.
///
/// Unlike tasks, events are not capped: rows past the bottom of the canvas
/// run off it.
pub fn draw_calendar_column(
  canvas: &mut impl Canvas,
  column: Column,
  canvas_width: i32,
  events: &[CalendarEvent],
) {
  canvas.set_pen(Pen::Black);
  canvas.text(
    "Today",
    Point::new(column.x, HEADING_Y),
    column.width - 10,
    3,
  );

  if events.is_empty() {
    canvas.text(
      NO_EVENTS,
      Point::new(column.x, ROWS_TOP),
      canvas_width - 75,
      2,
    );
    return;
  }

  for (index, event) in events.iter().enumerate() {
    let y = row_top(index);
    canvas.text(&event.start, Point::new(column.x, y), START_WRAP, 2);
    canvas.text(
      &event.title,
      Point::new(column.x + TITLE_OFFSET, y),
      column.width - START_WRAP,
      2,
    );
  }
}
