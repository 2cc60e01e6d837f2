use crate::display::{Canvas, Pen, Point, Rect};
use crate::feed::Issue;
use crate::ui::layout::{row_top, Column, HEADING_Y};

use super::utils::status_pen;

const BAR_WIDTH: i32 = 5;
const BAR_HEIGHT: i32 = 50;
/// Offset from the bar to the text
const TEXT_INSET: i32 = 20;
/// Offset from the title to the label line
const LABEL_OFFSET: i32 = 40;

/// Draw the "Tasks" heading and one fixed slot per visible task
pub fn draw_tasks_column(canvas: &mut impl Canvas, column: Column, tasks: &[&Issue]) {
  canvas.set_pen(Pen::Black);
  canvas.text(
    "Tasks",
    Point::new(column.x, HEADING_Y),
    column.width - 10,
    3,
  );

  let wrap = text_wrap(column);
  for (index, issue) in tasks.iter().enumerate() {
    draw_issue(canvas, issue, Point::new(column.x, row_top(index)), wrap);
  }
}

fn draw_issue(canvas: &mut impl Canvas, issue: &Issue, at: Point, wrap: i32) {
  canvas.set_pen(status_pen(issue));
  canvas.rectangle(Rect::new(at.x, at.y, BAR_WIDTH, BAR_HEIGHT));

  canvas.set_pen(Pen::Black);
  let text_x = at.x + TEXT_INSET;
  canvas.text(&issue.title, Point::new(text_x, at.y), wrap, 2);
  canvas.text(
    issue.label(),
    Point::new(text_x, at.y + LABEL_OFFSET),
    wrap,
    1,
  );
}

/// Width left for task text once the bar and inset are taken off.
fn text_wrap(column: Column) -> i32 {
  (column.width - 60).max(0)
}
