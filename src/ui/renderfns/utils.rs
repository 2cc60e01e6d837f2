use crate::display::Pen;
use crate::feed::Issue;

/// Color bar for a task slot. Only "In Progress" is highlighted; every other
/// status shares the neutral grey.
pub fn status_pen(issue: &Issue) -> Pen {
  if issue.is_in_progress() {
    Pen::Blue
  } else {
    NEUTRAL
  }
}

pub const NEUTRAL: Pen = Pen::Rgb(170, 170, 170);
