//! Column geometry and task pagination.

use crate::feed::{DashboardData, Issue, IN_PROGRESS, TODO};

/// Space between the canvas edge and the first column
pub const GUTTER: i32 = 15;

/// Height of the title band
pub const HEADER_HEIGHT: i32 = 50;

/// Baseline of the column headings
pub const HEADING_Y: i32 = 70;

/// Top of the first task or event row
pub const ROWS_TOP: i32 = 120;

/// Vertical pitch of task slots and event rows
pub const ROW_HEIGHT: i32 = 60;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
  pub width: i32,
  pub height: i32,
}

impl Size {
  pub const fn new(width: i32, height: i32) -> Self {
    Self { width, height }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub x: i32,
  pub width: i32,
}

/// The two-column split of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
  pub tasks: Column,
  pub calendar: Column,
}

impl Columns {
  pub fn compute(size: Size) -> Self {
    let tasks_width = size.width / 2 + 10;
    let calendar_x = GUTTER + tasks_width + 20;
    let calendar_width = (size.width - calendar_x - GUTTER - 10).max(0);

    Self {
      tasks: Column {
        x: GUTTER,
        width: tasks_width,
      },
      calendar: Column {
        x: calendar_x,
        width: calendar_width,
      },
    }
  }
}

/// Top of the `index`th row.
pub fn row_top(index: usize) -> i32 {
  ROWS_TOP + index as i32 * ROW_HEIGHT
}

/// The tasks that get a slot: in-progress first, then todo, capped at
/// `max_issues`. Issues in any other bucket are not shown.
pub fn visible_tasks(data: &DashboardData, max_issues: usize) -> Vec<&Issue> {
  data
    .bucket(IN_PROGRESS)
    .iter()
    .chain(data.bucket(TODO))
    .take(max_issues)
    .collect()
}
