pub mod layout;
mod renderfns;

use crate::display::{Canvas, Pen};
use crate::feed::{RemoteDocument, StatusLog};
use color_eyre::Result;
use layout::{visible_tasks, Columns, Size};
use renderfns::{draw_calendar_column, draw_header, draw_status_bar, draw_tasks_column};

/// Maps a dashboard document and status log onto a fixed-size canvas.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
  title: String,
  max_issues: usize,
}

impl LayoutRenderer {
  pub fn new(title: impl Into<String>, max_issues: usize) -> Self {
    Self {
      title: title.into(),
      max_issues,
    }
  }

  /// Draw a full frame and commit it to the display.
  ///
  /// Any document the sync engine hands out renders, including the empty
  /// default. Only the final flush can fail.
  pub fn render(
    &self,
    canvas: &mut impl Canvas,
    document: &RemoteDocument,
    status: &StatusLog,
    size: Size,
  ) -> Result<()> {
    canvas.set_pen(Pen::White);
    canvas.clear();

    let columns = Columns::compute(size);

    draw_header(canvas, size.width, &self.title);
    draw_tasks_column(
      canvas,
      columns.tasks,
      &visible_tasks(&document.data, self.max_issues),
    );
    draw_calendar_column(canvas, columns.calendar, size.width, &document.data.events);
    draw_status_bar(canvas, size.width, size.height, status);

    canvas.update()
  }
}
