pub mod calendar;
pub mod header;
pub mod status_bar;
pub mod tasks;
pub mod utils;

pub use calendar::draw_calendar_column;
pub use header::draw_header;
pub use status_bar::draw_status_bar;
pub use tasks::draw_tasks_column;
