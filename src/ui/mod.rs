pub mod app;
pub mod calendar_view;
pub mod render;

pub use app::App;
pub use calendar_view::{
    CalendarCursor, CalendarView, DayCell, Direction, MonthGrid, SelectionEvent, SelectionSink,
};
pub use render::{CellRenderer, TextRenderer};
