use itertools::Itertools;
use std::fmt::{self, Display};
use termion::style;

use super::calendar_view::{DayCell, MonthGrid};
use crate::calendar::weekday_header;
use crate::config::{DisplayConfig, Theme};

/// Presentation backend for a rendered month. Slots arrive row by row, Sunday
/// first; `end_row` is called after every seventh slot and after the last one.
pub trait CellRenderer {
    type Output;

    fn title(&mut self, title: &str);
    fn header(&mut self, labels: &[&str]);
    fn blank(&mut self);
    fn day(&mut self, cell: &DayCell);
    fn end_row(&mut self);
    fn finish(self) -> Self::Output;
}

/// Feeds `grid` into `renderer`.
pub fn draw<R: CellRenderer>(
    grid: &MonthGrid,
    display: &DisplayConfig,
    mut renderer: R,
) -> R::Output {
    renderer.title(&format!(
        "{} {}",
        grid.cursor.month_name().name_in(display.month_names),
        grid.cursor.year()
    ));
    renderer.header(&weekday_header(display.weekday_names));

    for row in &grid.slots().chunks(MonthGrid::COLUMNS) {
        for slot in row {
            match slot {
                Some(cell) => renderer.day(cell),
                None => renderer.blank(),
            }
        }
        renderer.end_row();
    }

    renderer.finish()
}

struct StyledDay<'a> {
    cell: &'a DayCell,
    theme: &'a Theme,
}

impl Display for StyledDay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = match self.theme.focus_char {
            Some(c) if self.cell.is_focused => c,
            _ if self.cell.is_today => self.theme.today_char.unwrap_or(' '),
            _ => ' ',
        };

        let arg_future = if self.cell.is_future {
            self.theme.future_char.unwrap_or(' ')
        } else {
            ' '
        };

        let text = format!("{}{}{:>2}", arg_today, arg_future, self.cell.day);

        if !self.theme.color {
            write!(f, "{}", text)
        } else if self.cell.is_focused {
            write!(f, "{}{}{}", style::Underline, text, style::Reset)
        } else if self.cell.is_today {
            write!(f, "{}{}{}", style::Invert, text, style::Reset)
        } else if self.cell.is_future {
            write!(f, "{}{}{}", style::Faint, text, style::Reset)
        } else {
            write!(f, "{}", text)
        }
    }
}

/// Plain-text month grid, one `String` per line.
pub struct TextRenderer<'a> {
    theme: &'a Theme,
    lines: Vec<String>,
    row: Vec<String>,
}

impl<'a> TextRenderer<'a> {
    pub const CELL_WIDTH: usize = 4;
    const SEPARATOR: &'static str = " ";

    pub fn new(theme: &'a Theme) -> Self {
        TextRenderer {
            theme,
            lines: Vec::new(),
            row: Vec::with_capacity(MonthGrid::COLUMNS),
        }
    }

    pub fn line_width() -> usize {
        MonthGrid::COLUMNS * Self::CELL_WIDTH + (MonthGrid::COLUMNS - 1) * Self::SEPARATOR.len()
    }
}

impl CellRenderer for TextRenderer<'_> {
    type Output = Vec<String>;

    fn title(&mut self, title: &str) {
        let centered = format!("{:^width$}", title, width = Self::line_width());
        self.lines.push(centered.trim_end().to_owned());
    }

    fn header(&mut self, labels: &[&str]) {
        self.lines.push(
            labels
                .iter()
                .map(|label| format!("{:>width$.width$}", label, width = Self::CELL_WIDTH))
                .join(Self::SEPARATOR),
        );
    }

    fn blank(&mut self) {
        self.row.push(" ".repeat(Self::CELL_WIDTH));
    }

    fn day(&mut self, cell: &DayCell) {
        self.row.push(
            StyledDay {
                cell,
                theme: self.theme,
            }
            .to_string(),
        );
    }

    fn end_row(&mut self) {
        let row = self.row.drain(..).join(Self::SEPARATOR);
        self.lines.push(row.trim_end().to_owned());
    }

    fn finish(self) -> Vec<String> {
        self.lines
    }
}

/// Convenience wrapper rendering `grid` to text lines.
pub fn to_lines(grid: &MonthGrid, theme: &Theme, display: &DisplayConfig) -> Vec<String> {
    draw(grid, display, TextRenderer::new(theme))
}
