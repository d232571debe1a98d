use chrono::{Datelike, NaiveDate};
use derive_more::Constructor;
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;

use crate::calendar::{self, EthiopianDate, EthiopianMonth};
use crate::error::{Error, ErrorKind, Result};

/// Paging direction for months and years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn step(self) -> i32 {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = Error;

    fn try_from(step: i32) -> Result<Self> {
        match step {
            1 => Ok(Direction::Next),
            -1 => Ok(Direction::Prev),
            _ => Err(Error::new(
                ErrorKind::InvalidArgument,
                &format!("paging step must be +1 or -1, got {}", step),
            )),
        }
    }
}

/// The (year, month) currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarCursor {
    year: i32,
    month: EthiopianMonth,
}

impl CalendarCursor {
    pub fn new(year: i32, month: EthiopianMonth) -> Self {
        CalendarCursor { year, month }
    }

    pub fn from_ym(year: i32, month: u8) -> Result<Self> {
        EthiopianMonth::from_u8(month)
            .map(|month| CalendarCursor { year, month })
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("month {} is not in 1..={}", month, EthiopianMonth::COUNT),
                )
            })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month.number_from_month()
    }

    pub fn month_name(&self) -> EthiopianMonth {
        self.month
    }

    /// The following month. Stays put when the year would overflow.
    pub fn next(&self) -> Self {
        let next_month = self.month.succ();
        let year = if next_month == EthiopianMonth::Meskerem {
            self.year.checked_add(1)
        } else {
            Some(self.year)
        };

        match year {
            Some(year) => CalendarCursor {
                month: next_month,
                year,
            },
            None => *self,
        }
    }

    /// The preceding month. Stays put when the year would overflow.
    pub fn prev(&self) -> Self {
        let prev_month = self.month.pred();
        let year = if prev_month == EthiopianMonth::Pagume {
            self.year.checked_sub(1)
        } else {
            Some(self.year)
        };

        match year {
            Some(year) => CalendarCursor {
                month: prev_month,
                year,
            },
            None => *self,
        }
    }

    /// Same month, one year forward or back. Stays put at the ends of `i32`.
    pub fn shift_year(&self, direction: Direction) -> Self {
        match self.year.checked_add(direction.step()) {
            Some(year) => CalendarCursor::new(year, self.month),
            None => *self,
        }
    }

    pub fn num_days(&self) -> u8 {
        // month is always in 1..=13
        calendar::days_of_month(self.month(), self.year).unwrap_or(0)
    }
}

impl From<EthiopianDate> for CalendarCursor {
    fn from(date: EthiopianDate) -> Self {
        CalendarCursor::new(date.year(), date.month_name())
    }
}

impl PartialOrd for CalendarCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarCursor {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl fmt::Display for CalendarCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// One day of the displayed month. Future days must not be selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct DayCell {
    pub day: u8,
    pub is_today: bool,
    pub is_future: bool,
    pub is_focused: bool,
}

impl DayCell {
    pub fn is_selectable(&self) -> bool {
        !self.is_future
    }
}

/// Result of a single render pass: blank slots to align day 1 under its
/// weekday column (Sunday first), followed by one cell per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: CalendarCursor,
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    /// All grid slots in order, `None` for the leading blanks.
    pub fn slots(&self) -> impl Iterator<Item = Option<&DayCell>> + '_ {
        std::iter::repeat(None)
            .take(self.leading_blanks)
            .chain(self.cells.iter().map(Some))
    }

    pub fn num_rows(&self) -> usize {
        (self.leading_blanks + self.cells.len() + Self::COLUMNS - 1) / Self::COLUMNS
    }

    pub fn cell(&self, day: u8) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.day == day)
    }
}

/// Emitted when the user picks a (non-future) day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct SelectionEvent {
    pub date: EthiopianDate,
}

impl fmt::Display for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Selected Ethiopian date: {}/{}/{}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}

/// Receiver of day selections, e.g. an attendance workflow.
pub trait SelectionSink {
    fn on_select(&mut self, event: SelectionEvent);
}

impl<F: FnMut(SelectionEvent)> SelectionSink for F {
    fn on_select(&mut self, event: SelectionEvent) {
        self(event)
    }
}

#[derive(Debug, Clone)]
pub struct CalendarView {
    cursor: CalendarCursor,
    today: EthiopianDate,
    // day of the cursor month under the keyboard focus, if any
    focus: Option<u8>,
}

impl CalendarView {
    /// Creates a view positioned on the month containing `now`.
    pub fn new(now: NaiveDate) -> Result<Self> {
        let today = EthiopianDate::from_gregorian(&now)?;
        log::debug!("Initialising calendar view, today is {} ({})", today, now);

        Ok(CalendarView {
            cursor: today.into(),
            today,
            focus: None,
        })
    }

    pub fn with_cursor(mut self, cursor: CalendarCursor) -> Self {
        self.set_cursor(cursor);
        self
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CalendarCursor) {
        self.cursor = cursor;
        self.clamp_focus();
    }

    pub fn today(&self) -> EthiopianDate {
        self.today
    }

    /// Updates the reference "now". Returns `true` if the Ethiopian date of
    /// today changed. The cursor is left untouched.
    pub fn set_now(&mut self, now: NaiveDate) -> Result<bool> {
        let today = EthiopianDate::from_gregorian(&now)?;
        if today != self.today {
            log::info!("Day changed from {} to {}", self.today, today);
            self.today = today;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn change_month(&mut self, direction: Direction) {
        self.set_cursor(match direction {
            Direction::Next => self.cursor.next(),
            Direction::Prev => self.cursor.prev(),
        });
        log::debug!("Cursor moved to {}", self.cursor);
    }

    pub fn change_year(&mut self, direction: Direction) {
        self.set_cursor(self.cursor.shift_year(direction));
        log::debug!("Cursor moved to {}", self.cursor);
    }

    pub fn reset_to_today(&mut self) {
        self.cursor = self.today.into();
        if self.focus.is_some() {
            self.focus = Some(self.today.day());
        }
    }

    pub fn focus(&self) -> Option<u8> {
        self.focus
    }

    /// Moves the focused day by one, crossing into the adjacent month at
    /// either end. Without a focus, the first call focuses today (or day 1
    /// of a month that does not contain today).
    pub fn move_focus(&mut self, direction: Direction) {
        let day = match self.focus {
            None => {
                self.focus = Some(if self.shows_today() {
                    self.today.day()
                } else {
                    1
                });
                return;
            }
            Some(day) => day,
        };

        match direction {
            Direction::Next if day < self.cursor.num_days() => self.focus = Some(day + 1),
            Direction::Prev if day > 1 => self.focus = Some(day - 1),
            Direction::Next => {
                let next = self.cursor.next();
                if next != self.cursor {
                    self.cursor = next;
                    self.focus = Some(1);
                }
            }
            Direction::Prev => {
                let prev = self.cursor.prev();
                if prev != self.cursor {
                    self.cursor = prev;
                    self.focus = Some(prev.num_days());
                }
            }
        }
    }

    /// Selects the focused day. Future days are not selectable and yield
    /// `None`, as does a missing focus.
    pub fn select_focused(&self) -> Result<Option<SelectionEvent>> {
        let day = match self.focus {
            Some(day) => day,
            None => return Ok(None),
        };
        if (self.cursor.year(), self.cursor.month(), day) > self.today.as_tuple() {
            log::debug!("Ignoring selection of future day {} of {}", day, self.cursor);
            return Ok(None);
        }
        self.select_day(self.cursor.year(), self.cursor.month(), day)
            .map(Some)
    }

    fn clamp_focus(&mut self) {
        let num_days = self.cursor.num_days();
        self.focus = self.focus.map(|day| day.min(num_days));
    }

    pub fn shows_today(&self) -> bool {
        self.cursor == CalendarCursor::from(self.today)
    }

    pub fn render(&self) -> Result<MonthGrid> {
        let year = self.cursor.year();
        let month = self.cursor.month();

        let first = EthiopianDate::from_ymd(year, month, 1)?.to_gregorian()?;
        // Sunday = 0
        let leading_blanks = first.weekday().num_days_from_sunday() as usize;

        let today = self.today.as_tuple();
        let cells = (1..=self.cursor.num_days())
            .map(|day| {
                let focused = self.focus == Some(day);
                match (year, month, day).cmp(&today) {
                    Ordering::Greater => DayCell::new(day, false, true, focused),
                    Ordering::Equal => DayCell::new(day, true, false, focused),
                    Ordering::Less => DayCell::new(day, false, false, focused),
                }
            })
            .collect();

        Ok(MonthGrid {
            cursor: self.cursor,
            leading_blanks,
            cells,
        })
    }

    pub fn select_day(&self, year: i32, month: u8, day: u8) -> Result<SelectionEvent> {
        let date = EthiopianDate::from_ymd(year, month, day)?;
        if date > self.today {
            log::warn!("Selected future date {} (today is {})", date, self.today);
        } else {
            log::info!("Selected {}", date);
        }

        Ok(SelectionEvent::new(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_at(now: (i32, u32, u32)) -> CalendarView {
        CalendarView::new(NaiveDate::from_ymd_opt(now.0, now.1, now.2).unwrap()).unwrap()
    }

    fn cursor(year: i32, month: u8) -> CalendarCursor {
        CalendarCursor::from_ym(year, month).unwrap()
    }

    #[test]
    fn initialises_on_todays_month() {
        let view = view_at((2024, 9, 15));
        assert_eq!(view.today().as_tuple(), (2017, 1, 5));
        assert_eq!(view.cursor(), cursor(2017, 1));
        assert!(view.shows_today());
    }

    #[test]
    fn month_paging_wraps_around() {
        let mut view = view_at((2024, 9, 15)).with_cursor(cursor(2017, 13));
        view.change_month(Direction::Next);
        assert_eq!(view.cursor(), cursor(2018, 1));
        view.change_month(Direction::Prev);
        assert_eq!(view.cursor(), cursor(2017, 13));

        view.set_cursor(cursor(2017, 5));
        view.change_month(Direction::Prev);
        assert_eq!(view.cursor(), cursor(2017, 4));
        view.change_month(Direction::Next);
        view.change_month(Direction::Next);
        assert_eq!(view.cursor(), cursor(2017, 6));
    }

    #[test]
    fn thirteen_steps_is_one_year() {
        let mut view = view_at((2024, 9, 15));
        let start = view.cursor();
        for _ in 0..13 {
            view.change_month(Direction::Next);
        }
        assert_eq!(view.cursor(), cursor(start.year() + 1, start.month()));
        for _ in 0..26 {
            view.change_month(Direction::Prev);
        }
        assert_eq!(view.cursor(), cursor(start.year() - 1, start.month()));
    }

    #[test]
    fn paging_stops_at_the_ends_of_the_year_range() {
        let mut view = view_at((2024, 9, 15)).with_cursor(cursor(i32::MAX, 13));
        view.change_month(Direction::Next);
        assert_eq!(view.cursor(), cursor(i32::MAX, 13));
        view.change_year(Direction::Next);
        assert_eq!(view.cursor(), cursor(i32::MAX, 13));
        view.change_month(Direction::Prev);
        assert_eq!(view.cursor(), cursor(i32::MAX, 12));

        view.set_cursor(cursor(i32::MIN, 1));
        view.change_month(Direction::Prev);
        assert_eq!(view.cursor(), cursor(i32::MIN, 1));
        view.change_year(Direction::Prev);
        assert_eq!(view.cursor(), cursor(i32::MIN, 1));
        view.change_year(Direction::Next);
        assert_eq!(view.cursor(), cursor(i32::MIN + 1, 1));
    }

    #[test]
    fn cursor_month_lengths() {
        assert_eq!(cursor(2017, 1).num_days(), 30);
        assert_eq!(cursor(2015, 13).num_days(), 6);
        assert_eq!(cursor(2017, 13).num_days(), 5);
        assert_eq!(cursor(-1, 13).num_days(), 6);
    }

    #[test]
    fn year_paging_keeps_month() {
        let mut view = view_at((2024, 9, 15)).with_cursor(cursor(2017, 13));
        view.change_year(Direction::Prev);
        assert_eq!(view.cursor(), cursor(2016, 13));
        view.change_year(Direction::Next);
        view.change_year(Direction::Next);
        assert_eq!(view.cursor(), cursor(2018, 13));

        view.reset_to_today();
        assert_eq!(view.cursor(), cursor(2017, 1));
    }

    #[test]
    fn weekday_alignment() {
        // 2024-09-11 is a Wednesday
        let grid = view_at((2024, 9, 15)).render().unwrap();
        assert_eq!(grid.leading_blanks, 3);
        assert_eq!(grid.cells.len(), 30);

        // Pagume 2016 starts on 2024-09-06, a Friday
        let grid = view_at((2024, 9, 15))
            .with_cursor(cursor(2016, 13))
            .render()
            .unwrap();
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.cells.len(), 5);
    }

    #[test]
    fn pagume_length_follows_leap_years() {
        let view = view_at((2024, 9, 15));
        let leap = view.clone().with_cursor(cursor(2015, 13)).render().unwrap();
        assert_eq!(leap.cells.len(), 6);
        let common = view.with_cursor(cursor(2017, 13)).render().unwrap();
        assert_eq!(common.cells.len(), 5);
    }

    #[test]
    fn future_days_are_masked() {
        let grid = view_at((2024, 9, 15)).render().unwrap();
        for cell in &grid.cells {
            assert_eq!(cell.is_future, cell.day > 5, "day {}", cell.day);
            assert_eq!(cell.is_today, cell.day == 5, "day {}", cell.day);
            assert_eq!(cell.is_selectable(), cell.day <= 5);
        }
    }

    #[test]
    fn other_months_are_entirely_past_or_future() {
        let view = view_at((2024, 9, 15));
        let past = view.clone().with_cursor(cursor(2016, 12)).render().unwrap();
        assert!(past.cells.iter().all(|c| !c.is_future && !c.is_today));

        let future = view.with_cursor(cursor(2017, 2)).render().unwrap();
        assert!(future.cells.iter().all(|c| c.is_future && !c.is_today));
    }

    #[test]
    fn render_is_idempotent() {
        let view = view_at((2025, 1, 7));
        assert_eq!(view.render().unwrap(), view.render().unwrap());
    }

    #[test]
    fn fresh_now_moves_today_but_not_cursor() {
        let mut view = view_at((2024, 9, 15));
        assert!(!view.set_now(NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()).unwrap());
        assert!(view.set_now(NaiveDate::from_ymd_opt(2024, 9, 16).unwrap()).unwrap());

        assert_eq!(view.cursor(), cursor(2017, 1));
        let grid = view.render().unwrap();
        assert!(grid.cell(6).unwrap().is_today);
        assert!(!grid.cell(5).unwrap().is_today);
        assert!(!grid.cell(6).unwrap().is_future);
    }

    #[test]
    fn grid_slots_and_rows() {
        let grid = view_at((2024, 9, 15)).render().unwrap();
        let slots: Vec<_> = grid.slots().collect();
        assert_eq!(slots.len(), 33);
        assert!(slots[..3].iter().all(Option::is_none));
        assert_eq!(slots[3].map(|c| c.day), Some(1));
        assert_eq!(grid.num_rows(), 5);
    }

    #[test]
    fn selection_events() {
        let view = view_at((2024, 9, 15));
        let event = view.select_day(2017, 1, 3).unwrap();
        assert_eq!(event.to_string(), "Selected Ethiopian date: 2017/1/3");

        let mut received = Vec::new();
        {
            let mut sink = |e: SelectionEvent| received.push(e);
            sink.on_select(event);
        }
        assert_eq!(received, vec![event]);

        assert!(view.select_day(2017, 13, 6).unwrap_err().is_invalid_date());
    }

    #[test]
    fn focus_moves_across_month_boundaries() {
        let mut view = view_at((2024, 9, 15));
        assert_eq!(view.focus(), None);
        assert!(view.render().unwrap().cells.iter().all(|c| !c.is_focused));

        view.move_focus(Direction::Prev);
        assert_eq!(view.focus(), Some(5));
        for _ in 0..5 {
            view.move_focus(Direction::Prev);
        }
        // day 1 of Meskerem 2017 steps back to the last day of Pagume 2016
        assert_eq!(view.cursor(), cursor(2016, 13));
        assert_eq!(view.focus(), Some(5));
        assert!(view.render().unwrap().cell(5).unwrap().is_focused);

        view.move_focus(Direction::Next);
        assert_eq!(view.cursor(), cursor(2017, 1));
        assert_eq!(view.focus(), Some(1));

        // the sixth day of a leap Pagume clamps to five in a common year
        view.set_cursor(cursor(2015, 13));
        assert_eq!(view.focus(), Some(1));
        for _ in 0..5 {
            view.move_focus(Direction::Next);
        }
        assert_eq!(view.cursor(), cursor(2015, 13));
        assert_eq!(view.focus(), Some(6));
        view.change_year(Direction::Next);
        assert_eq!(view.cursor(), cursor(2016, 13));
        assert_eq!(view.focus(), Some(5));
        view.move_focus(Direction::Next);
        assert_eq!(view.cursor(), cursor(2017, 1));
        assert_eq!(view.focus(), Some(1));

        view.reset_to_today();
        assert_eq!(view.focus(), Some(5));
        assert_eq!(view.cursor(), cursor(2017, 1));
    }

    #[test]
    fn focused_selection_skips_future_days() {
        let mut view = view_at((2024, 9, 15));
        assert_eq!(view.select_focused().unwrap(), None);

        view.move_focus(Direction::Next);
        let event = view.select_focused().unwrap().unwrap();
        assert_eq!(event.date.as_tuple(), (2017, 1, 5));

        view.move_focus(Direction::Next);
        assert_eq!(view.select_focused().unwrap(), None);

        view.change_month(Direction::Prev);
        let event = view.select_focused().unwrap().unwrap();
        assert_eq!(event.to_string(), "Selected Ethiopian date: 2016/13/5");
    }

    #[test]
    fn cursor_validation() {
        assert!(CalendarCursor::from_ym(2017, 0).is_err());
        let err = CalendarCursor::from_ym(2017, 14).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("month 14 is not in 1..=13"));
        assert_eq!(cursor(2017, 13).to_string(), "Pagume 2017");
        assert!(cursor(2016, 13) < cursor(2017, 1));
        assert_eq!(Direction::try_from(-1).unwrap(), Direction::Prev);
        assert!(Direction::try_from(2).is_err());
    }
}
