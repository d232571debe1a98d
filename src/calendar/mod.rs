//! Conversion between the proleptic Gregorian calendar and the Ethiopian
//! (Amete Mihret) calendar.
//!
//! Both directions go through chrono's day count, where 0001-01-01 (Gregorian)
//! is day 1. The Ethiopian calendar has twelve months of 30 days followed by
//! Pagume, which has 5 days, or 6 in years where `year mod 4 == 3`. Unlike the
//! Gregorian calendar there is no century exception, so the two calendars
//! drift apart by one day every century not divisible by 400.

pub mod month;

pub use chrono::NaiveDate as GregorianDate;
pub use month::{weekday_header, weekday_name, EthiopianMonth, NameStyle};

use chrono::{Datelike, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, ErrorKind, Result};

// Day number of Meskerem 1, year 1 on chrono's day count. This is the Julian
// date 8-08-29, i.e. Gregorian 0008-08-27.
const ETHIOPIAN_EPOCH_DAY: i64 = 2796;

const DAYS_PER_MONTH: u8 = 30;
const PAGUME_DAYS: u8 = 5;
const PAGUME_DAYS_LEAP: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthiopianDate {
    year: i32,
    month: u8,
    day: u8,
}

/// Whether `year` is an Ethiopian leap year, i.e. Pagume has six days.
pub fn is_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 3
}

/// Number of days in the given Ethiopian month, or `None` if `month` is not
/// in `1..=13`.
pub fn days_of_month(month: u8, year: i32) -> Option<u8> {
    match month {
        1..=12 => Some(DAYS_PER_MONTH),
        13 if is_leap_year(year) => Some(PAGUME_DAYS_LEAP),
        13 => Some(PAGUME_DAYS),
        _ => None,
    }
}

pub fn days_of_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Converts a Gregorian calendar date to its Ethiopian equivalent.
pub fn to_ethiopian(year: i32, month: u32, day: u32) -> Result<EthiopianDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("{:04}-{:02}-{:02} is not a Gregorian date", year, month, day),
        )
    })?;

    EthiopianDate::from_gregorian(&date)
}

/// Converts an Ethiopian calendar date to its Gregorian equivalent.
pub fn to_gregorian(year: i32, month: u32, day: u32) -> Result<GregorianDate> {
    let month = u8::try_from(month).map_err(|_| invalid_ethiopian(year, month, day))?;
    let day = u8::try_from(day).map_err(|_| invalid_ethiopian(year, month as u32, day))?;

    EthiopianDate::from_ymd(year, month, day)?.to_gregorian()
}

fn invalid_ethiopian(year: i32, month: u32, day: u32) -> Error {
    Error::new(
        ErrorKind::InvalidDate,
        &format!(
            "{:04}-{:02}-{:02} is not an Ethiopian date",
            year, month, day
        ),
    )
}

// Day count of an Ethiopian date. Caller guarantees the triple is valid.
fn day_number(year: i32, month: u8, day: u8) -> i64 {
    let year = year as i64;
    ETHIOPIAN_EPOCH_DAY - 1
        + 365 * (year - 1)
        + year.div_euclid(4)
        + DAYS_PER_MONTH as i64 * (month as i64 - 1)
        + day as i64
}

impl EthiopianDate {
    /// Builds a date from its components, checking month and day ranges.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self> {
        match days_of_month(month, year) {
            Some(num_days) if (1..=num_days).contains(&day) => {
                Ok(EthiopianDate { year, month, day })
            }
            _ => Err(invalid_ethiopian(year, month as u32, day as u32)),
        }
    }

    pub fn from_gregorian(date: &NaiveDate) -> Result<Self> {
        Self::from_day_number(date.num_days_from_ce() as i64)
    }

    fn from_day_number(n: i64) -> Result<Self> {
        let year = (4 * (n - ETHIOPIAN_EPOCH_DAY) + 1463).div_euclid(1461);
        let year = i32::try_from(year).map_err(|_| {
            Error::new(
                ErrorKind::OutOfRange,
                &format!("day number {} has no Ethiopian year", n),
            )
        })?;

        let day_of_year = n - day_number(year, 1, 1);
        let month = (day_of_year / DAYS_PER_MONTH as i64 + 1) as u8;
        let day = (n - day_number(year, month, 1) + 1) as u8;

        Ok(EthiopianDate { year, month, day })
    }

    pub fn to_gregorian(&self) -> Result<GregorianDate> {
        let n = day_number(self.year, self.month, self.day);
        i32::try_from(n)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::OutOfRange,
                    &format!("{} is outside the Gregorian range", self),
                )
            })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn month_name(&self) -> EthiopianMonth {
        // month is validated on construction
        EthiopianMonth::from_u8(self.month).unwrap_or(EthiopianMonth::Meskerem)
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Day of the year, starting at 1 on Meskerem 1.
    pub fn ordinal(&self) -> u16 {
        (self.month as u16 - 1) * DAYS_PER_MONTH as u16 + self.day as u16
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    pub fn weekday(&self) -> Result<Weekday> {
        self.to_gregorian().map(|date| date.weekday())
    }

    pub fn as_tuple(&self) -> (i32, u8, u8) {
        (self.year, self.month, self.day)
    }
}

impl PartialOrd for EthiopianDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EthiopianDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_tuple().cmp(&other.as_tuple())
    }
}

impl fmt::Display for EthiopianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
