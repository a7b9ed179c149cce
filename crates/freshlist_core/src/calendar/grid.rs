//! Month grid builder.
//!
//! # Responsibility
//! - Lay out one month as a 6x7 grid of day cells and blanks.
//! - Map grid cells back to dates for week highlighting.
//!
//! # Invariants
//! - `cells.len() == GRID_CELLS` for every month.
//! - Day cells form one contiguous run `1..=days_in_month`, Sunday-first.

use crate::calendar::week::WeekSelection;
use crate::calendar::{CalendarError, CalendarResult};
use chrono::{Datelike, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Columns per grid row (one per weekday).
pub const GRID_COLUMNS: usize = 7;
/// Fixed row count so grid height never changes between months.
pub const GRID_ROWS: usize = 6;
/// Total cells in every grid.
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d{1,6})-(\d{1,2})$").expect("valid year-month regex"));

/// Validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month after validating `month` and `year`.
    ///
    /// # Errors
    /// - `InvalidMonth` when `month` is outside 1..=12.
    /// - `InvalidYear` when the month is not representable.
    pub fn new(year: i32, month: u32) -> CalendarResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        let candidate = Self { year, month };
        candidate
            .last_day()
            .ok_or(CalendarError::InvalidYear { year })?;
        Ok(candidate)
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Date of the 1st.
    pub fn first_day(self) -> NaiveDate {
        // Validated at construction: both the 1st and the last day exist.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days in the month (28..=31).
    pub fn days_in_month(self) -> u32 {
        self.last_day().map(|date| date.day()).unwrap_or(0)
    }

    /// Weekday index of the 1st, Sunday = 0.
    pub fn first_weekday(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// The following month.
    pub fn next(self) -> CalendarResult<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// The preceding month.
    pub fn previous(self) -> CalendarResult<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    fn last_day(self) -> Option<NaiveDate> {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = YEAR_MONTH_RE
            .captures(trimmed)
            .ok_or_else(|| CalendarError::InvalidYearMonth(trimmed.to_string()))?;
        let year = captures[1]
            .parse::<i32>()
            .map_err(|_| CalendarError::InvalidYearMonth(trimmed.to_string()))?;
        let month = captures[2]
            .parse::<u32>()
            .map_err(|_| CalendarError::InvalidYearMonth(trimmed.to_string()))?;
        Self::new(year, month)
    }
}

/// One grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCell {
    /// Padding before the 1st or after the last day.
    Blank,
    /// Day of month, 1-based.
    Day(u32),
}

impl GridCell {
    pub fn day(self) -> Option<u32> {
        match self {
            Self::Day(day) => Some(day),
            Self::Blank => None,
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Fixed-size display grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year_month: YearMonth,
    leading_blanks: usize,
    cells: [GridCell; GRID_CELLS],
}

impl MonthGrid {
    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    /// All cells in row-major order, Sunday column first.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Rows of `GRID_COLUMNS` cells each.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    /// Number of blanks before the 1st.
    pub fn leading_blanks(&self) -> usize {
        self.leading_blanks
    }

    /// Number of non-blank cells.
    pub fn day_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_blank()).count()
    }

    /// Date shown at `index`, or `None` for blanks and out-of-range indices.
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        let day = self.cells.get(index)?.day()?;
        NaiveDate::from_ymd_opt(self.year_month.year, self.year_month.month, day)
    }

    /// Cell index showing `date`, when it belongs to this month.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if YearMonth::of(date) != self.year_month {
            return None;
        }
        Some(self.leading_blanks + date.day() as usize - 1)
    }

    /// Indices of day cells whose date lies inside `week`.
    ///
    /// Empty when the week does not overlap this month.
    pub fn cells_in_week<Tz: TimeZone>(&self, week: &WeekSelection<Tz>) -> Vec<usize> {
        (0..GRID_CELLS)
            .filter(|index| {
                self.date_at(*index)
                    .is_some_and(|date| week.contains_date(date))
            })
            .collect()
    }
}

/// Builds the 42-cell grid for `year_month`.
pub fn build_month_grid(year_month: YearMonth) -> MonthGrid {
    let leading_blanks = year_month.first_weekday() as usize;
    let days = year_month.days_in_month() as usize;

    let mut cells = [GridCell::Blank; GRID_CELLS];
    for (offset, cell) in cells
        .iter_mut()
        .skip(leading_blanks)
        .take(days)
        .enumerate()
    {
        *cell = GridCell::Day(offset as u32 + 1);
    }

    MonthGrid {
        year_month,
        leading_blanks,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_month_grid, GridCell, YearMonth, GRID_CELLS};

    #[test]
    fn grid_with_sunday_first_has_no_leading_blanks() {
        // September 2024 starts on a Sunday.
        let grid = build_month_grid(YearMonth::new(2024, 9).unwrap());
        assert_eq!(grid.leading_blanks(), 0);
        assert_eq!(grid.cells()[0], GridCell::Day(1));
        assert_eq!(grid.cells()[29], GridCell::Day(30));
        assert!(grid.cells()[30..].iter().all(|cell| cell.is_blank()));
    }

    #[test]
    fn grid_with_saturday_first_uses_all_six_rows() {
        // March 2025 starts on a Saturday and has 31 days.
        let grid = build_month_grid(YearMonth::new(2025, 3).unwrap());
        assert_eq!(grid.leading_blanks(), 6);
        assert_eq!(grid.cells()[GRID_CELLS - 6], GridCell::Day(31));
        assert_eq!(grid.rows().count(), 6);
    }

    #[test]
    fn year_month_display_is_zero_padded() {
        assert_eq!(YearMonth::new(987, 3).unwrap().to_string(), "0987-03");
    }

    #[test]
    fn index_of_rejects_other_months() {
        let grid = build_month_grid(YearMonth::new(2024, 1).unwrap());
        let feb = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(grid.index_of(feb), None);
    }
}
