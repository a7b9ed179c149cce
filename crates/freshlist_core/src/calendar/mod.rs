//! Calendar week resolution and month grid construction.
//!
//! # Responsibility
//! - Resolve the Sunday-first week containing a reference date.
//! - Build fixed-height month grids for display and week highlighting.
//!
//! # Invariants
//! - A week always spans exactly 7 local calendar days starting on Sunday.
//! - A month grid always holds exactly 42 cells.
//! - All arithmetic goes through chrono dates, never string concatenation.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod grid;
pub mod week;

pub use grid::{build_month_grid, GridCell, MonthGrid, YearMonth, GRID_CELLS, GRID_COLUMNS};
pub use week::{resolve_week, WeekSelection};

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Caller-contract violations for calendar inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Month number outside 1..=12.
    InvalidMonth { month: u32 },
    /// Year outside the supported calendar range.
    InvalidYear { year: i32 },
    /// `YYYY-MM` text that does not parse.
    InvalidYearMonth(String),
    /// A week boundary cannot be represented near the calendar range edge.
    OutOfRange(NaiveDate),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { month } => write!(f, "invalid month: {month} (must be 1..=12)"),
            Self::InvalidYear { year } => write!(f, "unsupported year: {year}"),
            Self::InvalidYearMonth(value) => {
                write!(f, "invalid year-month `{value}`; expected YYYY-MM")
            }
            Self::OutOfRange(date) => write!(f, "week containing {date} is out of range"),
        }
    }
}

impl Error for CalendarError {}
