//! Week window resolution.
//!
//! # Responsibility
//! - Map a reference date to its Sunday-first week bounds and label.
//! - Offer navigation to neighbouring weeks for overlay UIs.
//!
//! # Invariants
//! - `start` is local 00:00:00.000 on Sunday; `end` is local 23:59:59.999 on
//!   the following Saturday.
//! - Resolving any date inside `[start, end]` yields an equal selection.

use crate::calendar::{CalendarError, CalendarResult};
use crate::expiry::calculator::resolve_local;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone};

const WEEK_LEN_DAYS: u64 = 7;
const LABEL_DATE_FORMAT: &str = "%m/%d";

/// Resolved 7-day window used to filter expirations.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSelection<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    label: String,
}

impl<Tz: TimeZone> WeekSelection<Tz> {
    /// Resolves the week that contains `date` in time zone `tz`.
    ///
    /// # Errors
    /// - `OutOfRange` when the week touches the edge of chrono's date range.
    pub fn for_date(date: NaiveDate, tz: &Tz) -> CalendarResult<Self> {
        let offset = u64::from(date.weekday().num_days_from_sunday());
        let start_date = date
            .checked_sub_days(Days::new(offset))
            .ok_or(CalendarError::OutOfRange(date))?;
        let end_date = start_date
            .checked_add_days(Days::new(WEEK_LEN_DAYS - 1))
            .ok_or(CalendarError::OutOfRange(date))?;
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or(CalendarError::OutOfRange(date))?;

        let start = resolve_local(tz, start_date.and_time(NaiveTime::MIN))
            .ok_or(CalendarError::OutOfRange(date))?;
        let end = resolve_local(tz, end_date.and_time(end_of_day))
            .ok_or(CalendarError::OutOfRange(date))?;
        let label = format!(
            "{} - {}",
            start_date.format(LABEL_DATE_FORMAT),
            end_date.format(LABEL_DATE_FORMAT)
        );
        Ok(Self { start, end, label })
    }

    /// First instant of the week, inclusive.
    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// Last instant of the week, inclusive.
    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Short `MM/DD - MM/DD` range label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Local date of the first day (always a Sunday).
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Local date of the last day (always a Saturday).
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Returns whether `instant` lies inside `[start, end]`.
    pub fn contains<Tz2: TimeZone>(&self, instant: &DateTime<Tz2>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// Returns whether the local `date` is one of the seven days.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// The seven local dates of the week, Sunday first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_date().iter_days().take(WEEK_LEN_DAYS as usize)
    }

    /// The following week.
    pub fn next(&self) -> CalendarResult<Self> {
        self.shifted(true)
    }

    /// The preceding week.
    pub fn previous(&self) -> CalendarResult<Self> {
        self.shifted(false)
    }

    fn shifted(&self, forward: bool) -> CalendarResult<Self> {
        let anchor = self.start_date();
        let step = Days::new(WEEK_LEN_DAYS);
        let target = if forward {
            anchor.checked_add_days(step)
        } else {
            anchor.checked_sub_days(step)
        }
        .ok_or(CalendarError::OutOfRange(anchor))?;
        Self::for_date(target, &self.start.timezone())
    }
}

/// Resolves the week containing `reference`, in the reference's own zone.
pub fn resolve_week<Tz: TimeZone>(reference: &DateTime<Tz>) -> CalendarResult<WeekSelection<Tz>> {
    WeekSelection::for_date(reference.date_naive(), &reference.timezone())
}

#[cfg(test)]
mod tests {
    use super::WeekSelection;
    use chrono::{Datelike, NaiveDate, Utc, Weekday};

    #[test]
    fn week_starting_on_reference_sunday_starts_there() {
        let sunday = NaiveDate::from_ymd_opt(2024, 7, 7).unwrap();
        let week = WeekSelection::for_date(sunday, &Utc).unwrap();
        assert_eq!(week.start_date(), sunday);
        assert_eq!(week.label(), "07/07 - 07/13");
    }

    #[test]
    fn dates_yield_seven_days_sunday_first() {
        let week =
            WeekSelection::for_date(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(), &Utc).unwrap();
        let dates = week.dates().collect::<Vec<_>>();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0].weekday(), Weekday::Sun);
        assert_eq!(dates[6].weekday(), Weekday::Sat);
        assert_eq!(dates[4], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
