use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::AttendanceError;
use crate::store::TimeWindow;

/// The single fixed-offset zone that defines a "reporting day".
///
/// Clock-in uniqueness, the daily roster, report date labels and lateness all
/// use this zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingZone {
    offset: FixedOffset,
}

impl ReportingZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    #[cfg(test)]
    pub fn utc() -> Self {
        use chrono::Offset;
        Self::new(Utc.fix())
    }

    /// Reporting-day date an instant belongs to.
    pub fn local_date(&self, t: DateTime<Utc>) -> NaiveDate {
        t.with_timezone(&self.offset).date_naive()
    }

    /// UTC instant of a local wall-clock time on `date`.
    pub fn instant(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        // A fixed offset has no gaps or folds, so the mapping is unique.
        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(time)))
    }

    pub fn start_of(&self, date: NaiveDate) -> DateTime<Utc> {
        self.instant(date, NaiveTime::MIN)
    }

    /// `[start of date, start of the next day)` in UTC.
    pub fn day_window(&self, date: NaiveDate) -> TimeWindow {
        self.range_window(date, date)
    }

    /// `[start of first, start of the day after last)` in UTC.
    pub fn range_window(&self, first: NaiveDate, last: NaiveDate) -> TimeWindow {
        let after_last = last.checked_add_days(Days::new(1)).unwrap_or(last);
        TimeWindow {
            start: self.start_of(first),
            end: self.start_of(after_last),
        }
    }
}

/// Parses an `HH:MM` schedule.
pub fn parse_schedule(start_time: &str) -> Result<NaiveTime, AttendanceError> {
    NaiveTime::parse_from_str(start_time.trim(), "%H:%M").map_err(|_| {
        AttendanceError::validation(format!(
            "invalid start_time '{start_time}', use HH:MM"
        ))
    })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, AttendanceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AttendanceError::validation(format!("invalid date '{value}', use YYYY-MM-DD"))
    })
}
