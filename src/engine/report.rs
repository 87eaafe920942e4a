use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use super::{AttendanceEngine, calendar::ReportingZone, calendar::parse_schedule};
use crate::error::AttendanceError;
use crate::model::{attendance::AttendanceLog, break_log::BreakLog};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakSummary {
    #[schema(example = "lunch")]
    pub break_type: String,
    pub duration_minutes: i64,
    pub count: u32,
}

/// Ended-break totals for one shift. Open breaks are counted in
/// `open_breaks` but contribute no minutes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakTotals {
    pub total_minutes: i64,
    pub by_type: Vec<BreakSummary>,
    pub open_breaks: usize,
}

pub fn summarize_breaks(breaks: &[BreakLog]) -> BreakTotals {
    let mut by_type: BTreeMap<&str, (i64, u32)> = BTreeMap::new();
    let mut totals = BreakTotals::default();

    for b in breaks {
        let Some(minutes) = b.duration_minutes() else {
            totals.open_breaks += 1;
            continue;
        };
        let entry = by_type.entry(b.break_type.as_str()).or_default();
        entry.0 += minutes;
        entry.1 += 1;
        totals.total_minutes += minutes;
    }

    totals.by_type = by_type
        .into_iter()
        .map(|(break_type, (duration_minutes, count))| BreakSummary {
            break_type: break_type.to_string(),
            duration_minutes,
            count,
        })
        .collect();
    totals
}

/// Minutes between `clock_in` and `until`, minus breaks, never below zero.
pub fn worked_minutes(clock_in: DateTime<Utc>, until: DateTime<Utc>, break_minutes: i64) -> i64 {
    ((until - clock_in).num_minutes() - break_minutes).max(0)
}

pub fn late_minutes(clock_in: DateTime<Utc>, scheduled_start: DateTime<Utc>) -> i64 {
    (clock_in - scheduled_start).num_minutes().max(0)
}

pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / 60.0
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayReport {
    pub attendance_id: u64,
    pub date: NaiveDate,
    pub clock_in: DateTime<Utc>,
    pub clock_out: DateTime<Utc>,
    pub breaks: Vec<BreakSummary>,
    pub total_worked_hours: f64,
    pub total_break_hours: f64,
    pub total_hours: f64,
    pub hourly_wage: i64,
    pub total_wage: f64,
    pub late_minutes: i64,
    pub is_late: bool,
}

/// Aggregates one shift. Returns `None` for an open shift.
pub fn day_report(
    shift: &AttendanceLog,
    breaks: &[BreakLog],
    schedule: NaiveTime,
    hourly_wage: i64,
    zone: ReportingZone,
) -> Option<DayReport> {
    let clock_out = shift.clock_out?;
    let date = zone.local_date(shift.clock_in);

    let totals = summarize_breaks(breaks);
    let work_minutes = worked_minutes(shift.clock_in, clock_out, totals.total_minutes);

    let work_hours = minutes_to_hours(work_minutes);
    let break_hours = minutes_to_hours(totals.total_minutes);
    let late = late_minutes(shift.clock_in, zone.instant(date, schedule));

    Some(DayReport {
        attendance_id: shift.id,
        date,
        clock_in: shift.clock_in,
        clock_out,
        breaks: totals.by_type,
        total_worked_hours: work_hours,
        total_break_hours: break_hours,
        total_hours: work_hours + break_hours,
        hourly_wage,
        total_wage: work_hours * hourly_wage as f64,
        late_minutes: late,
        is_late: late > 0,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ReportTotals {
    pub days: usize,
    pub total_worked_hours: f64,
    pub total_break_hours: f64,
    pub total_hours: f64,
    pub total_wage: f64,
    pub late_days: usize,
    pub late_minutes: i64,
}

impl ReportTotals {
    fn from_days(days: &[DayReport]) -> Self {
        days.iter().fold(Self::default(), |mut acc, d| {
            acc.days += 1;
            acc.total_worked_hours += d.total_worked_hours;
            acc.total_break_hours += d.total_break_hours;
            acc.total_hours += d.total_hours;
            acc.total_wage += d.total_wage;
            acc.late_minutes += d.late_minutes;
            if d.is_late {
                acc.late_days += 1;
            }
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeReport {
    pub employee_id: u64,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DayReport>,
    pub totals: ReportTotals,
}

impl AttendanceEngine {
    /// Closed shifts whose clock-in falls between `start_date` and `end_date`
    /// (inclusive, reporting days).
    pub async fn employee_report(
        &self,
        employee_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<EmployeeReport, AttendanceError> {
        if start_date > end_date {
            return Err(AttendanceError::validation(
                "start_date must not be after end_date",
            ));
        }

        let employee = self.require_employee(employee_id).await?;
        let schedule = parse_schedule(&employee.start_time)?;

        let shifts = self
            .store
            .list_attendance_in_window(employee.id, self.zone.range_window(start_date, end_date))
            .await?;

        let mut days = Vec::with_capacity(shifts.len());
        for shift in shifts.iter().filter(|s| !s.is_open()) {
            let breaks = self.store.list_breaks(shift.id).await?;
            days.extend(day_report(shift, &breaks, schedule, employee.hourly_wage, self.zone));
        }

        debug!(
            employee_id,
            shifts = shifts.len(),
            reported = days.len(),
            "Employee report built"
        );

        Ok(EmployeeReport {
            employee_id: employee.id,
            employee_name: employee.name,
            start_date,
            end_date,
            totals: ReportTotals::from_days(&days),
            days,
        })
    }
}
