use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    AttendanceEngine,
    report::{minutes_to_hours, summarize_breaks, worked_minutes},
};
use crate::error::AttendanceError;
use crate::model::{attendance::AttendanceLog, break_log::BreakLog, employee::Employee};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DailyStatus {
    Absent,
    Present,
    OnBreak,
    Working,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakEntry {
    pub id: u64,
    pub break_type: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyAttendance {
    pub employee_id: u64,
    pub employee: String,
    pub attendance_id: Option<u64>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
    /// Worked hours; measured to now while the shift is open.
    pub total_hours: f64,
    pub breaks: Vec<BreakEntry>,
    /// Hours of ended breaks.
    pub break_time: f64,
    pub is_on_break: bool,
    pub status: DailyStatus,
}

impl DailyAttendance {
    fn absent(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id,
            employee: employee.name.clone(),
            attendance_id: None,
            clock_in: None,
            clock_out: None,
            total_hours: 0.0,
            breaks: Vec::new(),
            break_time: 0.0,
            is_on_break: false,
            status: DailyStatus::Absent,
        }
    }
}

/// Live view of one employee's shift. An open shift is measured to `now`.
pub fn project_shift(
    employee: &Employee,
    shift: &AttendanceLog,
    breaks: &[BreakLog],
    now: DateTime<Utc>,
) -> DailyAttendance {
    let totals = summarize_breaks(breaks);
    let is_on_break = totals.open_breaks > 0;

    let until = shift.clock_out.unwrap_or(now);
    let work_minutes = worked_minutes(shift.clock_in, until, totals.total_minutes);

    let status = match (shift.clock_out, is_on_break) {
        (Some(_), _) => DailyStatus::Present,
        (None, true) => DailyStatus::OnBreak,
        (None, false) => DailyStatus::Working,
    };

    DailyAttendance {
        employee_id: employee.id,
        employee: employee.name.clone(),
        attendance_id: Some(shift.id),
        clock_in: Some(shift.clock_in),
        clock_out: shift.clock_out,
        total_hours: minutes_to_hours(work_minutes),
        breaks: breaks
            .iter()
            .map(|b| BreakEntry {
                id: b.id,
                break_type: b.break_type.clone(),
                start: b.break_start,
                end: b.break_end,
                duration_minutes: b.duration_minutes(),
            })
            .collect(),
        break_time: minutes_to_hours(totals.total_minutes),
        is_on_break,
        status,
    }
}

impl AttendanceEngine {
    /// One row per employee for `date` (reporting day).
    pub async fn daily_attendance(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DailyAttendance>, AttendanceError> {
        let window = self.zone.day_window(date);
        let now = self.now();
        let employees = self.store.list_employees().await?;

        let mut rows = Vec::with_capacity(employees.len());
        for employee in &employees {
            let Some(shift) = self
                .store
                .find_attendance_in_window(employee.id, window)
                .await?
            else {
                rows.push(DailyAttendance::absent(employee));
                continue;
            };
            let breaks = self.store.list_breaks(shift.id).await?;
            rows.push(project_shift(employee, &shift, &breaks, now));
        }
        Ok(rows)
    }
}
