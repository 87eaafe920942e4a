use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::AttendanceEngine;
use crate::error::AttendanceError;
use crate::model::{
    attendance::AttendanceLog,
    break_log::{BreakLog, NewBreak},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AttendanceCorrection {
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceBreaks {
    pub breaks: Vec<NewBreak>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceWithBreaks {
    pub attendance: AttendanceLog,
    pub breaks: Vec<BreakLog>,
}

fn check_break(b: &NewBreak) -> Result<NewBreak, AttendanceError> {
    let break_type = b.break_type.trim();
    if break_type.is_empty() {
        return Err(AttendanceError::validation("break_type is required"));
    }
    if b.break_end.is_some_and(|end| end < b.break_start) {
        return Err(AttendanceError::validation("break end precedes its start"));
    }
    Ok(NewBreak {
        break_type: break_type.to_string(),
        break_start: b.break_start,
        break_end: b.break_end,
    })
}

impl AttendanceEngine {
    async fn require_attendance(&self, id: u64) -> Result<AttendanceLog, AttendanceError> {
        self.store
            .find_attendance(id)
            .await?
            .ok_or(AttendanceError::AttendanceNotFound)
    }

    /// Overwrites clock-in and/or clock-out of a shift.
    pub async fn correct_attendance(
        &self,
        attendance_id: u64,
        correction: AttendanceCorrection,
    ) -> Result<AttendanceLog, AttendanceError> {
        let current = self.require_attendance(attendance_id).await?;

        let clock_in = correction.clock_in.unwrap_or(current.clock_in);
        let clock_out = correction.clock_out.or(current.clock_out);
        if clock_out.is_some_and(|out| out < clock_in) {
            return Err(AttendanceError::validation("clock_out precedes clock_in"));
        }

        let work_date = self.zone.local_date(clock_in);
        self.store
            .update_attendance_times(attendance_id, work_date, clock_in, clock_out)
            .await?;

        info!(attendance_id, "Attendance corrected");
        self.require_attendance(attendance_id).await
    }

    pub async fn replace_breaks(
        &self,
        attendance_id: u64,
        request: ReplaceBreaks,
    ) -> Result<Vec<BreakLog>, AttendanceError> {
        self.require_attendance(attendance_id).await?;

        let breaks = request
            .breaks
            .iter()
            .map(check_break)
            .collect::<Result<Vec<_>, _>>()?;
        if breaks.iter().filter(|b| b.break_end.is_none()).count() > 1 {
            return Err(AttendanceError::validation("at most one break may be open"));
        }

        let rows = self.store.replace_breaks(attendance_id, breaks).await?;
        info!(attendance_id, count = rows.len(), "Breaks replaced");
        Ok(rows)
    }

    pub async fn add_break(
        &self,
        attendance_id: u64,
        new: NewBreak,
    ) -> Result<BreakLog, AttendanceError> {
        self.require_attendance(attendance_id).await?;
        let row = self.store.insert_break(attendance_id, check_break(&new)?).await?;
        info!(attendance_id, break_id = row.id, "Break added");
        Ok(row)
    }

    pub async fn delete_break(
        &self,
        attendance_id: u64,
        break_id: u64,
    ) -> Result<(), AttendanceError> {
        self.require_attendance(attendance_id).await?;
        if !self.store.delete_break(attendance_id, break_id).await? {
            return Err(AttendanceError::BreakNotFound);
        }
        info!(attendance_id, break_id, "Break deleted");
        Ok(())
    }

    /// Today's shift for an employee, whatever its state.
    pub async fn today_attendance(
        &self,
        employee_id: u64,
    ) -> Result<Option<AttendanceWithBreaks>, AttendanceError> {
        let employee = self.require_employee(employee_id).await?;
        let today = self.today();

        let Some(attendance) = self
            .store
            .find_attendance_in_window(employee.id, self.zone.day_window(today))
            .await?
        else {
            return Ok(None);
        };
        let breaks = self.store.list_breaks(attendance.id).await?;
        Ok(Some(AttendanceWithBreaks { attendance, breaks }))
    }
}
