use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::AttendanceEngine;
use crate::error::{AttendanceError, StoreError};
use crate::model::{break_log::NewBreak, employee::Employee};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClockInReceipt {
    pub attendance_id: u64,
    pub clock_in: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClockOutReceipt {
    pub attendance_id: u64,
    pub clock_out: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakStartReceipt {
    pub break_id: u64,
    pub break_start: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakEndReceipt {
    pub break_id: u64,
    pub break_end: DateTime<Utc>,
}

/// What the employee can do next. A closed shift reads as `NotClockedIn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    NotClockedIn,
    Working,
    OnBreak,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentBreak {
    pub id: u64,
    pub break_type: String,
    pub break_start: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeStatus {
    pub employee_id: u64,
    pub employee_name: String,
    pub status: ShiftStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_attendance_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock_in_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_break: Option<CurrentBreak>,
}

impl AttendanceEngine {
    pub(crate) async fn require_employee(
        &self,
        employee_id: u64,
    ) -> Result<Employee, AttendanceError> {
        self.store
            .find_employee(employee_id)
            .await?
            .ok_or(AttendanceError::EmployeeNotFound)
    }

    pub async fn clock_in(&self, employee_id: u64) -> Result<ClockInReceipt, AttendanceError> {
        let employee = self.require_employee(employee_id).await?;
        let now = self.now();
        let today = self.zone.local_date(now);

        if let Some(existing) = self
            .store
            .find_attendance_in_window(employee.id, self.zone.day_window(today))
            .await?
        {
            warn!(employee_id, attendance_id = existing.id, "Already clocked in today");
            return Err(AttendanceError::AlreadyClockedIn);
        }

        let log = self
            .store
            .insert_attendance(employee.id, today, now)
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent clock-in
                StoreError::Duplicate => AttendanceError::AlreadyClockedIn,
                other => other.into(),
            })?;

        info!(employee_id, attendance_id = log.id, "Clock-in successful");
        Ok(ClockInReceipt {
            attendance_id: log.id,
            clock_in: log.clock_in,
        })
    }

    pub async fn clock_out(&self, employee_id: u64) -> Result<ClockOutReceipt, AttendanceError> {
        let employee = self.require_employee(employee_id).await?;

        let Some(shift) = self.store.find_open_attendance(employee.id).await? else {
            warn!(employee_id, "Clock-out without an open shift");
            return Err(AttendanceError::NoOpenShift);
        };

        if self.store.find_open_break(shift.id).await?.is_some() {
            warn!(employee_id, attendance_id = shift.id, "Clock-out while on break");
            return Err(AttendanceError::BreakStillOpen);
        }

        let now = self.now();
        self.store.set_clock_out(shift.id, now).await?;

        info!(employee_id, attendance_id = shift.id, "Clock-out successful");
        Ok(ClockOutReceipt {
            attendance_id: shift.id,
            clock_out: now,
        })
    }

    pub async fn start_break(
        &self,
        attendance_id: u64,
        break_type: &str,
    ) -> Result<BreakStartReceipt, AttendanceError> {
        let break_type = break_type.trim();
        if break_type.is_empty() {
            return Err(AttendanceError::validation("break_type is required"));
        }

        let shift = self
            .store
            .find_attendance(attendance_id)
            .await?
            .ok_or(AttendanceError::AttendanceNotFound)?;
        if !shift.is_open() {
            return Err(AttendanceError::ShiftClosed);
        }

        if self.store.find_open_break(attendance_id).await?.is_some() {
            warn!(attendance_id, "Break already open");
            return Err(AttendanceError::BreakAlreadyOpen);
        }

        let new = NewBreak {
            break_type: break_type.to_string(),
            break_start: self.now(),
            break_end: None,
        };
        let row = self
            .store
            .insert_break(attendance_id, new)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => AttendanceError::BreakAlreadyOpen,
                other => other.into(),
            })?;

        info!(attendance_id, break_id = row.id, break_type, "Break started");
        Ok(BreakStartReceipt {
            break_id: row.id,
            break_start: row.break_start,
        })
    }

    pub async fn end_break(&self, attendance_id: u64) -> Result<BreakEndReceipt, AttendanceError> {
        let Some(open) = self.store.find_open_break(attendance_id).await? else {
            warn!(attendance_id, "No open break to end");
            return Err(AttendanceError::NoOpenBreak);
        };

        let now = self.now();
        self.store.set_break_end(open.id, now).await?;

        info!(attendance_id, break_id = open.id, "Break ended");
        Ok(BreakEndReceipt {
            break_id: open.id,
            break_end: now,
        })
    }

    pub async fn status(&self, employee_id: u64) -> Result<EmployeeStatus, AttendanceError> {
        let employee = self.require_employee(employee_id).await?;
        self.status_of(employee).await
    }

    pub async fn status_by_qr(&self, qr_id: &str) -> Result<EmployeeStatus, AttendanceError> {
        let employee = self
            .store
            .find_employee_by_qr(qr_id.trim())
            .await?
            .ok_or(AttendanceError::EmployeeNotFound)?;
        self.status_of(employee).await
    }

    /// A shift left open on an earlier day does not count as current.
    async fn status_of(&self, employee: Employee) -> Result<EmployeeStatus, AttendanceError> {
        let today = self.zone.day_window(self.today());
        let open_today = self
            .store
            .find_attendance_in_window(employee.id, today)
            .await?
            .filter(|s| s.is_open());
        let Some(shift) = open_today else {
            return Ok(EmployeeStatus {
                employee_id: employee.id,
                employee_name: employee.name,
                status: ShiftStatus::NotClockedIn,
                current_attendance_id: None,
                clock_in_time: None,
                current_break: None,
            });
        };

        let current_break = self
            .store
            .find_open_break(shift.id)
            .await?
            .map(|b| CurrentBreak {
                id: b.id,
                break_type: b.break_type,
                break_start: b.break_start,
            });

        let status = if current_break.is_some() {
            ShiftStatus::OnBreak
        } else {
            ShiftStatus::Working
        };

        Ok(EmployeeStatus {
            employee_id: employee.id,
            employee_name: employee.name,
            status,
            current_attendance_id: Some(shift.id),
            clock_in_time: Some(shift.clock_in),
            current_break,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::engine::calendar::ReportingZone;
    use crate::engine::testing::{add_employee, fixture, fixture_in, utc};
    use crate::error::ErrorKind;
    use crate::store::AttendanceStore;

    #[actix_web::test]
    async fn clock_in_creates_open_shift_at_request_time() {
        let fx = fixture(utc(2025, 3, 3, 9, 15));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        let receipt = fx.engine.clock_in(emp.id).await.unwrap();
        assert_eq!(receipt.clock_in, utc(2025, 3, 3, 9, 15));

        let stored = fx.store.find_attendance(receipt.attendance_id).await.unwrap().unwrap();
        assert!(stored.is_open());
        assert_eq!(stored.employee_id, emp.id);
    }

    #[actix_web::test]
    async fn second_clock_in_same_day_conflicts_even_after_clock_out() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        fx.engine.clock_in(emp.id).await.unwrap();
        fx.clock.advance(Duration::hours(8));
        fx.engine.clock_out(emp.id).await.unwrap();
        fx.clock.advance(Duration::hours(1));

        let err = fx.engine.clock_in(emp.id).await.unwrap_err();
        assert!(matches!(err, AttendanceError::AlreadyClockedIn));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[actix_web::test]
    async fn clock_in_next_day_is_allowed() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        fx.engine.clock_in(emp.id).await.unwrap();
        fx.engine.clock_out(emp.id).await.unwrap();
        fx.clock.set(utc(2025, 3, 4, 9, 0));
        assert!(fx.engine.clock_in(emp.id).await.is_ok());
    }

    #[actix_web::test]
    async fn reporting_day_follows_configured_offset() {
        // 23:30 UTC on the 3rd and 01:00 UTC on the 4th are both the 4th in +09:00
        let zone = ReportingZone::from_offset_minutes(540).unwrap();
        let fx = fixture_in(utc(2025, 3, 3, 23, 30), zone);
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        fx.engine.clock_in(emp.id).await.unwrap();
        fx.engine.clock_out(emp.id).await.unwrap();
        fx.clock.set(utc(2025, 3, 4, 1, 0));
        assert!(matches!(
            fx.engine.clock_in(emp.id).await,
            Err(AttendanceError::AlreadyClockedIn)
        ));
    }

    #[actix_web::test]
    async fn clock_in_unknown_employee_is_not_found() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let err = fx.engine.clock_in(42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[actix_web::test]
    async fn clock_out_requires_open_shift() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        assert!(matches!(
            fx.engine.clock_out(emp.id).await,
            Err(AttendanceError::NoOpenShift)
        ));
    }

    #[actix_web::test]
    async fn clock_out_blocked_by_open_break_until_it_ends() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;
        let shift = fx.engine.clock_in(emp.id).await.unwrap();

        fx.clock.advance(Duration::hours(3));
        fx.engine.start_break(shift.attendance_id, "lunch").await.unwrap();

        let err = fx.engine.clock_out(emp.id).await.unwrap_err();
        assert!(matches!(err, AttendanceError::BreakStillOpen));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        fx.clock.advance(Duration::minutes(30));
        fx.engine.end_break(shift.attendance_id).await.unwrap();
        fx.clock.advance(Duration::hours(5));

        let out = fx.engine.clock_out(emp.id).await.unwrap();
        assert_eq!(out.attendance_id, shift.attendance_id);
        assert_eq!(out.clock_out, utc(2025, 3, 3, 17, 30));
    }

    #[actix_web::test]
    async fn second_start_break_conflicts() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;
        let shift = fx.engine.clock_in(emp.id).await.unwrap();

        fx.engine.start_break(shift.attendance_id, "rest").await.unwrap();
        let err = fx
            .engine
            .start_break(shift.attendance_id, "lunch")
            .await
            .unwrap_err();
        assert!(matches!(err, AttendanceError::BreakAlreadyOpen));
        assert_eq!(fx.store.list_breaks(shift.attendance_id).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn start_break_checks_shift() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        assert!(matches!(
            fx.engine.start_break(999, "lunch").await,
            Err(AttendanceError::AttendanceNotFound)
        ));

        let shift = fx.engine.clock_in(emp.id).await.unwrap();
        assert!(matches!(
            fx.engine.start_break(shift.attendance_id, "  ").await,
            Err(AttendanceError::Validation(_))
        ));

        fx.engine.clock_out(emp.id).await.unwrap();
        assert!(matches!(
            fx.engine.start_break(shift.attendance_id, "lunch").await,
            Err(AttendanceError::ShiftClosed)
        ));
    }

    #[actix_web::test]
    async fn end_break_without_open_break_conflicts() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;
        let shift = fx.engine.clock_in(emp.id).await.unwrap();

        assert!(matches!(
            fx.engine.end_break(shift.attendance_id).await,
            Err(AttendanceError::NoOpenBreak)
        ));

        fx.engine.start_break(shift.attendance_id, "rest").await.unwrap();
        fx.clock.advance(Duration::minutes(10));
        let ended = fx.engine.end_break(shift.attendance_id).await.unwrap();
        assert_eq!(ended.break_end, utc(2025, 3, 3, 9, 10));

        // a second end is the same conflict, nothing else changes
        assert!(matches!(
            fx.engine.end_break(shift.attendance_id).await,
            Err(AttendanceError::NoOpenBreak)
        ));
    }

    #[actix_web::test]
    async fn status_follows_transitions() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;

        let s = fx.engine.status(emp.id).await.unwrap();
        assert_eq!(s.status, ShiftStatus::NotClockedIn);
        assert!(s.current_attendance_id.is_none());

        let shift = fx.engine.clock_in(emp.id).await.unwrap();
        let s = fx.engine.status_by_qr("QR-1").await.unwrap();
        assert_eq!(s.status, ShiftStatus::Working);
        assert_eq!(s.current_attendance_id, Some(shift.attendance_id));
        assert_eq!(s.clock_in_time, Some(shift.clock_in));

        fx.clock.advance(Duration::hours(2));
        let br = fx.engine.start_break(shift.attendance_id, "rest").await.unwrap();
        let s = fx.engine.status(emp.id).await.unwrap();
        assert_eq!(s.status, ShiftStatus::OnBreak);
        let current = s.current_break.unwrap();
        assert_eq!(current.id, br.break_id);
        assert_eq!(current.break_type, "rest");

        fx.engine.end_break(shift.attendance_id).await.unwrap();
        fx.engine.clock_out(emp.id).await.unwrap();
        let s = fx.engine.status(emp.id).await.unwrap();
        assert_eq!(s.status, ShiftStatus::NotClockedIn);
    }

    #[actix_web::test]
    async fn shift_left_open_yesterday_is_not_current() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let emp = add_employee(&fx.store, "QR-1", "09:00").await;
        fx.engine.clock_in(emp.id).await.unwrap();

        fx.clock.set(utc(2025, 3, 4, 9, 0));
        let s = fx.engine.status(emp.id).await.unwrap();
        assert_eq!(s.status, ShiftStatus::NotClockedIn);
        assert!(s.current_attendance_id.is_none());
        assert!(s.clock_in_time.is_none());

        // a fresh clock-in today becomes the current shift
        let today = fx.engine.clock_in(emp.id).await.unwrap();
        let s = fx.engine.status(emp.id).await.unwrap();
        assert_eq!(s.status, ShiftStatus::Working);
        assert_eq!(s.current_attendance_id, Some(today.attendance_id));
    }

    #[actix_web::test]
    async fn status_by_unknown_qr_is_not_found() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        assert!(matches!(
            fx.engine.status_by_qr("nope").await,
            Err(AttendanceError::EmployeeNotFound)
        ));
    }
}
