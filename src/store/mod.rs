//! Persistence seam for the attendance engine.
//!
//! The engine only talks to [`AttendanceStore`]; `mysql` is the production
//! backend and `memory` backs the unit tests. Both enforce the same two
//! uniqueness backstops: one shift per employee per `work_date`, and one open
//! break per shift. A violation surfaces as [`StoreError::Duplicate`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::StoreError;
use crate::model::{
    attendance::AttendanceLog,
    break_log::{BreakLog, NewBreak},
    employee::{Employee, EmployeeChanges, NewEmployee},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub type StoreResult<T> = Result<T, StoreError>;

/// Half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    #[cfg(test)]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    // ---- employees ----
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>>;
    async fn find_employee_by_qr(&self, qr_id: &str) -> StoreResult<Option<Employee>>;
    /// Admins that currently hold an OTP hash.
    async fn list_admins_with_otp(&self) -> StoreResult<Vec<Employee>>;
    async fn insert_employee(&self, new: NewEmployee) -> StoreResult<Employee>;
    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<Employee>>;
    /// Returns `false` when no row matched.
    async fn delete_employee(&self, id: u64) -> StoreResult<bool>;

    // ---- shifts ----
    async fn find_attendance(&self, id: u64) -> StoreResult<Option<AttendanceLog>>;
    /// First shift whose clock-in falls inside `window`.
    async fn find_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Option<AttendanceLog>>;
    /// All shifts whose clock-in falls inside `window`, oldest first.
    async fn list_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Vec<AttendanceLog>>;
    /// Most recent shift without a clock-out (highest `created_at`, then id).
    async fn find_open_attendance(&self, employee_id: u64) -> StoreResult<Option<AttendanceLog>>;
    async fn insert_attendance(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
    ) -> StoreResult<AttendanceLog>;
    async fn set_clock_out(&self, id: u64, clock_out: DateTime<Utc>) -> StoreResult<()>;
    /// Overwrites both timestamps and the derived `work_date`.
    async fn update_attendance_times(
        &self,
        id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
        clock_out: Option<DateTime<Utc>>,
    ) -> StoreResult<()>;

    // ---- breaks ----
    async fn list_breaks(&self, attendance_id: u64) -> StoreResult<Vec<BreakLog>>;
    /// Open break with the latest start (then highest id).
    async fn find_open_break(&self, attendance_id: u64) -> StoreResult<Option<BreakLog>>;
    async fn insert_break(&self, attendance_id: u64, new: NewBreak) -> StoreResult<BreakLog>;
    async fn set_break_end(&self, id: u64, break_end: DateTime<Utc>) -> StoreResult<()>;
    /// Deletes every break of the shift and inserts `breaks`, atomically.
    async fn replace_breaks(
        &self,
        attendance_id: u64,
        breaks: Vec<NewBreak>,
    ) -> StoreResult<Vec<BreakLog>>;
    /// Returns `false` when the break does not belong to the shift.
    async fn delete_break(&self, attendance_id: u64, break_id: u64) -> StoreResult<bool>;
}
