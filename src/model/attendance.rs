use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One shift. `clock_out == None` means the shift is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceLog {
    pub id: u64,
    pub employee_id: u64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    /// Reporting-day date of `clock_in`; unique per employee.
    pub work_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl AttendanceLog {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}
