use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::role::Role;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Kim Minji",
        "qr_id": "QR-0001",
        "hourly_wage": 10000,
        "role": "employee",
        "start_time": "09:00",
        "created_at": "2025-03-01T00:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Kim Minji")]
    pub name: String,

    #[schema(example = "QR-0001")]
    pub qr_id: String,

    /// Integer currency units per hour.
    #[schema(example = 10000)]
    pub hourly_wage: i64,

    #[sqlx(try_from = "String")]
    pub role: Role,

    /// Scheduled daily start, `HH:MM` in the reporting zone.
    #[schema(example = "09:00")]
    pub start_time: String,

    #[serde(skip)]
    pub otp_hash: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Fields for a new roster entry, already validated.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub qr_id: String,
    pub hourly_wage: i64,
    pub role: Role,
    pub start_time: String,
    pub otp_hash: Option<String>,
}

/// Partial roster update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub qr_id: Option<String>,
    pub hourly_wage: Option<i64>,
    pub role: Option<Role>,
    pub start_time: Option<String>,
    pub otp_hash: Option<String>,
}
