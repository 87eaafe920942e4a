use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One break inside a shift. `break_end == None` means the break is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BreakLog {
    pub id: u64,
    pub attendance_id: u64,
    #[schema(example = "lunch")]
    pub break_type: String,
    pub break_start: DateTime<Utc>,
    pub break_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BreakLog {
    pub fn is_open(&self) -> bool {
        self.break_end.is_none()
    }

    /// Whole minutes between start and end, `None` while the break is open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.break_end
            .map(|end| (end - self.break_start).num_minutes())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct NewBreak {
    #[schema(example = "lunch")]
    pub break_type: String,
    #[serde(alias = "start")]
    pub break_start: DateTime<Utc>,
    #[serde(alias = "end", default)]
    pub break_end: Option<DateTime<Utc>>,
}
