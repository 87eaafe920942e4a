use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures raised by an [`AttendanceStore`](crate::store::AttendanceStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate record")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            // SQLSTATE 23000: integrity constraint violation
            if db_err.code().as_deref() == Some("23000") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Internal,
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Employee not found")]
    EmployeeNotFound,

    #[error("Attendance record not found")]
    AttendanceNotFound,

    #[error("Break not found")]
    BreakNotFound,

    #[error("You have already clocked in today")]
    AlreadyClockedIn,

    #[error("No active attendance log found")]
    NoOpenShift,

    #[error("You must end your break before clocking out")]
    BreakStillOpen,

    #[error("You must end your current break before starting a new one")]
    BreakAlreadyOpen,

    #[error("No active break found")]
    NoOpenBreak,

    #[error("Shift is already clocked out")]
    ShiftClosed,

    #[error("A conflicting record already exists")]
    Duplicate,

    #[error("{0}")]
    Validation(String),

    #[error("Storage failure")]
    Store(#[source] StoreError),
}

impl AttendanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AttendanceError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        use AttendanceError::*;
        match self {
            EmployeeNotFound | AttendanceNotFound | BreakNotFound => ErrorKind::NotFound,
            AlreadyClockedIn | NoOpenShift | BreakStillOpen | BreakAlreadyOpen | NoOpenBreak
            | ShiftClosed | Duplicate => ErrorKind::Conflict,
            Validation(_) => ErrorKind::Validation,
            Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AttendanceError::Duplicate,
            other => AttendanceError::Store(other),
        }
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AttendanceError::Store(e) = self {
            tracing::error!(error = %e, "Storage failure");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}
