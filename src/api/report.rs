use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::engine::{AttendanceEngine, calendar::parse_date};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Employee ID
    pub employee_id: u64,
    /// First reporting day, `YYYY-MM-DD`
    pub start_date: String,
    /// Last reporting day (inclusive), `YYYY-MM-DD`
    pub end_date: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyQuery {
    /// Reporting day, `YYYY-MM-DD`; today when omitted
    pub date: Option<String>,
}

/// Per-day hours, breaks, lateness and wage for one employee
#[utoipa::path(
    get,
    path = "/api/employee/reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report for the date range", body = crate::engine::report::EmployeeReport),
        (status = 400, description = "Malformed date or start after end"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_reports(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let start = parse_date(&query.start_date)?;
    let end = parse_date(&query.end_date)?;
    let report = engine.employee_report(query.employee_id, start, end).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Daily roster: one row per employee
#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    params(DailyQuery),
    responses(
        (status = 200, description = "Roster for the day", body = [crate::engine::daily::DailyAttendance]),
        (status = 400, description = "Malformed date")
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn daily_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    query: web::Query<DailyQuery>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => engine.today(),
    };
    let rows = engine.daily_attendance(date).await?;
    Ok(HttpResponse::Ok().json(rows))
}
