use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::engine::AttendanceEngine;
use crate::error::AttendanceError;
use crate::models::QrReq;

#[derive(Deserialize, IntoParams)]
pub struct EmployeeIdQuery {
    /// Employee ID from the scanned QR login
    pub employee_id: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct StartBreakReq {
    #[schema(example = 12)]
    pub attendance_id: u64,
    #[schema(example = "lunch")]
    pub break_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct EndBreakReq {
    #[schema(example = 12)]
    pub attendance_id: u64,
}

/// Kiosk login by QR identifier
#[utoipa::path(
    post,
    path = "/api/employee/login",
    request_body = QrReq,
    responses(
        (status = 200, description = "Employee found", body = crate::engine::staff::EmployeeIdentity),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_login(
    engine: web::Data<AttendanceEngine>,
    body: web::Json<QrReq>,
) -> Result<HttpResponse, AttendanceError> {
    let identity = engine.employee_login(&body.qr_id).await?;
    Ok(HttpResponse::Ok().json(identity))
}

/// Current status for a scanned QR identifier
#[utoipa::path(
    post,
    path = "/api/employee/status",
    request_body = QrReq,
    responses(
        (status = 200, description = "Current status", body = crate::engine::shift::EmployeeStatus),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_status(
    engine: web::Data<AttendanceEngine>,
    body: web::Json<QrReq>,
) -> Result<HttpResponse, AttendanceError> {
    let status = engine.status_by_qr(&body.qr_id).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Current status by employee ID
#[utoipa::path(
    get,
    path = "/api/employee/{id}/status",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Current status", body = crate::engine::shift::EmployeeStatus),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn employee_status_by_id(
    engine: web::Data<AttendanceEngine>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AttendanceError> {
    let status = engine.status(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Today's attendance (open or closed) with its breaks
#[utoipa::path(
    get,
    path = "/api/employee/status/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Today's attendance, null fields when none", body = crate::engine::correction::AttendanceWithBreaks),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn today_attendance(
    engine: web::Data<AttendanceEngine>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AttendanceError> {
    match engine.today_attendance(path.into_inner()).await? {
        Some(today) => Ok(HttpResponse::Ok().json(today)),
        None => Ok(HttpResponse::Ok().json(json!({
            "attendance": null,
            "breaks": null
        }))),
    }
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/employee/clock-in",
    params(EmployeeIdQuery),
    responses(
        (status = 201, description = "Clock-in successful", body = crate::engine::shift::ClockInReceipt),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already clocked in today", body = Object, example = json!({
            "error": "You have already clocked in today"
        }))
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    engine: web::Data<AttendanceEngine>,
    query: web::Query<EmployeeIdQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let receipt = engine.clock_in(query.employee_id).await?;
    Ok(HttpResponse::Created().json(receipt))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/employee/clock-out",
    params(EmployeeIdQuery),
    responses(
        (status = 200, description = "Clock-out successful", body = crate::engine::shift::ClockOutReceipt),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "No open shift, or a break is still open")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    engine: web::Data<AttendanceEngine>,
    query: web::Query<EmployeeIdQuery>,
) -> Result<HttpResponse, AttendanceError> {
    let receipt = engine.clock_out(query.employee_id).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[utoipa::path(
    post,
    path = "/api/employee/break/start",
    request_body = StartBreakReq,
    responses(
        (status = 201, description = "Break started", body = crate::engine::shift::BreakStartReceipt),
        (status = 404, description = "Attendance log not found"),
        (status = 409, description = "A break is already open or the shift is closed")
    ),
    tag = "Attendance"
)]
pub async fn start_break(
    engine: web::Data<AttendanceEngine>,
    body: web::Json<StartBreakReq>,
) -> Result<HttpResponse, AttendanceError> {
    let receipt = engine.start_break(body.attendance_id, &body.break_type).await?;
    Ok(HttpResponse::Created().json(receipt))
}

#[utoipa::path(
    post,
    path = "/api/employee/break/end",
    request_body = EndBreakReq,
    responses(
        (status = 200, description = "Break ended", body = crate::engine::shift::BreakEndReceipt),
        (status = 409, description = "No active break found")
    ),
    tag = "Attendance"
)]
pub async fn end_break(
    engine: web::Data<AttendanceEngine>,
    body: web::Json<EndBreakReq>,
) -> Result<HttpResponse, AttendanceError> {
    let receipt = engine.end_break(body.attendance_id).await?;
    Ok(HttpResponse::Ok().json(receipt))
}
