use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::auth::auth::AuthUser;
use crate::engine::{
    AttendanceEngine,
    correction::{AttendanceCorrection, ReplaceBreaks},
};
use crate::model::break_log::NewBreak;

/// Correct clock-in and/or clock-out of a shift
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance log ID")
    ),
    request_body = AttendanceCorrection,
    responses(
        (status = 200, description = "Corrected attendance log", body = crate::model::attendance::AttendanceLog),
        (status = 400, description = "Clock-out precedes clock-in"),
        (status = 404, description = "Attendance record not found"),
        (status = 409, description = "Employee already has a shift on that day")
    ),
    tag = "Correction",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_attendance(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    path: web::Path<u64>,
    body: web::Json<AttendanceCorrection>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let row = engine
        .correct_attendance(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(row))
}

/// Replace every break of a shift
#[utoipa::path(
    put,
    path = "/api/attendance/{id}/breaks",
    params(
        ("id", Path, description = "Attendance log ID")
    ),
    request_body = ReplaceBreaks,
    responses(
        (status = 200, description = "New break set", body = [crate::model::break_log::BreakLog]),
        (status = 400, description = "Invalid break"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Correction",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn replace_breaks(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    path: web::Path<u64>,
    body: web::Json<ReplaceBreaks>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let rows = engine
        .replace_breaks(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// Add one break to a shift
#[utoipa::path(
    post,
    path = "/api/attendance/{id}/breaks",
    params(
        ("id", Path, description = "Attendance log ID")
    ),
    request_body = NewBreak,
    responses(
        (status = 201, description = "Break added", body = crate::model::break_log::BreakLog),
        (status = 400, description = "Invalid break"),
        (status = 404, description = "Attendance record not found"),
        (status = 409, description = "Shift already has an open break")
    ),
    tag = "Correction",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_break(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    path: web::Path<u64>,
    body: web::Json<NewBreak>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let row = engine.add_break(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

/// Delete one break
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}/breaks/{break_id}",
    params(
        ("id", Path, description = "Attendance log ID"),
        ("break_id", Path, description = "Break ID")
    ),
    responses(
        (status = 200, description = "Break deleted", body = Object, example = json!({
            "message": "Break deleted"
        })),
        (status = 404, description = "Attendance record or break not found")
    ),
    tag = "Correction",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_break(
    auth: AuthUser,
    engine: web::Data<AttendanceEngine>,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<HttpResponse> {
    auth.require_admin()?;

    let (attendance_id, break_id) = path.into_inner();
    engine.delete_break(attendance_id, break_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Break deleted"
    })))
}
