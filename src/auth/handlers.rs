use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::jwt::generate_access_token,
    config::Config,
    engine::{AttendanceEngine, staff::EmployeeIdentity},
    error::AttendanceError,
    models::AdminLoginReq,
};

#[derive(Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub access_token: String,
    pub user: EmployeeIdentity,
}

/// Admin login with a one-time password
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginReq,
    responses(
        (status = 200, description = "Logged in", body = AdminLoginResponse),
        (status = 400, description = "OTP missing"),
        (status = 401, description = "Invalid OTP or not an admin")
    ),
    tag = "Auth"
)]
#[instrument(name = "admin_login", skip_all)]
pub async fn admin_login(
    body: web::Json<AdminLoginReq>,
    engine: web::Data<AttendanceEngine>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AttendanceError> {
    if body.otp.trim().is_empty() {
        return Err(AttendanceError::validation("OTP is required"));
    }

    let Some(admin) = engine.authenticate_admin(&body.otp).await? else {
        info!("Invalid OTP or not an admin");
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid OTP or not an admin"
        })));
    };

    let access_token = match generate_access_token(
        &admin,
        &config.jwt_secret,
        &config.jwt_issuer,
        config.access_token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, employee_id = admin.id, "Failed to sign access token");
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to generate access token"
            })));
        }
    };

    info!(employee_id = admin.id, "Admin login successful");
    Ok(HttpResponse::Ok().json(AdminLoginResponse {
        access_token,
        user: EmployeeIdentity::from(&admin),
    }))
}
