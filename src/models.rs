use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct AdminLoginReq {
    #[schema(example = "482913")]
    pub otp: String,
}

#[derive(Deserialize, ToSchema)]
pub struct QrReq {
    #[schema(example = "QR-0001")]
    pub qr_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Employee id of the admin
    pub sub: u64,
    pub name: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub jti: String,
}
