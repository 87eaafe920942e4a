use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::{AttendanceEngine, calendar::parse_schedule};
use crate::auth::otp::{hash_otp, verify_otp};
use crate::error::AttendanceError;
use crate::model::{
    employee::{Employee, EmployeeChanges, NewEmployee},
    role::Role,
};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Kim Minji")]
    pub name: String,
    #[schema(example = "QR-0001")]
    pub qr_id: String,
    #[schema(example = 10000)]
    pub hourly_wage: i64,
    pub role: Role,
    #[schema(example = "09:00")]
    pub start_time: String,
    /// One-time password for admin login; stored hashed.
    #[serde(default)]
    pub otp: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub qr_id: Option<String>,
    pub hourly_wage: Option<i64>,
    pub role: Option<Role>,
    #[schema(example = "09:30")]
    pub start_time: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeIdentity {
    pub id: u64,
    pub name: String,
    pub role: Role,
}

impl From<&Employee> for EmployeeIdentity {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            role: e.role,
        }
    }
}

fn required(field: &str, value: &str) -> Result<String, AttendanceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AttendanceError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn check_wage(wage: i64) -> Result<i64, AttendanceError> {
    if wage <= 0 {
        return Err(AttendanceError::validation("hourly_wage must be positive"));
    }
    Ok(wage)
}

fn check_schedule(start_time: &str) -> Result<String, AttendanceError> {
    parse_schedule(start_time).map(|t| t.format("%H:%M").to_string())
}

fn otp_hash(otp: Option<&str>) -> Result<Option<String>, AttendanceError> {
    match otp.map(str::trim) {
        None => Ok(None),
        Some("") => Err(AttendanceError::validation("otp must not be blank")),
        Some(otp) => hash_otp(otp)
            .map(Some)
            .map_err(|_| AttendanceError::validation("otp could not be hashed")),
    }
}

impl AttendanceEngine {
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AttendanceError> {
        Ok(self.store.list_employees().await?)
    }

    pub async fn get_employee(&self, id: u64) -> Result<Employee, AttendanceError> {
        self.require_employee(id).await
    }

    pub async fn create_employee(
        &self,
        input: CreateEmployee,
    ) -> Result<Employee, AttendanceError> {
        let new = NewEmployee {
            name: required("name", &input.name)?,
            qr_id: required("qr_id", &input.qr_id)?,
            hourly_wage: check_wage(input.hourly_wage)?,
            role: input.role,
            start_time: check_schedule(&input.start_time)?,
            otp_hash: otp_hash(input.otp.as_deref())?,
        };

        let employee = self.store.insert_employee(new).await?;
        info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: u64,
        input: UpdateEmployee,
    ) -> Result<Employee, AttendanceError> {
        let changes = EmployeeChanges {
            name: input.name.as_deref().map(|v| required("name", v)).transpose()?,
            qr_id: input.qr_id.as_deref().map(|v| required("qr_id", v)).transpose()?,
            hourly_wage: input.hourly_wage.map(check_wage).transpose()?,
            role: input.role,
            start_time: input.start_time.as_deref().map(check_schedule).transpose()?,
            otp_hash: otp_hash(input.otp.as_deref())?,
        };

        let employee = self
            .store
            .update_employee(id, changes)
            .await?
            .ok_or(AttendanceError::EmployeeNotFound)?;
        info!(employee_id = id, "Employee updated");
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: u64) -> Result<(), AttendanceError> {
        if !self.store.delete_employee(id).await? {
            return Err(AttendanceError::EmployeeNotFound);
        }
        info!(employee_id = id, "Employee deleted");
        Ok(())
    }

    /// QR scan login for the kiosk.
    pub async fn employee_login(&self, qr_id: &str) -> Result<EmployeeIdentity, AttendanceError> {
        self.store
            .find_employee_by_qr(qr_id.trim())
            .await?
            .map(|e| EmployeeIdentity::from(&e))
            .ok_or(AttendanceError::EmployeeNotFound)
    }

    /// The admin whose OTP matches, if any.
    pub async fn authenticate_admin(&self, otp: &str) -> Result<Option<Employee>, AttendanceError> {
        let otp = otp.trim();
        if otp.is_empty() {
            return Ok(None);
        }
        for admin in self.store.list_admins_with_otp().await? {
            let Some(hash) = admin.otp_hash.as_deref() else {
                continue;
            };
            match verify_otp(otp, hash) {
                Ok(true) => return Ok(Some(admin)),
                Ok(false) => {}
                Err(e) => warn!(employee_id = admin.id, error = %e, "Stored OTP hash unreadable"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{fixture, utc};

    fn input(qr_id: &str, role: Role, otp: Option<&str>) -> CreateEmployee {
        CreateEmployee {
            name: "Park Jisoo".into(),
            qr_id: qr_id.into(),
            hourly_wage: 12000,
            role,
            start_time: "8:30".into(),
            otp: otp.map(Into::into),
        }
    }

    #[actix_web::test]
    async fn create_normalizes_and_hashes() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let e = fx
            .engine
            .create_employee(input("QR-9", Role::Admin, Some("123456")))
            .await
            .unwrap();
        assert_eq!(e.start_time, "08:30");
        let hash = e.otp_hash.clone().unwrap();
        assert_ne!(hash, "123456");

        let found = fx.engine.authenticate_admin("123456").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(e.id));
        assert!(fx.engine.authenticate_admin("654321").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn create_validates_fields() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));

        let mut bad = input("QR-1", Role::Employee, None);
        bad.hourly_wage = 0;
        assert!(matches!(
            fx.engine.create_employee(bad).await,
            Err(AttendanceError::Validation(_))
        ));

        let mut bad = input("QR-1", Role::Employee, None);
        bad.start_time = "nine".into();
        assert!(matches!(
            fx.engine.create_employee(bad).await,
            Err(AttendanceError::Validation(_))
        ));

        let mut bad = input(" ", Role::Employee, None);
        bad.name = "x".into();
        assert!(matches!(
            fx.engine.create_employee(bad).await,
            Err(AttendanceError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn duplicate_qr_conflicts() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        fx.engine.create_employee(input("QR-1", Role::Employee, None)).await.unwrap();
        assert!(matches!(
            fx.engine.create_employee(input("QR-1", Role::Employee, None)).await,
            Err(AttendanceError::Duplicate)
        ));
    }

    #[actix_web::test]
    async fn update_delete_and_login() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        let e = fx
            .engine
            .create_employee(input("QR-1", Role::Employee, None))
            .await
            .unwrap();

        let updated = fx
            .engine
            .update_employee(
                e.id,
                UpdateEmployee {
                    hourly_wage: Some(15000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.hourly_wage, 15000);
        assert_eq!(updated.name, "Park Jisoo");

        let who = fx.engine.employee_login("QR-1").await.unwrap();
        assert_eq!(who.id, e.id);
        assert_eq!(who.role, Role::Employee);

        fx.engine.delete_employee(e.id).await.unwrap();
        assert!(matches!(
            fx.engine.delete_employee(e.id).await,
            Err(AttendanceError::EmployeeNotFound)
        ));
        assert!(matches!(
            fx.engine.update_employee(e.id, UpdateEmployee::default()).await,
            Err(AttendanceError::EmployeeNotFound)
        ));
    }

    #[actix_web::test]
    async fn employee_without_admin_role_cannot_log_in() {
        let fx = fixture(utc(2025, 3, 3, 9, 0));
        fx.engine
            .create_employee(input("QR-1", Role::Employee, Some("111111")))
            .await
            .unwrap();
        assert!(fx.engine.authenticate_admin("111111").await.unwrap().is_none());
    }
}
