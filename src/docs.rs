use crate::api::attendance::{EndBreakReq, StartBreakReq};
use crate::auth::handlers::AdminLoginResponse;
use crate::engine::correction::{AttendanceCorrection, AttendanceWithBreaks, ReplaceBreaks};
use crate::engine::daily::{BreakEntry, DailyAttendance, DailyStatus};
use crate::engine::report::{BreakSummary, DayReport, EmployeeReport, ReportTotals};
use crate::engine::shift::{
    BreakEndReceipt, BreakStartReceipt, ClockInReceipt, ClockOutReceipt, CurrentBreak,
    EmployeeStatus, ShiftStatus,
};
use crate::engine::staff::{CreateEmployee, EmployeeIdentity, UpdateEmployee};
use crate::model::attendance::AttendanceLog;
use crate::model::break_log::{BreakLog, NewBreak};
use crate::model::employee::Employee;
use crate::model::role::Role;
use crate::models::{AdminLoginReq, QrReq};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "QR Attendance API",
        version = "1.0.0",
        description = r#"
## QR Attendance

Backend for a QR-code kiosk that records when employees start and end their
shift and their breaks, plus an admin surface for corrections and reports.

### 🔹 Key Features
- **Kiosk**
  - QR login, clock-in/out, break start/end, current status
- **Employee Management**
  - Create, update, list, view and delete employees
- **Correction**
  - Fix clock times, replace/add/delete breaks
- **Reports**
  - Daily roster and per-employee hours, lateness and wage

### 🔐 Security
Kiosk endpoints are public and rate limited. Admin endpoints require a
**JWT Bearer** token obtained from `/api/admin/login` with an OTP.

### 📦 Response Format
- JSON responses, errors as `{"error": "..."}`
- Times are UTC; dates are reporting days

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::admin_login,

        crate::api::attendance::employee_login,
        crate::api::attendance::employee_status,
        crate::api::attendance::employee_status_by_id,
        crate::api::attendance::today_attendance,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::start_break,
        crate::api::attendance::end_break,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::report::employee_reports,
        crate::api::report::daily_attendance,

        crate::api::correction::update_attendance,
        crate::api::correction::replace_breaks,
        crate::api::correction::add_break,
        crate::api::correction::delete_break
    ),
    components(
        schemas(
            AdminLoginReq,
            AdminLoginResponse,
            QrReq,
            StartBreakReq,
            EndBreakReq,
            Role,
            Employee,
            EmployeeIdentity,
            CreateEmployee,
            UpdateEmployee,
            AttendanceLog,
            BreakLog,
            NewBreak,
            ClockInReceipt,
            ClockOutReceipt,
            BreakStartReceipt,
            BreakEndReceipt,
            ShiftStatus,
            CurrentBreak,
            EmployeeStatus,
            AttendanceWithBreaks,
            AttendanceCorrection,
            ReplaceBreaks,
            BreakSummary,
            DayReport,
            ReportTotals,
            EmployeeReport,
            DailyStatus,
            BreakEntry,
            DailyAttendance
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Admin login"),
        (name = "Attendance", description = "Kiosk clock and break APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Correction", description = "Attendance correction APIs"),
        (name = "Report", description = "Roster and wage report APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
