use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::debug;

use super::{AttendanceStore, StoreResult, TimeWindow};
use crate::error::StoreError;
use crate::model::{
    attendance::AttendanceLog,
    break_log::{BreakLog, NewBreak},
    employee::{Employee, EmployeeChanges, NewEmployee},
};

const EMPLOYEE_COLUMNS: &str =
    "id, name, qr_id, hourly_wage, role, start_time, otp_hash, created_at";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, clock_in, clock_out, work_date, created_at";
const BREAK_COLUMNS: &str =
    "id, attendance_id, break_type, break_start, break_end, created_at";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_break(&self, id: u64) -> StoreResult<BreakLog> {
        let sql = format!("SELECT {BREAK_COLUMNS} FROM break_logs WHERE id = ?");
        Ok(sqlx::query_as::<_, BreakLog>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_employee_by_qr(&self, qr_id: &str) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE qr_id = ?");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(qr_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_admins_with_otp(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE role = 'admin' AND otp_hash IS NOT NULL"
        );
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_employee(&self, new: NewEmployee) -> StoreResult<Employee> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, qr_id, hourly_wage, role, start_time, otp_hash)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.qr_id)
        .bind(new.hourly_wage)
        .bind(new.role.as_ref())
        .bind(&new.start_time)
        .bind(&new.otp_hash)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        debug!(employee_id = id, "Employee row inserted");
        self.find_employee(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        if self.find_employee(id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE employees
            SET name = COALESCE(?, name),
                qr_id = COALESCE(?, qr_id),
                hourly_wage = COALESCE(?, hourly_wage),
                role = COALESCE(?, role),
                start_time = COALESCE(?, start_time),
                otp_hash = COALESCE(?, otp_hash)
            WHERE id = ?
            "#,
        )
        .bind(changes.name)
        .bind(changes.qr_id)
        .bind(changes.hourly_wage)
        .bind(changes.role.map(|r| r.as_ref().to_string()))
        .bind(changes.start_time)
        .bind(changes.otp_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_employee(id).await
    }

    async fn delete_employee(&self, id: u64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_attendance(&self, id: u64) -> StoreResult<Option<AttendanceLog>> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance_logs WHERE id = ?");
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Option<AttendanceLog>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_logs \
             WHERE employee_id = ? AND clock_in >= ? AND clock_in < ? \
             ORDER BY clock_in, id LIMIT 1"
        );
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(employee_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Vec<AttendanceLog>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_logs \
             WHERE employee_id = ? AND clock_in >= ? AND clock_in < ? \
             ORDER BY clock_in, id"
        );
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(employee_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_open_attendance(&self, employee_id: u64) -> StoreResult<Option<AttendanceLog>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance_logs \
             WHERE employee_id = ? AND clock_out IS NULL \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        Ok(sqlx::query_as::<_, AttendanceLog>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_attendance(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
    ) -> StoreResult<AttendanceLog> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_logs (employee_id, clock_in, work_date, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(clock_in)
        .bind(work_date)
        .bind(clock_in)
        .execute(&self.pool)
        .await?;

        self.find_attendance(result.last_insert_id())
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn set_clock_out(&self, id: u64, clock_out: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE attendance_logs SET clock_out = ? WHERE id = ?")
            .bind(clock_out)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_attendance_times(
        &self,
        id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
        clock_out: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE attendance_logs SET clock_in = ?, clock_out = ?, work_date = ? WHERE id = ?",
        )
        .bind(clock_in)
        .bind(clock_out)
        .bind(work_date)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_breaks(&self, attendance_id: u64) -> StoreResult<Vec<BreakLog>> {
        let sql = format!(
            "SELECT {BREAK_COLUMNS} FROM break_logs WHERE attendance_id = ? ORDER BY break_start, id"
        );
        Ok(sqlx::query_as::<_, BreakLog>(&sql)
            .bind(attendance_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_open_break(&self, attendance_id: u64) -> StoreResult<Option<BreakLog>> {
        let sql = format!(
            "SELECT {BREAK_COLUMNS} FROM break_logs \
             WHERE attendance_id = ? AND break_end IS NULL \
             ORDER BY break_start DESC, id DESC LIMIT 1"
        );
        Ok(sqlx::query_as::<_, BreakLog>(&sql)
            .bind(attendance_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_break(&self, attendance_id: u64, new: NewBreak) -> StoreResult<BreakLog> {
        let result = sqlx::query(
            r#"
            INSERT INTO break_logs (attendance_id, break_type, break_start, break_end)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(attendance_id)
        .bind(&new.break_type)
        .bind(new.break_start)
        .bind(new.break_end)
        .execute(&self.pool)
        .await?;

        self.fetch_break(result.last_insert_id()).await
    }

    async fn set_break_end(&self, id: u64, break_end: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query("UPDATE break_logs SET break_end = ? WHERE id = ?")
            .bind(break_end)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_breaks(
        &self,
        attendance_id: u64,
        breaks: Vec<NewBreak>,
    ) -> StoreResult<Vec<BreakLog>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM break_logs WHERE attendance_id = ?")
            .bind(attendance_id)
            .execute(&mut *tx)
            .await?;

        for b in &breaks {
            sqlx::query(
                r#"
                INSERT INTO break_logs (attendance_id, break_type, break_start, break_end)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(attendance_id)
            .bind(&b.break_type)
            .bind(b.break_start)
            .bind(b.break_end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(attendance_id, count = breaks.len(), "Breaks replaced");

        self.list_breaks(attendance_id).await
    }

    async fn delete_break(&self, attendance_id: u64, break_id: u64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM break_logs WHERE id = ? AND attendance_id = ?")
            .bind(break_id)
            .bind(attendance_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
