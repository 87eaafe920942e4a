use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::{AttendanceStore, StoreResult, TimeWindow};
use crate::error::StoreError;
use crate::model::{
    attendance::AttendanceLog,
    break_log::{BreakLog, NewBreak},
    employee::{Employee, EmployeeChanges, NewEmployee},
    role::Role,
};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceLog>,
    breaks: Vec<BreakLog>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_open_break(&self, attendance_id: u64) -> bool {
        self.breaks
            .iter()
            .any(|b| b.attendance_id == attendance_id && b.is_open())
    }
}

/// Store used by tests. Mirrors the unique keys of `schema.sql`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.tables.lock().unwrap().employees.clone())
    }

    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let t = self.tables.lock().unwrap();
        Ok(t.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_employee_by_qr(&self, qr_id: &str) -> StoreResult<Option<Employee>> {
        let t = self.tables.lock().unwrap();
        Ok(t.employees.iter().find(|e| e.qr_id == qr_id).cloned())
    }

    async fn list_admins_with_otp(&self) -> StoreResult<Vec<Employee>> {
        let t = self.tables.lock().unwrap();
        Ok(t.employees
            .iter()
            .filter(|e| e.role == Role::Admin && e.otp_hash.is_some())
            .cloned()
            .collect())
    }

    async fn insert_employee(&self, new: NewEmployee) -> StoreResult<Employee> {
        let mut t = self.tables.lock().unwrap();
        if t.employees.iter().any(|e| e.qr_id == new.qr_id) {
            return Err(StoreError::Duplicate);
        }
        let employee = Employee {
            id: t.next_id(),
            name: new.name,
            qr_id: new.qr_id,
            hourly_wage: new.hourly_wage,
            role: new.role,
            start_time: new.start_time,
            otp_hash: new.otp_hash,
            created_at: Utc::now(),
        };
        t.employees.push(employee.clone());
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: u64,
        changes: EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        let mut t = self.tables.lock().unwrap();
        if let Some(qr) = &changes.qr_id {
            if t.employees.iter().any(|e| e.id != id && &e.qr_id == qr) {
                return Err(StoreError::Duplicate);
            }
        }
        let Some(e) = t.employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name {
            e.name = v;
        }
        if let Some(v) = changes.qr_id {
            e.qr_id = v;
        }
        if let Some(v) = changes.hourly_wage {
            e.hourly_wage = v;
        }
        if let Some(v) = changes.role {
            e.role = v;
        }
        if let Some(v) = changes.start_time {
            e.start_time = v;
        }
        if let Some(v) = changes.otp_hash {
            e.otp_hash = Some(v);
        }
        Ok(Some(e.clone()))
    }

    async fn delete_employee(&self, id: u64) -> StoreResult<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.employees.len();
        t.employees.retain(|e| e.id != id);
        Ok(t.employees.len() < before)
    }

    async fn find_attendance(&self, id: u64) -> StoreResult<Option<AttendanceLog>> {
        let t = self.tables.lock().unwrap();
        Ok(t.attendance.iter().find(|a| a.id == id).cloned())
    }

    async fn find_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Option<AttendanceLog>> {
        Ok(self
            .list_attendance_in_window(employee_id, window)
            .await?
            .into_iter()
            .next())
    }

    async fn list_attendance_in_window(
        &self,
        employee_id: u64,
        window: TimeWindow,
    ) -> StoreResult<Vec<AttendanceLog>> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<_> = t
            .attendance
            .iter()
            .filter(|a| a.employee_id == employee_id && window.contains(a.clock_in))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.clock_in, a.id));
        Ok(rows)
    }

    async fn find_open_attendance(&self, employee_id: u64) -> StoreResult<Option<AttendanceLog>> {
        let t = self.tables.lock().unwrap();
        Ok(t.attendance
            .iter()
            .filter(|a| a.employee_id == employee_id && a.is_open())
            .max_by_key(|a| (a.created_at, a.id))
            .cloned())
    }

    async fn insert_attendance(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
    ) -> StoreResult<AttendanceLog> {
        let mut t = self.tables.lock().unwrap();
        if t
            .attendance
            .iter()
            .any(|a| a.employee_id == employee_id && a.work_date == work_date)
        {
            return Err(StoreError::Duplicate);
        }
        let log = AttendanceLog {
            id: t.next_id(),
            employee_id,
            clock_in,
            clock_out: None,
            work_date,
            created_at: clock_in,
        };
        t.attendance.push(log.clone());
        Ok(log)
    }

    async fn set_clock_out(&self, id: u64, clock_out: DateTime<Utc>) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(a) = t.attendance.iter_mut().find(|a| a.id == id) {
            a.clock_out = Some(clock_out);
        }
        Ok(())
    }

    async fn update_attendance_times(
        &self,
        id: u64,
        work_date: NaiveDate,
        clock_in: DateTime<Utc>,
        clock_out: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        let Some(owner) = t.attendance.iter().find(|a| a.id == id).map(|a| a.employee_id) else {
            return Ok(());
        };
        if t
            .attendance
            .iter()
            .any(|a| a.id != id && a.employee_id == owner && a.work_date == work_date)
        {
            return Err(StoreError::Duplicate);
        }
        if let Some(a) = t.attendance.iter_mut().find(|a| a.id == id) {
            a.work_date = work_date;
            a.clock_in = clock_in;
            a.clock_out = clock_out;
        }
        Ok(())
    }

    async fn list_breaks(&self, attendance_id: u64) -> StoreResult<Vec<BreakLog>> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<_> = t
            .breaks
            .iter()
            .filter(|b| b.attendance_id == attendance_id)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.break_start, b.id));
        Ok(rows)
    }

    async fn find_open_break(&self, attendance_id: u64) -> StoreResult<Option<BreakLog>> {
        let t = self.tables.lock().unwrap();
        Ok(t.breaks
            .iter()
            .filter(|b| b.attendance_id == attendance_id && b.is_open())
            .max_by_key(|b| (b.break_start, b.id))
            .cloned())
    }

    async fn insert_break(&self, attendance_id: u64, new: NewBreak) -> StoreResult<BreakLog> {
        let mut t = self.tables.lock().unwrap();
        if new.break_end.is_none() && t.has_open_break(attendance_id) {
            return Err(StoreError::Duplicate);
        }
        let row = BreakLog {
            id: t.next_id(),
            attendance_id,
            break_type: new.break_type,
            break_start: new.break_start,
            break_end: new.break_end,
            created_at: new.break_start,
        };
        t.breaks.push(row.clone());
        Ok(row)
    }

    async fn set_break_end(&self, id: u64, break_end: DateTime<Utc>) -> StoreResult<()> {
        let mut t = self.tables.lock().unwrap();
        if let Some(b) = t.breaks.iter_mut().find(|b| b.id == id) {
            b.break_end = Some(break_end);
        }
        Ok(())
    }

    async fn replace_breaks(
        &self,
        attendance_id: u64,
        breaks: Vec<NewBreak>,
    ) -> StoreResult<Vec<BreakLog>> {
        if breaks.iter().filter(|b| b.break_end.is_none()).count() > 1 {
            return Err(StoreError::Duplicate);
        }
        {
            let mut t = self.tables.lock().unwrap();
            t.breaks.retain(|b| b.attendance_id != attendance_id);
            for new in breaks {
                let row = BreakLog {
                    id: t.next_id(),
                    attendance_id,
                    break_type: new.break_type,
                    break_start: new.break_start,
                    break_end: new.break_end,
                    created_at: new.break_start,
                };
                t.breaks.push(row);
            }
        }
        self.list_breaks(attendance_id).await
    }

    async fn delete_break(&self, attendance_id: u64, break_id: u64) -> StoreResult<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.breaks.len();
        t.breaks
            .retain(|b| !(b.id == break_id && b.attendance_id == attendance_id));
        Ok(t.breaks.len() < before)
    }
}
