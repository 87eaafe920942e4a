//! Attendance rules and derived-time computation.
//!
//! Every operation reads current state from the store, checks the transition
//! and writes at most one row (bulk break replacement excepted). "Open shift"
//! and "open break" are always derived from the store, never cached here.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::store::AttendanceStore;

pub mod calendar;
pub mod correction;
pub mod daily;
pub mod report;
pub mod shift;
pub mod staff;

use calendar::ReportingZone;

/// Source of "now" for the engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone)]
pub struct AttendanceEngine {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    zone: ReportingZone,
}

impl AttendanceEngine {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
        zone: ReportingZone,
    ) -> Self {
        Self { store, clock, zone }
    }

    /// Current reporting day.
    pub fn today(&self) -> NaiveDate {
        self.zone.local_date(self.now())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
