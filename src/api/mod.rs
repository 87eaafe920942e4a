pub mod attendance;
pub mod correction;
pub mod employee;
pub mod report;
