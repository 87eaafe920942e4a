pub mod attendance;
pub mod break_log;
pub mod employee;
pub mod role;
