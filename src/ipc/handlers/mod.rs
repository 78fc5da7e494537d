pub mod attendance;
pub mod backup_exchange;
pub mod core;
pub mod dashboard;
pub mod exports;
pub mod fees;
pub mod staff;
pub mod stubs;
pub mod students;
