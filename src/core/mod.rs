pub mod attendance;
pub mod backup;
pub mod config;
pub mod forms;
pub mod incident;
pub mod log;
pub mod notify;
pub mod payroll;
pub mod people;
pub mod routes;
