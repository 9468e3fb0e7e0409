pub mod attendance;
pub mod form;
pub mod incident;
pub mod organization;
pub mod profile;
pub mod route;
pub mod visit;
pub mod weekday;
