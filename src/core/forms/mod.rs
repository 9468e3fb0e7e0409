pub mod render;
pub mod submission;
pub mod validator;

pub use render::{Widget, render_form, widget_for};
pub use submission::{FormLogic, VisitLogic};
pub use validator::{ValidationErrors, validate, validate_field};
