pub mod calendar;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use calendar::Weekday;
pub use models::*;
pub use services::*;
