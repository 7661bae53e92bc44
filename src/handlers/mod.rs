pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod result_handler;
