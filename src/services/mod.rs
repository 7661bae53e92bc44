pub mod performance;
pub mod quiz_service;
pub mod result_service;
pub mod scoring;
pub mod user_service;

use mongodb::bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Path ids arrive as hex strings; a malformed id reads the same as a
/// missing resource.
pub(crate) fn parse_object_id(id: &str, not_found_msg: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::NotFound(not_found_msg.to_string()))
}
