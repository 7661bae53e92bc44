use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::User,
    repositories::UserRepository,
};

/// Ordered gate in front of protected operations: authenticate (done by
/// the extractor), then resolve the account, then verification, then
/// role/ownership. Each step short-circuits, so ownership checks never
/// run for an unauthenticated or unverified identity.
pub struct AccessGuard {
    users: Arc<dyn UserRepository>,
}

impl AccessGuard {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Map validated claims back to a live account. The token outlives
    /// nothing: a deleted account answers 401 like a missing one.
    pub async fn resolve_user(&self, claims: &Claims) -> AppResult<User> {
        let id = ObjectId::parse_str(&claims.sub).map_err(|_| {
            AppError::Unauthorized("Invalid token. Please login again!".to_string())
        })?;

        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("User not found. Please login again!".to_string())
            })
    }

}

pub fn ensure_verified(user: &User) -> AppResult<()> {
    if !user.is_verified {
        return Err(AppError::UnverifiedEmail(
            "Please verify your email address before creating or participating in quizzes"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_admin(user: &User) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "You are not authorized to access this resource".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_owner_or_admin(user: &User, resource_owner: &ObjectId) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    if user.id.as_ref() == Some(resource_owner) {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You don't have permission to modify this resource".to_string(),
    ))
}
