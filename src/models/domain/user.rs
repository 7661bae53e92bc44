use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A registered account as stored in the `users` collection.
///
/// `password` only ever holds an argon2 PHC hash. The verification and
/// reset token fields each hold at most one outstanding value and are
/// cleared atomically when consumed.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expiry: Option<DateTime>,
    pub reset_password_token: Option<String>,
    pub reset_password_expiry: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str) -> Self {
        User {
            id: Some(ObjectId::new()),
            name: name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            role: UserRole::User,
            is_verified: false,
            verification_token: None,
            verification_token_expiry: None,
            reset_password_token: None,
            reset_password_expiry: None,
            created_at: Some(DateTime::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(email: &str) -> Self {
        User::new("Test User", email, "$argon2id$test-hash")
    }

    pub fn test_admin(email: &str) -> Self {
        let mut user = User::test_user(email);
        user.role = UserRole::Admin;
        user.is_verified = true;
        user
    }
}
