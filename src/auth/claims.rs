use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::User;

/// Session token payload: identity only. Role is deliberately not
/// embedded: authorization always reloads the user so a role change
/// takes effect without waiting out the token window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id, ObjectId hex)
    pub name: String,
    pub email: String,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        let subject = user
            .id
            .as_ref()
            .map(|oid| oid.to_hex())
            .unwrap_or_default();

        Self {
            sub: subject,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user = User::new("John Doe", "john@example.com", "hash");
        let claims = Claims::new(&user, 24);

        assert_eq!(claims.sub, user.id.unwrap().to_hex());
        assert_eq!(claims.name, "John Doe");
        assert_eq!(claims.email, "john@example.com");
        assert!(claims.exp > claims.iat);
    }
}
