use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime as BsonDateTime},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{Database, USERS_COLLECTION},
    errors::{AppError, AppResult},
    models::domain::User,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;
    /// Overwrites any outstanding verification token, invalidating it.
    async fn set_verification_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;
    /// Atomic check-and-clear: matches an unexpired token, flips
    /// `is_verified`, clears the token fields, and returns the updated
    /// user, all in one store operation, so two racing verify calls
    /// cannot both succeed.
    async fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;
    async fn set_reset_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;
    /// Atomic check-and-clear for the reset flow: matches an unexpired
    /// token, swaps in the new password hash, clears token + expiry.
    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(USERS_COLLECTION);
        Self { collection }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::AlreadyExists("User already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(user)
    }

    async fn set_verification_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": {
                    "verification_token": token,
                    "verification_token_expiry": BsonDateTime::from_chrono(expires_at),
                } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let filter = doc! {
            "verification_token": token,
            "verification_token_expiry": { "$gt": BsonDateTime::from_chrono(now) },
        };
        let update = doc! { "$set": {
            "is_verified": true,
            "verification_token": Bson::Null,
            "verification_token_expiry": Bson::Null,
        } };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let user = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;

        Ok(user)
    }

    async fn set_reset_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": {
                    "reset_password_token": token,
                    "reset_password_expiry": BsonDateTime::from_chrono(expires_at),
                } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let filter = doc! {
            "reset_password_token": token,
            "reset_password_expiry": { "$gt": BsonDateTime::from_chrono(now) },
        };
        let update = doc! { "$set": {
            "password": new_password_hash,
            "reset_password_token": Bson::Null,
            "reset_password_expiry": Bson::Null,
        } };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let user = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?;

        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on users.email");

        Ok(())
    }
}
