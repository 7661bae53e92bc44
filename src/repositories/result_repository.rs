use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::{
    db::{Database, RESULTS_COLLECTION},
    errors::AppResult,
    models::domain::QuizResult,
};

/// Append-only attempt ledger. There is deliberately no update or delete
/// here, and no unique index involving `attempt`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn count_for_user_and_quiz(&self, user: &ObjectId, quiz: &ObjectId) -> AppResult<u64>;
    /// Page of a user's results, most recent first, plus the total count.
    async fn find_page_for_user(
        &self,
        user: &ObjectId,
        skip: u64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, u64)>;
    async fn find_all_for_user(&self, user: &ObjectId) -> AppResult<Vec<QuizResult>>;
    async fn find_by_id_for_user(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<QuizResult>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(RESULTS_COLLECTION);
        Self { collection }
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn count_for_user_and_quiz(&self, user: &ObjectId, quiz: &ObjectId) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "user": *user, "quiz": *quiz })
            .await?;
        Ok(count)
    }

    async fn find_page_for_user(
        &self,
        user: &ObjectId,
        skip: u64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, u64)> {
        let filter = doc! { "user": *user };

        let total = self.collection.count_documents(filter.clone()).await?;

        let results = self
            .collection
            .find(filter)
            .sort(doc! { "completed_at": -1 })
            .skip(skip)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((results, total))
    }

    async fn find_all_for_user(&self, user: &ObjectId) -> AppResult<Vec<QuizResult>> {
        let results = self
            .collection
            .find(doc! { "user": *user })
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }

    async fn find_by_id_for_user(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<QuizResult>> {
        let result = self
            .collection
            .find_one(doc! { "_id": *id, "user": *user })
            .await?;
        Ok(result)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let history_index = IndexModel::builder()
            .keys(doc! { "user": 1, "completed_at": -1 })
            .build();

        let attempt_count_index = IndexModel::builder()
            .keys(doc! { "user": 1, "quiz": 1 })
            .build();

        self.collection.create_index(history_index).await?;
        self.collection.create_index(attempt_count_index).await?;
        log::info!("Created indexes on results collection");

        Ok(())
    }
}
