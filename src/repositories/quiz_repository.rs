use async_trait::async_trait;
use futures::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::{
    db::{Database, QUIZES_COLLECTION},
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>>;
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    async fn find_by_creator(&self, user_id: &ObjectId) -> AppResult<Vec<Quiz>>;
    /// Full replacement: the question set is only ever swapped wholesale.
    async fn replace(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(QUIZES_COLLECTION);
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(quiz)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let quizzes = self
            .collection
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn find_by_creator(&self, user_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "created_by": *user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn replace(&self, quiz: Quiz) -> AppResult<Quiz> {
        let id = quiz
            .id
            .ok_or_else(|| AppError::InternalError("Quiz is missing an id".to_string()))?;

        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        Ok(quiz)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Quiz doesn't exist!".to_string()));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "created_by": 1 })
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created index on quizes.created_by");

        Ok(())
    }
}
