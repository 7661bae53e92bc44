#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use secrecy::SecretString;
use tokio::sync::RwLock;

use quizweb_server::{
    app_state::AppState,
    auth::JwtService,
    config::Config,
    errors::{AppError, AppResult},
    mailer::Mailer,
    models::domain::{Quiz, QuizResult, User},
    repositories::{QuizRepository, ResultRepository, UserRepository},
};

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quizweb-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8000,
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 1,
        frontend_url: "http://localhost:5173".to_string(),
        mail: None,
        production: false,
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_directly(&self, user: User) -> User {
        let mut users = self.users.write().await;
        let id = user.id.expect("test user should have an id");
        users.insert(id, user.clone());
        user
    }

    pub async fn get(&self, id: &ObjectId) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists("User already exists".to_string()));
        }

        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn set_verification_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.verification_token = Some(token.to_string());
        user.verification_token_expiry = Some(BsonDateTime::from_chrono(expires_at));
        Ok(())
    }

    async fn consume_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        // Single write-lock pass: check and clear cannot interleave
        let mut users = self.users.write().await;
        let now = BsonDateTime::from_chrono(now);

        let matched = users.values_mut().find(|u| {
            u.verification_token.as_deref() == Some(token)
                && u.verification_token_expiry.map(|e| e > now).unwrap_or(false)
        });

        Ok(matched.map(|user| {
            user.is_verified = true;
            user.verification_token = None;
            user.verification_token_expiry = None;
            user.clone()
        }))
    }

    async fn set_reset_token(
        &self,
        id: &ObjectId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.reset_password_token = Some(token.to_string());
        user.reset_password_expiry = Some(BsonDateTime::from_chrono(expires_at));
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        let now = BsonDateTime::from_chrono(now);

        let matched = users.values_mut().find(|u| {
            u.reset_password_token.as_deref() == Some(token)
                && u.reset_password_expiry.map(|e| e > now).unwrap_or(false)
        });

        Ok(matched.map(|user| {
            user.password = new_password_hash.to_string();
            user.reset_password_token = None;
            user.reset_password_expiry = None;
            user.clone()
        }))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<ObjectId, Quiz>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let id = quiz
            .id
            .ok_or_else(|| AppError::InternalError("Quiz is missing an id".to_string()))?;
        quizzes.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| quizzes.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn find_by_creator(&self, user_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.created_by == *user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn replace(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let id = quiz
            .id
            .ok_or_else(|| AppError::InternalError("Quiz is missing an id".to_string()))?;

        if !quizzes.contains_key(&id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        quizzes.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.remove(id).is_none() {
            return Err(AppError::NotFound("Quiz doesn't exist!".to_string()));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryResultRepository {
    results: RwLock<Vec<QuizResult>>,
}

impl InMemoryResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<QuizResult> {
        self.results.read().await.clone()
    }
}

#[async_trait]
impl ResultRepository for InMemoryResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        let mut results = self.results.write().await;
        results.push(result.clone());
        Ok(result)
    }

    async fn count_for_user_and_quiz(&self, user: &ObjectId, quiz: &ObjectId) -> AppResult<u64> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .filter(|r| r.user == *user && r.quiz == *quiz)
            .count() as u64)
    }

    async fn find_page_for_user(
        &self,
        user: &ObjectId,
        skip: u64,
        limit: i64,
    ) -> AppResult<(Vec<QuizResult>, u64)> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results.iter().filter(|r| r.user == *user).cloned().collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let total = items.len() as u64;
        let start = (skip as usize).min(items.len());
        let end = (start + limit.max(0) as usize).min(items.len());

        Ok((items[start..end].to_vec(), total))
    }

    async fn find_all_for_user(&self, user: &ObjectId) -> AppResult<Vec<QuizResult>> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results.iter().filter(|r| r.user == *user).cloned().collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(items)
    }

    async fn find_by_id_for_user(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<QuizResult>> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .find(|r| r.id == Some(*id) && r.user == *user)
            .cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct TestEnv {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub results: Arc<InMemoryResultRepository>,
}

pub fn test_env() -> TestEnv {
    let config = test_config();
    let users = Arc::new(InMemoryUserRepository::new());
    let quizzes = Arc::new(InMemoryQuizRepository::new());
    let results = Arc::new(InMemoryResultRepository::new());

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let mailer = Arc::new(Mailer::disabled(&config.frontend_url));

    let state = AppState::from_parts(
        users.clone(),
        quizzes.clone(),
        results.clone(),
        jwt_service,
        mailer,
        config,
    );

    TestEnv {
        state,
        users,
        quizzes,
        results,
    }
}
