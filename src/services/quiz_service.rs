use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::guard,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizQuestion, User},
        dto::{request::SaveQuizRequest, response::QuizDto},
    },
    repositories::QuizRepository,
    services::parse_object_id,
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    pub async fn create(&self, user: &User, request: SaveQuizRequest) -> AppResult<QuizDto> {
        request.validate()?;

        let owner = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let quiz = Quiz::new(&request.title, questions_from(request.questions), owner);
        Ok(self.quizzes.create(quiz).await?.into())
    }

    /// Whole-quiz replacement. Ownership is checked against the stored
    /// quiz before the payload is even validated, so a non-owner learns
    /// nothing about what a valid update would look like.
    pub async fn update(
        &self,
        user: &User,
        id: &str,
        request: SaveQuizRequest,
    ) -> AppResult<QuizDto> {
        let oid = parse_object_id(id, "Quiz not found")?;

        let existing = self
            .quizzes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        guard::ensure_owner_or_admin(user, &existing.created_by)?;

        request.validate()?;

        let quiz = Quiz {
            id: existing.id,
            title: request.title,
            questions: questions_from(request.questions),
            created_by: existing.created_by,
            created_at: existing.created_at,
        };

        Ok(self.quizzes.replace(quiz).await?.into())
    }

    pub async fn delete(&self, user: &User, id: &str) -> AppResult<()> {
        let oid = parse_object_id(id, "Quiz doesn't exist!")?;

        let existing = self
            .quizzes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz doesn't exist!".to_string()))?;

        guard::ensure_owner_or_admin(user, &existing.created_by)?;

        self.quizzes.delete(&oid).await
    }

    pub async fn get(&self, id: &str) -> AppResult<QuizDto> {
        let oid = parse_object_id(id, "Quiz not found")?;

        let quiz = self
            .quizzes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        Ok(quiz.into())
    }

    pub async fn list_all(&self) -> AppResult<Vec<QuizDto>> {
        let quizzes = self.quizzes.find_all().await?;
        Ok(quizzes.into_iter().map(QuizDto::from).collect())
    }

    pub async fn list_mine(&self, user: &User) -> AppResult<Vec<QuizDto>> {
        let owner = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let quizzes = self.quizzes.find_by_creator(&owner).await?;
        Ok(quizzes.into_iter().map(QuizDto::from).collect())
    }
}

fn questions_from(inputs: Vec<crate::models::dto::request::QuestionInput>) -> Vec<QuizQuestion> {
    inputs
        .into_iter()
        .map(|q| QuizQuestion {
            question: q.question,
            options: q.options,
            correct_answer: q.correct_answer,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::dto::request::QuestionInput,
        repositories::quiz_repository::MockQuizRepository,
    };

    fn save_request() -> SaveQuizRequest {
        SaveQuizRequest {
            title: "Geography".to_string(),
            questions: vec![QuestionInput {
                question: "Capital of France?".to_string(),
                options: vec!["Berlin".into(), "Madrid".into(), "Paris".into(), "Rome".into()],
                correct_answer: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ownership() {
        let user = User::test_user("owner@example.com");
        let owner_id = user.id.unwrap();

        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_create().returning(move |quiz| {
            assert_eq!(quiz.created_by, owner_id);
            assert_eq!(quiz.questions.len(), 1);
            Ok(quiz)
        });

        let service = QuizService::new(Arc::new(quizzes));
        let dto = service.create(&user, save_request()).await.unwrap();

        assert_eq!(dto.title, "Geography");
        assert_eq!(dto.created_by, owner_id.to_hex());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_question_set() {
        let service = QuizService::new(Arc::new(MockQuizRepository::new()));
        let user = User::test_user("owner@example.com");

        let result = service
            .create(
                &user,
                SaveQuizRequest {
                    title: "Empty".to_string(),
                    questions: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_non_owner() {
        let stranger = User::test_user("stranger@example.com");
        let quiz = Quiz::new(
            "Someone else's quiz",
            vec![],
            mongodb::bson::oid::ObjectId::new(),
        );
        let quiz_id = quiz.id.unwrap().to_hex();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));

        let service = QuizService::new(Arc::new(quizzes));
        let result = service.update(&stranger, &quiz_id, save_request()).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_allows_admin() {
        let admin = User::test_admin("admin@example.com");
        let quiz = Quiz::new(
            "Someone else's quiz",
            vec![],
            mongodb::bson::oid::ObjectId::new(),
        );
        let quiz_id = quiz.id.unwrap().to_hex();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        quizzes.expect_replace().returning(|quiz| Ok(quiz));

        let service = QuizService::new(Arc::new(quizzes));
        let dto = service.update(&admin, &quiz_id, save_request()).await.unwrap();

        assert_eq!(dto.title, "Geography");
    }

    #[tokio::test]
    async fn test_delete_checks_ownership_before_deleting() {
        let owner = User::test_user("owner@example.com");
        let quiz = Quiz::new("Mine", vec![], owner.id.unwrap());
        let quiz_id = quiz.id.unwrap().to_hex();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        quizzes.expect_delete().times(1).returning(|_| Ok(()));

        let service = QuizService::new(Arc::new(quizzes));
        assert!(service.delete(&owner, &quiz_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_with_malformed_id_is_not_found() {
        let service = QuizService::new(Arc::new(MockQuizRepository::new()));

        let result = service.get("not-an-object-id").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
