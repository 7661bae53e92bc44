use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "All fields are required!"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "All fields are required!"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1, message = "Invalid question format"))]
    pub question: String,

    #[validate(length(equal = 4, message = "Each question needs exactly 4 options"))]
    pub options: Vec<String>,

    #[validate(range(min = 0, max = 3, message = "correct_answer must be between 0 and 3"))]
    pub correct_answer: i32,
}

/// Shared by create and update: the original API replaces the full
/// question set on update rather than patching individual questions.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveQuizRequest {
    #[validate(length(min = 1, message = "Title and questions are required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Title and questions are required"), nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    /// One entry per question; clients may send fewer entries, nulls, or
    /// out-of-range indices; all of those grade as incorrect.
    pub answers: Vec<Option<i32>>,
    #[serde(default)]
    pub time_taken: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}
