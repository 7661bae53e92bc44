use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Quiz, QuizQuestion, QuizResult, User, UserRole};

/// Public view of an account. Never exposes the password hash or any
/// outstanding token material.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at.map(|dt| dt.to_chrono()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            id: quiz.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            title: quiz.title,
            questions: quiz.questions,
            created_by: quiz.created_by.to_hex(),
            created_at: quiz.created_at.map(|dt| dt.to_chrono()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcomeDto {
    pub score: i32,
    pub total: i32,
    pub percentage: i32,
    pub attempt: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultSummaryDto {
    pub id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub score: i32,
    pub total: i32,
    pub percentage: i32,
    pub attempt: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
    pub completed_at: DateTime<Utc>,
}

impl ResultSummaryDto {
    pub fn from_result(result: QuizResult, quiz_title: &str) -> Self {
        ResultSummaryDto {
            id: result.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            quiz_id: result.quiz.to_hex(),
            quiz_title: quiz_title.to_string(),
            score: result.score,
            total: result.total,
            percentage: result.percentage,
            attempt: result.attempt,
            time_taken: result.time_taken,
            completed_at: result.completed_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationDto {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_results: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationDto {
    pub fn new(current_page: i64, page_size: i64, total_results: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_results + page_size - 1) / page_size
        } else {
            0
        };

        PaginationDto {
            current_page,
            total_pages,
            total_results,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPageDto {
    pub results: Vec<ResultSummaryDto>,
    pub pagination: PaginationDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizPerformanceDto {
    pub quiz_id: String,
    pub quiz_title: String,
    pub attempts: u32,
    pub best_score: i32,
    pub average_score: f64,
    pub last_attempt: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceStatsDto {
    pub total_quizzes_taken: u32,
    pub unique_quizzes_attempted: u32,
    pub average_score: f64,
    pub best_score: i32,
    pub worst_score: i32,
    pub recent_activity: u32,
    pub quiz_performance: Vec<QuizPerformanceDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionReviewDto {
    pub question_number: usize,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    pub user_answer: Option<i32>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptDetailsDto {
    pub result: ResultSummaryDto,
    pub detailed_analysis: Vec<QuestionReviewDto>,
}
