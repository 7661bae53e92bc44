use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{QuizResult, User},
        dto::{
            request::SubmitQuizRequest,
            response::{
                AttemptDetailsDto, HistoryPageDto, PaginationDto, PerformanceStatsDto,
                QuizPerformanceDto, ResultSummaryDto, SubmitOutcomeDto,
            },
        },
    },
    repositories::{QuizRepository, ResultRepository},
    services::{parse_object_id, performance, scoring},
};

/// Title shown for history rows whose quiz has since been deleted.
const MISSING_QUIZ_TITLE: &str = "Deleted quiz";

pub struct ResultService {
    results: Arc<dyn ResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl ResultService {
    pub fn new(results: Arc<dyn ResultRepository>, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { results, quizzes }
    }

    /// Grade a submission and append the attempt row.
    ///
    /// The attempt ordinal is the prior row count plus one, computed at
    /// submission time. Two racing submissions for the same (user, quiz)
    /// pair may briefly share an ordinal; the ordinal is display-only and
    /// nothing keys off it.
    pub async fn submit(
        &self,
        user: &User,
        quiz_id: &str,
        request: SubmitQuizRequest,
    ) -> AppResult<SubmitOutcomeDto> {
        let quiz_oid = parse_object_id(quiz_id, "Quiz not found")?;
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let quiz = self
            .quizzes
            .find_by_id(&quiz_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let outcome = scoring::grade(&quiz.questions, &request.answers)?;

        let prior = self
            .results
            .count_for_user_and_quiz(&user_id, &quiz_oid)
            .await?;
        let attempt = prior as i32 + 1;

        let completed_at = BsonDateTime::now();
        let result = QuizResult {
            id: Some(ObjectId::new()),
            user: user_id,
            quiz: quiz_oid,
            score: outcome.score,
            total: outcome.total,
            percentage: outcome.percentage,
            answers: request.answers,
            time_taken: request.time_taken,
            completed_at,
            attempt,
        };

        let result = self.results.create(result).await?;

        Ok(SubmitOutcomeDto {
            score: result.score,
            total: result.total,
            percentage: result.percentage,
            attempt: result.attempt,
            time_taken: result.time_taken,
            completed_at: result.completed_at.to_chrono(),
        })
    }

    pub async fn history(&self, user: &User, page: i64, limit: i64) -> AppResult<HistoryPageDto> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let skip = ((page - 1) * limit) as u64;
        let (rows, total) = self.results.find_page_for_user(&user_id, skip, limit).await?;

        let titles = self.quiz_titles(&rows).await?;
        let results = rows
            .into_iter()
            .map(|row| {
                let title = titles
                    .get(&row.quiz)
                    .map(String::as_str)
                    .unwrap_or(MISSING_QUIZ_TITLE);
                ResultSummaryDto::from_result(row, title)
            })
            .collect();

        Ok(HistoryPageDto {
            results,
            pagination: PaginationDto::new(page, limit, total as i64),
        })
    }

    pub async fn stats(&self, user: &User) -> AppResult<PerformanceStatsDto> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let rows = self.results.find_all_for_user(&user_id).await?;
        let summary = performance::summarize(&rows, Utc::now());
        let titles = self.quiz_titles(&rows).await?;

        let quiz_performance = summary
            .per_quiz
            .into_iter()
            .map(|entry| QuizPerformanceDto {
                quiz_id: entry.quiz_id.to_hex(),
                quiz_title: titles
                    .get(&entry.quiz_id)
                    .cloned()
                    .unwrap_or_else(|| MISSING_QUIZ_TITLE.to_string()),
                attempts: entry.attempts,
                best_score: entry.best_score,
                average_score: entry.average_score,
                last_attempt: entry.last_attempt,
            })
            .collect();

        Ok(PerformanceStatsDto {
            total_quizzes_taken: summary.total_quizzes_taken,
            unique_quizzes_attempted: summary.unique_quizzes_attempted,
            average_score: summary.average_score,
            best_score: summary.best_score,
            worst_score: summary.worst_score,
            recent_activity: summary.recent_activity,
            quiz_performance,
        })
    }

    /// Per-question review of one of the caller's own attempts,
    /// evaluated against the quiz's current questions.
    pub async fn attempt_details(
        &self,
        user: &User,
        result_id: &str,
    ) -> AppResult<AttemptDetailsDto> {
        let result_oid = parse_object_id(result_id, "Quiz result not found")?;
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("User record is missing an id".to_string()))?;

        let result = self
            .results
            .find_by_id_for_user(&result_oid, &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz result not found".to_string()))?;

        let quiz = self
            .quizzes
            .find_by_id(&result.quiz)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let detailed_analysis = scoring::breakdown(&quiz.questions, &result.answers);
        let summary = ResultSummaryDto::from_result(result, &quiz.title);

        Ok(AttemptDetailsDto {
            result: summary,
            detailed_analysis,
        })
    }

    async fn quiz_titles(&self, rows: &[QuizResult]) -> AppResult<HashMap<ObjectId, String>> {
        let mut ids: Vec<ObjectId> = rows.iter().map(|r| r.quiz).collect();
        ids.sort_unstable();
        ids.dedup();

        let quizzes = self.quizzes.find_by_ids(&ids).await?;
        Ok(quizzes
            .into_iter()
            .filter_map(|q| q.id.map(|id| (id, q.title)))
            .collect())
    }
}
