use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;

use crate::models::domain::QuizResult;

#[derive(Debug, Clone, PartialEq)]
pub struct QuizPerformance {
    pub quiz_id: ObjectId,
    pub attempts: u32,
    pub best_score: i32,
    pub average_score: f64,
    pub last_attempt: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceSummary {
    pub total_quizzes_taken: u32,
    pub unique_quizzes_attempted: u32,
    pub average_score: f64,
    pub best_score: i32,
    pub worst_score: i32,
    pub recent_activity: u32,
    pub per_quiz: Vec<QuizPerformance>,
}

/// Derive a user's statistics from their attempt rows. Pure: the rows
/// are immutable history and `now` is passed in, so the same inputs
/// always produce the same summary. Empty input yields zeroed defaults.
pub fn summarize(results: &[QuizResult], now: DateTime<Utc>) -> PerformanceSummary {
    if results.is_empty() {
        return PerformanceSummary::default();
    }

    let total = results.len() as u32;
    let sum: i64 = results.iter().map(|r| r.percentage as i64).sum();
    let average_score = sum as f64 / total as f64;
    let best_score = results.iter().map(|r| r.percentage).max().unwrap_or(0);
    let worst_score = results.iter().map(|r| r.percentage).min().unwrap_or(0);

    let seven_days_ago = now - Duration::days(7);
    let recent_activity = results
        .iter()
        .filter(|r| r.completed_at.to_chrono() >= seven_days_ago)
        .count() as u32;

    let mut by_quiz: HashMap<ObjectId, Vec<&QuizResult>> = HashMap::new();
    for result in results {
        by_quiz.entry(result.quiz).or_default().push(result);
    }

    let mut per_quiz: Vec<QuizPerformance> = by_quiz
        .into_iter()
        .map(|(quiz_id, rows)| {
            let attempts = rows.len() as u32;
            let best = rows.iter().map(|r| r.percentage).max().unwrap_or(0);
            let avg = rows.iter().map(|r| r.percentage as i64).sum::<i64>() as f64
                / attempts as f64;
            let last = rows
                .iter()
                .map(|r| r.completed_at.to_chrono())
                .max()
                .unwrap_or(now);

            QuizPerformance {
                quiz_id,
                attempts,
                best_score: best,
                average_score: avg,
                last_attempt: last,
            }
        })
        .collect();

    per_quiz.sort_by(|a, b| b.last_attempt.cmp(&a.last_attempt));

    PerformanceSummary {
        total_quizzes_taken: total,
        unique_quizzes_attempted: per_quiz.len() as u32,
        average_score,
        best_score,
        worst_score,
        recent_activity,
        per_quiz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime as BsonDateTime;

    fn result_for(quiz: ObjectId, percentage: i32, completed_at: DateTime<Utc>) -> QuizResult {
        QuizResult {
            id: Some(ObjectId::new()),
            user: ObjectId::new(),
            quiz,
            score: percentage / 25,
            total: 4,
            percentage,
            answers: vec![Some(0); 4],
            time_taken: None,
            completed_at: BsonDateTime::from_chrono(completed_at),
            attempt: 1,
        }
    }

    #[test]
    fn test_empty_history_yields_zeroed_summary() {
        let summary = summarize(&[], Utc::now());

        assert_eq!(summary.total_quizzes_taken, 0);
        assert_eq!(summary.unique_quizzes_attempted, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.best_score, 0);
        assert_eq!(summary.worst_score, 0);
        assert_eq!(summary.recent_activity, 0);
        assert!(summary.per_quiz.is_empty());
    }

    #[test]
    fn test_aggregates_over_percentages() {
        let now = Utc::now();
        let quiz_a = ObjectId::new();
        let quiz_b = ObjectId::new();

        let rows = vec![
            result_for(quiz_a, 50, now - Duration::days(1)),
            result_for(quiz_a, 100, now - Duration::hours(2)),
            result_for(quiz_b, 75, now - Duration::days(10)),
        ];

        let summary = summarize(&rows, now);

        assert_eq!(summary.total_quizzes_taken, 3);
        assert_eq!(summary.unique_quizzes_attempted, 2);
        assert_eq!(summary.best_score, 100);
        assert_eq!(summary.worst_score, 50);
        assert!((summary.average_score - 75.0).abs() < f64::EPSILON);
        // Only the two attempts within the trailing week count
        assert_eq!(summary.recent_activity, 2);
    }

    #[test]
    fn test_per_quiz_breakdown_sorted_by_recency() {
        let now = Utc::now();
        let older_quiz = ObjectId::new();
        let newer_quiz = ObjectId::new();

        let rows = vec![
            result_for(older_quiz, 40, now - Duration::days(5)),
            result_for(older_quiz, 60, now - Duration::days(4)),
            result_for(newer_quiz, 90, now - Duration::days(1)),
        ];

        let summary = summarize(&rows, now);

        assert_eq!(summary.per_quiz.len(), 2);
        assert_eq!(summary.per_quiz[0].quiz_id, newer_quiz);
        assert_eq!(summary.per_quiz[1].quiz_id, older_quiz);
        assert_eq!(summary.per_quiz[1].attempts, 2);
        assert_eq!(summary.per_quiz[1].best_score, 60);
        assert!((summary.per_quiz[1].average_score - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_exactly_seven_days_counts_as_recent() {
        let now = Utc::now();
        let rows = vec![result_for(ObjectId::new(), 80, now - Duration::days(7))];

        let summary = summarize(&rows, now);

        assert_eq!(summary.recent_activity, 1);
    }
}
