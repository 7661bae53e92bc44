use crate::{
    errors::{AppError, AppResult},
    models::{domain::QuizQuestion, dto::response::QuestionReviewDto},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeOutcome {
    pub score: i32,
    pub total: i32,
    pub percentage: i32,
}

/// Grade a submitted answer sequence against a quiz's questions.
///
/// Position i is correct iff `answers[i]` is present and equals that
/// question's `correct_answer`. Missing entries, nulls, and out-of-range
/// indices count as incorrect; nothing here panics on short or long
/// answer vectors. Quiz creation requires at least one question, so an
/// empty question set reaching this point is a caller bug; it is
/// rejected rather than dividing by zero.
pub fn grade(questions: &[QuizQuestion], answers: &[Option<i32>]) -> AppResult<GradeOutcome> {
    if questions.is_empty() {
        return Err(AppError::ValidationError(
            "Cannot grade a quiz with no questions".to_string(),
        ));
    }

    let total = questions.len() as i32;
    let score = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).copied().flatten() == Some(q.correct_answer))
        .count() as i32;

    Ok(GradeOutcome {
        score,
        total,
        percentage: percentage(score, total),
    })
}

/// Integer percentage, rounding half away from zero (`f64::round`).
fn percentage(score: i32, total: i32) -> i32 {
    ((score as f64 / total as f64) * 100.0).round() as i32
}

/// Per-question review of a stored attempt, zipped by position against
/// the quiz's *current* questions. If the quiz was edited after the
/// attempt, correctness is evaluated against the edited content.
pub fn breakdown(questions: &[QuizQuestion], answers: &[Option<i32>]) -> Vec<QuestionReviewDto> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_answer = answers.get(i).copied().flatten();
            QuestionReviewDto {
                question_number: i + 1,
                question: q.question.clone(),
                options: q.options.clone(),
                correct_answer: q.correct_answer,
                user_answer,
                is_correct: user_answer == Some(q.correct_answer),
            }
        })
        .collect()
}
