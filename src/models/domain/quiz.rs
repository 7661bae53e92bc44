use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A single four-option question. `correct_answer` is an index into
/// `options`, always in 0..=3 once the quiz passes creation validation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub created_by: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl Quiz {
    pub fn new(title: &str, questions: Vec<QuizQuestion>, created_by: ObjectId) -> Self {
        Quiz {
            id: Some(ObjectId::new()),
            title: title.to_string(),
            questions,
            created_by,
            created_at: Some(DateTime::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                question: "What is 2 + 2?".to_string(),
                options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
                correct_answer: 1,
            },
            QuizQuestion {
                question: "Capital of France?".to_string(),
                options: vec!["Berlin".into(), "Madrid".into(), "Paris".into(), "Rome".into()],
                correct_answer: 2,
            },
        ]
    }

    #[test]
    fn test_quiz_keeps_question_order() {
        let owner = ObjectId::new();
        let quiz = Quiz::new("Basics", sample_questions(), owner);

        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].correct_answer, 1);
        assert_eq!(quiz.questions[1].question, "Capital of France?");
        assert_eq!(quiz.created_by, owner);
    }

    #[test]
    fn test_quiz_round_trips_through_bson() {
        let quiz = Quiz::new("Basics", sample_questions(), ObjectId::new());

        let doc = mongodb::bson::to_document(&quiz).expect("quiz should serialize");
        let parsed: Quiz = mongodb::bson::from_document(doc).expect("quiz should deserialize");

        assert_eq!(parsed.title, "Basics");
        assert_eq!(parsed.questions, quiz.questions);
    }
}
