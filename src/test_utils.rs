use mongodb::bson::oid::ObjectId;

use crate::models::domain::{Quiz, QuizQuestion};

pub mod fixtures {
    use super::*;

    /// Email guaranteed unique per call, for tests that share a store.
    pub fn unique_email(prefix: &str) -> String {
        format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
    }

    pub fn four_option_question(text: &str, correct: i32) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_answer: correct,
        }
    }

    /// The quiz from the canonical grading scenario: correct answers
    /// [1, 2, 0, 3].
    pub fn scenario_quiz(owner: ObjectId) -> Quiz {
        Quiz::new(
            "Scenario Quiz",
            vec![
                four_option_question("First", 1),
                four_option_question("Second", 2),
                four_option_question("Third", 0),
                four_option_question("Fourth", 3),
            ],
            owner,
        )
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}
