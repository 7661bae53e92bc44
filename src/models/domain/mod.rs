pub mod quiz;
pub mod quiz_result;
pub mod user;

pub use quiz::{Quiz, QuizQuestion};
pub use quiz_result::QuizResult;
pub use user::{User, UserRole};
