use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One graded submission. Rows are append-only: once written they are
/// never updated or deleted, which is what makes the aggregation in
/// `services::performance` a pure read.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub quiz: ObjectId,
    pub score: i32,
    pub total: i32,
    pub percentage: i32,
    pub answers: Vec<Option<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
    pub completed_at: DateTime,
    /// 1-based ordinal of this submission for the (user, quiz) pair.
    /// Display-only; never used as a uniqueness key.
    pub attempt: i32,
}
