use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
}

/// The latest attempt by one user against one test. Unique per
/// (test_id, user_email); every re-submission overwrites the stored answers
/// and score and bumps both counters. Prior attempts are not retained.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub test_id: Uuid,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub user_answers: Vec<String>,
    pub score: i32,
    pub total_questions: i32,
    pub submission_count: i32,
    pub attempt_count: i32,
    pub status: SubmissionStatus,
    pub category_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Raw submit payload. Score and total come in as untyped values because the
/// legacy clients send either strings or numbers; they must parse as
/// integers before anything is persisted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub user_email: String,
    #[serde(default)]
    pub user_answers: Vec<String>,
    pub score: serde_json::Value,
    pub total_questions: serde_json::Value,
}
