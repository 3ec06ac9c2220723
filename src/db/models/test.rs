use serde::{Deserialize, Serialize};
use sqlx::types::{Json, Uuid};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
}

/// A test belongs to exactly one category and one tenant. Category
/// membership lives here alone; the category side is a derived query.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Test {
    pub id: Uuid,
    pub title: String,
    pub duration_minutes: Option<i32>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub questions: Json<Vec<Question>>,
    pub submission_count: i32,
    pub company_id: Uuid,
    pub category_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub duration: Option<i32>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTest {
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub questions: Option<Vec<Question>>,
}
