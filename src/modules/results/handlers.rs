use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use super::leaderboard::rank_leaderboard;
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::{CategoryRepository, SubmissionRepository, TestRepository};
use crate::db::Submission;
use crate::error::{AppError, AppResult};
use crate::modules::resolve_tenant;

pub async fn leaderboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    let rows = SubmissionRepository::score_rows_for_company(&state.db, tenant).await?;
    let board = rank_leaderboard(rows);
    Ok(Json(json!({ "leaderboard": board })))
}

/// Every category the caller created, with its tests and their submissions.
pub async fn created_by_results(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let categories = CategoryRepository::list_by_creator(&state.db, &auth.email).await?;
    let category_ids = categories.iter().map(|c| c.id).collect::<Vec<_>>();
    let submissions = SubmissionRepository::list_by_categories(&state.db, &category_ids).await?;

    let mut by_test: HashMap<Uuid, Vec<_>> = HashMap::new();
    for submission in submissions {
        by_test.entry(submission.test_id).or_default().push(submission);
    }

    let mut results = Vec::with_capacity(categories.len());
    for category in categories {
        let tests = TestRepository::list_by_category(&state.db, category.id).await?;
        let tests_with_submissions = tests
            .into_iter()
            .map(|test| {
                let submissions = by_test.remove(&test.id).unwrap_or_default();
                json!({ "test": test, "submissions": submissions })
            })
            .collect::<Vec<_>>();
        results.push(json!({ "category": category, "tests": tests_with_submissions }));
    }

    Ok(Json(json!({ "results": results })))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    pub test_name: String,
    pub score: i32,
    pub total_questions: i32,
    pub attempt_count: i32,
    pub submitted_at: String,
}

/// Each submission is named after its owning category, looked up through
/// `submission.category_id`. A submission whose category has since been
/// deleted keeps its score under the legacy fallback name.
pub fn score_entries(
    submissions: Vec<Submission>,
    category_titles: &HashMap<Uuid, String>,
) -> Vec<UserScore> {
    submissions
        .into_iter()
        .map(|s| UserScore {
            test_name: category_titles
                .get(&s.category_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Test".to_string()),
            score: s.score,
            total_questions: s.total_questions,
            attempt_count: s.attempt_count,
            submitted_at: s.updated_at.format(&Rfc3339).unwrap_or_default(),
        })
        .collect()
}

/// The caller's own submissions with the test name resolved through the
/// owning category. A caller with no submissions gets a 404, as the legacy
/// API answered.
pub async fn user_scores(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let submissions = SubmissionRepository::list_by_email(&state.db, &auth.email).await?;
    if submissions.is_empty() {
        return Err(AppError::NotFound("No submissions found".to_string()));
    }

    let category_ids = submissions.iter().map(|s| s.category_id).collect::<Vec<_>>();
    let categories = CategoryRepository::list_by_ids(&state.db, &category_ids).await?;
    let titles: HashMap<Uuid, String> =
        categories.into_iter().map(|c| (c.id, c.title)).collect();

    let scores = score_entries(submissions, &titles);
    Ok(Json(json!({ "scores": scores })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SubmissionStatus;
    use time::OffsetDateTime;

    fn submission(category_id: Uuid, score: i32) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            test_id: Uuid::new_v4(),
            user_id: "emp@acme.com".to_string(),
            user_email: "emp@acme.com".to_string(),
            user_name: "Emp".to_string(),
            user_answers: vec!["A".to_string()],
            score,
            total_questions: 10,
            submission_count: 1,
            attempt_count: 1,
            status: SubmissionStatus::Submitted,
            category_id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn scores_are_named_after_the_owning_category() {
        let category_id = Uuid::new_v4();
        let titles = HashMap::from([(category_id, "Safety Basics".to_string())]);
        let entries = score_entries(vec![submission(category_id, 8)], &titles);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].test_name, "Safety Basics");
        assert_eq!(entries[0].score, 8);
    }

    #[test]
    fn deleted_category_falls_back_to_the_legacy_name() {
        let entries = score_entries(vec![submission(Uuid::new_v4(), 3)], &HashMap::new());
        assert_eq!(entries[0].test_name, "Unknown Test");
        assert_eq!(entries[0].score, 3);
    }
}
