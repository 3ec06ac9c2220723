use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::engine::{
    assigned_category_overview, own_submissions, parse_count, single_attempt_blocked,
};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::{
    AssignmentRepository, CategoryRepository, SubmissionRepository, TenantResolver,
    TestRepository, UserRepository,
};
use crate::db::SubmitPayload;
use crate::error::{AppError, AppResult};

/// Record one attempt. Deliberately unauthenticated: the exam clients call
/// this without a token, exactly as the platform has always allowed.
pub async fn submit_test(
    State(state): State<AppState>,
    Path(test_id): Path<Uuid>,
    Json(payload): Json<SubmitPayload>,
) -> AppResult<Json<Value>> {
    let score = parse_count(&payload.score)
        .ok_or_else(|| AppError::Validation("Score must be a non-negative integer".to_string()))?;
    let total_questions = parse_count(&payload.total_questions).ok_or_else(|| {
        AppError::Validation("Total questions must be a non-negative integer".to_string())
    })?;

    let user = UserRepository::find_by_email(&state.db, &payload.user_email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let test = TestRepository::find_by_id(&state.db, test_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;
    let category = CategoryRepository::find_by_id(&state.db, test.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    if state.env.app.enforce_single_attempt {
        let prior = SubmissionRepository::find_by_test_and_email(&state.db, test.id, &user.email)
            .await?;
        if single_attempt_blocked(true, category.test_mode, prior.is_some()) {
            return Err(AppError::Conflict(
                "Test already submitted for this single attempt category".to_string(),
            ));
        }
    }

    let submission = SubmissionRepository::record(
        &state.db,
        test.id,
        &user.email,
        &user.email,
        &user.name,
        &payload.user_answers,
        score,
        total_questions,
        category.id,
    )
    .await?;

    if submission.submission_count == 1 {
        TestRepository::increment_submission_count(&state.db, test.id).await?;
    }

    Ok(Json(json!({
        "message": "Test submitted",
        "submission": submission,
    })))
}

pub async fn user_submission_count(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let count = SubmissionRepository::count_by_email(&state.db, &email).await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesWithSubmissionsQuery {
    pub user_email: String,
}

/// Assigned categories with per-category submission status. Unauthenticated
/// by longstanding client contract; the tenant filter still applies.
pub async fn categories_with_submissions(
    State(state): State<AppState>,
    Query(query): Query<CategoriesWithSubmissionsQuery>,
) -> AppResult<Json<Value>> {
    let user = UserRepository::find_by_email(&state.db, &query.user_email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let tenant = TenantResolver::resolve(&state.db, &user.email, user.role)
        .await?
        .ok_or(AppError::TenantNotFound)?;

    let titles = AssignmentRepository::find_by_email(&state.db, &user.email)
        .await?
        .map(|a| a.test_titles)
        .unwrap_or_default();
    let categories = CategoryRepository::list_by_titles(&state.db, &titles).await?;
    let submissions = SubmissionRepository::list_by_email(&state.db, &user.email).await?;

    let overview = assigned_category_overview(&titles, tenant, categories, &submissions);
    Ok(Json(json!({ "categories": overview })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsByCategoriesQuery {
    /// Comma separated category ids.
    pub category_ids: String,
}

/// The caller's submissions across the given categories, with the matched
/// categories echoed back. Unknown category ids and an empty match both
/// answer 404, as the legacy API did.
pub async fn submissions_by_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SubmissionsByCategoriesQuery>,
) -> AppResult<Json<Value>> {
    let ids = parse_category_ids(&query.category_ids)?;

    let categories = CategoryRepository::list_by_ids(&state.db, &ids).await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("Categories not found".to_string()));
    }

    let submissions = own_submissions(
        SubmissionRepository::list_by_categories(&state.db, &ids).await?,
        &auth.email,
    );
    if submissions.is_empty() {
        return Err(AppError::NotFound(
            "No submissions found for these categories".to_string(),
        ));
    }

    Ok(Json(json!({ "categories": categories, "submissions": submissions })))
}

fn parse_category_ids(raw: &str) -> Result<Vec<Uuid>, AppError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| AppError::Validation(format!("Invalid category id '{s}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err(AppError::Validation("Category ids are required".to_string()));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_parse_from_comma_separated_list() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!("{a}, {b},");
        assert_eq!(parse_category_ids(&raw).unwrap(), vec![a, b]);
    }

    #[test]
    fn empty_or_garbage_id_lists_are_rejected() {
        assert!(parse_category_ids("").is_err());
        assert!(parse_category_ids("not-a-uuid").is_err());
    }
}
