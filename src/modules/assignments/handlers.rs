use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::AssignmentRepository;
use crate::db::AssignTestsPayload;
use crate::error::{AppError, AppResult};

/// Merge-assign a batch of titles to a batch of emails. Each email is
/// upserted independently; a failure partway leaves earlier emails
/// assigned, matching the batch semantics the clients expect.
pub async fn assign_tests(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<AssignTestsPayload>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut assignments = Vec::with_capacity(payload.emails.len());
    for email in &payload.emails {
        let assignment = AssignmentRepository::assign(
            &state.db,
            &email.to_lowercase(),
            &payload.test_titles,
            &payload.assigned_by,
        )
        .await?;
        assignments.push(assignment);
    }

    Ok(Json(json!({ "assignments": assignments })))
}

pub async fn assigned_tests(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let assignment = AssignmentRepository::find_by_email(&state.db, &email.to_lowercase())
        .await?
        .ok_or_else(|| AppError::NotFound("No tests assigned to this email".to_string()))?;
    Ok(Json(json!({ "assignment": assignment })))
}

pub async fn assigned_to_count(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let count = AssignmentRepository::count_assigned_to(&state.db, &email.to_lowercase()).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn assigned_by_count(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let count = AssignmentRepository::count_assigned_by(&state.db, &email.to_lowercase()).await?;
    Ok(Json(json!({ "count": count })))
}
