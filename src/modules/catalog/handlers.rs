use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::{AssignmentRepository, CategoryRepository, TestRepository};
use crate::db::{Category, NewCategory, NewTest, UpdateCategory, UpdateTest};
use crate::error::{AppError, AppResult};
use crate::modules::resolve_tenant;

/// Two-level sharing inside a tenant: a category is visible to its creator
/// and to anyone whose tests were assigned by that creator.
pub fn visible_categories(
    categories: Vec<Category>,
    caller_email: &str,
    assigned_by: Option<&str>,
) -> Vec<Category> {
    categories
        .into_iter()
        .filter(|c| c.created_by == caller_email || Some(c.created_by.as_str()) == assigned_by)
        .collect()
}

pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewCategory>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let tenant = resolve_tenant(&state, &auth).await?;

    let schedule_date = payload
        .schedule
        .as_ref()
        .map(|s| s.normalized_date())
        .transpose()
        .map_err(AppError::Validation)?
        .flatten();

    let category =
        CategoryRepository::create(&state.db, &payload, schedule_date, &auth.email, tenant)
            .await?;
    Ok(Json(json!({ "category": category })))
}

pub async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    let categories = CategoryRepository::list_by_company(&state.db, tenant).await?;
    let assignment = AssignmentRepository::find_by_email(&state.db, &auth.email).await?;
    let assigned_by = assignment.as_ref().map(|a| a.assigned_by.as_str());

    let visible = visible_categories(categories, &auth.email, assigned_by);
    Ok(Json(json!({ "categories": visible })))
}

pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategory>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let tenant = resolve_tenant(&state, &auth).await?;

    let schedule_date = payload
        .schedule
        .as_ref()
        .map(|s| s.normalized_date())
        .transpose()
        .map_err(AppError::Validation)?
        .flatten();

    let category = CategoryRepository::update(&state.db, id, tenant, &payload, schedule_date)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
    Ok(Json(json!({ "category": category })))
}

pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    let deleted = CategoryRepository::delete(&state.db, id, tenant).await?;
    if !deleted {
        return Err(AppError::NotFound("Category not found".to_string()));
    }
    Ok(Json(json!({ "message": "Category deleted" })))
}

pub async fn expired_test_counts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    let counts = CategoryRepository::expired_counts(&state.db, tenant).await?;
    Ok(Json(json!({ "counts": counts })))
}

pub async fn category_count_by_creator(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let count = CategoryRepository::count_by_creator(&state.db, &email).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn create_test(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<NewTest>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let tenant = resolve_tenant(&state, &auth).await?;

    let category = CategoryRepository::find_by_id(&state.db, category_id)
        .await?
        .filter(|c| c.company_id == tenant)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let test = TestRepository::create(&state.db, &payload, category.id, tenant).await?;
    Ok(Json(json!({ "test": test })))
}

pub async fn list_tests(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    CategoryRepository::find_by_id(&state.db, category_id)
        .await?
        .filter(|c| c.company_id == tenant)
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let tests = TestRepository::list_by_category(&state.db, category_id).await?;
    Ok(Json(json!({ "tests": tests })))
}

pub async fn update_test(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(test_id): Path<Uuid>,
    Json(payload): Json<UpdateTest>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let test = TestRepository::update(&state.db, test_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Test not found".to_string()))?;
    Ok(Json(json!({ "test": test })))
}

pub async fn delete_test(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(test_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let deleted = TestRepository::delete(&state.db, test_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Test not found".to_string()));
    }
    Ok(Json(json!({ "message": "Test deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{TestMode, TestType};
    use time::OffsetDateTime;

    fn category(title: &str, created_by: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "desc".to_string(),
            image: "img.png".to_string(),
            duration_minutes: 30,
            test_instruction: "read carefully".to_string(),
            type_of_test: TestType::MockTest,
            schedule_date: None,
            schedule_time: None,
            test_mode: TestMode::MultipleTime,
            expired_test_count: 0,
            created_by: created_by.to_string(),
            company_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn creator_sees_own_categories() {
        let cats = vec![category("C1", "admin@acme.com"), category("C2", "other@acme.com")];
        let visible = visible_categories(cats, "admin@acme.com", None);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "C1");
    }

    #[test]
    fn assignee_sees_assigner_categories() {
        let cats = vec![category("C1", "admin@acme.com"), category("C2", "other@acme.com")];
        let visible = visible_categories(cats, "emp@acme.com", Some("admin@acme.com"));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "C1");
    }

    #[test]
    fn unrelated_caller_sees_nothing() {
        let cats = vec![category("C1", "admin@acme.com")];
        assert!(visible_categories(cats, "emp@acme.com", None).is_empty());
    }
}
