use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{issue_token, AuthUser};
use crate::db::repositories::{CompanyRepository, UserRepository};
use crate::db::{NewCompany, NewUser, Role, UpdateUser};
use crate::error::{AppError, AppResult};
use crate::mail;
use crate::modules::resolve_tenant;

pub async fn register_company(
    State(state): State<AppState>,
    Json(payload): Json<NewCompany>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if CompanyRepository::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Company already exists".to_string()));
    }

    let company_id = Uuid::new_v4();
    let company = CompanyRepository::create(&state.db, &payload, company_id).await?;
    let token = issue_token(&company.id.to_string(), &company.email, Role::Company)?;

    Ok(Json(json!({ "token": token, "company": company })))
}

pub async fn register_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewUser>,
) -> AppResult<Json<Value>> {
    if auth.role != Role::Company && !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only company or admin accounts can register users".to_string(),
        ));
    }
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tenant = resolve_tenant(&state, &auth).await?;
    let user = UserRepository::create(&state.db, &payload, Some(tenant), true, None).await?;

    let designation = user.designation.clone().unwrap_or_default();
    state.mailer.send_in_background(
        user.email.clone(),
        "Your account is ready".to_string(),
        mail::registration_email(&user.name, &user.email, &payload.password, &designation),
    );

    Ok(Json(json!({ "user": user })))
}

pub async fn fetch_registered_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    let tenant = resolve_tenant(&state, &auth).await?;
    let users = UserRepository::list_by_company(&state.db, tenant).await?;
    Ok(Json(json!({ "users": users })))
}

pub async fn edit_user_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<Json<Value>> {
    if !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only admin roles can edit users".to_string(),
        ));
    }
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let role_changed = payload.role;
    let designation_changed = payload.designation.clone();
    let password_changed = payload.password.is_some();

    let user = UserRepository::update(&state.db, user_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if role_changed.is_some() || designation_changed.is_some() || password_changed {
        let role_name = role_changed
            .map(|r| serde_json::to_value(r).unwrap_or_default())
            .and_then(|v| v.as_str().map(str::to_string));
        state.mailer.send_in_background(
            user.email.clone(),
            "Your account was updated".to_string(),
            mail::account_update_email(
                &user.name,
                role_name.as_deref(),
                designation_changed.as_deref(),
                password_changed,
            ),
        );
    }

    Ok(Json(json!({ "user": user })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    if !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only admin roles can delete users".to_string(),
        ));
    }
    let deleted = UserRepository::delete(&state.db, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(json!({ "message": "User deleted" })))
}

pub async fn user_details(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Value>> {
    if auth.role == Role::Company {
        let company = CompanyRepository::find_by_email(&state.db, &auth.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
        return Ok(Json(json!({ "company": company })));
    }
    let user = UserRepository::find_by_email(&state.db, &auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(json!({ "user": user })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> AppResult<Json<Value>> {
    if payload.new_password.is_empty() {
        return Err(AppError::Validation(
            "New password must not be empty".to_string(),
        ));
    }
    let user = UserRepository::find_by_email(&state.db, &auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if user.password != payload.current_password {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }
    UserRepository::update_password(&state.db, &auth.email, &payload.new_password).await?;
    Ok(Json(json!({ "message": "Password updated" })))
}

/// One row of the bulk-register CSV. Headers follow the exported template:
/// name, email, password, role, empId, designation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvUserRow {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub emp_id: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

impl CsvUserRow {
    fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role.unwrap_or(Role::User),
            emp_id: self.emp_id,
            dob: None,
            age: None,
            designation: self.designation,
            aadhar_number: None,
        }
    }
}

pub fn parse_users_csv(data: &[u8]) -> Result<Vec<CsvUserRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvUserRow =
            result.map_err(|e| AppError::Validation(format!("Invalid CSV row: {e}")))?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(AppError::Validation("CSV contains no rows".to_string()));
    }
    Ok(rows)
}

pub async fn bulk_register(
    State(state): State<AppState>,
    auth: AuthUser,
    body: String,
) -> AppResult<Json<Value>> {
    if auth.role != Role::Company && !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only company or admin accounts can register users".to_string(),
        ));
    }
    let tenant = resolve_tenant(&state, &auth).await?;
    let rows = parse_users_csv(body.as_bytes())?;

    let mut created = 0u32;
    let mut skipped = 0u32;
    for row in rows {
        let new_user = row.into_new_user();
        new_user
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if UserRepository::find_by_email(&state.db, &new_user.email)
            .await?
            .is_some()
        {
            skipped += 1;
            continue;
        }
        UserRepository::create(&state.db, &new_user, Some(tenant), true, None).await?;
        created += 1;
    }

    Ok(Json(json!({ "created": created, "skipped": skipped })))
}

pub async fn register_manual(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<Vec<NewUser>>,
) -> AppResult<Json<Value>> {
    if auth.role != Role::Company && !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only company or admin accounts can register users".to_string(),
        ));
    }
    let tenant = resolve_tenant(&state, &auth).await?;

    let mut created = 0u32;
    let mut skipped = 0u32;
    for new_user in &payload {
        new_user
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if UserRepository::find_by_email(&state.db, &new_user.email)
            .await?
            .is_some()
        {
            skipped += 1;
            continue;
        }
        UserRepository::create(&state.db, new_user, Some(tenant), true, None).await?;
        created += 1;
    }

    Ok(Json(json!({ "created": created, "skipped": skipped })))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeletePayload {
    pub emails: Vec<String>,
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BulkDeletePayload>,
) -> AppResult<Json<Value>> {
    if auth.role != Role::Company && !auth.role.is_user_admin() {
        return Err(AppError::Forbidden(
            "Only company or admin accounts can delete users".to_string(),
        ));
    }
    if payload.emails.is_empty() {
        return Err(AppError::Validation("Emails are required".to_string()));
    }
    let tenant = resolve_tenant(&state, &auth).await?;
    let deleted = UserRepository::delete_by_emails(&state.db, &payload.emails, tenant).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_parse_with_optional_columns() {
        let data = b"name,email,password,role,empId,designation\n\
                     Asha,asha@example.com,pw1,Admin HR,E1,Engineer\n\
                     Ravi,ravi@example.com,pw2,,,\n";
        let mut rows = parse_users_csv(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, Some(Role::AdminHr));
        assert_eq!(rows[0].emp_id.as_deref(), Some("E1"));
        let ravi = rows.pop().unwrap();
        assert_eq!(ravi.role, None);
        assert_eq!(ravi.into_new_user().role, Role::User);
    }

    #[test]
    fn empty_csv_is_rejected() {
        assert!(parse_users_csv(b"name,email,password\n").is_err());
    }

    #[test]
    fn malformed_csv_is_rejected() {
        assert!(parse_users_csv(b"name,email\nonly-one-field").is_err());
    }
}
