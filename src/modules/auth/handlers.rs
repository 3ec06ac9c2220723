use axum::extract::State;
use axum::Json;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::issue_token;
use crate::db::repositories::{CompanyRepository, UserRepository};
use crate::db::{NewUser, Role};
use crate::error::{AppError, AppResult};
use crate::mail;

/// Six digit verification code, zero padded.
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if payload.role == Role::Company {
        return Err(AppError::Validation(
            "Company accounts register through /company/register-company".to_string(),
        ));
    }

    if UserRepository::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let otp = generate_otp();
    let user = UserRepository::create(&state.db, &payload, None, false, Some(&otp)).await?;

    state.mailer.send_in_background(
        user.email.clone(),
        "Verify your account".to_string(),
        mail::otp_email(&user.name, &otp),
    );

    Ok(Json(json!({
        "message": "OTP sent to your email",
        "email": user.email,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpPayload {
    pub email: String,
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> AppResult<Json<Value>> {
    let verified = UserRepository::verify_otp(&state.db, &payload.email, &payload.otp).await?;
    if !verified {
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }
    Ok(Json(json!({ "message": "Account verified" })))
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Users are checked first, companies as a fallback under the same
/// credentials. Passwords are stored and compared as plain text, matching
/// the data this service inherited.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<Json<Value>> {
    if let Some(user) = UserRepository::find_by_email(&state.db, &payload.email).await? {
        if user.password != payload.password {
            return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
        }
        if !user.is_verified {
            return Err(AppError::Forbidden("Account is not verified".to_string()));
        }
        let token = issue_token(&user.id.to_string(), &user.email, user.role)?;
        return Ok(Json(json!({ "token": token, "user": user })));
    }

    let company = CompanyRepository::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid credentials".to_string()))?;
    if company.password != payload.password {
        return Err(AppError::Unauthenticated("Invalid credentials".to_string()));
    }
    let token = issue_token(&company.id.to_string(), &company.email, Role::Company)?;
    Ok(Json(json!({ "token": token, "company": company })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
