use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config;
use crate::db::Role;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User or company record id.
    pub id: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

pub fn issue_token(id: &str, email: &str, role: Role) -> Result<String, AppError> {
    let cfg = config::get();
    let claims = Claims {
        id: id.to_string(),
        email: email.to_lowercase(),
        role,
        exp: OffsetDateTime::now_utc().unix_timestamp() + cfg.auth.token_lifetime_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
}

pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let cfg = config::get();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Forbidden("Invalid or expired token".to_string()))
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// Missing header is a 401; a token that fails verification is a 403.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .unwrap_or(header);

        let claims = verify_token(token)?;
        Ok(AuthUser {
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        config::init_for_tests();
        let token = issue_token("42", "Admin@Example.com", Role::Admin).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.id, "42");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > OffsetDateTime::now_utc().unix_timestamp());
    }

    #[test]
    fn garbage_token_is_rejected() {
        config::init_for_tests();
        assert!(verify_token("not-a-token").is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        config::init_for_tests();
        let claims = Claims {
            id: "1".to_string(),
            email: "user@example.com".to_string(),
            role: Role::User,
            exp: OffsetDateTime::now_utc().unix_timestamp() + 600,
        };
        let forged = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"wrong-secret"),
        )
        .unwrap();
        assert!(verify_token(&forged).is_err());
    }
}
