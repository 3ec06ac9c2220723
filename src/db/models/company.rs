use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// A registered organization. `company_id` is the opaque tenant id every
/// tenant-scoped row carries; it is generated at registration and never
/// changes.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: String,
    pub address: String,
    pub company_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCompany {
    #[validate(length(min = 1, message = "Company name must not be empty"))]
    pub company_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub phone_number: String,
    pub address: String,
}
