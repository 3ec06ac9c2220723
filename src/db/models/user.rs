use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

/// Principal roles. `Company` never appears in the `users` table; it is the
/// fixed role of the tenant account itself and only shows up in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    #[serde(rename = "Admin HR")]
    AdminHr,
    #[serde(rename = "Admin CEO")]
    AdminCeo,
    #[serde(rename = "Travel Agency")]
    TravelAgency,
    Company,
}

impl Role {
    /// Roles allowed to edit or delete other users of their company.
    pub fn is_user_admin(self) -> bool {
        matches!(self, Role::Admin | Role::AdminHr | Role::AdminCeo)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub emp_id: Option<String>,
    pub dob: Option<Date>,
    pub age: Option<i32>,
    pub designation: Option<String>,
    pub aadhar_number: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    pub company_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub role: Role,
    pub emp_id: Option<String>,
    pub dob: Option<Date>,
    pub age: Option<i32>,
    pub designation: Option<String>,
    pub aadhar_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub emp_id: Option<String>,
    pub dob: Option<Date>,
    pub age: Option<i32>,
    pub designation: Option<String>,
    pub aadhar_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names_match_legacy_api() {
        assert_eq!(serde_json::to_string(&Role::AdminHr).unwrap(), "\"Admin HR\"");
        assert_eq!(
            serde_json::to_string(&Role::AdminCeo).unwrap(),
            "\"Admin CEO\""
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"User\"");
        let parsed: Role = serde_json::from_str("\"Travel Agency\"").unwrap();
        assert_eq!(parsed, Role::TravelAgency);
    }

    #[test]
    fn only_admin_roles_manage_users() {
        assert!(Role::Admin.is_user_admin());
        assert!(Role::AdminHr.is_user_admin());
        assert!(Role::AdminCeo.is_user_admin());
        assert!(!Role::User.is_user_admin());
        assert!(!Role::TravelAgency.is_user_admin());
        assert!(!Role::Company.is_user_admin());
    }
}
