use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewUser, UpdateUser, User};

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &PgPool,
        new_user: &NewUser,
        company_id: Option<Uuid>,
        is_verified: bool,
        otp: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role, emp_id, dob, age, designation,
                               aadhar_number, is_verified, otp, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new_user.name)
        .bind(new_user.email.to_lowercase())
        .bind(&new_user.password)
        .bind(new_user.role)
        .bind(&new_user.emp_id)
        .bind(new_user.dob)
        .bind(new_user.age)
        .bind(&new_user.designation)
        .bind(&new_user.aadhar_number)
        .bind(is_verified)
        .bind(otp)
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE company_id = $1 ORDER BY created_at",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        update: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                password = COALESCE($3, password),
                role = COALESCE($4, role),
                emp_id = COALESCE($5, emp_id),
                dob = COALESCE($6, dob),
                age = COALESCE($7, age),
                designation = COALESCE($8, designation),
                aadhar_number = COALESCE($9, aadhar_number),
                is_verified = TRUE,
                updated_at = now()
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&update.name)
        .bind(update.email.as_ref().map(|e| e.to_lowercase()))
        .bind(&update.password)
        .bind(update.role)
        .bind(&update.emp_id)
        .bind(update.dob)
        .bind(update.age)
        .bind(&update.designation)
        .bind(&update.aadhar_number)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_password(
        pool: &PgPool,
        email: &str,
        new_password: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password = $1, updated_at = now() WHERE email = $2",
        )
        .bind(new_password)
        .bind(email.to_lowercase())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn verify_otp(pool: &PgPool, email: &str, otp: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE, otp = NULL, updated_at = now()
            WHERE email = $1 AND otp = $2
            "#,
        )
        .bind(email.to_lowercase())
        .bind(otp)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tenant-scoped bulk delete; returns how many users were removed.
    pub async fn delete_by_emails(
        pool: &PgPool,
        emails: &[String],
        company_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE email = ANY($1) AND company_id = $2",
        )
        .bind(emails)
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
