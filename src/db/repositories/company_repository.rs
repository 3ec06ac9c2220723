use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Company, NewCompany};

pub struct CompanyRepository;

impl CompanyRepository {
    pub async fn create(
        pool: &PgPool,
        new_company: &NewCompany,
        company_id: Uuid,
    ) -> Result<Company, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (company_name, email, password, phone_number, address, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new_company.company_name)
        .bind(new_company.email.to_lowercase())
        .bind(&new_company.password)
        .bind(&new_company.phone_number)
        .bind(&new_company.address)
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Company>, sqlx::Error> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(pool)
            .await
    }
}
