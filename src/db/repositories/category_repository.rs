use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{Category, NewCategory, UpdateCategory};

#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct ExpiredCount {
    pub title: String,
    pub expired_test_count: i32,
}

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create(
        pool: &PgPool,
        new_category: &NewCategory,
        schedule_date: Option<OffsetDateTime>,
        created_by: &str,
        company_id: Uuid,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (title, description, image, duration_minutes, test_instruction,
                                    type_of_test, schedule_date, schedule_time, test_mode,
                                    expired_test_count, created_by, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&new_category.title)
        .bind(&new_category.description)
        .bind(&new_category.image)
        .bind(new_category.duration)
        .bind(&new_category.test_instruction)
        .bind(new_category.type_of_test)
        .bind(schedule_date)
        .bind(new_category.schedule.as_ref().and_then(|s| s.time.clone()))
        .bind(new_category.test_mode)
        .bind(created_by)
        .bind(company_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE company_id = $1 ORDER BY created_at",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: &str,
    ) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE created_by = $1 ORDER BY created_at",
        )
        .bind(created_by)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_titles(
        pool: &PgPool,
        titles: &[String],
    ) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE title = ANY($1)")
            .bind(titles)
            .fetch_all(pool)
            .await
    }

    /// Tenant-checked update: a category outside the caller's tenant is
    /// reported as absent, never touched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        company_id: Uuid,
        update: &UpdateCategory,
        schedule_date: Option<OffsetDateTime>,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                image = COALESCE($3, image),
                duration_minutes = COALESCE($4, duration_minutes),
                test_instruction = COALESCE($5, test_instruction),
                type_of_test = COALESCE($6, type_of_test),
                schedule_date = COALESCE($7, schedule_date),
                schedule_time = COALESCE($8, schedule_time),
                test_mode = COALESCE($9, test_mode),
                updated_at = now()
            WHERE id = $10 AND company_id = $11
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image)
        .bind(update.duration)
        .bind(&update.test_instruction)
        .bind(update.type_of_test)
        .bind(schedule_date)
        .bind(update.schedule.as_ref().and_then(|s| s.time.clone()))
        .bind(update.test_mode)
        .bind(id)
        .bind(company_id)
        .fetch_optional(pool)
        .await
    }

    /// Tenant-checked delete; owned tests go with it (fk cascade).
    pub async fn delete(pool: &PgPool, id: Uuid, company_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn expired_counts(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<ExpiredCount>, sqlx::Error> {
        sqlx::query_as::<_, ExpiredCount>(
            "SELECT title, expired_test_count FROM categories WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_creator(pool: &PgPool, email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM categories WHERE created_by = $1")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Daily sweep: bump the expired counter of every Schedule Test category
    /// whose schedule date has passed. Running this more than once per day
    /// over-increments; the sweeper fires it once per UTC day.
    pub async fn increment_expired(pool: &PgPool, now: OffsetDateTime) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET expired_test_count = expired_test_count + 1, updated_at = now()
            WHERE type_of_test = 'schedule_test'
              AND schedule_date IS NOT NULL
              AND schedule_date < $1
            "#,
        )
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
