use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewTest, Test, UpdateTest};

pub struct TestRepository;

impl TestRepository {
    pub async fn create(
        pool: &PgPool,
        new_test: &NewTest,
        category_id: Uuid,
        company_id: Uuid,
    ) -> Result<Test, sqlx::Error> {
        sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (title, duration_minutes, instructions, image_url, questions,
                               submission_count, company_id, category_id)
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&new_test.title)
        .bind(new_test.duration)
        .bind(&new_test.instructions)
        .bind(&new_test.image_url)
        .bind(Json(&new_test.questions))
        .bind(company_id)
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Test>, sqlx::Error> {
        sqlx::query_as::<_, Test>("SELECT * FROM tests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        category_id: Uuid,
    ) -> Result<Vec<Test>, sqlx::Error> {
        sqlx::query_as::<_, Test>(
            "SELECT * FROM tests WHERE category_id = $1 ORDER BY created_at",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        update: &UpdateTest,
    ) -> Result<Option<Test>, sqlx::Error> {
        sqlx::query_as::<_, Test>(
            r#"
            UPDATE tests
            SET title = COALESCE($1, title),
                duration_minutes = COALESCE($2, duration_minutes),
                instructions = COALESCE($3, instructions),
                image_url = COALESCE($4, image_url),
                questions = COALESCE($5, questions),
                updated_at = now()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(update.duration)
        .bind(&update.instructions)
        .bind(&update.image_url)
        .bind(update.questions.as_ref().map(Json))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_submission_count(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tests SET submission_count = submission_count + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
