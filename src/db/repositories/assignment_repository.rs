use sqlx::PgPool;

use crate::db::models::{merge_titles, TestAssignment};

pub struct AssignmentRepository;

impl AssignmentRepository {
    /// Merge-assign titles to one email. The existing record is locked for
    /// the duration of the transaction so concurrent assignments to the same
    /// email cannot lose titles; the count only grows by the net-new titles.
    pub async fn assign(
        pool: &PgPool,
        email: &str,
        titles: &[String],
        assigned_by: &str,
    ) -> Result<TestAssignment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, TestAssignment>(
            "SELECT * FROM test_assignments WHERE email = $1 FOR UPDATE",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let merged = merge_titles(
            existing.as_ref().map(|a| a.test_titles.as_slice()).unwrap_or(&[]),
            titles,
        );
        let count = merged.len() as i32;

        let assignment = sqlx::query_as::<_, TestAssignment>(
            r#"
            INSERT INTO test_assignments (email, test_titles, assigned_by, test_count, assigned_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (email) DO UPDATE
            SET test_titles = EXCLUDED.test_titles,
                assigned_by = EXCLUDED.assigned_by,
                test_count = EXCLUDED.test_count,
                assigned_at = now()
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(&merged)
        .bind(assigned_by)
        .bind(count)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(assignment)
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<TestAssignment>, sqlx::Error> {
        sqlx::query_as::<_, TestAssignment>("SELECT * FROM test_assignments WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_assigned_to(pool: &PgPool, email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM test_assignments WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    pub async fn count_assigned_by(pool: &PgPool, email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT count(*) FROM test_assignments WHERE assigned_by = $1",
        )
        .bind(email)
        .fetch_one(pool)
        .await
    }
}
