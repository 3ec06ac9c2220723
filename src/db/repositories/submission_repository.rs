use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Submission;

/// One scored row for the leaderboard: a submission joined to the
/// submitting user's tenant record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreRow {
    pub user_email: String,
    pub user_name: String,
    pub score: i32,
}

pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Record one attempt as a single atomic upsert. The first submission
    /// inserts with both counters at 1; every later one for the same
    /// (test_id, user_email) overwrites answers and score and bumps both
    /// counters inside the same statement, so concurrent submits never lose
    /// an increment.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        pool: &PgPool,
        test_id: Uuid,
        user_id: &str,
        user_email: &str,
        user_name: &str,
        user_answers: &[String],
        score: i32,
        total_questions: i32,
        category_id: Uuid,
    ) -> Result<Submission, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (test_id, user_id, user_email, user_name, user_answers,
                                     score, total_questions, submission_count, attempt_count,
                                     status, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 1, 1, 'submitted', $8)
            ON CONFLICT (test_id, user_email) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                user_name = EXCLUDED.user_name,
                user_answers = EXCLUDED.user_answers,
                score = EXCLUDED.score,
                total_questions = EXCLUDED.total_questions,
                submission_count = submissions.submission_count + 1,
                attempt_count = submissions.attempt_count + 1,
                status = 'submitted',
                category_id = EXCLUDED.category_id,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(test_id)
        .bind(user_id)
        .bind(user_email.to_lowercase())
        .bind(user_name)
        .bind(user_answers)
        .bind(score)
        .bind(total_questions)
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_test_and_email(
        pool: &PgPool,
        test_id: Uuid,
        user_email: &str,
    ) -> Result<Option<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE test_id = $1 AND user_email = $2",
        )
        .bind(test_id)
        .bind(user_email.to_lowercase())
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_email(
        pool: &PgPool,
        user_email: &str,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE user_email = $1")
            .bind(user_email.to_lowercase())
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_categories(
        pool: &PgPool,
        category_ids: &[Uuid],
    ) -> Result<Vec<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE category_id = ANY($1)")
            .bind(category_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_email(pool: &PgPool, user_email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM submissions WHERE user_email = $1")
            .bind(user_email.to_lowercase())
            .fetch_one(pool)
            .await
    }

    /// All scored rows for one tenant, joined through the users table. The
    /// ranking itself happens in memory so ties and cutoffs stay in one
    /// place.
    pub async fn score_rows_for_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<ScoreRow>, sqlx::Error> {
        sqlx::query_as::<_, ScoreRow>(
            r#"
            SELECT s.user_email, s.user_name, s.score
            FROM submissions s
            JOIN users u ON u.email = s.user_email
            WHERE u.company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
    }
}
