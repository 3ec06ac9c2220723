use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Role;

/// Derives the owning tenant for an authenticated principal.
///
/// Canonical lookup order: a `Company` principal is resolved against the
/// company registry; every other role is resolved against the user registry.
/// The legacy call sites disagreed on this order; this is the single
/// deterministic rule now.
pub struct TenantResolver;

impl TenantResolver {
    pub async fn resolve(
        pool: &PgPool,
        email: &str,
        role: Role,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        if role == Role::Company {
            sqlx::query_scalar::<_, Uuid>("SELECT company_id FROM companies WHERE email = $1")
                .bind(email)
                .fetch_optional(pool)
                .await
        } else {
            let company_id = sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT company_id FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(pool)
            .await?;
            Ok(company_id.flatten())
        }
    }
}
