pub mod accounts;
pub mod assignments;
pub mod auth;
pub mod catalog;
pub mod results;
pub mod submissions;

use uuid::Uuid;

use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::db::repositories::TenantResolver;
use crate::error::{AppError, AppResult};

/// Resolve the caller's tenant id or fail the request with the legacy
/// "Company ID not found" 400.
pub(crate) async fn resolve_tenant(state: &AppState, auth: &AuthUser) -> AppResult<Uuid> {
    TenantResolver::resolve(&state.db, &auth.email, auth.role)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::TenantNotFound)
}
