use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    bulk_delete, bulk_register, change_password, delete_user, edit_user_details,
    fetch_registered_users, register_company, register_manual, register_user, user_details,
};
use crate::app_state::AppState;

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/company/register-company", post(register_company))
        .route("/registerUser", post(register_user))
        .route("/fetchRegisterUserDetails", get(fetch_registered_users))
        .route("/editUserDetails/:id", put(edit_user_details))
        .route("/deleteUser/:id", delete(delete_user))
        .route("/userDetails", get(user_details))
        .route("/changePassword", post(change_password))
        .route("/registration/bulk-register", post(bulk_register))
        .route("/registration/register-manual", post(register_manual))
        .route("/registration/bulk-delete", post(bulk_delete))
}
