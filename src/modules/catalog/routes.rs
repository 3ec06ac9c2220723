use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    category_count_by_creator, create_category, create_test, delete_category, delete_test,
    expired_test_counts, list_categories, list_tests, update_category, update_test,
};
use crate::app_state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category).get(list_categories))
        .route("/categories/:id", put(update_category).delete(delete_category))
        .route("/categories/expired-tests/count", get(expired_test_counts))
        .route("/categories/count/:email", get(category_count_by_creator))
        .route("/tests/:id/tests", post(create_test).get(list_tests))
        .route("/tests/:id", put(update_test).delete(delete_test))
}
