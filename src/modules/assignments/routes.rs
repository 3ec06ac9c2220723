use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{assign_tests, assigned_by_count, assigned_tests, assigned_to_count};
use crate::app_state::AppState;

pub fn assignments_routes() -> Router<AppState> {
    Router::new()
        .route("/assign-test", post(assign_tests))
        .route("/assign-test/:email", get(assigned_tests))
        .route("/assign-test/count/:email", get(assigned_to_count))
        .route("/assign-test/assigned-by/:email", get(assigned_by_count))
}
