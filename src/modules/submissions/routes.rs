use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    categories_with_submissions, submissions_by_categories, submit_test, user_submission_count,
};
use crate::app_state::AppState;

pub fn submissions_routes() -> Router<AppState> {
    Router::new()
        .route("/tests/submit/:id", put(submit_test))
        .route("/tests/user/:email/submissions/count", get(user_submission_count))
        .route(
            "/submission/categories-with-submissions",
            get(categories_with_submissions),
        )
        .route(
            "/submission/submissions/categories",
            get(submissions_by_categories),
        )
}
