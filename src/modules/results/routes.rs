use axum::{routing::get, Router};

use super::handlers::{created_by_results, leaderboard, user_scores};
use crate::app_state::AppState;

pub fn results_routes() -> Router<AppState> {
    Router::new()
        .route("/result/created-by", get(created_by_results))
        .route("/result/leaderboard", get(leaderboard))
        .route("/result/user-scores", get(user_scores))
}
