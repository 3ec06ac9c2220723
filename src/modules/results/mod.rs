pub mod handlers;
pub mod leaderboard;
pub mod routes;
