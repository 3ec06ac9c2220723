use serde::Serialize;

use crate::db::repositories::ScoreRow;

pub const LEADERBOARD_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_email: String,
    pub user_name: String,
    pub total_score: i64,
}

/// Group score rows by email, sum across all of a user's submissions, and
/// rank descending. The sort is stable, so ties keep their first-seen
/// order; only the top twenty make the board.
pub fn rank_leaderboard(rows: Vec<ScoreRow>) -> Vec<LeaderboardEntry> {
    let mut totals: Vec<(String, String, i64)> = Vec::new();
    for row in rows {
        match totals.iter_mut().find(|(email, _, _)| *email == row.user_email) {
            Some((_, _, total)) => *total += i64::from(row.score),
            None => totals.push((row.user_email, row.user_name, i64::from(row.score))),
        }
    }

    totals.sort_by(|a, b| b.2.cmp(&a.2));
    totals.truncate(LEADERBOARD_SIZE);
    totals
        .into_iter()
        .enumerate()
        .map(|(i, (user_email, user_name, total_score))| LeaderboardEntry {
            rank: i + 1,
            user_email,
            user_name,
            total_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(email: &str, score: i32) -> ScoreRow {
        ScoreRow {
            user_email: email.to_string(),
            user_name: email.split('@').next().unwrap_or("user").to_string(),
            score,
        }
    }

    #[test]
    fn scores_sum_across_tests_and_rank_descending() {
        let board = rank_leaderboard(vec![
            row("a@acme.com", 5),
            row("b@acme.com", 9),
            row("a@acme.com", 7),
        ]);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_email, "a@acme.com");
        assert_eq!(board[0].total_score, 12);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].user_email, "b@acme.com");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let board = rank_leaderboard(vec![row("first@acme.com", 10), row("second@acme.com", 10)]);
        assert_eq!(board[0].user_email, "first@acme.com");
        assert_eq!(board[1].user_email, "second@acme.com");
    }

    #[test]
    fn board_is_capped_at_twenty() {
        let rows = (0..25)
            .map(|i| row(&format!("u{i}@acme.com"), i))
            .collect::<Vec<_>>();
        let board = rank_leaderboard(rows);
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board[0].total_score, 24);
        assert_eq!(board.last().unwrap().rank, 20);
        // the five lowest scorers fall off
        assert!(board.iter().all(|e| e.total_score >= 5));
    }

    #[test]
    fn empty_input_gives_an_empty_board() {
        assert!(rank_leaderboard(Vec::new()).is_empty());
    }
}
