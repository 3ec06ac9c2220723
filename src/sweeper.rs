use std::time::Duration;

use sqlx::PgPool;
use time::{OffsetDateTime, Time};

use crate::db::repositories::CategoryRepository;

/// Time to sleep until the next UTC midnight. Exactly at midnight the next
/// run is a full day away.
pub fn duration_until_next_run(now: OffsetDateTime) -> Duration {
    let next = (now.date() + time::Duration::DAY).with_time(Time::MIDNIGHT).assume_utc();
    let secs = (next - now).whole_seconds().max(1) as u64;
    Duration::from_secs(secs)
}

/// Background task that runs once per UTC day and bumps the expired counter
/// of every scheduled category whose date has passed.
pub fn spawn(pool: PgPool) {
    tokio::spawn(async move {
        loop {
            let sleep_for = duration_until_next_run(OffsetDateTime::now_utc());
            tokio::time::sleep(sleep_for).await;

            let now = OffsetDateTime::now_utc();
            match CategoryRepository::increment_expired(&pool, now).await {
                Ok(updated) => {
                    tracing::info!(updated, "expired test sweep completed");
                }
                Err(err) => {
                    tracing::error!(error = %err, "expired test sweep failed");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn sleeps_until_the_next_utc_midnight() {
        let now = datetime!(2025-03-10 18:30:00 UTC);
        assert_eq!(
            duration_until_next_run(now),
            Duration::from_secs(5 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn at_midnight_the_next_run_is_a_full_day_away() {
        let now = datetime!(2025-03-10 00:00:00 UTC);
        assert_eq!(duration_until_next_run(now), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn just_before_midnight_the_sleep_is_short() {
        let now = datetime!(2025-03-10 23:59:59 UTC);
        assert_eq!(duration_until_next_run(now), Duration::from_secs(1));
    }
}
