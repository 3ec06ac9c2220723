use serde::Serialize;
use uuid::Uuid;

use crate::db::{Category, Submission, SubmissionStatus, TestMode};

/// Legacy clients send counts either as JSON numbers or as numeric strings.
/// Anything else, including negatives and fractions, is rejected before the
/// engine touches storage.
pub fn parse_count(value: &serde_json::Value) -> Option<i32> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .filter(|v| *v >= 0)
            .and_then(|v| i32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse::<i32>().ok().filter(|v| *v >= 0),
        _ => None,
    }
}

/// Single-attempt policy check. The mode only bites when enforcement is
/// switched on; the platform historically accepted re-submissions to
/// Single Time categories.
pub fn single_attempt_blocked(enforce: bool, mode: TestMode, has_prior_submission: bool) -> bool {
    enforce && mode == TestMode::SingleTime && has_prior_submission
}

/// Keep only the submissions made by one user.
pub fn own_submissions(submissions: Vec<Submission>, email: &str) -> Vec<Submission> {
    submissions
        .into_iter()
        .filter(|s| s.user_email == email)
        .collect()
}

/// One assigned category with the user's submission progress attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverview {
    #[serde(flatten)]
    pub category: Category,
    pub test_submitted: String,
    pub no_of_test_attempted: i32,
}

/// Join the user's assigned titles to categories and attach per-category
/// submission status. Categories outside the user's tenant are dropped even
/// when their title matches an assigned one, so an identically named
/// category in another company never shows up.
pub fn assigned_category_overview(
    assigned_titles: &[String],
    tenant: Uuid,
    categories: Vec<Category>,
    submissions: &[Submission],
) -> Vec<CategoryOverview> {
    categories
        .into_iter()
        .filter(|c| c.company_id == tenant && assigned_titles.contains(&c.title))
        .map(|category| {
            let submission = submissions
                .iter()
                .find(|s| s.category_id == category.id && s.status == SubmissionStatus::Submitted);
            let (test_submitted, no_of_test_attempted) = match submission {
                Some(s) => ("Submitted".to_string(), s.attempt_count),
                None => ("Not Submitted".to_string(), 0),
            };
            CategoryOverview {
                category,
                test_submitted,
                no_of_test_attempted,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TestType;
    use serde_json::json;
    use time::OffsetDateTime;

    fn category(title: &str, tenant: Uuid) -> Category {
        Category {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "desc".to_string(),
            image: "img.png".to_string(),
            duration_minutes: 30,
            test_instruction: "read carefully".to_string(),
            type_of_test: TestType::MockTest,
            schedule_date: None,
            schedule_time: None,
            test_mode: TestMode::MultipleTime,
            expired_test_count: 0,
            created_by: "admin@acme.com".to_string(),
            company_id: tenant,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn submission(category_id: Uuid, attempts: i32) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            test_id: Uuid::new_v4(),
            user_id: "emp@acme.com".to_string(),
            user_email: "emp@acme.com".to_string(),
            user_name: "Emp".to_string(),
            user_answers: vec!["A".to_string()],
            score: 5,
            total_questions: 10,
            submission_count: attempts,
            attempt_count: attempts,
            status: SubmissionStatus::Submitted,
            category_id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn counts_parse_from_numbers_and_strings() {
        assert_eq!(parse_count(&json!(7)), Some(7));
        assert_eq!(parse_count(&json!("7")), Some(7));
        assert_eq!(parse_count(&json!(" 12 ")), Some(12));
        assert_eq!(parse_count(&json!(0)), Some(0));
    }

    #[test]
    fn invalid_counts_are_rejected() {
        assert_eq!(parse_count(&json!("seven")), None);
        assert_eq!(parse_count(&json!(-1)), None);
        assert_eq!(parse_count(&json!(3.5)), None);
        assert_eq!(parse_count(&json!(null)), None);
        assert_eq!(parse_count(&json!(["7"])), None);
    }

    #[test]
    fn single_attempt_policy_only_bites_when_enforced() {
        assert!(single_attempt_blocked(true, TestMode::SingleTime, true));
        assert!(!single_attempt_blocked(false, TestMode::SingleTime, true));
        assert!(!single_attempt_blocked(true, TestMode::MultipleTime, true));
        assert!(!single_attempt_blocked(true, TestMode::SingleTime, false));
    }

    #[test]
    fn overview_attaches_submission_status() {
        let tenant = Uuid::new_v4();
        let done = category("Safety Basics", tenant);
        let pending = category("Fire Drill", tenant);
        let subs = vec![submission(done.id, 2)];
        let titles = vec!["Safety Basics".to_string(), "Fire Drill".to_string()];

        let overview = assigned_category_overview(&titles, tenant, vec![done, pending], &subs);
        assert_eq!(overview.len(), 2);
        let by_title = |t: &str| overview.iter().find(|o| o.category.title == t).unwrap();
        assert_eq!(by_title("Safety Basics").test_submitted, "Submitted");
        assert_eq!(by_title("Safety Basics").no_of_test_attempted, 2);
        assert_eq!(by_title("Fire Drill").test_submitted, "Not Submitted");
        assert_eq!(by_title("Fire Drill").no_of_test_attempted, 0);
    }

    #[test]
    fn same_title_in_another_tenant_never_leaks() {
        let tenant = Uuid::new_v4();
        let other_tenant = Uuid::new_v4();
        let ours = category("Safety Basics", tenant);
        let theirs = category("Safety Basics", other_tenant);
        let titles = vec!["Safety Basics".to_string()];

        let overview = assigned_category_overview(&titles, tenant, vec![ours.clone(), theirs], &[]);
        assert_eq!(overview.len(), 1);
        assert_eq!(overview[0].category.id, ours.id);
    }

    #[test]
    fn only_the_callers_submissions_survive_the_filter() {
        let category_id = Uuid::new_v4();
        let mine = submission(category_id, 1);
        let mut theirs = submission(category_id, 3);
        theirs.user_email = "other@acme.com".to_string();

        let own = own_submissions(vec![mine.clone(), theirs], "emp@acme.com");
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, mine.id);
        assert!(own_submissions(Vec::new(), "emp@acme.com").is_empty());
    }

    #[test]
    fn unassigned_categories_are_excluded() {
        let tenant = Uuid::new_v4();
        let cat = category("Unassigned", tenant);
        let overview = assigned_category_overview(&[], tenant, vec![cat], &[]);
        assert!(overview.is_empty());
    }
}
