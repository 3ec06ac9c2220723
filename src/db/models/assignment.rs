use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// One record per user email: the set of test titles the user may attempt.
/// Titles are a deliberate weak reference carried over from the legacy data
/// model; `assigned_by` always holds the most recent assigner.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TestAssignment {
    pub id: Uuid,
    pub email: String,
    pub test_titles: Vec<String>,
    pub assigned_by: String,
    pub test_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignTestsPayload {
    #[validate(length(min = 1, message = "Emails are required"))]
    pub emails: Vec<String>,
    #[validate(length(min = 1, message = "Test titles are required"))]
    pub test_titles: Vec<String>,
    #[validate(length(min = 1, message = "AssignedBy is required"))]
    pub assigned_by: String,
}

/// Set-union merge of assigned titles. Existing titles keep their position,
/// net-new titles append in the incoming order; duplicates never count
/// twice. Assigning an already-present title is a no-op for the count.
pub fn merge_titles(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for title in incoming {
        if !merged.contains(title) {
            merged.push(title.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_is_a_set_union() {
        let merged = merge_titles(&titles(&["T1", "T2"]), &titles(&["T2", "T3"]));
        assert_eq!(merged, titles(&["T1", "T2", "T3"]));
    }

    #[test]
    fn merge_is_idempotent() {
        let first = merge_titles(&[], &titles(&["T1", "T2"]));
        let second = merge_titles(&first, &titles(&["T1", "T2"]));
        assert_eq!(first, second);
        // a repeat assignment adds zero net-new titles
        assert_eq!(second.len() as i32 - first.len() as i32, 0);
    }

    #[test]
    fn merge_ignores_duplicates_within_the_incoming_batch() {
        let merged = merge_titles(&[], &titles(&["T1", "T1", "T2"]));
        assert_eq!(merged, titles(&["T1", "T2"]));
    }
}
