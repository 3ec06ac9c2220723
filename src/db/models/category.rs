use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "test_type", rename_all = "snake_case")]
pub enum TestType {
    #[serde(rename = "Schedule Test")]
    ScheduleTest,
    #[serde(rename = "Mock Test")]
    MockTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "test_mode", rename_all = "snake_case")]
pub enum TestMode {
    #[serde(rename = "Single Time")]
    SingleTime,
    #[serde(rename = "Multiple Time")]
    MultipleTime,
}

/// A tenant-scoped grouping of tests with scheduling and mode metadata.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub duration_minutes: i32,
    pub test_instruction: String,
    pub type_of_test: TestType,
    #[serde(with = "time::serde::rfc3339::option")]
    pub schedule_date: Option<OffsetDateTime>,
    pub schedule_time: Option<String>,
    pub test_mode: TestMode,
    pub expired_test_count: i32,
    pub created_by: String,
    pub company_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Schedule payload as the clients send it: a local `YYYY-MM-DDTHH:mm:ss`
/// date normalized to UTC before it is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulePayload {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl SchedulePayload {
    pub fn normalized_date(&self) -> Result<Option<OffsetDateTime>, String> {
        let Some(raw) = self.date.as_deref() else {
            return Ok(None);
        };
        let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        let parsed = PrimitiveDateTime::parse(raw, &format)
            .map_err(|e| format!("Invalid schedule date '{raw}': {e}"))?;
        Ok(Some(parsed.assume_utc()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "Image must not be empty"))]
    pub image: String,
    pub duration: i32,
    #[validate(length(min = 1, message = "Test instruction must not be empty"))]
    pub test_instruction: String,
    pub type_of_test: TestType,
    pub schedule: Option<SchedulePayload>,
    pub test_mode: TestMode,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategory {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub duration: Option<i32>,
    pub test_instruction: Option<String>,
    pub type_of_test: Option<TestType>,
    pub schedule: Option<SchedulePayload>,
    pub test_mode: Option<TestMode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn schedule_date_is_normalized_to_utc() {
        let payload = SchedulePayload {
            date: Some("2025-03-01T09:30:00".to_string()),
            time: Some("09:30".to_string()),
        };
        let normalized = payload.normalized_date().unwrap().unwrap();
        assert_eq!(normalized, datetime!(2025-03-01 09:30:00 UTC));
    }

    #[test]
    fn missing_schedule_date_is_allowed() {
        let payload = SchedulePayload {
            date: None,
            time: None,
        };
        assert!(payload.normalized_date().unwrap().is_none());
    }

    #[test]
    fn malformed_schedule_date_is_rejected() {
        let payload = SchedulePayload {
            date: Some("01-03-2025".to_string()),
            time: None,
        };
        assert!(payload.normalized_date().is_err());
    }

    #[test]
    fn type_and_mode_use_legacy_wire_names() {
        assert_eq!(
            serde_json::to_string(&TestType::ScheduleTest).unwrap(),
            "\"Schedule Test\""
        );
        assert_eq!(
            serde_json::to_string(&TestMode::SingleTime).unwrap(),
            "\"Single Time\""
        );
    }
}
