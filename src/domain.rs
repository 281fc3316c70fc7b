// Practicum homework statuses API: response envelope and verdicts
use std::{fmt, str::FromStr};

use compact_str::{format_compact, CompactString};
use serde_json::Value;

use crate::client::{ClientError, Result};

/// Review verdict of a single homework submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Localized sentence sent to the chat for this verdict
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(ClientError::unknown_status(other)),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent submission extracted from an API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    pub name: CompactString,
    pub status: HomeworkStatus,
}

impl Homework {
    /// Human readable status change notification
    pub fn message(&self) -> CompactString {
        format_compact!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Validates the response envelope and returns the first (most recent) submission
pub fn check_response(response: &Value) -> Result<&Value> {
    let body = response.as_object().ok_or(ClientError::ResponseNotObject)?;

    let homeworks = body
        .get("homeworks")
        .ok_or_else(|| ClientError::missing_key("homeworks"))?
        .as_array()
        .ok_or_else(|| ClientError::unexpected_type("homeworks", "list"))?;

    homeworks.first().ok_or(ClientError::EmptyHomeworks)
}

/// Extracts name and verdict from a submission record
pub fn parse_homework(homework: &Value) -> Result<Homework> {
    let record = homework
        .as_object()
        .ok_or_else(|| ClientError::unexpected_type("homework", "JSON object"))?;

    let name = string_field(record, "homework_name")?;
    let status = string_field(record, "status")?.parse::<HomeworkStatus>()?;

    Ok(Homework { name: name.into(), status })
}

/// Formats the notification text for a submission record
pub fn parse_status(homework: &Value) -> Result<CompactString> {
    parse_homework(homework).map(|homework| homework.message())
}

/// Lower bound for the next fetch: the server's `current_date`, if any
pub fn next_cursor(response: &Value, current: i64) -> i64 {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .unwrap_or(current)
}

fn string_field<'a>(record: &'a serde_json::Map<String, Value>, key: &str) -> Result<&'a str> {
    record
        .get(key)
        .ok_or_else(|| ClientError::missing_key(key))?
        .as_str()
        .ok_or_else(|| ClientError::unexpected_type(key, "string"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response_with(homework: Value) -> Value {
        json!({ "homeworks": [homework], "current_date": 1700000000 })
    }

    #[test]
    fn test_approved_message() {
        let response = response_with(json!({
            "homework_name": "sprint_7.zip",
            "status": "approved",
        }));

        let homework = check_response(&response).unwrap();
        let message = parse_status(homework).unwrap();

        assert_eq!(
            message,
            "Изменился статус проверки работы \"sprint_7.zip\". \
             Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_only_first_homework_is_used() {
        let response = json!({
            "homeworks": [
                { "homework_name": "newest", "status": "reviewing" },
                { "homework_name": "older", "status": "approved" },
            ]
        });

        let homework = parse_homework(check_response(&response).unwrap()).unwrap();
        assert_eq!(homework.name, "newest");
        assert_eq!(homework.status, HomeworkStatus::Reviewing);
    }

    #[test]
    fn test_unknown_status_is_named() {
        let homework = json!({ "homework_name": "hw", "status": "pending" });

        let err = parse_status(&homework).unwrap_err();
        assert!(matches!(err, ClientError::UnknownStatus { ref status } if status == "pending"));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_missing_homeworks_key() {
        let err = check_response(&json!({ "current_date": 1 })).unwrap_err();
        assert!(matches!(err, ClientError::MissingKey { ref key } if key == "homeworks"));
    }

    #[test]
    fn test_response_must_be_object() {
        let err = check_response(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ClientError::ResponseNotObject));
        assert_eq!(err.to_string(), "API response is not a JSON object");
    }

    #[test]
    fn test_homeworks_must_be_list() {
        let err = check_response(&json!({ "homeworks": "nope" })).unwrap_err();
        assert_eq!(err.to_string(), "API response field homeworks is not a list");
    }

    #[test]
    fn test_empty_homeworks() {
        let err = check_response(&json!({ "homeworks": [] })).unwrap_err();
        assert!(matches!(err, ClientError::EmptyHomeworks));
    }

    #[test]
    fn test_missing_record_fields() {
        let err = parse_status(&json!({ "status": "approved" })).unwrap_err();
        assert!(matches!(err, ClientError::MissingKey { ref key } if key == "homework_name"));

        let err = parse_status(&json!({ "homework_name": "hw" })).unwrap_err();
        assert!(matches!(err, ClientError::MissingKey { ref key } if key == "status"));

        let err = parse_status(&json!({ "homework_name": 7, "status": "approved" })).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedType { .. }));
    }

    #[test]
    fn test_verdicts() {
        for status in [HomeworkStatus::Approved, HomeworkStatus::Reviewing, HomeworkStatus::Rejected]
        {
            assert_eq!(status.as_str().parse::<HomeworkStatus>().unwrap(), status);
            assert!(!status.verdict().is_empty());
        }
    }

    #[test]
    fn test_next_cursor() {
        assert_eq!(next_cursor(&json!({ "current_date": 1700000500 }), 10), 1700000500);
        assert_eq!(next_cursor(&json!({ "homeworks": [] }), 10), 10);
        assert_eq!(next_cursor(&json!({ "current_date": "soon" }), 10), 10);
    }
}
