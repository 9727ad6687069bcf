use serde::{Deserialize, Serialize};

use crate::models::{DoseEvent, PrescriptionEntry};

/// Outward error classification for pipeline results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotPrescribed,
    AlreadyTaken,
    MalformedExtraction,
    DatabaseError,
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotPrescribed => "NOT_PRESCRIBED",
            Self::AlreadyTaken => "ALREADY_TAKEN",
            Self::MalformedExtraction => "MALFORMED_EXTRACTION",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// Result of a dose-logging attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DoseEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

impl LogOutcome {
    pub fn logged(event: DoseEvent) -> Self {
        Self {
            success: true,
            data: Some(event),
            error: None,
            error_type: None,
        }
    }

    pub fn rejected(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_type: Some(kind),
        }
    }
}

/// Result of a prescription upload. Partial success is still success:
/// unparsable lines are skipped and the recognized entries persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<PrescriptionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
}

impl UploadOutcome {
    pub fn stored(entries: Vec<PrescriptionEntry>) -> Self {
        Self {
            success: true,
            data: entries,
            error: None,
            error_type: None,
        }
    }

    pub fn rejected(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            error: Some(message.into()),
            error_type: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;

    #[test]
    fn error_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::NotPrescribed).unwrap();
        assert_eq!(json, "\"NOT_PRESCRIBED\"");
        assert_eq!(ErrorKind::AlreadyTaken.as_str(), "ALREADY_TAKEN");
    }

    #[test]
    fn logged_outcome_omits_error_fields() {
        let ts = chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let outcome = LogOutcome::logged(crate::models::DoseEvent::new(
            123,
            ts,
            "aspirin",
            "200mg",
            Segment::Morning,
        ));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("error_type").is_none());
        assert_eq!(json["data"]["medicine_name"], "aspirin");
        assert_eq!(json["data"]["time_of_day"], "morning");
    }

    #[test]
    fn rejected_outcome_carries_kind_and_message() {
        let outcome = LogOutcome::rejected(ErrorKind::AlreadyTaken, "already taken");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_type"], "ALREADY_TAKEN");
        assert!(json.get("data").is_none());
    }
}
