use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SubmissionId;

/// Query parameters accompanying a raw document body on `POST /dars/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
    pub mime_type: Option<String>,
}

/// Acknowledgement that a document was handed off for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReceipt {
    pub submission_id: SubmissionId,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}

/// One entry of the course catalog. Fields beyond the id and title are passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub title: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_keeps_unknown_fields() {
        let raw = r#"{"course_id":"CS 1114","title":"Intro to Software Design","credits":3,"pathways":["1f"]}"#;
        let course: Course = serde_json::from_str(raw).expect("course");
        assert_eq!(course.course_id, "CS 1114");
        assert_eq!(course.extra.get("credits"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&course).expect("json");
        assert_eq!(back["pathways"], serde_json::json!(["1f"]));
        assert_eq!(back["title"], "Intro to Software Design");
    }

    #[test]
    fn receipt_uses_snake_case_wire_keys() {
        let receipt = IngestionReceipt {
            submission_id: SubmissionId::new(),
            filename: "transcript.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 42,
            received_at: "2024-01-01T00:00:00Z".parse().expect("timestamp"),
        };
        let json = serde_json::to_value(&receipt).expect("json");
        assert!(json.get("submission_id").is_some());
        assert!(json.get("size_bytes").is_some());
        assert!(json.get("received_at").is_some());
    }
}
