//! # Domain Models
//!
//! The row written for every accepted lead. Field names and column names
//! match the `leads` table the landing page has always written to.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::form::FormFields;
use crate::validation::Lead;

/// Request headers copied onto the stored row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub user_agent: String,
    pub client_ip: String,
}

/// One persisted lead.
///
/// Absent optional values serialize as `null` rather than being omitted, so
/// every row carries the same set of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: Option<String>,
    pub contribution: Option<String>,
    pub form_type: String,
    /// Always true; a lead without consent never becomes a Submission
    pub consent: bool,
    pub user_agent: String,
    #[serde(rename = "ip")]
    pub client_ip: String,
    /// The decoded form as posted, kept for audit in a text column
    #[serde(rename = "raw_data", serialize_with = "fields_as_json_text")]
    pub raw: FormFields,
}

impl Submission {
    pub fn new(lead: Lead, meta: RequestMeta, raw: FormFields, created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            quantity: lead.quantity,
            contribution: lead.contribution,
            form_type: lead.form_type,
            consent: true,
            user_agent: meta.user_agent,
            client_ip: meta.client_ip,
            raw,
        }
    }
}

fn fields_as_json_text<S: Serializer>(fields: &FormFields, serializer: S) -> Result<S::Ok, S::Error> {
    let text = serde_json::to_string(fields).map_err(<S::Error as serde::ser::Error>::custom)?;
    serializer.serialize_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Submission {
        let raw = FormFields::from_urlencoded(b"name=Jane&email=jane%40example.com&consent=on&quantity=3");
        let lead = Lead {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            phone: None,
            quantity: Some("3".into()),
            contribution: None,
            form_type: "purchase".into(),
        };
        let meta = RequestMeta {
            user_agent: "Mozilla/5.0".into(),
            client_ip: "203.0.113.7".into(),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date");
        Submission::new(lead, meta, raw, at)
    }

    #[test]
    fn test_row_columns() {
        let row = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(row["name"], "Jane");
        assert_eq!(row["email"], "jane@example.com");
        assert_eq!(row["quantity"], "3");
        assert_eq!(row["form_type"], "purchase");
        assert_eq!(row["consent"], true);
        assert_eq!(row["ip"], "203.0.113.7");
        assert_eq!(row["user_agent"], "Mozilla/5.0");
        assert_eq!(row["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_absent_optionals_are_null() {
        let row = serde_json::to_value(sample()).expect("serialize");
        let object = row.as_object().expect("object");
        assert!(object["phone"].is_null());
        assert!(object["contribution"].is_null());
        assert_eq!(object.len(), 11);
    }

    #[test]
    fn test_raw_data_is_json_text() {
        let row = serde_json::to_value(sample()).expect("serialize");
        let text = row["raw_data"].as_str().expect("raw_data is a string");
        let raw: serde_json::Value = serde_json::from_str(text).expect("raw json");
        assert_eq!(raw["email"], "jane@example.com");
        assert_eq!(raw["consent"], "on");
    }
}
