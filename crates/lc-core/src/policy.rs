//! # Field policy
//!
//! Several historical versions of the landing page post to the same handler
//! with differently named inputs. Each logical field therefore owns an
//! ordered list of keys; the first key carrying a non-blank value wins.

use serde::{Deserialize, Serialize};

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| (*k).to_string()).collect()
}

/// Ordered alias keys per logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub name: Vec<String>,
    pub email: Vec<String>,
    pub phone: Vec<String>,
    pub quantity: Vec<String>,
    pub contribution: Vec<String>,
    /// Checkbox names differ between the purchase and download forms
    pub consent: Vec<String>,
    pub form_type: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            name: keys(&["name", "nome", "full_name"]),
            email: keys(&["email", "e-mail", "mail"]),
            phone: keys(&["phone", "telefone", "tel", "whatsapp"]),
            quantity: keys(&["quantity", "quantidade", "qty"]),
            contribution: keys(&["contrib", "contribution"]),
            consent: keys(&["consent", "privacy", "lgpd", "terms"]),
            form_type: keys(&["type", "form_type"]),
        }
    }
}

/// Labels written to the `form_type` column when the form does not say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormTypeLabels {
    pub purchase: String,
    pub download: String,
    pub unknown: String,
}

impl Default for FormTypeLabels {
    fn default() -> Self {
        Self {
            purchase: "purchase".to_string(),
            download: "download".to_string(),
            unknown: "unknown".to_string(),
        }
    }
}

/// Everything the screening step needs to know about the forms it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPolicy {
    /// Hidden trap input; a value here means a bot filled the form
    pub honeypot_field: String,
    /// Accepted checkbox values, compared case-insensitively
    pub consent_tokens: Vec<String>,
    /// Keys whose presence marks a download form
    pub download_markers: Vec<String>,
    pub aliases: FieldAliases,
    pub labels: FormTypeLabels,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            honeypot_field: "company".to_string(),
            consent_tokens: keys(&["on", "true", "1", "yes"]),
            download_markers: keys(&["download"]),
            aliases: FieldAliases::default(),
            labels: FormTypeLabels::default(),
        }
    }
}

impl FormPolicy {
    pub fn accepts_consent(&self, raw: &str) -> bool {
        let token = raw.trim();
        self.consent_tokens
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_tokens_case_insensitive() {
        let policy = FormPolicy::default();
        for token in ["on", "ON", "True", "1", "YES", " yes "] {
            assert!(policy.accepts_consent(token), "{token} should be accepted");
        }
        for token in ["no", "", "maybe", "0", "off", "y"] {
            assert!(!policy.accepts_consent(token), "{token} should be rejected");
        }
    }

    #[test]
    fn test_primary_key_comes_first() {
        let aliases = FieldAliases::default();
        assert_eq!(aliases.name.first().map(String::as_str), Some("name"));
        assert_eq!(aliases.email.first().map(String::as_str), Some("email"));
        assert_eq!(aliases.consent.first().map(String::as_str), Some("consent"));
        assert_eq!(aliases.contribution.first().map(String::as_str), Some("contrib"));
    }

    #[test]
    fn test_partial_policy_deserializes_with_defaults() {
        let policy: FormPolicy =
            serde_json::from_str(r#"{"labels":{"purchase":"buy"}}"#).expect("policy");
        assert_eq!(policy.labels.purchase, "buy");
        assert_eq!(policy.labels.unknown, "unknown");
        assert_eq!(policy.honeypot_field, "company");
    }
}
