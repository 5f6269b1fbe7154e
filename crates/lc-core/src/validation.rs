//! # Screening
//!
//! Runs the honeypot check and field validation over decoded form fields.
//! The order of checks is fixed: honeypot, required fields, email shape,
//! consent. The first failing check decides the outcome.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::form::FormFields;
use crate::policy::FormPolicy;

/// Loose `local@domain.tld` shape; not an RFC 5322 validator.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub quantity: Option<String>,
    pub contribution: Option<String>,
    pub form_type: String,
}

/// Result of screening a form that did not fail validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    /// The trap field was filled; answer as if it worked and store nothing.
    Honeypot,
    Accepted(Lead),
}

/// Screens decoded fields against `policy`.
pub fn screen(fields: &FormFields, policy: &FormPolicy) -> Result<Screening> {
    if fields.trimmed(&policy.honeypot_field).is_some() {
        return Ok(Screening::Honeypot);
    }

    let aliases = &policy.aliases;
    let (name, email) = match (
        fields.first_non_empty(&aliases.name),
        fields.first_non_empty(&aliases.email),
    ) {
        (Some(name), Some(email)) => (name, email),
        _ => return Err(AppError::MissingRequiredFields),
    };

    if !is_valid_email(email) {
        return Err(AppError::InvalidEmail);
    }

    let consent = fields.first_non_empty(&aliases.consent).unwrap_or_default();
    if !policy.accepts_consent(consent) {
        return Err(AppError::ConsentRequired);
    }

    let quantity = fields.first_non_empty(&aliases.quantity).map(str::to_string);
    let form_type = resolve_form_type(fields, policy, quantity.is_some());

    Ok(Screening::Accepted(Lead {
        name: name.to_string(),
        email: email.to_string(),
        phone: fields.first_non_empty(&aliases.phone).map(str::to_string),
        quantity,
        contribution: fields.first_non_empty(&aliases.contribution).map(str::to_string),
        form_type,
    }))
}

fn resolve_form_type(fields: &FormFields, policy: &FormPolicy, has_quantity: bool) -> String {
    if let Some(explicit) = fields.first_non_empty(&policy.aliases.form_type) {
        return explicit.to_string();
    }
    let labels = &policy.labels;
    if has_quantity {
        labels.purchase.clone()
    } else if fields.first_non_empty(&policy.download_markers).is_some() {
        labels.download.clone()
    } else {
        labels.unknown.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Result<Screening> {
        screen(&FormFields::from_urlencoded(body.as_bytes()), &FormPolicy::default())
    }

    fn accepted(body: &str) -> Lead {
        match run(body) {
            Ok(Screening::Accepted(lead)) => lead,
            other => panic!("expected accepted lead, got {other:?}"),
        }
    }

    #[test]
    fn test_purchase_example() {
        let lead = accepted("name=Jane&email=jane%40example.com&consent=on&quantity=3");
        assert_eq!(lead.name, "Jane");
        assert_eq!(lead.email, "jane@example.com");
        assert_eq!(lead.quantity.as_deref(), Some("3"));
        assert_eq!(lead.form_type, "purchase");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.contribution, None);
    }

    #[test]
    fn test_honeypot_wins_over_everything() {
        assert_eq!(
            run("name=Bob&email=bob@x.com&consent=on&company=spammer").unwrap(),
            Screening::Honeypot
        );
        // even an otherwise invalid form is absorbed silently
        assert_eq!(run("company=acme").unwrap(), Screening::Honeypot);
    }

    #[test]
    fn test_blank_honeypot_is_ignored() {
        let lead = accepted("name=Bob&email=bob@x.com&consent=on&company=+++");
        assert_eq!(lead.name, "Bob");
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(matches!(run("email=a@b.co&consent=on"), Err(AppError::MissingRequiredFields)));
        assert!(matches!(run("name=Ann&consent=on"), Err(AppError::MissingRequiredFields)));
        assert!(matches!(run("name=+&email=a@b.co"), Err(AppError::MissingRequiredFields)));
        assert!(matches!(run(""), Err(AppError::MissingRequiredFields)));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.cd"));
        assert!(matches!(run("name=A&email=a%40b&consent=on"), Err(AppError::InvalidEmail)));
    }

    #[test]
    fn test_email_checked_before_consent() {
        assert!(matches!(run("name=A&email=nope"), Err(AppError::InvalidEmail)));
    }

    #[test]
    fn test_consent_tokens() {
        for token in ["ON", "True", "1", "YES"] {
            accepted(&format!("name=A&email=a@b.co&consent={token}"));
        }
        for token in ["no", "", "maybe"] {
            assert!(matches!(
                run(&format!("name=A&email=a@b.co&consent={token}")),
                Err(AppError::ConsentRequired)
            ));
        }
        assert!(matches!(run("name=A&email=a@b.co"), Err(AppError::ConsentRequired)));
    }

    #[test]
    fn test_aliases_from_download_form() {
        let lead = accepted("nome=Ana&e-mail=ana%40site.com.br&privacy=true&download=ebook");
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.email, "ana@site.com.br");
        assert_eq!(lead.form_type, "download");
    }

    #[test]
    fn test_optional_fields_trimmed_and_blank_to_none() {
        let lead = accepted("name=+A+&email=a@b.co&consent=on&phone=+11+999&contrib=+&quantity=");
        assert_eq!(lead.name, "A");
        assert_eq!(lead.phone.as_deref(), Some("11 999"));
        assert_eq!(lead.contribution, None);
        assert_eq!(lead.quantity, None);
        assert_eq!(lead.form_type, "unknown");
    }

    #[test]
    fn test_explicit_type_wins_over_inference() {
        let lead = accepted("name=A&email=a@b.co&consent=on&quantity=2&type=+vip+");
        assert_eq!(lead.form_type, "vip");
    }

    #[test]
    fn test_labels_are_configurable() {
        let mut policy = FormPolicy::default();
        policy.labels.purchase = "buy".to_string();
        let fields = FormFields::from_urlencoded(b"name=A&email=a@b.co&consent=on&quantity=1");
        match screen(&fields, &policy) {
            Ok(Screening::Accepted(lead)) => assert_eq!(lead.form_type, "buy"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
