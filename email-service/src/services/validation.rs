//! Request schema enforcement.
//!
//! Each field runs an ordered list of rules. All rules run and every
//! violation is collected; nothing short-circuits except a missing or
//! non-string value, which leaves nothing to check.
//!
//! Length limits count Unicode scalar values (`char`s). A character outside
//! the Basic Multilingual Plane, such as an emoji, counts once rather than
//! as two UTF-16 code units, so these limits are looser than a UTF-16 count
//! for that kind of text.

use crate::dtos::{EmailRequest, Tone};
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Pseudo-field used when the body as a whole is rejected.
pub const BODY_FIELD: &str = "body";

const MAX_FIELD_CHARS: usize = 500;
const MAX_RECIPIENT_CHARS: usize = 50;

struct Rule {
    code: &'static str,
    message: &'static str,
    violated: fn(&str) -> bool,
}

const TEXT_RULES: &[Rule] = &[
    Rule {
        code: "empty",
        message: "Field cannot be empty",
        violated: is_empty,
    },
    Rule {
        code: "only_digits",
        message: "Field cannot be only numbers",
        violated: is_only_digits,
    },
    Rule {
        code: "too_long",
        message: "Field cannot exceed 500 characters",
        violated: exceeds_field_limit,
    },
];

const RECIPIENT_RULES: &[Rule] = &[Rule {
    code: "recipient_too_long",
    message: "Recipient name cannot exceed 50 characters",
    violated: exceeds_recipient_limit,
}];

fn is_empty(value: &str) -> bool {
    value.is_empty()
}

fn is_only_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn exceeds_field_limit(value: &str) -> bool {
    value.chars().count() > MAX_FIELD_CHARS
}

fn exceeds_recipient_limit(value: &str) -> bool {
    value.chars().count() > MAX_RECIPIENT_CHARS
}

/// Validate and normalize a raw JSON body.
///
/// Strings are trimmed and `tone` is lowercased before the membership check.
pub fn parse_email_request(body: &Value) -> Result<EmailRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let Some(object) = body.as_object() else {
        errors.add(
            BODY_FIELD,
            rule_error(
                "invalid_type",
                format!("Expected object, received {}", json_type(body)),
            ),
        );
        return Err(errors);
    };

    let purpose = read_field(object, "purpose", &[TEXT_RULES], &mut errors);
    let recipient_name = read_field(
        object,
        "recipient_name",
        &[TEXT_RULES, RECIPIENT_RULES],
        &mut errors,
    );
    let tone = read_field(object, "tone", &[TEXT_RULES], &mut errors).and_then(|raw| {
        match raw.to_lowercase().parse::<Tone>() {
            Ok(tone) => Some(tone),
            Err(()) => {
                errors.add("tone", rule_error("invalid_tone", tone_choices_message()));
                None
            }
        }
    });

    match (purpose, recipient_name, tone) {
        (Some(purpose), Some(recipient_name), Some(tone)) if errors.field_errors().is_empty() => {
            Ok(EmailRequest {
                purpose,
                recipient_name,
                tone,
            })
        }
        _ => Err(errors),
    }
}

/// Trimmed string value of `field`, after recording every rule it violates.
///
/// Returns `None` only when the value is missing or not a string.
fn read_field(
    object: &Map<String, Value>,
    field: &'static str,
    rule_sets: &[&[Rule]],
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = match object.get(field) {
        None => {
            errors.add(field, rule_error("required", "Required"));
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            errors.add(
                field,
                rule_error(
                    "invalid_type",
                    format!("Expected string, received {}", json_type(other)),
                ),
            );
            return None;
        }
    };

    for rule in rule_sets.iter().flat_map(|rules| rules.iter()) {
        if (rule.violated)(&value) {
            errors.add(field, rule_error(rule.code, rule.message));
        }
    }

    Some(value)
}

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn tone_choices_message() -> String {
    let choices: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
    format!("tone must be one of: {}", choices.join(", "))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use service_core::error::FieldError;

    const ORDER: [&str; 4] = [BODY_FIELD, "purpose", "recipient_name", "tone"];

    fn issues(body: Value) -> Vec<FieldError> {
        let errors = parse_email_request(&body).expect_err("expected validation failure");
        FieldError::from_validation_errors(&errors, &ORDER)
    }

    fn messages_for(issues: &[FieldError], field: &str) -> Vec<String> {
        issues
            .iter()
            .filter(|i| i.field == field)
            .map(|i| i.message.clone())
            .collect()
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let request = parse_email_request(&json!({
            "purpose": "  Request a meeting ",
            "recipient_name": " Alex",
            "tone": " Friendly ",
        }))
        .unwrap();

        assert_eq!(request.purpose, "Request a meeting");
        assert_eq!(request.recipient_name, "Alex");
        assert_eq!(request.tone, Tone::Friendly);
    }

    #[test]
    fn test_every_tone_is_accepted_case_insensitively() {
        for tone in Tone::ALL {
            let request = parse_email_request(&json!({
                "purpose": "Say thanks",
                "recipient_name": "Sam",
                "tone": tone.as_str().to_uppercase(),
            }))
            .unwrap();
            assert_eq!(request.tone, tone);
        }
    }

    #[test]
    fn test_whitespace_only_fields_are_empty() {
        let issues = issues(json!({
            "purpose": "   ",
            "recipient_name": "\t",
            "tone": "professional",
        }));

        assert_eq!(messages_for(&issues, "purpose"), vec!["Field cannot be empty"]);
        assert_eq!(
            messages_for(&issues, "recipient_name"),
            vec!["Field cannot be empty"]
        );
        assert!(messages_for(&issues, "tone").is_empty());
    }

    #[test]
    fn test_empty_tone_also_fails_membership() {
        let issues = issues(json!({
            "purpose": "Follow up",
            "recipient_name": "Alex",
            "tone": "",
        }));

        let tone = messages_for(&issues, "tone");
        assert_eq!(tone.len(), 2);
        assert_eq!(tone[0], "Field cannot be empty");
        assert!(tone[1].starts_with("tone must be one of: friendly"));
    }

    #[test]
    fn test_digit_only_fields_are_rejected() {
        let issues = issues(json!({
            "purpose": "12345",
            "recipient_name": " 007 ",
            "tone": "formal",
        }));

        assert_eq!(
            messages_for(&issues, "purpose"),
            vec!["Field cannot be only numbers"]
        );
        assert_eq!(
            messages_for(&issues, "recipient_name"),
            vec!["Field cannot be only numbers"]
        );
    }

    #[test]
    fn test_mixed_digits_and_text_are_allowed() {
        assert!(parse_email_request(&json!({
            "purpose": "Invoice 12345",
            "recipient_name": "R2D2",
            "tone": "neutral",
        }))
        .is_ok());
    }

    #[test]
    fn test_recipient_name_limit() {
        let at_limit = "a".repeat(50);
        assert!(parse_email_request(&json!({
            "purpose": "Hello",
            "recipient_name": at_limit,
            "tone": "polite",
        }))
        .is_ok());

        let issues = issues(json!({
            "purpose": "Hello",
            "recipient_name": "a".repeat(51),
            "tone": "polite",
        }));
        assert_eq!(
            messages_for(&issues, "recipient_name"),
            vec!["Recipient name cannot exceed 50 characters"]
        );
    }

    #[test]
    fn test_oversized_recipient_reports_both_limits() {
        let issues = issues(json!({
            "purpose": "Hello",
            "recipient_name": "b".repeat(501),
            "tone": "polite",
        }));
        assert_eq!(
            messages_for(&issues, "recipient_name"),
            vec![
                "Field cannot exceed 500 characters",
                "Recipient name cannot exceed 50 characters",
            ]
        );
    }

    #[test]
    fn test_purpose_and_tone_limit() {
        let issues = issues(json!({
            "purpose": "p".repeat(501),
            "recipient_name": "Alex",
            "tone": "t".repeat(501),
        }));

        assert_eq!(
            messages_for(&issues, "purpose"),
            vec!["Field cannot exceed 500 characters"]
        );
        assert_eq!(
            messages_for(&issues, "tone")[0],
            "Field cannot exceed 500 characters"
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(parse_email_request(&json!({
            "purpose": "é".repeat(500),
            "recipient_name": "ü".repeat(50),
            "tone": "friendly",
        }))
        .is_ok());
    }

    #[test]
    fn test_astral_characters_count_once() {
        // 300 emoji are 600 UTF-16 code units but 300 chars.
        assert!(parse_email_request(&json!({
            "purpose": "\u{1F600}".repeat(300),
            "recipient_name": "\u{1F44B}".repeat(30),
            "tone": "friendly",
        }))
        .is_ok());

        let issues = issues(json!({
            "purpose": "\u{1F600}".repeat(501),
            "recipient_name": "Alex",
            "tone": "friendly",
        }));
        assert_eq!(
            messages_for(&issues, "purpose"),
            vec!["Field cannot exceed 500 characters"]
        );
    }

    #[test]
    fn test_unknown_tone_lists_choices() {
        let issues = issues(json!({
            "purpose": "Hello",
            "recipient_name": "Alex",
            "tone": "sarcastic",
        }));

        assert_eq!(
            issues,
            vec![FieldError::new(
                "tone",
                "tone must be one of: friendly, professional, formal, polite, neutral, \
                 confident, supportive, urgent, apologetic, informative"
            )]
        );
    }

    #[test]
    fn test_errors_follow_schema_order() {
        let issues = issues(json!({
            "tone": "999",
            "recipient_name": "",
            "purpose": "42",
        }));

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["purpose", "recipient_name", "tone", "tone"]
        );
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let issues = issues(json!({
            "recipient_name": 42,
            "tone": null,
        }));

        assert_eq!(
            issues,
            vec![
                FieldError::new("purpose", "Required"),
                FieldError::new("recipient_name", "Expected string, received number"),
                FieldError::new("tone", "Expected string, received null"),
            ]
        );
    }

    #[test]
    fn test_non_object_body() {
        assert_eq!(
            issues(json!(["purpose"])),
            vec![FieldError::new(BODY_FIELD, "Expected object, received array")]
        );
    }
}
