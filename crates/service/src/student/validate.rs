//! Declarative field rules shared by create, full update, and partial
//! update. The three paths differ only in which fields are mandatory.

use super::domain::StudentPatch;
use crate::errors::ValidationErrors;

/// Message attached to the repository-backed uniqueness violation.
pub const EMAIL_TAKEN: &str = "email has already been taken";

/// Whether absent fields are violations (POST/PUT) or skipped (PATCH).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Text,
    Email,
    Digits(usize),
}

struct FieldRule {
    field: &'static str,
    format: Format,
    max_len: Option<usize>,
}

const RULES: [FieldRule; 4] = [
    FieldRule { field: "name", format: Format::Text, max_len: Some(255) },
    FieldRule { field: "email", format: Format::Email, max_len: Some(255) },
    FieldRule { field: "phone", format: Format::Digits(10), max_len: None },
    FieldRule { field: "language", format: Format::Text, max_len: None },
];

/// Evaluate every rule against the supplied fields, accumulating violations
/// per field. Email uniqueness is repository-backed and layered on top of
/// this result by the service.
pub fn collect(input: &StudentPatch, presence: Presence) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for rule in &RULES {
        let value = match rule.field {
            "name" => input.name.as_deref(),
            "email" => input.email.as_deref(),
            "phone" => input.phone.as_deref(),
            _ => input.language.as_deref(),
        };
        match value {
            None if presence == Presence::Required => {
                errors.add(rule.field, format!("the {} field is required", rule.field));
            }
            None => {}
            Some(v) => rule.check(v, &mut errors),
        }
    }
    errors
}

impl FieldRule {
    fn check(&self, value: &str, errors: &mut ValidationErrors) {
        if value.trim().is_empty() {
            errors.add(self.field, format!("the {} field must not be empty", self.field));
            return;
        }
        if let Some(max) = self.max_len {
            if value.chars().count() > max {
                errors.add(
                    self.field,
                    format!("the {} field must not exceed {} characters", self.field, max),
                );
            }
        }
        match self.format {
            Format::Text => {}
            Format::Email => {
                if !is_valid_email(value) {
                    errors.add(self.field, "must be a valid email address");
                }
            }
            Format::Digits(len) => {
                if value.len() != len || !value.bytes().all(|b| b.is_ascii_digit()) {
                    errors.add(self.field, format!("must be exactly {} digits", len));
                }
            }
        }
    }
}

/// One `@`, non-empty local part, dotted domain with non-empty labels, no
/// whitespace anywhere.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> StudentPatch {
        StudentPatch {
            name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
            phone: Some("1234567890".into()),
            language: Some("English".into()),
        }
    }

    #[test]
    fn complete_input_passes_required_mode() {
        assert!(collect(&full(), Presence::Required).is_empty());
    }

    #[test]
    fn missing_fields_reported_in_required_mode() {
        let errors = collect(&StudentPatch::default(), Presence::Required);
        for field in ["name", "email", "phone", "language"] {
            assert!(errors.has(field), "expected violation for {}", field);
        }
    }

    #[test]
    fn missing_fields_skipped_in_optional_mode() {
        let input = StudentPatch { phone: Some("0987654321".into()), ..Default::default() };
        assert!(collect(&input, Presence::Optional).is_empty());
    }

    #[test]
    fn phone_must_be_ten_digits() {
        for bad in ["12345", "12345678901", "12345abcde", "123 456 78"] {
            let input = StudentPatch { phone: Some(bad.into()), ..full() };
            let errors = collect(&input, Presence::Required);
            assert!(errors.has("phone"), "expected violation for {:?}", bad);
        }
    }

    #[test]
    fn name_capped_at_255_chars() {
        let input = StudentPatch { name: Some("x".repeat(256)), ..Default::default() };
        assert!(collect(&input, Presence::Optional).has("name"));
        let input = StudentPatch { name: Some("x".repeat(255)), ..Default::default() };
        assert!(collect(&input, Presence::Optional).is_empty());
    }

    #[test]
    fn blank_present_field_is_a_violation_even_in_optional_mode() {
        let input = StudentPatch { name: Some("   ".into()), ..Default::default() };
        assert!(collect(&input, Presence::Optional).has("name"));
    }

    #[test]
    fn email_format_rules() {
        for good in ["ana@example.com", "a.b+c@sub.example.org", "x@y.z"] {
            assert!(is_valid_email(good), "expected valid: {:?}", good);
        }
        for bad in [
            "ana",
            "@example.com",
            "ana@",
            "ana@example",
            "ana@@example.com",
            "ana@exa mple.com",
            "ana@.com",
            "ana@example.",
            "an a@example.com",
        ] {
            assert!(!is_valid_email(bad), "expected invalid: {:?}", bad);
        }
    }
}
