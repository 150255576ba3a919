use crate::domain::model::{ContactField, FieldErrors, GuestDetails};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_PHONE_LENGTH: usize = 10;
const MAX_PHONE_DIGITS: usize = 11;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub struct ContactFormValidator;

impl ContactFormValidator {
    /// Checks every field and reports all problems at once; an empty map
    /// means the form can be sent.
    pub fn validate(details: &GuestDetails, consent: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if details.name.trim().is_empty() {
            errors.insert(ContactField::Name, "Enter your name".to_string());
        }

        if details.phone.trim().is_empty() {
            errors.insert(ContactField::Phone, "Enter a phone number".to_string());
        } else if details.phone.chars().count() < MIN_PHONE_LENGTH {
            errors.insert(ContactField::Phone, "Check the phone number".to_string());
        }

        if details.email.trim().is_empty() {
            errors.insert(ContactField::Email, "Enter an email".to_string());
        } else if !EMAIL_SHAPE.is_match(&details.email) {
            errors.insert(ContactField::Email, "Invalid email address".to_string());
        }

        if !consent {
            errors.insert(
                ContactField::Consent,
                "Consent to personal data processing is required".to_string(),
            );
        }

        errors
    }
}

/// Input mask for Russian phone numbers: keeps up to 11 digits and renders
/// `+7 (XXX) XXX-XX-XX` when the number starts with 7 or 8.
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_PHONE_DIGITS)
        .collect();

    if digits.is_empty() {
        return String::new();
    }
    if !digits.starts_with(['7', '8']) {
        return format!("+7 {}", digits);
    }
    if digits.len() == 1 {
        return "+7 ".to_string();
    }

    let part = |from: usize, to: usize| digits.get(from..to.min(digits.len())).unwrap_or("");
    format!(
        "+7 ({}) {}-{}-{}",
        part(1, 4),
        part(4, 7),
        part(7, 9),
        part(9, 11)
    )
}
