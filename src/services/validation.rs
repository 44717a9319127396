use std::sync::LazyLock;

use regex::Regex;

use crate::errors::FieldError;
use crate::models::{ContactInfo, Field};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+]?[1-9][0-9]{0,15}$").unwrap());

pub const MIN_NAME_CHARS: usize = 2;

pub fn validate_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_CHARS
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Separators a visitor may type inside a phone number.
fn is_phone_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '(' | ')')
}

pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !is_phone_separator(*c)).collect()
}

pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(&normalize_phone(phone))
}

/// Checks every personal-details field and reports all failures together.
pub fn validate_contact(contact: &ContactInfo) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !validate_name(&contact.name) {
        errors.push(FieldError::missing(Field::Name));
    }

    if contact.email.is_empty() {
        errors.push(FieldError::missing(Field::Email));
    } else if !validate_email(&contact.email) {
        errors.push(FieldError::invalid(Field::Email));
    }

    if contact.phone.is_empty() {
        errors.push(FieldError::missing(Field::Phone));
    } else if !validate_phone(&contact.phone) {
        errors.push(FieldError::invalid(Field::Phone));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
