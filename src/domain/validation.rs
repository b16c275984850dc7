//! Client-side checks that front-run the API's own validation.
//!
//! Nothing here is authoritative. A failing check keeps a draft from being
//! submitted; a passing one still defers to whatever the API answers.

use std::collections::BTreeMap;
use std::fmt;

use super::attachments::Attachment;

pub const MIN_TEXT_CHARS: usize = 5;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const IMAGE_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];
pub const DOCUMENT_CONTENT_TYPES: [&str; 1] = ["application/pdf"];

pub const MIN_USERNAME_CHARS: usize = 6;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const OTP_CODE_DIGITS: usize = 6;

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Record `message` under `field` when present.
    pub fn check(&mut self, field: &'static str, message: Option<String>) {
        if let Some(message) = message {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Title and content share one rule: at least five characters, first one alphanumeric.
pub fn check_text(label: &str, value: &str) -> Option<String> {
    if value.chars().count() < MIN_TEXT_CHARS {
        return Some(format!(
            "{label} must be at least {MIN_TEXT_CHARS} characters long"
        ));
    }
    match value.chars().next() {
        Some(first) if first.is_alphanumeric() => None,
        _ => Some(format!("{label} must start with a letter or number")),
    }
}

pub fn check_image(attachment: &Attachment) -> Option<String> {
    if !IMAGE_CONTENT_TYPES.contains(&attachment.content_type()) {
        return Some("Image must be a JPEG, PNG or GIF".to_string());
    }
    if attachment.size() > MAX_IMAGE_BYTES {
        return Some("Image must be 5 MB or smaller".to_string());
    }
    None
}

pub fn check_document(attachment: &Attachment) -> Option<String> {
    if !DOCUMENT_CONTENT_TYPES.contains(&attachment.content_type()) {
        return Some("File must be a PDF".to_string());
    }
    if attachment.size() > MAX_DOCUMENT_BYTES {
        return Some("File must be 10 MB or smaller".to_string());
    }
    None
}

pub fn check_comment(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("Comment must not be empty".to_string())
    } else {
        None
    }
}

pub fn check_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => None,
        _ => Some("Enter a valid email address".to_string()),
    }
}

/// Usernames are optional at registration; when given they follow the API's rule.
pub fn check_username(value: &str) -> Option<String> {
    if value.chars().count() < MIN_USERNAME_CHARS {
        return Some(format!(
            "Username must be at least {MIN_USERNAME_CHARS} characters long"
        ));
    }
    match value.chars().next() {
        Some(first) if first.is_alphanumeric() => None,
        _ => Some("Username must start with a letter or number".to_string()),
    }
}

pub fn check_password(value: &str) -> Option<String> {
    if value.chars().count() < MIN_PASSWORD_CHARS {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters long"
        ));
    }
    if !value.chars().any(char::is_uppercase) {
        return Some("Password must contain an uppercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain a number".to_string());
    }
    None
}

pub fn check_otp_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.len() == OTP_CODE_DIGITS && trimmed.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some(format!("Code must be {OTP_CODE_DIGITS} digits"))
    }
}
