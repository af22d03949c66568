//! Form input validation
//!
//! Failures are collected per field so the caller can show each message next
//! to the input it belongs to.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Field name → message, in stable field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Record a message; the first message for a field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Check a trimmed string against a minimum character count
pub fn min_chars(errors: &mut FieldErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.add(field, message);
    }
}

/// Check an email address shape
pub fn email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !EMAIL_RE.is_match(value.trim()) {
        errors.add(field, "Invalid email address");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_counts_trimmed_chars() {
        let mut errors = FieldErrors::default();
        min_chars(&mut errors, "name", "  a ", 2, "too short");
        assert_eq!(errors.get("name"), Some("too short"));

        let mut errors = FieldErrors::default();
        min_chars(&mut errors, "name", "ab", 2, "too short");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_shapes() {
        let mut errors = FieldErrors::default();
        email(&mut errors, "email", "john@example.com");
        assert!(errors.is_empty());

        for bad in ["john", "john@", "@example.com", "john@example", "jo hn@example.com"] {
            let mut errors = FieldErrors::default();
            email(&mut errors, "email", bad);
            assert!(!errors.is_empty(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::default();
        errors.add("title", "first");
        errors.add("title", "second");
        assert_eq!(errors.get("title"), Some("first"));
        assert_eq!(errors.to_string(), "title: first");
    }
}
