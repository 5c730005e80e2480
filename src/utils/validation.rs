//! Client-side input validation run before any request is made.

use log::*;
use regex::Regex;
use std::sync::OnceLock;

/// Problem with a single form field.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Failed to compile email pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Value must contain something other than whitespace.
///
pub fn required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError {
            field,
            message: "is required".to_string(),
        });
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), FieldError> {
    required(field, value)?;
    let valid = match email_pattern() {
        Some(re) => re.is_match(value.trim()),
        None => value.contains('@'),
    };
    if !valid {
        return Err(FieldError {
            field,
            message: "is not a valid email address".to_string(),
        });
    }
    Ok(())
}

/// Password must be present and at least `min` characters long.
///
pub fn password(field: &'static str, value: &str, min: usize) -> Result<(), FieldError> {
    required(field, value)?;
    if value.chars().count() < min {
        return Err(FieldError {
            field,
            message: format!("must be at least {} characters", min),
        });
    }
    Ok(())
}

/// Both password entries must be identical.
///
pub fn matching(field: &'static str, value: &str, confirmation: &str) -> Result<(), FieldError> {
    if value != confirmation {
        return Err(FieldError {
            field,
            message: "does not match".to_string(),
        });
    }
    Ok(())
}
