//! Declared field constraints for every form the site accepts.
//!
//! Forms arrive as urlencoded strings, so each form is a struct of optional
//! raw strings that `validate` turns into typed fields or a map of per-field
//! messages. Fields a form does not declare (an `owner` or `cat` value, a
//! `name` on the cat update form) are dropped during deserialization.

pub mod account;
pub mod cat;
pub mod feeding;
pub mod toy;

use std::collections::HashMap;

pub use account::{LoginForm, SignupForm};
pub use cat::{CatChanges, CatFields, CatForm, CatUpdateForm};
pub use feeding::{FeedingFields, FeedingForm};
pub use toy::{ToyFields, ToyForm};

pub type FieldErrors = HashMap<String, String>;

pub trait Validate {
    type Output;

    /// Form name used in rendered view models
    const NAME: &'static str;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;

    /// Fixed value sets for choice fields, keyed by field name
    fn choices() -> Vec<(&'static str, Vec<&'static str>)> {
        Vec::new()
    }
}

pub(crate) const REQUIRED: &str = "This field is required.";

/// Trimmed, non-empty value of a required field, recording an error otherwise
pub(crate) fn required<'a>(errors: &mut FieldErrors, field: &str, value: &'a Option<String>) -> Option<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.insert(field.to_string(), REQUIRED.to_string());
            None
        }
    }
}

/// Enforce a maximum length in characters
pub(crate) fn max_length<'a>(errors: &mut FieldErrors, field: &str, value: &'a str, max: usize) -> Option<&'a str> {
    let len = value.chars().count();
    if len > max {
        errors.insert(
            field.to_string(),
            format!("Ensure this value has at most {} characters (it has {}).", max, len),
        );
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_flags_blanks() {
        let mut errors = FieldErrors::new();
        assert_eq!(required(&mut errors, "name", &Some("  Tom ".into())), Some("Tom"));
        assert!(errors.is_empty());

        assert_eq!(required(&mut errors, "name", &Some("   ".into())), None);
        assert_eq!(required(&mut errors, "color", &None), None);
        assert_eq!(errors.get("name").map(String::as_str), Some(REQUIRED));
        assert!(errors.contains_key("color"));
    }

    #[test]
    fn max_length_counts_chars_not_bytes() {
        let mut errors = FieldErrors::new();
        assert!(max_length(&mut errors, "name", "ééé", 3).is_some());
        assert!(max_length(&mut errors, "name", "éééé", 3).is_none());
        assert!(errors["name"].contains("at most 3"));
    }
}
