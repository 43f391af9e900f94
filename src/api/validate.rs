use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::ApiError;

pub const PASSWORD_SPECIALS: &str = "@$!%*?&";
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Accumulates per-field problems so one response reports all of them.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok && !self.errors.contains_key(field) {
            self.errors.insert(field.to_string(), message.into());
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "This field is required")
    }

    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        self.check(
            field,
            value.chars().count() >= min,
            format!("Must be at least {} characters", min),
        )
    }

    pub fn required_date(&mut self, field: &str, value: Option<NaiveDate>) -> &mut Self {
        self.check(field, value.is_some(), "This field is required")
    }

    pub fn date_order(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> &mut Self {
        if let (Some(start), Some(end)) = (start, end) {
            self.check("endDate", end >= start, "End date must not be before start date");
        }
        self
    }

    pub fn into_result(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let errors = std::mem::take(&mut self.errors);
        let message = if errors.len() == 1 {
            errors.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect::<String>()
        } else {
            "Request validation failed".to_string()
        };
        Err(ApiError::validation_error(message, Some(errors)))
    }
}

/// At least eight characters: one lowercase, one uppercase, one digit and
/// one of `@$!%*?&`, with nothing outside letters, digits and those specials.
pub fn is_valid_password(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut special = false;

    for c in password.chars() {
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            c if PASSWORD_SPECIALS.contains(c) => special = true,
            _ => return false,
        }
    }

    password.chars().count() >= PASSWORD_MIN_LENGTH && lower && upper && digit && special
}

pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
}
