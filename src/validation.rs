//! Field rules for request bodies and the table that turns a failed rule
//! into the message shown to the client.

use crate::error::AppError;

pub const LOGIN_MIN_LEN: usize = 3;
pub const LOGIN_MAX_LEN: usize = 50;
pub const PASSWORD_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Alphanumeric,
    NonNegative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldError {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }

    pub fn message(&self) -> String {
        match (self.field, self.rule) {
            ("login", Rule::MinLength(_)) => "login is too short".to_string(),
            ("login", Rule::MaxLength(_)) => "login is too long".to_string(),
            ("login", Rule::Alphanumeric) => "login should only contain letters and numbers".to_string(),
            ("password", Rule::MinLength(_)) => "password is required".to_string(),
            ("password", Rule::MaxLength(_)) => "password is too long".to_string(),
            (field, Rule::Required) => format!("{} is required", field),
            (field, Rule::MinLength(min)) => format!("{} must be at least {} characters", field, min),
            (field, Rule::MaxLength(max)) => format!("{} must be at most {} characters", field, max),
            (field, Rule::Alphanumeric) => format!("{} should only contain letters and numbers", field),
            (field, Rule::NonNegative) => format!("{} must not be negative", field),
        }
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::ValidationError(err.message())
    }
}

pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, FieldError> {
    value.ok_or(FieldError::new(field, Rule::Required))
}

pub fn length_between(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < min {
        return Err(FieldError::new(field, Rule::MinLength(min)));
    }
    if len > max {
        return Err(FieldError::new(field, Rule::MaxLength(max)));
    }
    Ok(())
}

pub fn alphanumeric(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(FieldError::new(field, Rule::Alphanumeric))
    }
}

pub fn non_negative(field: &'static str, value: i64) -> Result<i64, FieldError> {
    if value < 0 {
        Err(FieldError::new(field, Rule::NonNegative))
    } else {
        Ok(value)
    }
}

/// Login rules applied at registration: 3 to 50 ASCII letters and digits.
pub fn validate_login(login: &str) -> Result<(), FieldError> {
    length_between("login", login, LOGIN_MIN_LEN, LOGIN_MAX_LEN)?;
    alphanumeric("login", login)
}
