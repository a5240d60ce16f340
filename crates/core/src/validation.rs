//! Form validation rules
//!
//! Runs before any network call. Every failing rule contributes a message, and
//! messages are grouped by the field they belong to so a form can show them
//! next to the offending input.

use crate::types::{Credentials, RegistrationForm};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

pub const CEDULA_MAX_LEN: usize = 10;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const NAME_MAX_LEN: usize = 50;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]+$").expect("name pattern is a valid regex")
});

/// Form fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Cedula,
    Password,
    ConfirmPassword,
    FirstName,
    LastName,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cedula => "cedula",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-specific validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    fn extend(&mut self, field: Field, messages: Vec<String>) {
        for message in messages {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field, empty if the field passed
    pub fn messages(&self, field: Field) -> &[String] {
        self.fields.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &[String])> {
        self.fields.iter().map(|(f, m)| (*f, m.as_slice()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Rules for the national ID
pub fn validate_cedula(cedula: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let len = cedula.chars().count();
    if len < 1 {
        errors.push("Cedula is required".to_string());
    }
    if len > CEDULA_MAX_LEN {
        errors.push(format!("Cedula cannot exceed {CEDULA_MAX_LEN} characters"));
    }
    errors
}

/// Strength rules for a new password
pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        errors.push(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        ));
    }
    if len > PASSWORD_MAX_LEN {
        errors.push(format!(
            "Password cannot exceed {PASSWORD_MAX_LEN} characters"
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        errors.push(
            "Password must contain at least one lowercase letter, one uppercase letter and one number"
                .to_string(),
        );
    }
    errors
}

fn validate_name(value: &str, label: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let len = value.chars().count();
    if len < 1 {
        errors.push(format!("{label} is required"));
    }
    if len > NAME_MAX_LEN {
        errors.push(format!("{label} cannot exceed {NAME_MAX_LEN} characters"));
    }
    if !NAME_PATTERN.is_match(value) {
        errors.push(format!("{label} can only contain letters and spaces"));
    }
    errors
}

/// Validate the login form
pub fn validate_login(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.extend(Field::Cedula, validate_cedula(&credentials.cedula));
    if credentials.password.is_empty() {
        errors.add(Field::Password, "Password is required");
    }
    errors.into_result()
}

/// Validate the registration form
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.extend(Field::Cedula, validate_cedula(&form.cedula));
    errors.extend(Field::Password, validate_password(&form.password));
    if form.confirm_password.is_empty() {
        errors.add(Field::ConfirmPassword, "Confirm your password");
    }
    errors.extend(Field::FirstName, validate_name(&form.first_name, "First name"));
    errors.extend(Field::LastName, validate_name(&form.last_name, "Last name"));
    // Only checked once the individual fields pass
    if errors.is_empty() && form.password != form.confirm_password {
        errors.add(Field::ConfirmPassword, "Passwords do not match");
    }
    errors.into_result()
}
