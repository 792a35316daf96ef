//! Login and registration request bodies.

use serde::Serialize;

use nimbus_core::error::AppError;

/// Body for `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Create a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject obviously incomplete credentials before any request.
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body for `POST /auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl RegisterRequest {
    /// Validate the form fields.
    pub fn validate(&self, confirm_password: &str) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::validation("First and last name are required"));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if self.password != confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::validation("Invalid email address")),
    }
}
