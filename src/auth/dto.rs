use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::present};

/// Request body for registration. Fields are optional so a missing one is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Registration input after boundary validation.
#[derive(Debug, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        match (
            present(self.username),
            present(self.email),
            self.password.filter(|p| !p.is_empty()),
        ) {
            (Some(username), Some(email), Some(password)) => Ok(Registration {
                username,
                email,
                password,
            }),
            _ => Err(ApiError::validation("Missing required fields")),
        }
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ApiError> {
        match (present(self.username), self.password.filter(|p| !p.is_empty())) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            _ => Err(ApiError::validation("Missing username or password")),
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}
