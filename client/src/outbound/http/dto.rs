//! Wire shapes for request and response bodies.
//!
//! Request DTOs borrow from domain values so secrets are never copied into
//! owned serializable structs.

use serde::{Deserialize, Serialize};

use crate::domain::ports::LoginResponse;
use crate::domain::{AuthToken, Credentials, Registration, UserRecord, UserUpdate};

#[derive(Serialize)]
pub(crate) struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequestDto<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: credentials.email(),
            password: credentials.password(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegistrationDto<'a> {
    firstname: &'a str,
    lastname: &'a str,
    password: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<&'a str>,
}

impl<'a> From<&'a Registration> for RegistrationDto<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            firstname: registration.firstname.as_str(),
            lastname: registration.lastname.as_str(),
            password: registration.password(),
            email: registration.email(),
            birthday: registration.birthday.as_deref(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct UserUpdateDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    firstname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lastname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birthday: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl<'a> From<&'a UserUpdate> for UserUpdateDto<'a> {
    fn from(update: &'a UserUpdate) -> Self {
        Self {
            firstname: update.firstname.as_deref(),
            lastname: update.lastname.as_deref(),
            email: update.email.as_deref(),
            birthday: update.birthday.as_deref(),
            password: update.password.as_ref().map(|password| password.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponseDto {
    token: String,
    user: UserRecord,
}

impl LoginResponseDto {
    /// Convert into the domain response; `None` when the token is blank.
    pub(crate) fn into_domain(self) -> Option<LoginResponse> {
        let token = AuthToken::new(self.token)?;
        Some(LoginResponse {
            token,
            user: self.user,
        })
    }
}
