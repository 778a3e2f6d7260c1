//! Driven port for the movie catalogue REST backend.
//!
//! The port is stateless: callers pass the bearer token and account email
//! explicitly, so the adapter never reads local session state.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::{AuthToken, Credentials, MovieId, MovieRecord, Registration, UserRecord, UserUpdate};

define_port_error! {
    /// Normalized failure surfaced to callers.
    ///
    /// `Display` renders only the human-readable message so UI text stays
    /// stable regardless of the variant.
    pub enum ApiError {
        /// No response reached the client.
        Network {
            /// Normalized message.
            message: String,
        } => "{message}",
        /// The server rejected the request with a structured 4xx body.
        Validation {
            /// HTTP status code.
            status: u16,
            /// Normalized message.
            message: String,
        } => "{message}",
        /// 5xx, unstructured error body, or an unexpected success body.
        Server {
            /// HTTP status code.
            status: u16,
            /// Normalized message.
            message: String,
        } => "{message}",
        /// No usable local session for an authenticated operation.
        Session {
            /// Normalized message.
            message: String,
        } => "{message}",
    }
}

impl ApiError {
    /// Human-readable message for presentation.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Validation { message, .. }
            | Self::Server { message, .. }
            | Self::Session { message } => message.as_str(),
        }
    }

    /// HTTP status when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Network { .. } | Self::Session { .. } => None,
        }
    }

    /// The error raised when an authenticated call has no session.
    #[must_use]
    pub fn not_logged_in() -> Self {
        Self::session("You are not logged in. Please log in to continue.")
    }
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    pub token: AuthToken,
    /// Authenticated account.
    pub user: UserRecord,
}

/// Opaque server acknowledgement for favourite changes.
///
/// Empty bodies decode as `Value::Null`; non-JSON text is kept as a string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Acknowledgement(pub Value);

/// Confirmation returned by account deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Server message, e.g. "ada@example.com was deleted.".
    pub message: String,
}

/// Port for the movie catalogue REST API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// `POST /users`: create an account.
    async fn register(&self, registration: &Registration) -> Result<UserRecord, ApiError>;

    /// `POST /login`: exchange credentials for a token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `GET /movies`: the full catalogue.
    async fn list_movies(&self, token: &AuthToken) -> Result<Vec<MovieRecord>, ApiError>;

    /// `GET /users/{email}/favoriteMovies`.
    async fn get_favorites(
        &self,
        token: &AuthToken,
        email: &str,
    ) -> Result<Vec<MovieRecord>, ApiError>;

    /// `POST /users/{email}/favoriteMovies/{movieId}`.
    async fn add_favorite(
        &self,
        token: &AuthToken,
        email: &str,
        movie_id: &MovieId,
    ) -> Result<Acknowledgement, ApiError>;

    /// `DELETE /users/{email}/favoriteMovies/{movieId}`.
    async fn remove_favorite(
        &self,
        token: &AuthToken,
        email: &str,
        movie_id: &MovieId,
    ) -> Result<Acknowledgement, ApiError>;

    /// `PATCH /users/{email}`: returns the updated account.
    async fn edit_user(
        &self,
        token: &AuthToken,
        email: &str,
        update: &UserUpdate,
    ) -> Result<UserRecord, ApiError>;

    /// `DELETE /users/{email}`.
    async fn delete_user(&self, token: &AuthToken, email: &str) -> Result<Confirmation, ApiError>;
}
