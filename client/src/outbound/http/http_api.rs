//! Reqwest-backed movie API adapter.
//!
//! This adapter owns transport details only: URL construction, bearer
//! headers, error normalization, and decoding JSON into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::dto::{LoginRequestDto, LoginResponseDto, RegistrationDto, UserUpdateDto};
use super::normalize::{FailureBody, body_read_error, status_error, transport_error};
use crate::domain::ports::{Acknowledgement, ApiError, Confirmation, LoginResponse, MovieApi};
use crate::domain::{AuthToken, Credentials, MovieId, MovieRecord, Registration, UserRecord, UserUpdate};

/// Base URL of the hosted myFlix API.
pub const DEFAULT_BASE_URL: &str = "https://myflix-z30i.onrender.com/";

const FAVORITE_MOVIES_SEGMENT: &str = "favoriteMovies";

/// Errors raised while constructing [`HttpMovieApi`].
#[derive(Debug, Error)]
pub enum HttpMovieApiBuildError {
    /// The base URL cannot take path segments (e.g. `mailto:`).
    #[error("base URL '{url}' cannot be used as an API root")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
    },
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Movie API adapter issuing one HTTP request per call.
///
/// # Examples
///
/// ```rust,no_run
/// use myflix_client::outbound::http::{DEFAULT_BASE_URL, HttpMovieApi};
/// use reqwest::Url;
///
/// let api = HttpMovieApi::new(Url::parse(DEFAULT_BASE_URL)?, None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpMovieApi {
    client: Client,
    base_url: Url,
}

impl HttpMovieApi {
    /// Build an adapter rooted at `base_url`.
    ///
    /// `timeout` bounds each whole request; `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry paths or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, HttpMovieApiBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(HttpMovieApiBuildError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// API root this adapter talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::network(format!("Error: cannot build a path on {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let response = request.send().await.map_err(|error| {
            debug!(operation, %error, "movie api request failed before a response");
            transport_error(&error)
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| {
                debug!(operation, %error, "movie api response body unreadable");
                body_read_error(status, &error)
            })?
            .to_vec();
        debug!(operation, status = status.as_u16(), bytes = body.len(), "movie api response");

        if !status.is_success() {
            return Err(status_error(status, &FailureBody::from_bytes(&body)));
        }
        Ok((status, body))
    }
}

fn decode_json<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|err| {
        ApiError::server(
            status.as_u16(),
            format!("Unexpected response from server: {err}"),
        )
    })
}

fn decode_movies(status: StatusCode, body: &[u8]) -> Result<Vec<MovieRecord>, ApiError> {
    decode_json::<Option<Vec<MovieRecord>>>(status, body).map(Option::unwrap_or_default)
}

fn decode_acknowledgement(body: &[u8]) -> Acknowledgement {
    match FailureBody::from_bytes(body) {
        FailureBody::Empty => Acknowledgement(Value::Null),
        FailureBody::Text(text) => Acknowledgement(Value::String(text)),
        FailureBody::Json(value) => Acknowledgement(value),
    }
}

fn decode_confirmation(body: &[u8]) -> Confirmation {
    let message = match FailureBody::from_bytes(body) {
        FailureBody::Empty => String::new(),
        FailureBody::Text(text) => text.trim().to_owned(),
        FailureBody::Json(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_owned),
    };
    Confirmation { message }
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn register(&self, registration: &Registration) -> Result<UserRecord, ApiError> {
        let url = self.endpoint(&["users"])?;
        let request = self.client.post(url).json(&RegistrationDto::from(registration));
        let (status, body) = self.execute("register", request).await?;
        decode_json(status, &body)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&["login"])?;
        let request = self.client.post(url).json(&LoginRequestDto::from(credentials));
        let (status, body) = self.execute("login", request).await?;
        let decoded: LoginResponseDto = decode_json(status, &body)?;
        decoded.into_domain().ok_or_else(|| {
            ApiError::server(status.as_u16(), "Unexpected response from server: empty token")
        })
    }

    async fn list_movies(&self, token: &AuthToken) -> Result<Vec<MovieRecord>, ApiError> {
        let url = self.endpoint(&["movies"])?;
        let request = self.client.get(url).bearer_auth(token.expose());
        let (status, body) = self.execute("list_movies", request).await?;
        decode_movies(status, &body)
    }

    async fn get_favorites(
        &self,
        token: &AuthToken,
        email: &str,
    ) -> Result<Vec<MovieRecord>, ApiError> {
        let url = self.endpoint(&["users", email, FAVORITE_MOVIES_SEGMENT])?;
        let request = self.client.get(url).bearer_auth(token.expose());
        let (status, body) = self.execute("get_favorites", request).await?;
        decode_movies(status, &body)
    }

    async fn add_favorite(
        &self,
        token: &AuthToken,
        email: &str,
        movie_id: &MovieId,
    ) -> Result<Acknowledgement, ApiError> {
        let url = self.endpoint(&["users", email, FAVORITE_MOVIES_SEGMENT, movie_id.as_ref()])?;
        let request = self
            .client
            .post(url)
            .bearer_auth(token.expose())
            .json(&serde_json::json!({}));
        let (_, body) = self.execute("add_favorite", request).await?;
        Ok(decode_acknowledgement(&body))
    }

    async fn remove_favorite(
        &self,
        token: &AuthToken,
        email: &str,
        movie_id: &MovieId,
    ) -> Result<Acknowledgement, ApiError> {
        let url = self.endpoint(&["users", email, FAVORITE_MOVIES_SEGMENT, movie_id.as_ref()])?;
        let request = self.client.delete(url).bearer_auth(token.expose());
        let (_, body) = self.execute("remove_favorite", request).await?;
        Ok(decode_acknowledgement(&body))
    }

    async fn edit_user(
        &self,
        token: &AuthToken,
        email: &str,
        update: &UserUpdate,
    ) -> Result<UserRecord, ApiError> {
        let url = self.endpoint(&["users", email])?;
        let request = self
            .client
            .patch(url)
            .bearer_auth(token.expose())
            .json(&UserUpdateDto::from(update));
        let (status, body) = self.execute("edit_user", request).await?;
        decode_json(status, &body)
    }

    async fn delete_user(&self, token: &AuthToken, email: &str) -> Result<Confirmation, ApiError> {
        let url = self.endpoint(&["users", email])?;
        let request = self.client.delete(url).bearer_auth(token.expose());
        let (_, body) = self.execute("delete_user", request).await?;
        Ok(decode_confirmation(&body))
    }
}
