//! User records and the request payloads that create or change them.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::movie::MovieId;

/// Validation errors raised while building user-facing payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Insertion-ordered set of favourite movie identifiers.
///
/// ## Invariants
/// - No identifier appears twice, including after deserializing a server
///   payload that repeats one.
///
/// # Examples
/// ```
/// use myflix_client::domain::{FavoriteMovies, MovieId};
///
/// let mut favorites = FavoriteMovies::default();
/// let id = MovieId::new("m1").unwrap();
/// assert!(favorites.insert(id.clone()));
/// assert!(!favorites.insert(id.clone()));
/// assert_eq!(favorites.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<MovieId>", into = "Vec<MovieId>")]
pub struct FavoriteMovies(Vec<MovieId>);

impl FavoriteMovies {
    /// Whether `id` is in the set.
    #[must_use]
    pub fn contains(&self, id: &MovieId) -> bool {
        self.0.contains(id)
    }

    /// Append `id` unless present. Returns whether the set changed.
    pub fn insert(&mut self, id: MovieId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove `id` if present. Returns whether the set changed.
    pub fn remove(&mut self, id: &MovieId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    /// Number of favourites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MovieId> {
        self.0.iter()
    }
}

impl From<Vec<MovieId>> for FavoriteMovies {
    fn from(ids: Vec<MovieId>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            favorites.insert(id);
        }
        favorites
    }
}

impl From<FavoriteMovies> for Vec<MovieId> {
    fn from(value: FavoriteMovies) -> Self {
        value.0
    }
}

impl FromIterator<MovieId> for FavoriteMovies {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Locally mirrored account record.
///
/// Serialized in the server's camelCase shape; this is also the format of
/// the persisted `user` session entry. Unknown server fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique account identifier.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub firstname: String,
    /// Family name.
    #[serde(default)]
    pub lastname: String,
    /// Birthday as sent by the server, usually an ISO-8601 timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Favourite movie identifiers.
    #[serde(default)]
    pub favorite_movies: FavoriteMovies,
}

impl UserRecord {
    /// "firstname lastname", trimmed, for greetings.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_owned()
    }

    /// Birthday rendered as `yyyy-MM-dd` for date inputs.
    ///
    /// Returns `None` when no birthday is stored or it cannot be parsed.
    ///
    /// # Examples
    /// ```
    /// use myflix_client::domain::UserRecord;
    ///
    /// let user: UserRecord = serde_json::from_str(
    ///     r#"{"email":"a@b.c","birthday":"1990-04-01T00:00:00.000Z"}"#,
    /// ).unwrap();
    /// assert_eq!(user.birthday_for_input().as_deref(), Some("1990-04-01"));
    /// ```
    #[must_use]
    pub fn birthday_for_input(&self) -> Option<String> {
        let raw = self.birthday.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let date = DateTime::parse_from_rfc3339(raw)
            .map(|parsed| parsed.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()?;
        Some(date.format("%Y-%m-%d").to_string())
    }

    /// Whether `id` is one of this user's favourites.
    #[must_use]
    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.favorite_movies.contains(id)
    }
}

/// Login credentials.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty; it keeps caller-provided whitespace and is
///   zeroized on drop.
///
/// # Examples
/// ```
/// use myflix_client::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: Credentials,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Birthday, `yyyy-MM-dd`.
    pub birthday: Option<String>,
}

impl Registration {
    /// Build a registration from validated credentials and profile fields.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        birthday: Option<String>,
    ) -> Self {
        Self {
            credentials,
            firstname: firstname.into(),
            lastname: lastname.into(),
            birthday,
        }
    }

    /// Email the account will be registered under.
    #[must_use]
    pub fn email(&self) -> &str {
        self.credentials.email()
    }

    /// Initial password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.credentials.password()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("credentials", &self.credentials)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("birthday", &self.birthday)
            .finish()
    }
}

/// Partial profile update; `None` fields are left untouched by the server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// New given name.
    pub firstname: Option<String>,
    /// New family name.
    pub lastname: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New birthday, `yyyy-MM-dd`.
    pub birthday: Option<String>,
    /// New password.
    pub password: Option<Zeroizing<String>>,
}

impl UserUpdate {
    /// Whether the update carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
            && self.password.is_none()
    }

    /// Profile form update: names, email and birthday taken from `user`.
    #[must_use]
    pub fn profile_of(user: &UserRecord) -> Self {
        Self {
            firstname: Some(user.firstname.clone()),
            lastname: Some(user.lastname.clone()),
            email: Some(user.email.clone()),
            birthday: user.birthday_for_input(),
            password: None,
        }
    }

    /// Password form update: the stored names plus `new_password`.
    #[must_use]
    pub fn password_change(user: &UserRecord, new_password: Zeroizing<String>) -> Self {
        Self {
            firstname: Some(user.firstname.clone()),
            lastname: Some(user.lastname.clone()),
            password: Some(new_password),
            ..Self::default()
        }
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("birthday", &self.birthday)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
