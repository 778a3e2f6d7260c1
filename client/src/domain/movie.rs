//! Movie catalogue records.
//!
//! The catalogue is read-only from the client's point of view. Records keep
//! any fields the server adds beyond the known ones in an `extra` map so
//! detail views can still show them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validation errors returned by [`MovieId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieIdError {
    /// The identifier was missing or blank once trimmed.
    Empty,
}

impl fmt::Display for MovieIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "movie id must not be empty"),
        }
    }
}

impl std::error::Error for MovieIdError {}

/// Server-assigned movie identifier (`_id` on the wire).
///
/// ## Invariants
/// - The identifier is trimmed and never empty.
///
/// # Examples
/// ```
/// use myflix_client::domain::MovieId;
///
/// let id = MovieId::new("  65f1c0  ").unwrap();
/// assert_eq!(id.as_ref(), "65f1c0");
/// assert!(MovieId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MovieId(String);

impl MovieId {
    /// Validate and construct a [`MovieId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, MovieIdError> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MovieIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for MovieId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<MovieId> for String {
    fn from(value: MovieId) -> Self {
        value.0
    }
}

impl TryFrom<String> for MovieId {
    type Error = MovieIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Director detail embedded in a movie record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    /// Director's name.
    #[serde(default)]
    pub name: String,
    /// Short biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Birth date or year as sent by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<Value>,
    /// Death date or year, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<Value>,
}

/// Genre detail embedded in a movie record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    /// Genre name.
    #[serde(default)]
    pub name: String,
    /// Genre description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One movie as returned by the catalogue endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// Movie identifier.
    #[serde(rename = "_id")]
    pub id: MovieId,
    /// Movie title.
    pub title: String,
    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Director detail.
    #[serde(default)]
    pub director: Director,
    /// Genres in server order.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Poster image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Whether the movie is featured.
    #[serde(default)]
    pub featured: bool,
    /// Fields the client does not model.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl MovieRecord {
    /// Comma-separated genre names for compact listings.
    #[must_use]
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
