//! Persisted session contract over a [`KeyValueStore`].
//!
//! Two entries are kept: `token` holds the raw bearer token and `user` the
//! JSON-serialized [`UserRecord`]. A pair with only one entry present is
//! read as "no session".

use tracing::warn;

use crate::domain::ports::{ApiError, KeyValueStore, StoreError};
use crate::domain::{AuthToken, Session, UserRecord};

/// Key of the raw bearer token entry.
pub const TOKEN_KEY: &str = "token";
/// Key of the JSON user record entry.
pub const USER_KEY: &str = "user";

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self::session(error.to_string())
    }
}

/// Owner of the locally persisted session.
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the current session, if both entries are present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails or the `user` entry is not
    /// a valid user record.
    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        let token = self.store.get(TOKEN_KEY)?.and_then(AuthToken::new);
        let user = self.load_user()?;
        match (token, user) {
            (Some(token), Some(user)) => Ok(Some(Session::new(token, user))),
            (None, None) => Ok(None),
            (token, user) => {
                warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "half-present session ignored"
                );
                Ok(None)
            }
        }
    }

    /// Read the current session or fail with [`ApiError::Session`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when no session is stored or the store
    /// fails.
    pub fn require(&self) -> Result<Session, ApiError> {
        self.load()?.ok_or_else(ApiError::not_logged_in)
    }

    /// Persist a freshly created session, replacing any previous one.
    ///
    /// The previous pair is cleared first, then `token` and `user` are
    /// written. A failed `user` write removes the new token again, so a
    /// token is never left paired with another account's record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any write fails; no session is stored
    /// afterwards.
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.clear()?;
        self.store.set(TOKEN_KEY, session.token().expose())?;
        self.save_user(session.user()).inspect_err(|error| {
            warn!(%error, "session user write failed; discarding token");
            drop(self.store.remove(TOKEN_KEY));
        })
    }

    /// Rewrite only the `user` entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the write fails.
    pub fn save_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(user)
            .map_err(|err| StoreError::corrupt(format!("failed to encode user: {err}")))?;
        self.store.set(USER_KEY, &encoded)
    }

    /// Remove `user` then `token`.
    ///
    /// The two removals are not atomic; an interruption between them leaves
    /// a token without a user, which [`Self::load`] treats as no session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when either removal fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(USER_KEY)?;
        self.store.remove(TOKEN_KEY)
    }

    fn load_user(&self) -> Result<Option<UserRecord>, StoreError> {
        let Some(raw) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StoreError::corrupt(format!("stored user is invalid: {err}")))
    }
}
