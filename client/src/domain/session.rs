//! Authenticated session: a bearer token paired with the user it belongs to.

use std::fmt;

use zeroize::Zeroizing;

use super::user::UserRecord;

/// Opaque bearer token issued by `POST /login`.
///
/// `Debug` output never includes the token and the backing string is wiped
/// on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a raw token. Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(Zeroizing::new(raw)))
    }

    /// Raw token for the `Authorization` header and the `token` entry.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Logged-in state.
///
/// ## Invariants
/// - A session always has both a token and a user; there is no way to hold
///   one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: AuthToken,
    user: UserRecord,
}

impl Session {
    /// Pair a token with its user.
    #[must_use]
    pub fn new(token: AuthToken, user: UserRecord) -> Self {
        Self { token, user }
    }

    /// Bearer token.
    #[must_use]
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Locally mirrored user record.
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Replace the user record, keeping the token.
    #[must_use]
    pub fn with_user(self, user: UserRecord) -> Self {
        Self {
            token: self.token,
            user,
        }
    }

    /// Split into token and user.
    #[must_use]
    pub fn into_parts(self) -> (AuthToken, UserRecord) {
        (self.token, self.user)
    }
}
