//! Client façade over the movie API and the persisted session.
//!
//! Presentation code talks to [`CatalogueClient`] only. It is the single
//! owner of the session store: authenticated calls read the token and email
//! from it, and login, profile edits, favourite toggles, logout and account
//! deletion write to it.

use std::sync::Arc;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{Acknowledgement, ApiError, Confirmation, KeyValueStore, MovieApi};
use crate::domain::session_store::SessionStore;
use crate::domain::{
    Credentials, MovieId, MovieRecord, Registration, Session, UserRecord, UserUpdate,
};

/// Outcome of [`CatalogueClient::toggle_favorite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The movie was not a favourite and now is.
    Added,
    /// The movie was a favourite and no longer is.
    Removed,
}

/// Movie catalogue client.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use myflix_client::domain::{CatalogueClient, Credentials};
/// use myflix_client::outbound::http::{DEFAULT_BASE_URL, HttpMovieApi};
/// use myflix_client::outbound::storage::InMemoryKeyValueStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpMovieApi::new(DEFAULT_BASE_URL.parse()?, None)?;
/// let client = CatalogueClient::new(Arc::new(api), InMemoryKeyValueStore::default());
///
/// let credentials = Credentials::try_from_parts("ada@example.com", "secret")?;
/// let session = client.login(&credentials).await?;
/// println!("Welcome {}", session.user().firstname);
/// for movie in client.list_movies().await? {
///     println!("{}", movie.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CatalogueClient<A, S> {
    api: Arc<A>,
    session: SessionStore<S>,
}

impl<A, S: KeyValueStore> CatalogueClient<A, S> {
    /// Create a client that owns `store` as its session storage.
    pub fn new(api: Arc<A>, store: S) -> Self {
        Self {
            api,
            session: SessionStore::new(store),
        }
    }
}

impl<A, S> CatalogueClient<A, S>
where
    A: MovieApi,
    S: KeyValueStore,
{
    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns the normalized server error, typically a validation failure.
    pub async fn register(&self, registration: &Registration) -> Result<UserRecord, ApiError> {
        let user = self.api.register(registration).await?;
        info!(email = %user.email, "account registered");
        Ok(user)
    }

    /// Authenticate and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns the normalized server error on bad credentials; nothing is
    /// stored in that case.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let response = self.api.login(credentials).await?;
        let session = Session::new(response.token, response.user);
        self.session.save(&session)?;
        info!(email = %session.user().email, "logged in");
        Ok(session)
    }

    /// Forget the stored user and token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when the store cannot be written.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }

    /// The locally stored user, if logged in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when the store cannot be read.
    pub fn current_user(&self) -> Result<Option<UserRecord>, ApiError> {
        Ok(self.session.load()?.map(|session| session.into_parts().1))
    }

    /// Whether `movie_id` is in the stored user's favourites.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in.
    pub fn is_favorite(&self, movie_id: &MovieId) -> Result<bool, ApiError> {
        Ok(self.session.require()?.user().is_favorite(movie_id))
    }

    /// The full catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error.
    pub async fn list_movies(&self) -> Result<Vec<MovieRecord>, ApiError> {
        let session = self.session.require()?;
        self.api.list_movies(session.token()).await
    }

    /// One movie from the catalogue, for detail views.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_movies`].
    pub async fn find_movie(&self, movie_id: &MovieId) -> Result<Option<MovieRecord>, ApiError> {
        Ok(self
            .list_movies()
            .await?
            .into_iter()
            .find(|movie| &movie.id == movie_id))
    }

    /// Server-side favourites of the account `email`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error.
    pub async fn favorites(&self, email: &str) -> Result<Vec<MovieRecord>, ApiError> {
        let session = self.session.require()?;
        self.api.get_favorites(session.token(), email).await
    }

    /// Catalogue entries whose ids are in the local favourites, in catalogue
    /// order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_movies`].
    pub async fn favorite_movies(&self) -> Result<Vec<MovieRecord>, ApiError> {
        let session = self.session.require()?;
        let movies = self.api.list_movies(session.token()).await?;
        Ok(movies
            .into_iter()
            .filter(|movie| session.user().is_favorite(&movie.id))
            .collect())
    }

    /// Add a favourite on the server for the stored user.
    ///
    /// Local state is not touched; see [`Self::toggle_favorite`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error.
    pub async fn add_favorite(&self, movie_id: &MovieId) -> Result<Acknowledgement, ApiError> {
        let session = self.session.require()?;
        self.api
            .add_favorite(session.token(), &session.user().email, movie_id)
            .await
    }

    /// Remove a favourite on the server for the stored user.
    ///
    /// Local state is not touched; see [`Self::toggle_favorite`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error.
    pub async fn remove_favorite(&self, movie_id: &MovieId) -> Result<Acknowledgement, ApiError> {
        let session = self.session.require()?;
        self.api
            .remove_favorite(session.token(), &session.user().email, movie_id)
            .await
    }

    /// Flip the favourite state of `movie_id`.
    ///
    /// The server is called first. Only after it acknowledges is the stored
    /// user re-read, updated and persisted, so concurrent toggles resolve as
    /// last-response-wins. A failed call leaves local state unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in (before or after the
    /// call), otherwise the normalized server error.
    pub async fn toggle_favorite(&self, movie_id: &MovieId) -> Result<FavoriteToggle, ApiError> {
        let session = self.session.require()?;
        let (token, user) = session.into_parts();

        let outcome = if user.is_favorite(movie_id) {
            self.api
                .remove_favorite(&token, &user.email, movie_id)
                .await
                .map(|_| FavoriteToggle::Removed)
        } else {
            self.api
                .add_favorite(&token, &user.email, movie_id)
                .await
                .map(|_| FavoriteToggle::Added)
        };
        let toggle = outcome.inspect_err(|error| {
            warn!(
                movie_id = %movie_id,
                error = %error,
                "favorite toggle failed; local favorites unchanged"
            );
        })?;

        let mut current = self.session.require()?.into_parts().1;
        match toggle {
            FavoriteToggle::Added => current.favorite_movies.insert(movie_id.clone()),
            FavoriteToggle::Removed => current.favorite_movies.remove(movie_id),
        };
        self.session.save_user(&current)?;
        debug!(
            movie_id = %movie_id,
            ?toggle,
            favorites = current.favorite_movies.len(),
            "favorite toggled"
        );
        Ok(toggle)
    }

    /// Apply a profile update for the stored user and persist the returned
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error. The stored user is unchanged on failure.
    pub async fn edit_user(&self, update: &UserUpdate) -> Result<UserRecord, ApiError> {
        let session = self.session.require()?;
        let updated = self
            .api
            .edit_user(session.token(), &session.user().email, update)
            .await?;
        self.session.save_user(&updated)?;
        info!(email = %updated.email, "profile updated");
        Ok(updated)
    }

    /// Change the password, resending the stored first and last name.
    ///
    /// # Errors
    ///
    /// Same as [`Self::edit_user`].
    pub async fn change_password(
        &self,
        new_password: Zeroizing<String>,
    ) -> Result<UserRecord, ApiError> {
        let session = self.session.require()?;
        let update = UserUpdate::password_change(session.user(), new_password);
        self.edit_user(&update).await
    }

    /// Phrase the user must type to confirm account deletion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in.
    pub fn deletion_phrase(&self) -> Result<String, ApiError> {
        let session = self.session.require()?;
        Ok(format!("Delete account {}", session.user().email))
    }

    /// Delete the stored user's account, then clear the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when not logged in, otherwise the
    /// normalized server error. The session is kept when the server refuses.
    pub async fn delete_user(&self) -> Result<Confirmation, ApiError> {
        let session = self.session.require()?;
        let confirmation = self
            .api
            .delete_user(session.token(), &session.user().email)
            .await?;
        self.session.clear()?;
        info!(email = %session.user().email, "account deleted");
        Ok(confirmation)
    }
}

#[cfg(test)]
#[path = "catalogue_client_tests.rs"]
mod tests;
