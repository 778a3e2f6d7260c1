//! Domain model for the movie catalogue client.
//!
//! Purpose: define the records exchanged with the catalogue backend, the
//! persisted session contract, and the [`CatalogueClient`] façade that
//! presentation code talks to. Transport and storage details stay behind
//! the ports in [`ports`].

pub mod catalogue_client;
pub mod movie;
pub mod ports;
pub mod session;
pub mod session_store;
pub mod user;

pub use self::catalogue_client::{CatalogueClient, FavoriteToggle};
pub use self::movie::{Director, Genre, MovieId, MovieIdError, MovieRecord};
pub use self::session::{AuthToken, Session};
pub use self::session_store::{SessionStore, TOKEN_KEY, USER_KEY};
pub use self::user::{
    Credentials, FavoriteMovies, Registration, UserRecord, UserUpdate, UserValidationError,
};
