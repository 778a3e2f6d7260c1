//! Domain ports.
//!
//! Driven ports describe what the client needs from the outside world: the
//! REST backend and a local key-value store. Adapters live under
//! `crate::outbound`.

mod key_value_store;
mod macros;
mod movie_api;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, StoreError};
#[cfg(test)]
pub use movie_api::MockMovieApi;
pub use movie_api::{Acknowledgement, ApiError, Confirmation, LoginResponse, MovieApi};
