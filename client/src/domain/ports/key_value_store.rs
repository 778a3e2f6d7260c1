//! Driven port for the local string-keyed store that holds the session.
//!
//! Mirrors browser local storage: string keys, string values, synchronous
//! access. Implementations serialize individual calls but give no isolation
//! across calls.

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by key-value store adapters.
    pub enum StoreError {
        /// The backing medium could not be read or written.
        Io {
            /// Adapter-specific detail.
            message: String,
        } => "session storage unavailable: {message}",
        /// Stored data could not be decoded.
        Corrupt {
            /// Adapter-specific detail.
            message: String,
        } => "session storage is corrupt: {message}",
    }
}

/// Port for reading and writing local string entries.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
