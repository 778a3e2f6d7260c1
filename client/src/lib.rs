//! Client library for the myFlix movie catalogue API.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] holds the records, the session contract and the
//!   [`domain::CatalogueClient`] façade.
//! - [`outbound`] holds the reqwest adapter for the REST backend and the
//!   key-value stores backing the session.
//! - [`config`] and [`cli`] wire those pieces into the `myflix` binary.

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;
