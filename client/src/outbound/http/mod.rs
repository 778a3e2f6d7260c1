//! HTTP outbound adapter for the movie catalogue REST API.
//!
//! This module provides a thin reqwest implementation of the `MovieApi`
//! port.

mod dto;
mod http_api;
mod normalize;

pub use http_api::{DEFAULT_BASE_URL, HttpMovieApi, HttpMovieApiBuildError};
