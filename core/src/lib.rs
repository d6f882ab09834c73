//! Synchronous API client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip.
//!
//! # Design
//! - `TodoClient` holds only `base_url` and an optional bearer token.
//! - Each endpoint is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - Todos are open JSON maps plus a string `id`; the client imposes no schema.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{AccessToken, Todo};
