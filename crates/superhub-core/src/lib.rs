//! # superhub-core
//!
//! Transport-facing building blocks for the SuperHub control-panel API.
//!
//! This crate owns everything that moves a request to the remote service and
//! turns the answer back into a typed value: credentials, the base client,
//! URL resolution and the request/response pipeline. Domain types live in
//! `superhub-api`.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and the structured API error body
//! - [`credentials`] - Request authorization strategies
//! - [`client`] - Base client, builder, URL resolution and the transport seam
//! - [`request`] - Generic "invoke endpoint and decode as `T`" pipeline
//! - [`config`] - Serializable, validated client configuration
//! - [`ids`] - Strongly-typed identifiers for SuperHub resources

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ids;
pub mod request;

// Re-export commonly used types
pub use client::{Client, ClientBuilder, Transport, DEFAULT_BASE_URL};
pub use config::SuperhubClientConfig;
pub use credentials::{Credentials, PersistentToken};
pub use error::{Error, ErrorResponse, Result};
pub use request::Method;
