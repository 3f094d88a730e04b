//! SuperHub API client and data models.
//!
//! This crate exposes the SuperHub billing/control-panel resources (servers,
//! nodes, users and payments) as strongly typed structures together with an
//! asynchronous client whose methods map one-to-one onto API endpoints.
//!
//! ```no_run
//! use superhub_api::{Credentials, SuperhubClient};
//! use superhub_core::ids::ServerId;
//!
//! # async fn example(token_id: uuid::Uuid) -> superhub_api::Result<()> {
//! let client = SuperhubClient::with_credentials(Credentials::persistent(token_id, "secret"))?;
//! let server = client.get_server(ServerId::new(5)).await?;
//! if server.is_frozen_by_user() {
//!     client.unblock_server(server.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
mod de;
pub mod node;
pub mod payment;
pub mod server;
pub mod user;

pub use client::SuperhubClient;
pub use node::{Node, NodeComponent, NodeLoad, NodeLocation, NodePrices};
pub use payment::{
    Payment, PaymentAmount, PaymentCreationForm, PaymentMode, PaymentSource, PaymentSourceType,
};
pub use server::{ExternalServer, FeatureLimits, Resources, Server, ServerPricing, ServerState};
pub use superhub_core::{Credentials, Error, ErrorResponse, PersistentToken};
pub use user::{LinkedDiscord, LinkedVk, Referral, User, CURRENT_USER_REFERENCE};

/// Convenient result alias matching the shared SuperHub error type.
pub type Result<T> = superhub_core::Result<T>;
