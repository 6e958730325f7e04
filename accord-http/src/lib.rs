//! # accord-http
//!
//! HTTP client for the accord ecosystem: builds authenticated requests,
//! admits them through the shared [rate limiter] before any bytes leave the
//! process, and reconciles every response's rate-limit headers back into it.
//!
//! Requests are issued through per-endpoint helpers obtained from
//! [`Client`], each of which validates its parameters synchronously before
//! any I/O:
//!
//! ```no_run
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use accord_http::Client;
//! use accord_model::id::Id;
//! use std::env;
//!
//! let client = Client::new(env::var("BOT_TOKEN")?);
//!
//! let message = client
//!     .create_message(Id::new(640_604_716_662_358_047))
//!     .content("hello")?
//!     .exec()
//!     .await?
//!     .model()
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Responses are returned to the caller whatever their status code; a 429
//! receives no special treatment beyond header reconciliation, since the
//! pre-flight admission protocol exists to avoid producing one in the first
//! place.
//!
//! [rate limiter]: accord_http_ratelimiting::Ratelimiter

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod routing;

pub use crate::{
    client::Client,
    error::{Error, ErrorType},
    response::Response,
};

/// Version of the REST API the client speaks.
pub const API_VERSION: u8 = 10;
