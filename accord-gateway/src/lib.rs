//! # accord-gateway
//!
//! Maintains a live session with the chat platform's websocket gateway: it
//! performs the identify/resume handshake, answers the server's heartbeat
//! contract, paces outbound frames below the gateway's send budget, and
//! forwards every dispatched event to a caller-supplied [`EventHandler`].
//!
//! The entry point is the [`Shard`]. [`Shard::connect`] drives one complete
//! session and returns a boolean instruction: `true` means the session ended
//! for a transient reason and the caller should reconnect (session identity
//! is kept across transport failures, so the next connection resumes);
//! `false` means the session was shut down deliberately.
//!
//! ```no_run
//! use accord_gateway::{EventHandler, Shard};
//! use accord_model::gateway::Intents;
//! use serde_json::value::RawValue;
//! use std::{env, sync::Arc};
//!
//! struct Logger;
//!
//! impl EventHandler for Logger {
//!     fn handle_event(&self, name: &str, data: &RawValue) {
//!         println!("{name}: {data}");
//!     }
//! }
//!
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let token = env::var("BOT_TOKEN")?;
//! let shard = Shard::new(token, Intents::GUILD_MESSAGES, Arc::new(Logger));
//!
//! while shard.connect().await? {
//!     println!("session ended, reconnecting");
//! }
//! # Ok(()) }
//! ```

pub mod heartbeat;

mod builder;
mod config;
mod event;
mod json;
mod queue;
mod session;
mod shard;
mod stage;
mod url;

pub use self::{
    builder::ShardBuilder,
    config::Config,
    event::EventHandler,
    heartbeat::Latency,
    shard::{ConnectError, ConnectErrorType, SessionInactiveError, Shard},
    stage::Stage,
};

/// Version of the gateway protocol the session speaks.
pub const GATEWAY_VERSION: u8 = 10;
