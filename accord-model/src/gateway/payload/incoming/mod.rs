//! Payloads received from the gateway that the session layer consumes.
//!
//! Only the fields the session needs are modelled; everything else in an
//! inbound frame is passed through untouched as raw JSON.

mod hello;
mod ready;

pub use self::{hello::Hello, ready::Ready};
