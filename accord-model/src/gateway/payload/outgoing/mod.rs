//! Payloads the session layer sends to the gateway.

pub mod identify;

mod heartbeat;
mod resume;

pub use self::{
    heartbeat::Heartbeat,
    identify::{Identify, IdentifyInfo, IdentifyProperties},
    resume::Resume,
};
