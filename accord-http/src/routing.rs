//! Supported endpoints and their rate-limit identities.

use accord_http_ratelimiting::{Method, Path};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Endpoint of a request.
///
/// A route produces two path forms: the concrete request path (via
/// [`Display`]) and the rate-limit [`Path`], whose template preserves major
/// path parameters but elides minor ones so that, for example, deleting two
/// different messages in one channel draws from a single budget.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Route {
    /// Route to create a global application command.
    CreateGlobalCommand {
        /// ID of the owning application.
        application_id: u64,
    },
    /// Route to send a message in a channel.
    CreateMessage {
        /// ID of the channel.
        channel_id: u64,
    },
    /// Route to delete a message.
    DeleteMessage {
        /// ID of the channel.
        channel_id: u64,
        /// ID of the message.
        message_id: u64,
    },
    /// Route to get the current user.
    GetCurrentUser,
    /// Route to discover the gateway URL.
    GetGateway,
    /// Route to edit a message.
    UpdateMessage {
        /// ID of the channel.
        channel_id: u64,
        /// ID of the message.
        message_id: u64,
    },
}

impl Route {
    /// HTTP method of the route.
    pub const fn method(&self) -> Method {
        match self {
            Self::CreateGlobalCommand { .. } | Self::CreateMessage { .. } => Method::Post,
            Self::DeleteMessage { .. } => Method::Delete,
            Self::GetCurrentUser | Self::GetGateway => Method::Get,
            Self::UpdateMessage { .. } => Method::Patch,
        }
    }

    /// Rate-limit identity of the route: its method and route template.
    ///
    /// Message IDs are minor parameters and are elided from the template;
    /// channel and application IDs are major and kept.
    pub fn ratelimit_path(&self) -> Path {
        let template = match self {
            Self::CreateGlobalCommand { application_id } => {
                format!("applications/{application_id}/commands")
            }
            Self::CreateMessage { channel_id } => format!("channels/{channel_id}/messages"),
            Self::DeleteMessage { channel_id, .. } | Self::UpdateMessage { channel_id, .. } => {
                format!("channels/{channel_id}/messages/{{0}}")
            }
            Self::GetCurrentUser => "users/@me".to_owned(),
            Self::GetGateway => "gateway".to_owned(),
        };

        Path::new(self.method(), template)
    }
}

impl Display for Route {
    /// Format the route into the concrete request path.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::CreateGlobalCommand { application_id } => {
                f.write_str("applications/")?;
                Display::fmt(application_id, f)?;

                f.write_str("/commands")
            }
            Self::CreateMessage { channel_id } => {
                f.write_str("channels/")?;
                Display::fmt(channel_id, f)?;

                f.write_str("/messages")
            }
            Self::DeleteMessage {
                channel_id,
                message_id,
            }
            | Self::UpdateMessage {
                channel_id,
                message_id,
            } => {
                f.write_str("channels/")?;
                Display::fmt(channel_id, f)?;
                f.write_str("/messages/")?;

                Display::fmt(message_id, f)
            }
            Self::GetCurrentUser => f.write_str("users/@me"),
            Self::GetGateway => f.write_str("gateway"),
        }
    }
}
