use accord_http::Client;
use accord_model::gateway::{payload::outgoing::identify::IdentifyProperties, Intents};
use std::sync::Arc;

/// The configuration used by a shard to identify with the gateway and
/// operate.
///
/// Use [`Shard::builder`] to start creating a configured shard.
///
/// [`Shard::builder`]: crate::Shard::builder
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) gateway_url: Option<Box<str>>,
    pub(crate) http: Arc<Client>,
    pub(crate) identify_properties: IdentifyProperties,
    pub(crate) intents: Intents,
    pub(crate) token: Box<str>,
}

impl Config {
    /// Return the configured gateway URL override, if any.
    ///
    /// When this is `None` the URL is discovered through the HTTP client
    /// and cached process-wide.
    pub fn gateway_url(&self) -> Option<&str> {
        self.gateway_url.as_deref()
    }

    /// Return an immutable reference to the identification properties the
    /// shard will use.
    pub const fn identify_properties(&self) -> &IdentifyProperties {
        &self.identify_properties
    }

    /// Return a copy of the intents the session subscribes with.
    pub const fn intents(&self) -> Intents {
        self.intents
    }

    /// Return an immutable reference to the token used to authenticate,
    /// without its scheme prefix.
    pub fn token(&self) -> &str {
        &self.token
    }
}
