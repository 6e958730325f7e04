use crate::{config::Config, event::EventHandler, shard::Shard};
use accord_http::Client;
use accord_model::gateway::{payload::outgoing::identify::IdentifyProperties, Intents};
use std::{env::consts::OS, sync::Arc};

/// Builder to configure and construct a shard.
///
/// # Examples
///
/// Create a new shard with an explicit gateway URL:
///
/// ```no_run
/// use accord_gateway::{EventHandler, Shard};
/// use accord_model::gateway::Intents;
/// use serde_json::value::RawValue;
/// use std::{env, sync::Arc};
///
/// struct Ignore;
///
/// impl EventHandler for Ignore {
///     fn handle_event(&self, _: &str, _: &RawValue) {}
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let token = env::var("BOT_TOKEN")?;
///
/// let shard = Shard::builder(token, Intents::empty(), Arc::new(Ignore))
///     .gateway_url("wss://gateway.example.com".to_owned())
///     .build();
/// # Ok(()) }
/// ```
#[must_use = "has no effect if not built"]
pub struct ShardBuilder {
    event_handler: Arc<dyn EventHandler>,
    gateway_url: Option<String>,
    http: Option<Arc<Client>>,
    identify_properties: Option<IdentifyProperties>,
    intents: Intents,
    token: Box<str>,
}

impl ShardBuilder {
    /// Create a new builder to configure and construct a shard.
    ///
    /// A leading authentication-scheme prefix on the token is stripped; the
    /// gateway handshake wants the bare token.
    pub fn new(token: String, intents: Intents, event_handler: Arc<dyn EventHandler>) -> Self {
        let trimmed = token.trim();
        let raw = trimmed.strip_prefix("Bot ").unwrap_or(trimmed);

        Self {
            event_handler,
            gateway_url: None,
            http: None,
            identify_properties: None,
            intents,
            token: raw.into(),
        }
    }

    /// Consume the builder, constructing a shard.
    pub fn build(self) -> Shard {
        let http = self
            .http
            .unwrap_or_else(|| Arc::new(Client::new(self.token.clone().into_string())));

        Shard::new_with_config(
            Config {
                gateway_url: self.gateway_url.map(String::into_boxed_str),
                http,
                identify_properties: self
                    .identify_properties
                    .unwrap_or_else(|| IdentifyProperties::new("accord", "accord", OS)),
                intents: self.intents,
                token: self.token,
            },
            self.event_handler,
        )
    }

    /// Set the URL used to connect to the gateway, skipping discovery.
    ///
    /// Default is to discover the URL through the HTTP client.
    #[allow(clippy::missing_const_for_fn)]
    pub fn gateway_url(mut self, gateway_url: String) -> Self {
        self.gateway_url = Some(gateway_url);

        self
    }

    /// Set the HTTP client used for gateway URL discovery.
    ///
    /// Default is a client created from the shard's token. Provide one to
    /// share connection pools and the rate limiter with the rest of the
    /// application.
    pub fn http_client(mut self, http: Arc<Client>) -> Self {
        self.http = Some(http);

        self
    }

    /// Set the properties to identify with.
    ///
    /// This may be used to set a different operating system, for example.
    #[allow(clippy::missing_const_for_fn)]
    pub fn identify_properties(mut self, identify_properties: IdentifyProperties) -> Self {
        self.identify_properties = Some(identify_properties);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::ShardBuilder;
    use crate::event::EventHandler;
    use accord_model::gateway::Intents;
    use serde_json::value::RawValue;
    use static_assertions::assert_impl_all;
    use std::sync::Arc;

    assert_impl_all!(ShardBuilder: Send, Sync);

    struct Ignore;

    impl EventHandler for Ignore {
        fn handle_event(&self, _: &str, _: &RawValue) {}
    }

    #[test]
    fn token_prefix_is_stripped() {
        let shard = ShardBuilder::new(
            "Bot abc123".to_owned(),
            Intents::empty(),
            Arc::new(Ignore),
        )
        .build();

        assert_eq!(shard.config().token(), "abc123");
    }

    #[test]
    fn bare_token_is_kept() {
        let shard =
            ShardBuilder::new(" abc123 ".to_owned(), Intents::empty(), Arc::new(Ignore)).build();

        assert_eq!(shard.config().token(), "abc123");
    }
}
