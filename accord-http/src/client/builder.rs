use super::{connector, Client};
use accord_http_ratelimiting::Ratelimiter;
use std::{sync::Arc, time::Duration};

/// Builder to configure and construct a [`Client`].
#[derive(Debug)]
#[must_use = "has no effect if not built"]
pub struct ClientBuilder {
    ratelimiter: Option<Arc<Ratelimiter>>,
    timeout: Duration,
    token: Option<Box<str>>,
}

impl ClientBuilder {
    /// Create a new builder to create a [`Client`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder, constructing the client.
    pub fn build(self) -> Client {
        Client {
            http: hyper::Client::builder().build(connector::create()),
            ratelimiter: self.ratelimiter.unwrap_or_default(),
            timeout: self.timeout,
            token: self.token,
        }
    }

    /// Set the ratelimiter to admit requests through.
    ///
    /// Defaults to a fresh ratelimiter private to this client. Provide a
    /// shared one when several clients act on behalf of the same account.
    pub fn ratelimiter(mut self, ratelimiter: Arc<Ratelimiter>) -> Self {
        self.ratelimiter.replace(ratelimiter);

        self
    }

    /// Set the timeout applied to each exchange.
    ///
    /// Defaults to 10 seconds.
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;

        self
    }

    /// Set the token to authenticate with.
    ///
    /// A leading authentication-scheme prefix is stripped; the client
    /// re-attaches the scheme when building the authorization header, so
    /// both `"Bot abc"` and `"abc"` configure the same credentials.
    pub fn token(mut self, token: String) -> Self {
        let trimmed = token.trim();
        let raw = trimmed.strip_prefix("Bot ").unwrap_or(trimmed);

        self.token = Some(raw.into());

        self
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            ratelimiter: None,
            timeout: Duration::from_secs(10),
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientBuilder;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(ClientBuilder: Debug, Default, Send, Sync);

    #[test]
    fn token_prefix_is_stripped() {
        let client = ClientBuilder::new().token("Bot abc123".to_owned()).build();
        assert_eq!(client.token(), Some("abc123"));

        let client = ClientBuilder::new().token("  abc123".to_owned()).build();
        assert_eq!(client.token(), Some("abc123"));
    }
}
