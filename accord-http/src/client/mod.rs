mod builder;
mod connector;

pub use self::builder::ClientBuilder;

use self::connector::Connector;
use crate::{
    error::{Error, ErrorType},
    request::{
        application::command::CreateGlobalCommand,
        channel::message::{CreateMessage, DeleteMessage, UpdateMessage},
        GetCurrentUser, GetGateway, Request,
    },
    response::Response,
    API_VERSION,
};
use accord_http_ratelimiting::{Method, Ratelimiter, RatelimitHeaders};
use accord_model::id::{
    marker::{ApplicationMarker, ChannelMarker, MessageMarker},
    Id,
};
use hyper::{
    body::Body,
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
};
use std::{sync::Arc, time::Duration};
use tokio::time;

/// Host all REST requests are issued against.
const HOST: &str = "discord.com";

/// User agent sent with every request.
const USER_AGENT_VALUE: &str = "DiscordBot (https://github.com/accord-rs/accord.git, 0.1.0) accord";

/// Client to issue authenticated REST requests on behalf of a bot account.
///
/// Every request passes through the client's [`Ratelimiter`] before any
/// bytes are written, and every response's rate-limit headers are
/// reconciled back into it, so concurrent requests can never overrun a
/// route's advertised budget.
///
/// Cloning is not provided; wrap the client in an [`Arc`] to share it.
#[derive(Debug)]
pub struct Client {
    pub(crate) http: hyper::Client<Connector>,
    pub(crate) ratelimiter: Arc<Ratelimiter>,
    pub(crate) timeout: Duration,
    pub(crate) token: Option<Box<str>>,
}

impl Client {
    /// Create a new client with a token.
    ///
    /// A leading authentication-scheme prefix on the token is stripped.
    pub fn new(token: String) -> Self {
        ClientBuilder::new().token(token).build()
    }

    /// Create a builder to configure a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Immutable reference to the token, without its scheme prefix.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The ratelimiter admitting this client's requests.
    pub fn ratelimiter(&self) -> &Arc<Ratelimiter> {
        &self.ratelimiter
    }

    /// Create a global command for an application.
    pub const fn create_global_command<'a>(
        &'a self,
        application_id: Id<ApplicationMarker>,
        name: &'a str,
        description: &'a str,
    ) -> CreateGlobalCommand<'a> {
        CreateGlobalCommand::new(self, application_id, name, description)
    }

    /// Send a message to a channel.
    pub const fn create_message(&self, channel_id: Id<ChannelMarker>) -> CreateMessage<'_> {
        CreateMessage::new(self, channel_id)
    }

    /// Delete a message in a channel, by ID.
    pub const fn delete_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> DeleteMessage<'_> {
        DeleteMessage::new(self, channel_id, message_id)
    }

    /// Get information about the user the token belongs to.
    pub const fn current_user(&self) -> GetCurrentUser<'_> {
        GetCurrentUser::new(self)
    }

    /// Discover the URL of the websocket gateway.
    pub const fn gateway(&self) -> GetGateway<'_> {
        GetGateway::new(self)
    }

    /// Edit a message in a channel, by ID.
    pub const fn update_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> UpdateMessage<'_> {
        UpdateMessage::new(self, channel_id, message_id)
    }

    /// Admit a raw request through the ratelimiter, send it, and reconcile
    /// the response's rate-limit headers.
    ///
    /// The response is returned whatever its status code; rate-limit
    /// avoidance is the admission protocol's job, not the caller's.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`RequestTimedOut`] if the configured
    /// timeout elapsed, or of type [`RequestError`] if the exchange failed
    /// at the transport layer.
    ///
    /// [`RequestError`]: ErrorType::RequestError
    /// [`RequestTimedOut`]: ErrorType::RequestTimedOut
    pub async fn request<T>(&self, request: Request) -> Result<Response<T>, Error> {
        let permit = self
            .ratelimiter
            .acquire(request.ratelimit_path().clone())
            .await;

        match self.try_request(request).await {
            Ok(response) => {
                match RatelimitHeaders::from_map(response.headers()) {
                    Ok(headers) => self.ratelimiter.update(permit, Some(&headers)),
                    Err(source) => {
                        tracing::warn!("failed to parse rate limit headers: {source}");

                        self.ratelimiter.update(permit, None);
                    }
                }

                Ok(Response::new(response))
            }
            Err(source) => {
                // The exchange produced no headers; release the permit so
                // probe waiters wake and retry.
                self.ratelimiter.update(permit, None);

                Err(source)
            }
        }
    }

    async fn try_request(&self, request: Request) -> Result<hyper::Response<Body>, Error> {
        let Request {
            body,
            headers,
            method,
            path,
            ..
        } = request;

        let authorization = self
            .token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bot {token}")).map_err(|source| Error {
                    kind: ErrorType::CreatingHeader {
                        name: AUTHORIZATION.as_str().to_owned(),
                    },
                    source: Some(Box::new(source)),
                })
            })
            .transpose()?;

        let mut builder = hyper::Request::builder()
            .method(hyper_method(method))
            .uri(format!("https://{HOST}/api/v{API_VERSION}/{path}"));

        if let Some(map) = builder.headers_mut() {
            if let Some(authorization) = authorization {
                map.insert(AUTHORIZATION, authorization);
            }

            if body.is_some() {
                map.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                );
            }

            map.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

            if let Some(extra) = headers {
                map.extend(extra);
            }
        }

        let body = body.map_or_else(Body::empty, Body::from);
        let hyper_request = builder.body(body).map_err(|source| Error {
            kind: ErrorType::BuildingRequest,
            source: Some(Box::new(source)),
        })?;

        tracing::debug!(%path, "sending request");

        let inflight = self.http.request(hyper_request);

        match time::timeout(self.timeout, inflight).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(source)) => Err(Error {
                kind: ErrorType::RequestError,
                source: Some(Box::new(source)),
            }),
            Err(source) => Err(Error {
                kind: ErrorType::RequestTimedOut,
                source: Some(Box::new(source)),
            }),
        }
    }
}

const fn hyper_method(method: Method) -> hyper::Method {
    match method {
        Method::Delete => hyper::Method::DELETE,
        Method::Get => hyper::Method::GET,
        Method::Patch => hyper::Method::PATCH,
        Method::Post => hyper::Method::POST,
        Method::Put => hyper::Method::PUT,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::{hyper_method, Client};
    use accord_http_ratelimiting::Method;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(Client: Debug, Send, Sync);

    #[test]
    fn method_conversion() {
        assert_eq!(hyper::Method::DELETE, hyper_method(Method::Delete));
        assert_eq!(hyper::Method::GET, hyper_method(Method::Get));
        assert_eq!(hyper::Method::PATCH, hyper_method(Method::Patch));
        assert_eq!(hyper::Method::POST, hyper_method(Method::Post));
        assert_eq!(hyper::Method::PUT, hyper_method(Method::Put));
    }

    #[test]
    fn clients_can_share_a_ratelimiter() {
        let first = Client::builder().token("a".to_owned()).build();
        let second = Client::builder()
            .ratelimiter(std::sync::Arc::clone(first.ratelimiter()))
            .token("a".to_owned())
            .build();

        assert!(std::sync::Arc::ptr_eq(
            first.ratelimiter(),
            second.ratelimiter(),
        ));
    }
}
