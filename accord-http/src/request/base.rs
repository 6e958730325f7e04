use crate::{
    error::{Error, ErrorType},
    routing::Route,
};
use accord_http_ratelimiting::{Method, Path};
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

/// A request to be sent by the client.
///
/// Carries everything the transport needs: the method, the concrete path,
/// the rate-limit identity, and the optional JSON body and extra headers.
#[derive(Debug)]
pub struct Request {
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) headers: Option<HeaderMap<HeaderValue>>,
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) ratelimit_path: Path,
}

impl Request {
    /// Create a request from a route with neither body nor extra headers.
    pub fn from_route(route: &Route) -> Self {
        Self::builder(route).build()
    }

    /// Create a builder for a request targeting a route.
    pub fn builder(route: &Route) -> RequestBuilder {
        RequestBuilder(Self {
            body: None,
            headers: None,
            method: route.method(),
            path: route.to_string(),
            ratelimit_path: route.ratelimit_path(),
        })
    }

    /// Body of the request, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Extra headers of the request, if any.
    pub const fn headers(&self) -> Option<&HeaderMap<HeaderValue>> {
        self.headers.as_ref()
    }

    /// Method of the request.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Concrete path of the request, without the API base.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Rate-limit identity of the request.
    pub const fn ratelimit_path(&self) -> &Path {
        &self.ratelimit_path
    }
}

/// Builder for a [`Request`].
#[derive(Debug)]
#[must_use = "request builders have no effect if unused"]
pub struct RequestBuilder(Request);

impl RequestBuilder {
    /// Consume the builder, returning the request.
    #[allow(clippy::missing_const_for_fn)]
    pub fn build(self) -> Request {
        self.0
    }

    /// Add extra headers to the request.
    pub fn headers(mut self, iter: impl Iterator<Item = (HeaderName, HeaderValue)>) -> Self {
        self.0.headers.replace(iter.collect());

        self
    }

    /// Serialize a value as the request's JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`Json`] if serializing the value fails.
    ///
    /// [`Json`]: ErrorType::Json
    pub fn json(mut self, to: &impl Serialize) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(to).map_err(|source| Error {
            kind: ErrorType::Json,
            source: Some(Box::new(source)),
        })?;
        self.0.body.replace(bytes);

        Ok(self)
    }
}
