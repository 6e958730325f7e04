//! Response utilities, for working with the raw body or deserializing it
//! into a model.
//!
//! The response is returned to the caller whatever its status code; check
//! [`Response::status`] before deserializing if the route can fail.

pub mod marker;

use crate::error::{Error, ErrorType};
use hyper::{
    body::{self, Body},
    header::HeaderMap,
    StatusCode,
};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Response of a request, owned by the caller.
///
/// The type parameter is a statically known marker for what the body
/// deserializes into; it costs nothing at runtime.
#[derive(Debug)]
pub struct Response<T> {
    inner: hyper::Response<Body>,
    phantom: PhantomData<T>,
}

impl<T> Response<T> {
    pub(crate) const fn new(inner: hyper::Response<Body>) -> Self {
        Self {
            inner,
            phantom: PhantomData,
        }
    }

    /// Headers of the response.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Status code of the response.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Consume the response, returning the full body.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`ChunkingResponse`] if collecting the body
    /// fails.
    ///
    /// [`ChunkingResponse`]: ErrorType::ChunkingResponse
    pub async fn bytes(self) -> Result<Vec<u8>, Error> {
        let bytes = body::to_bytes(self.inner.into_body())
            .await
            .map_err(|source| Error {
                kind: ErrorType::ChunkingResponse,
                source: Some(Box::new(source)),
            })?;

        Ok(bytes.to_vec())
    }

    /// Consume the response, returning the body as text.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`ChunkingResponse`] if collecting the body
    /// fails, or of type [`Parsing`] if the body is not UTF-8.
    ///
    /// [`ChunkingResponse`]: ErrorType::ChunkingResponse
    /// [`Parsing`]: ErrorType::Parsing
    pub async fn text(self) -> Result<String, Error> {
        String::from_utf8(self.bytes().await?).map_err(|source| Error {
            kind: ErrorType::Parsing,
            source: Some(Box::new(source)),
        })
    }
}

impl<T: DeserializeOwned> Response<T> {
    /// Consume the response, deserializing the body.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`ChunkingResponse`] if collecting the body
    /// fails, or of type [`Json`] if deserializing it fails.
    ///
    /// [`ChunkingResponse`]: ErrorType::ChunkingResponse
    /// [`Json`]: ErrorType::Json
    pub async fn model(self) -> Result<T, Error> {
        let bytes = self.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|source| Error {
            kind: ErrorType::Json,
            source: Some(Box::new(source)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{marker::EmptyBody, Response};
    use accord_model::message::Message;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(Response<EmptyBody>: Debug, Send, Sync);
    assert_impl_all!(Response<Message>: Debug, Send, Sync);

    #[tokio::test]
    async fn model_deserializes_body() {
        let inner = hyper::Response::builder()
            .status(200)
            .body(hyper::Body::from(
                r#"{"channel_id":"1","content":"hi","id":"2"}"#,
            ))
            .unwrap();

        let response = Response::<Message>::new(inner);
        assert!(response.status().is_success());

        let message = response.model().await.unwrap();
        assert_eq!(message.content, "hi");
    }

    #[tokio::test]
    async fn text_requires_utf8() {
        let inner = hyper::Response::builder()
            .body(hyper::Body::from(vec![0xff, 0xfe]))
            .unwrap();

        assert!(Response::<EmptyBody>::new(inner).text().await.is_err());
    }
}
