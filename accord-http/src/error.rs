use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Working with an HTTP request or response failed.
#[derive(Debug)]
pub struct Error {
    pub(crate) kind: ErrorType,
    pub(crate) source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &ErrorType {
        &self.kind
    }

    /// Consume the error, returning the source error if there is any.
    #[must_use = "consuming the error and retrieving the source has no effect if left unused"]
    pub fn into_source(self) -> Option<Box<dyn StdError + Send + Sync>> {
        self.source
    }

    /// Consume the error, returning the owned error type and the source error.
    #[must_use = "consuming the error into its parts has no effect if left unused"]
    pub fn into_parts(self) -> (ErrorType, Option<Box<dyn StdError + Send + Sync>>) {
        (self.kind, self.source)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            ErrorType::BuildingRequest => f.write_str("failed to build the request"),
            ErrorType::ChunkingResponse => f.write_str("failed to read the response body"),
            ErrorType::CreatingHeader { name } => {
                f.write_str("\"")?;
                f.write_str(name)?;

                f.write_str("\" header value is invalid")
            }
            ErrorType::Json => f.write_str("failed to serialize or deserialize json"),
            ErrorType::Parsing => f.write_str("response body is not valid utf-8"),
            ErrorType::RequestError => f.write_str("sending the request failed"),
            ErrorType::RequestTimedOut => f.write_str("request timed out"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}

/// Type of [`Error`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorType {
    /// Assembling the underlying HTTP request failed.
    BuildingRequest,
    /// Collecting the response body failed.
    ChunkingResponse,
    /// A header's value could not be constructed.
    CreatingHeader {
        /// Name of the header.
        name: String,
    },
    /// Serializing a body or deserializing a model failed.
    Json,
    /// Response body is not valid UTF-8.
    Parsing,
    /// Sending the request failed at the transport layer.
    RequestError,
    /// The configured request timeout elapsed before a response arrived.
    RequestTimedOut,
}
