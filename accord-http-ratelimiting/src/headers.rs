//! Parse rate-limit headers out of a response.

use http::header::HeaderMap;
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Header carrying the server-assigned bucket identifier.
pub const BUCKET: &str = "x-ratelimit-bucket";

/// Header carrying the window's capacity.
pub const LIMIT: &str = "x-ratelimit-limit";

/// Header carrying the number of slots left in the window.
pub const REMAINING: &str = "x-ratelimit-remaining";

/// Header carrying the window's refresh instant, in fractional UNIX epoch
/// seconds.
pub const RESET: &str = "x-ratelimit-reset";

/// Parsing the rate-limit headers of a response failed.
#[derive(Debug)]
pub struct HeaderParsingError {
    kind: HeaderParsingErrorType,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl HeaderParsingError {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &HeaderParsingErrorType {
        &self.kind
    }

    /// Consume the error, returning the source error if there is any.
    #[must_use = "consuming the error and retrieving the source has no effect if left unused"]
    pub fn into_source(self) -> Option<Box<dyn Error + Send + Sync>> {
        self.source
    }

    /// Consume the error, returning the owned error type and the source error.
    #[must_use = "consuming the error into its parts has no effect if left unused"]
    pub fn into_parts(
        self,
    ) -> (
        HeaderParsingErrorType,
        Option<Box<dyn Error + Send + Sync>>,
    ) {
        (self.kind, self.source)
    }
}

impl Display for HeaderParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            HeaderParsingErrorType::Parsing { name } => {
                f.write_str("header ")?;
                f.write_str(name)?;

                f.write_str(" is not of the expected type")
            }
        }
    }
}

impl Error for HeaderParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn Error + 'static))
    }
}

/// Type of [`HeaderParsingError`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum HeaderParsingErrorType {
    /// A present header's value is not valid for its type.
    Parsing {
        /// Name of the header.
        name: &'static str,
    },
}

/// Rate-limit headers of one response.
///
/// Every header is optional: responses from routes without a budget carry
/// none of them, and servers are free to omit individual values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatelimitHeaders {
    bucket: Option<Box<str>>,
    limit: Option<u64>,
    remaining: Option<u64>,
    reset: Option<f64>,
}

impl RatelimitHeaders {
    /// Parse the rate-limit headers out of a header map.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`Parsing`] if a header is present but its
    /// value is not valid UTF-8 or does not parse as its documented type.
    ///
    /// [`Parsing`]: HeaderParsingErrorType::Parsing
    pub fn from_map(map: &HeaderMap) -> Result<Self, HeaderParsingError> {
        let bucket = match map.get(BUCKET) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|source| HeaderParsingError {
                        kind: HeaderParsingErrorType::Parsing { name: BUCKET },
                        source: Some(Box::new(source)),
                    })?
                    .into(),
            ),
            None => None,
        };

        Ok(Self {
            bucket,
            limit: parse_integer(map, LIMIT)?,
            remaining: parse_integer(map, REMAINING)?,
            reset: parse_float(map, RESET)?,
        })
    }

    /// Server-assigned bucket identifier.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Capacity of the window.
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Slots left in the window.
    pub const fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Instant the window refreshes, converted from epoch seconds.
    pub fn reset(&self) -> Option<SystemTime> {
        self.reset
            .map(|seconds| UNIX_EPOCH + Duration::from_secs_f64(seconds))
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        bucket: Option<&str>,
        limit: Option<u64>,
        remaining: Option<u64>,
        reset: Option<f64>,
    ) -> Self {
        Self {
            bucket: bucket.map(Into::into),
            limit,
            remaining,
            reset,
        }
    }
}

fn header_str<'a>(
    map: &'a HeaderMap,
    name: &'static str,
) -> Result<Option<&'a str>, HeaderParsingError> {
    map.get(name)
        .map(|value| {
            value.to_str().map_err(|source| HeaderParsingError {
                kind: HeaderParsingErrorType::Parsing { name },
                source: Some(Box::new(source)),
            })
        })
        .transpose()
}

fn parse_integer(map: &HeaderMap, name: &'static str) -> Result<Option<u64>, HeaderParsingError> {
    header_str(map, name)?
        .map(|text| {
            text.parse().map_err(|source| HeaderParsingError {
                kind: HeaderParsingErrorType::Parsing { name },
                source: Some(Box::new(source)),
            })
        })
        .transpose()
}

fn parse_float(map: &HeaderMap, name: &'static str) -> Result<Option<f64>, HeaderParsingError> {
    header_str(map, name)?
        .map(|text| {
            text.parse().map_err(|source| HeaderParsingError {
                kind: HeaderParsingErrorType::Parsing { name },
                source: Some(Box::new(source)),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{HeaderParsingError, HeaderParsingErrorType, RatelimitHeaders};
    use http::header::{HeaderMap, HeaderName, HeaderValue};
    use static_assertions::assert_impl_all;
    use std::{
        error::Error,
        fmt::Debug,
        time::{Duration, UNIX_EPOCH},
    };

    assert_impl_all!(HeaderParsingError: Error, Send, Sync);
    assert_impl_all!(HeaderParsingErrorType: Debug, Send, Sync);
    assert_impl_all!(RatelimitHeaders: Clone, Debug, Default, PartialEq, Send, Sync);

    fn map(values: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();

        for (name, value) in values {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_str(value).unwrap(),
            );
        }

        map
    }

    #[test]
    fn all_present() {
        let map = map(&[
            ("x-ratelimit-bucket", "d721dea6054f6322373d361f98e5c38b"),
            ("x-ratelimit-limit", "10"),
            ("x-ratelimit-remaining", "9"),
            ("x-ratelimit-reset", "1470173023.123"),
        ]);

        let headers = RatelimitHeaders::from_map(&map).unwrap();
        assert_eq!(headers.bucket(), Some("d721dea6054f6322373d361f98e5c38b"));
        assert_eq!(headers.limit(), Some(10));
        assert_eq!(headers.remaining(), Some(9));
        assert_eq!(
            headers.reset(),
            Some(UNIX_EPOCH + Duration::from_secs_f64(1_470_173_023.123)),
        );
    }

    #[test]
    fn all_absent() {
        let headers = RatelimitHeaders::from_map(&HeaderMap::new()).unwrap();
        assert_eq!(headers, RatelimitHeaders::default());
        assert!(headers.reset().is_none());
    }

    #[test]
    fn malformed_integer() {
        let map = map(&[("x-ratelimit-limit", "ten")]);

        let error = RatelimitHeaders::from_map(&map).unwrap_err();
        assert!(matches!(
            error.kind(),
            HeaderParsingErrorType::Parsing {
                name: "x-ratelimit-limit"
            },
        ));
    }
}
