//! Constants, error types, and functions for validating message fields.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Maximum length of a message's content, in UTF-16 code units.
pub const MESSAGE_CONTENT_LENGTH_MAX: usize = 2000;

/// A message field is not valid.
#[derive(Debug)]
pub struct MessageValidationError {
    kind: MessageValidationErrorType,
}

impl MessageValidationError {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &MessageValidationErrorType {
        &self.kind
    }

    /// Consume the error, returning the source error if there is any.
    #[allow(clippy::unused_self)]
    #[must_use = "consuming the error and retrieving the source has no effect if left unused"]
    pub fn into_source(self) -> Option<Box<dyn Error + Send + Sync>> {
        None
    }

    /// Consume the error, returning the owned error type and the source error.
    #[must_use = "consuming the error into its parts has no effect if left unused"]
    pub fn into_parts(
        self,
    ) -> (
        MessageValidationErrorType,
        Option<Box<dyn Error + Send + Sync>>,
    ) {
        (self.kind, None)
    }
}

impl Display for MessageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            MessageValidationErrorType::ContentInvalid => f.write_str("message content is invalid"),
        }
    }
}

impl Error for MessageValidationError {}

/// Type of [`MessageValidationError`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum MessageValidationErrorType {
    /// Returned when the content is over 2000 UTF-16 code units.
    ContentInvalid,
}

/// Ensure a message's content is correct.
///
/// # Errors
///
/// Returns an error of type [`ContentInvalid`] if the content is longer than
/// [`MESSAGE_CONTENT_LENGTH_MAX`] UTF-16 code units.
///
/// [`ContentInvalid`]: MessageValidationErrorType::ContentInvalid
pub fn content(value: impl AsRef<str>) -> Result<(), MessageValidationError> {
    // Server-side the length is measured in UTF-16 code units, not bytes or
    // chars.
    let length = value.as_ref().chars().map(char::len_utf16).sum::<usize>();

    if length <= MESSAGE_CONTENT_LENGTH_MAX {
        Ok(())
    } else {
        Err(MessageValidationError {
            kind: MessageValidationErrorType::ContentInvalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{content, MessageValidationError, MessageValidationErrorType};
    use static_assertions::assert_impl_all;
    use std::{error::Error, fmt::Debug};

    assert_impl_all!(MessageValidationError: Error, Send, Sync);
    assert_impl_all!(MessageValidationErrorType: Debug, Send, Sync);

    #[test]
    fn content_length() {
        assert!(content("").is_ok());
        assert!(content("a".repeat(2000)).is_ok());
        assert!(content("a".repeat(2001)).is_err());

        // 'üñ≥' is 2 UTF-16 code units but 1 char.
        assert!(content("üñ≥".repeat(1000)).is_ok());
        assert!(content("üñ≥".repeat(1001)).is_err());
    }
}
