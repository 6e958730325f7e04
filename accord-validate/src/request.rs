//! Constants, error types, and functions for validating whole requests.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Maximum length of an audit log reason, in characters.
pub const AUDIT_REASON_MAX: usize = 512;

/// A request field is not valid.
#[derive(Debug)]
pub struct ValidationError {
    kind: ValidationErrorType,
}

impl ValidationError {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &ValidationErrorType {
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
    pub fn into_parts(self) -> (ValidationErrorType, Option<Box<dyn Error + Send + Sync>>) {
        (self.kind, None)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            ValidationErrorType::AuditReason { len } => {
                f.write_str("provided audit reason length is ")?;
                Display::fmt(len, f)?;
                f.write_str(", but it must be at most ")?;

                Display::fmt(&AUDIT_REASON_MAX, f)
            }
        }
    }
}

impl Error for ValidationError {}

/// Type of [`ValidationError`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum ValidationErrorType {
    /// Provided audit reason was too large.
    AuditReason {
        /// Provided length.
        len: usize,
    },
}

/// Ensure an audit reason is correct.
///
/// # Errors
///
/// Returns an error of type [`AuditReason`] if the length is longer than
/// [`AUDIT_REASON_MAX`].
///
/// [`AuditReason`]: ValidationErrorType::AuditReason
pub fn audit_reason(audit_reason: impl AsRef<str>) -> Result<(), ValidationError> {
    let len = audit_reason.as_ref().chars().count();

    if len <= AUDIT_REASON_MAX {
        Ok(())
    } else {
        Err(ValidationError {
            kind: ValidationErrorType::AuditReason { len },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{audit_reason, ValidationError, ValidationErrorType};
    use static_assertions::assert_impl_all;
    use std::{error::Error, fmt::Debug};

    assert_impl_all!(ValidationError: Error, Send, Sync);
    assert_impl_all!(ValidationErrorType: Debug, Send, Sync);

    #[test]
    fn audit_reason_length() {
        assert!(audit_reason("").is_ok());
        assert!(audit_reason("a".repeat(512)).is_ok());

        let err = audit_reason("a".repeat(513)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ValidationErrorType::AuditReason { len: 513 }
        ));
    }
}
