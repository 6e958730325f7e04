use accord_validate::request::ValidationError;

/// Attach a reason for a request to appear in the server's audit log.
///
/// The reason is validated synchronously against the documented length
/// limit; requests with an over-long reason are rejected before any I/O.
pub trait AuditLogReason: Sized {
    /// Attach the reason to the request.
    ///
    /// # Errors
    ///
    /// Returns an error of type [`AuditReason`] if the reason is longer than
    /// the documented maximum.
    ///
    /// [`AuditReason`]: accord_validate::request::ValidationErrorType::AuditReason
    fn reason(self, reason: impl Into<String>) -> Result<Self, ValidationError>;
}
