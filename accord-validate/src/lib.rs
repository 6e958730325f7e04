//! Constants, error types, and functions for validating request parameters
//! against documented server limits.
//!
//! Validation runs synchronously in request builders, before any I/O is
//! performed; a request that fails validation is never admitted to the
//! rate limiter.

pub mod message;
pub mod request;
