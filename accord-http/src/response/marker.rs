//! Markers denoting the type of a response body.

/// Marker for a response without a meaningful body, such as a deletion's
/// 204.
#[derive(Debug)]
#[non_exhaustive]
pub struct EmptyBody;
