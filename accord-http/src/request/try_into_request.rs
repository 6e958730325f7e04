use super::Request;
use crate::error::Error;

/// Convert a typed request builder into a raw [`Request`].
pub trait TryIntoRequest: Sized {
    /// Try to convert the typed builder into a raw request.
    ///
    /// # Errors
    ///
    /// Not all typed builders are fallible, but those with bodies or extra
    /// headers may fail to serialize them.
    fn try_into_request(self) -> Result<Request, Error>;
}
