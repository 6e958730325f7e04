use crate::user::CurrentUser;
use serde::{Deserialize, Serialize};

/// Dispatched when a new session has been established.
///
/// The full event carries considerably more state; only the session identity
/// fields are extracted here.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ready {
    /// ID used to resume this session after a transport failure.
    pub session_id: String,
    /// The connected bot's identity.
    pub user: CurrentUser,
}
