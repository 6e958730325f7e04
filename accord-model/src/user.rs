//! The bot's own identity, as reported by the session handshake.

use crate::id::{marker::UserMarker, Id};
use serde::{Deserialize, Serialize};

/// Information about the current user.
///
/// Delivered inside the READY payload once a session is established; the
/// session layer stores the [`id`] for use by application-scoped routes.
///
/// [`id`]: Self::id
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CurrentUser {
    /// Whether the user is a bot account.
    #[serde(default)]
    pub bot: bool,
    /// Discriminator used to differentiate people with the same username.
    #[serde(default)]
    pub discriminator: String,
    /// User's ID.
    pub id: Id<UserMarker>,
    /// Username of the user.
    #[serde(rename = "username")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::CurrentUser;
    use crate::id::Id;
    use serde::{Deserialize, Serialize};
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(
        CurrentUser: Clone,
        Debug,
        Deserialize<'static>,
        Eq,
        PartialEq,
        Send,
        Serialize,
        Sync
    );

    #[test]
    fn deserialize_ignores_extra_fields() {
        let value = serde_json::json!({
            "avatar": null,
            "bot": true,
            "discriminator": "0001",
            "id": "572733281425408011",
            "username": "test",
            "verified": true,
        });

        let user: CurrentUser = serde_json::from_value(value).unwrap();
        assert!(user.bot);
        assert_eq!(user.discriminator, "0001");
        assert_eq!(user.id, Id::new(572_733_281_425_408_011));
        assert_eq!(user.name, "test");
    }

    #[test]
    fn deserialize_defaults() {
        let user: CurrentUser =
            serde_json::from_value(serde_json::json!({"id": "1", "username": "partial"})).unwrap();
        assert!(!user.bot);
        assert!(user.discriminator.is_empty());
    }
}
