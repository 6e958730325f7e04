//! Minimal message record returned by message routes.

use crate::id::{
    marker::{ChannelMarker, MessageMarker},
    Id,
};
use serde::{Deserialize, Serialize};

/// Text message in a channel.
///
/// Only the fields the bundled request helpers consume are modelled; the
/// full server representation carries many more.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Message {
    /// ID of the channel the message was sent in.
    pub channel_id: Id<ChannelMarker>,
    /// Text content of the message.
    #[serde(default)]
    pub content: String,
    /// ID of the message.
    pub id: Id<MessageMarker>,
}

#[cfg(test)]
mod tests {
    use super::Message;
    use crate::id::Id;
    use serde::{Deserialize, Serialize};
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(
        Message: Clone,
        Debug,
        Deserialize<'static>,
        Eq,
        PartialEq,
        Send,
        Serialize,
        Sync
    );

    #[test]
    fn deserialize() {
        let value = serde_json::json!({
            "author": {"id": "3", "username": "someone"},
            "channel_id": "1",
            "content": "ping",
            "id": "2",
            "timestamp": "2020-02-02T02:02:02.020000+00:00",
        });

        let message: Message = serde_json::from_value(value).unwrap();
        assert_eq!(message.channel_id, Id::new(1));
        assert_eq!(message.id, Id::new(2));
        assert_eq!(message.content, "ping");
    }
}
