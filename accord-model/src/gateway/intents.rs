use bitflags::bitflags;
use serde::{
    de::{Deserialize, Deserializer},
    ser::{Serialize, Serializer},
};

bitflags! {
    /// Bitmask selecting which categories of events a session receives.
    ///
    /// The session treats the value as opaque: it is sent verbatim in the
    /// identify payload and never inspected afterwards.
    pub struct Intents: u64 {
        /// Guild lifecycle events.
        const GUILDS = 1;
        /// Member add, update, and remove events.
        const GUILD_MEMBERS = 1 << 1;
        /// Ban add and remove events.
        const GUILD_BANS = 1 << 2;
        /// Emoji and sticker update events.
        const GUILD_EMOJIS_AND_STICKERS = 1 << 3;
        /// Integration update events.
        const GUILD_INTEGRATIONS = 1 << 4;
        /// Webhook update events.
        const GUILD_WEBHOOKS = 1 << 5;
        /// Invite create and delete events.
        const GUILD_INVITES = 1 << 6;
        /// Voice state update events.
        const GUILD_VOICE_STATES = 1 << 7;
        /// Presence update events.
        const GUILD_PRESENCES = 1 << 8;
        /// Message events in guild channels.
        const GUILD_MESSAGES = 1 << 9;
        /// Reaction events in guild channels.
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        /// Typing start events in guild channels.
        const GUILD_MESSAGE_TYPING = 1 << 11;
        /// Message events in direct messages.
        const DIRECT_MESSAGES = 1 << 12;
        /// Reaction events in direct messages.
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        /// Typing start events in direct messages.
        const DIRECT_MESSAGE_TYPING = 1 << 14;
        /// Message content in message events.
        const MESSAGE_CONTENT = 1 << 15;
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_bits_truncate(u64::deserialize(deserializer)?))
    }
}

impl Serialize for Intents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}
