use serde_repr::{Deserialize_repr, Serialize_repr};

/// Gateway event opcodes.
///
/// The session layer consumes [`Dispatch`], [`Reconnect`], [`Hello`], and
/// [`HeartbeatAck`], and emits [`Heartbeat`], [`Identify`], and [`Resume`].
/// The remaining opcodes are defined so inbound frames always deserialize;
/// they are acknowledged only implicitly.
///
/// [`Dispatch`]: Self::Dispatch
/// [`Heartbeat`]: Self::Heartbeat
/// [`HeartbeatAck`]: Self::HeartbeatAck
/// [`Hello`]: Self::Hello
/// [`Identify`]: Self::Identify
/// [`Reconnect`]: Self::Reconnect
/// [`Resume`]: Self::Resume
#[derive(Clone, Copy, Debug, Deserialize_repr, Eq, Hash, PartialEq, Serialize_repr)]
#[non_exhaustive]
#[repr(u8)]
pub enum OpCode {
    /// An event was dispatched.
    Dispatch = 0,
    /// A periodic keepalive, carrying the most recent sequence number.
    Heartbeat = 1,
    /// Start a new session.
    Identify = 2,
    /// Update the client's presence.
    PresenceUpdate = 3,
    /// Join, move between, or leave voice channels.
    VoiceStateUpdate = 4,
    /// Resume a disconnected session.
    Resume = 6,
    /// Server request to reconnect.
    Reconnect = 7,
    /// Request a list of a guild's members.
    RequestGuildMembers = 8,
    /// The session is invalid; this opcode is currently ignored.
    InvalidSession = 9,
    /// Sent by the server immediately after connecting; contains the
    /// heartbeat interval.
    Hello = 10,
    /// Acknowledgement of a [`Heartbeat`].
    ///
    /// [`Heartbeat`]: Self::Heartbeat
    HeartbeatAck = 11,
}

#[cfg(test)]
mod tests {
    use super::OpCode;
    use serde::{Deserialize, Serialize};
    use serde_test::Token;
    use static_assertions::assert_impl_all;
    use std::{fmt::Debug, hash::Hash};

    assert_impl_all!(
        OpCode: Clone,
        Copy,
        Debug,
        Deserialize<'static>,
        Eq,
        Hash,
        PartialEq,
        Send,
        Serialize,
        Sync
    );

    #[test]
    fn variants() {
        serde_test::assert_tokens(&OpCode::Dispatch, &[Token::U8(0)]);
        serde_test::assert_tokens(&OpCode::Heartbeat, &[Token::U8(1)]);
        serde_test::assert_tokens(&OpCode::Identify, &[Token::U8(2)]);
        serde_test::assert_tokens(&OpCode::PresenceUpdate, &[Token::U8(3)]);
        serde_test::assert_tokens(&OpCode::VoiceStateUpdate, &[Token::U8(4)]);
        serde_test::assert_tokens(&OpCode::Resume, &[Token::U8(6)]);
        serde_test::assert_tokens(&OpCode::Reconnect, &[Token::U8(7)]);
        serde_test::assert_tokens(&OpCode::RequestGuildMembers, &[Token::U8(8)]);
        serde_test::assert_tokens(&OpCode::InvalidSession, &[Token::U8(9)]);
        serde_test::assert_tokens(&OpCode::Hello, &[Token::U8(10)]);
        serde_test::assert_tokens(&OpCode::HeartbeatAck, &[Token::U8(11)]);
    }

    #[test]
    fn unknown_value_errors() {
        assert!(serde_json::from_str::<OpCode>("5").is_err());
        assert!(serde_json::from_str::<OpCode>("12").is_err());
    }
}
