use serde_repr::{Deserialize_repr, Serialize_repr};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Close codes sent by the gateway when ending a connection.
///
/// Codes below [`InvalidSequence`] generally indicate a fault that can be
/// retried, while the authentication and intent codes are terminal.
///
/// [`InvalidSequence`]: Self::InvalidSequence
#[derive(Clone, Copy, Debug, Deserialize_repr, Eq, Hash, PartialEq, Serialize_repr)]
#[non_exhaustive]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred.
    UnknownError = 4000,
    /// Invalid opcode, or invalid payload for an opcode, was sent.
    UnknownOpcode = 4001,
    /// Payload failed to decode.
    DecodeError = 4002,
    /// Payload was sent before identifying.
    NotAuthenticated = 4003,
    /// Invalid token was provided when identifying.
    AuthenticationFailed = 4004,
    /// Multiple identify payloads were sent on one connection.
    AlreadyAuthenticated = 4005,
    /// Invalid sequence was sent when resuming.
    InvalidSequence = 4007,
    /// Payloads were sent too quickly.
    RateLimited = 4008,
    /// Session timed out.
    SessionTimedOut = 4009,
    /// Invalid shard was specified when identifying.
    InvalidShard = 4010,
    /// Sharding is required to connect.
    ShardingRequired = 4011,
    /// Invalid gateway API version was requested.
    InvalidApiVersion = 4012,
    /// Invalid intents were provided.
    InvalidIntents = 4013,
    /// Disallowed intents were provided; they may require verification.
    DisallowedIntents = 4014,
}

impl CloseCode {
    /// Whether the session may attempt to reconnect after this close code.
    pub const fn can_reconnect(self) -> bool {
        !matches!(
            self,
            Self::AuthenticationFailed
                | Self::InvalidShard
                | Self::ShardingRequired
                | Self::InvalidApiVersion
                | Self::InvalidIntents
                | Self::DisallowedIntents
        )
    }
}

/// Converting a `u16` into a [`CloseCode`] failed.
#[derive(Debug, Eq, PartialEq)]
pub struct CloseCodeConversionError {
    code: u16,
}

impl CloseCodeConversionError {
    const fn new(code: u16) -> Self {
        Self { code }
    }

    /// The value that couldn't be converted.
    pub const fn code(&self) -> u16 {
        self.code
    }
}

impl Display for CloseCodeConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.code, f)?;

        f.write_str(" isn't a valid close code")
    }
}

impl Error for CloseCodeConversionError {}

impl TryFrom<u16> for CloseCode {
    type Error = CloseCodeConversionError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let close_code = match value {
            4000 => Self::UnknownError,
            4001 => Self::UnknownOpcode,
            4002 => Self::DecodeError,
            4003 => Self::NotAuthenticated,
            4004 => Self::AuthenticationFailed,
            4005 => Self::AlreadyAuthenticated,
            4007 => Self::InvalidSequence,
            4008 => Self::RateLimited,
            4009 => Self::SessionTimedOut,
            4010 => Self::InvalidShard,
            4011 => Self::ShardingRequired,
            4012 => Self::InvalidApiVersion,
            4013 => Self::InvalidIntents,
            4014 => Self::DisallowedIntents,
            _ => return Err(CloseCodeConversionError::new(value)),
        };

        Ok(close_code)
    }
}

#[cfg(test)]
mod tests {
    use super::{CloseCode, CloseCodeConversionError};
    use serde_test::Token;
    use static_assertions::assert_impl_all;
    use std::{error::Error, fmt::Debug};

    assert_impl_all!(CloseCode: Clone, Copy, Debug, Eq, PartialEq, Send, Sync);
    assert_impl_all!(CloseCodeConversionError: Error, Send, Sync);

    const CODES: [(CloseCode, u16); 14] = [
        (CloseCode::UnknownError, 4000),
        (CloseCode::UnknownOpcode, 4001),
        (CloseCode::DecodeError, 4002),
        (CloseCode::NotAuthenticated, 4003),
        (CloseCode::AuthenticationFailed, 4004),
        (CloseCode::AlreadyAuthenticated, 4005),
        (CloseCode::InvalidSequence, 4007),
        (CloseCode::RateLimited, 4008),
        (CloseCode::SessionTimedOut, 4009),
        (CloseCode::InvalidShard, 4010),
        (CloseCode::ShardingRequired, 4011),
        (CloseCode::InvalidApiVersion, 4012),
        (CloseCode::InvalidIntents, 4013),
        (CloseCode::DisallowedIntents, 4014),
    ];

    #[test]
    fn variants() {
        for (code, value) in CODES {
            serde_test::assert_tokens(&code, &[Token::U16(value)]);
        }
    }

    #[test]
    fn conversion() {
        for (code, value) in CODES {
            assert_eq!(CloseCode::try_from(value).unwrap(), code);
        }

        assert_eq!(CloseCode::try_from(4006).unwrap_err().code(), 4006);
        assert!(CloseCode::try_from(1000).is_err());
    }

    #[test]
    fn reconnectability() {
        assert!(CloseCode::UnknownError.can_reconnect());
        assert!(CloseCode::SessionTimedOut.can_reconnect());
        assert!(!CloseCode::AuthenticationFailed.can_reconnect());
        assert!(!CloseCode::DisallowedIntents.can_reconnect());
    }
}
