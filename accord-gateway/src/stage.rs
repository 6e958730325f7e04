//! Utilities for knowing what state a session is in.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// The current state of a session with the gateway.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
#[repr(u8)]
pub enum Stage {
    /// The handshake completed and events are flowing.
    Connected = 0,
    /// There is no open connection; the entry state.
    Disconnected = 1,
    /// A connection is open and a new session is being established.
    Identifying = 2,
    /// A connection is open and a previous session is being reattached.
    Resuming = 3,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Disconnected
    }
}

/// Converting a `u8` into a [`Stage`] failed.
#[derive(Debug, Eq, PartialEq)]
pub struct StageConversionError {
    value: u8,
}

impl StageConversionError {
    /// The value that couldn't be converted.
    pub const fn value(&self) -> u8 {
        self.value
    }
}

impl Display for StageConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.value, f)?;

        f.write_str(" isn't a valid stage")
    }
}

impl Error for StageConversionError {}

impl TryFrom<u8> for Stage {
    type Error = StageConversionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Connected,
            1 => Self::Disconnected,
            2 => Self::Identifying,
            3 => Self::Resuming,
            _ => return Err(StageConversionError { value }),
        })
    }
}
