//! Deserialization of inbound gateway frames.
//!
//! Only the framing fields are extracted; the payload stays raw JSON for
//! the session to interpret per opcode. Frames with an opcode this library
//! doesn't know are a parsing error, which the session logs and skips.

use accord_model::gateway::OpCode;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::{
    borrow::Cow,
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// One inbound gateway frame, borrowed from the text it was parsed from.
#[derive(Debug, Deserialize)]
pub(crate) struct GatewayFrame<'a> {
    /// Opcode of the frame.
    pub op: OpCode,
    /// Sequence number, on frames that carry one.
    #[serde(default)]
    pub s: Option<u64>,
    /// Event name, on dispatch frames.
    #[serde(borrow, default)]
    pub t: Option<Cow<'a, str>>,
    /// Raw payload.
    #[serde(borrow, default)]
    pub d: Option<&'a RawValue>,
}

/// Parsing an inbound frame failed.
#[derive(Debug)]
pub(crate) struct FrameParsingError {
    source: serde_json::Error,
}

impl Display for FrameParsingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("frame is not a known gateway payload")
    }
}

impl Error for FrameParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Parse one text frame into its framing fields.
pub(crate) fn parse(text: &str) -> Result<GatewayFrame<'_>, FrameParsingError> {
    serde_json::from_str(text).map_err(|source| FrameParsingError { source })
}
