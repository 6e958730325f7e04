use crate::gateway::OpCode;
use serde::{Deserialize, Serialize};

/// Payload reattaching to an existing session after a transport failure.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Resume {
    /// Session identity and replay position.
    pub d: ResumeInfo,
    /// Opcode of the payload.
    pub op: OpCode,
}

impl Resume {
    /// Create a resume payload for a session at the given sequence.
    pub fn new(seq: u64, session_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            d: ResumeInfo {
                seq,
                session_id: session_id.into(),
                token: token.into(),
            },
            op: OpCode::Resume,
        }
    }
}

/// Contents of a [`Resume`] payload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResumeInfo {
    /// Sequence number of the last event received before the disconnect.
    pub seq: u64,
    /// ID of the session being resumed.
    pub session_id: String,
    /// Authentication token, without any scheme prefix.
    pub token: String,
}
