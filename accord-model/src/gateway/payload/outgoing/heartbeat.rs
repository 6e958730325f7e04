use crate::gateway::OpCode;
use serde::{Deserialize, Serialize};

/// Keepalive payload, sent periodically at the interval advertised by the
/// gateway's hello payload.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Heartbeat {
    /// Most recently received sequence number, or `None` when no sequenced
    /// frame has arrived yet; serialized as `null` in that case.
    pub d: Option<u64>,
    /// Opcode of the payload.
    pub op: OpCode,
}

impl Heartbeat {
    /// Create a heartbeat carrying the given sequence number.
    pub const fn new(seq: Option<u64>) -> Self {
        Self {
            d: seq,
            op: OpCode::Heartbeat,
        }
    }
}
