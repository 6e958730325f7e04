//! First-time handshake payload establishing a new session.

use crate::gateway::{Intents, OpCode};
use serde::{Deserialize, Serialize};

/// Payload starting a new gateway session.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Identify {
    /// Authentication and subscription details.
    pub d: IdentifyInfo,
    /// Opcode of the payload.
    pub op: OpCode,
}

impl Identify {
    /// Create an identify payload from its info block.
    pub const fn new(info: IdentifyInfo) -> Self {
        Self {
            d: info,
            op: OpCode::Identify,
        }
    }
}

/// Contents of an [`Identify`] payload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdentifyInfo {
    /// Event categories the session subscribes to.
    pub intents: Intents,
    /// Client properties reported to the server.
    pub properties: IdentifyProperties,
    /// Authentication token, without any scheme prefix.
    pub token: String,
}

/// Client properties reported when identifying.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdentifyProperties {
    /// Library or browser name.
    pub browser: String,
    /// Device name.
    pub device: String,
    /// Operating system name, such as `linux`.
    pub os: String,
}

impl IdentifyProperties {
    /// Create client properties to identify with.
    pub fn new(
        browser: impl Into<String>,
        device: impl Into<String>,
        os: impl Into<String>,
    ) -> Self {
        Self {
            browser: browser.into(),
            device: device.into(),
            os: os.into(),
        }
    }
}
