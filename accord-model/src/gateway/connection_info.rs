//! Gateway URL discovery response.

use serde::{Deserialize, Serialize};

/// Body of the gateway URL discovery endpoint.
///
/// How long the URL may be cached is advertised out of band via the
/// response's `cache-control` header, not in the body.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConnectionInfo {
    /// URL of the websocket gateway, without protocol version or encoding
    /// parameters.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::ConnectionInfo;
    use serde::{Deserialize, Serialize};
    use serde_test::Token;
    use static_assertions::assert_impl_all;
    use std::fmt::Debug;

    assert_impl_all!(
        ConnectionInfo: Clone,
        Debug,
        Deserialize<'static>,
        Eq,
        PartialEq,
        Send,
        Serialize,
        Sync
    );

    #[test]
    fn serde() {
        let info = ConnectionInfo {
            url: "wss://gateway.example.com".to_owned(),
        };

        serde_test::assert_tokens(
            &info,
            &[
                Token::Struct {
                    name: "ConnectionInfo",
                    len: 1,
                },
                Token::Str("url"),
                Token::Str("wss://gateway.example.com"),
                Token::StructEnd,
            ],
        );
    }
}
