use serde::{Deserialize, Serialize};

/// First payload sent by the gateway after the connection opens.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hello {
    /// Interval in milliseconds at which heartbeats must be sent.
    pub heartbeat_interval: u64,
}

#[cfg(test)]
mod tests {
    use super::Hello;
    use serde_test::Token;

    #[test]
    fn hello() {
        let hello = Hello {
            heartbeat_interval: 41_250,
        };

        serde_test::assert_tokens(
            &hello,
            &[
                Token::Struct {
                    name: "Hello",
                    len: 1,
                },
                Token::Str("heartbeat_interval"),
                Token::U64(41_250),
                Token::StructEnd,
            ],
        );
    }
}
