//! Client connection settings.

/// WebSocket subprotocol name negotiated for this message set.
pub const GRAPHQL_WS_PROTOCOL: &str = "graphql-ws";

/// Settings for opening a client connection.
///
/// Defaults target a local server and request the `graphql-ws`
/// subprotocol in the `Sec-WebSocket-Protocol` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// `ws://` or `wss://` URL of the GraphQL endpoint.
    pub url: String,

    /// Subprotocol to request. `None` sends no `Sec-WebSocket-Protocol`
    /// header at all.
    pub subprotocol: Option<String>,
}

impl ConnectConfig {
    /// Creates a config for `url` with the default subprotocol.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the subprotocol to request.
    pub fn subprotocol(mut self, protocol: impl Into<String>) -> Self {
        self.subprotocol = Some(protocol.into());
        self
    }

    /// Stops requesting any subprotocol.
    pub fn without_subprotocol(mut self) -> Self {
        self.subprotocol = None;
        self
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:4000/graphql".to_string(),
            subprotocol: Some(GRAPHQL_WS_PROTOCOL.to_string()),
        }
    }
}
