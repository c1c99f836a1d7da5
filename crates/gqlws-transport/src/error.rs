use crate::ReadyState;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The socket exists but is not in the `OPEN` state.
    ///
    /// The inner state says which of connecting, closing or closed
    /// applied at the moment of the check.
    #[error("{}", not_ready_message(.0))]
    NotReady(ReadyState),

    /// The socket reported a state outside the four known values.
    #[error("websocket is in unknown state {0}")]
    UnknownState(u16),

    /// Opening the connection failed (DNS, TCP, or the upgrade handshake).
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Handing a frame to the connection failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}

fn not_ready_message(state: &ReadyState) -> &'static str {
    match state {
        ReadyState::Connecting => {
            "websocket connection is in the process of connecting"
        }
        ReadyState::Closing => {
            "websocket connection is in the process of closing"
        }
        ReadyState::Closed => "websocket connection is closed",
        // `ensure_open` never builds `NotReady(Open)`.
        ReadyState::Open => "websocket connection is open",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_messages_name_the_state() {
        let connecting = TransportError::NotReady(ReadyState::Connecting);
        assert!(connecting.to_string().contains("connecting"));

        let closing = TransportError::NotReady(ReadyState::Closing);
        assert!(closing.to_string().contains("closing"));

        let closed = TransportError::NotReady(ReadyState::Closed);
        assert!(closed.to_string().ends_with("is closed"));
    }

    #[test]
    fn test_unknown_state_carries_raw_value() {
        let err = TransportError::UnknownState(9);
        assert_eq!(err.to_string(), "websocket is in unknown state 9");
    }
}
