//! Unified error type for the `gqlws` crates.

use gqlws_protocol::{ErrorKind, ProtocolError};
use gqlws_transport::TransportError;
use serde_json::Value;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert transport and protocol errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum GqlWsError {
    /// A transport-level error (connect, state, write).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (validation, encode, dispatch).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered `connection_init` with `connection_error`.
    #[error("connection rejected by server: {}", display_payload(.0))]
    ConnectionRejected(Option<Value>),

    /// The server sent something other than what the exchange expected.
    #[error("unexpected {0} message")]
    UnexpectedMessage(&'static str),

    /// The connection closed before the exchange finished.
    #[error("connection closed before {0}")]
    ClosedEarly(&'static str),

    /// The server did not answer within the allowed time.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

impl GqlWsError {
    /// Returns `true` when a frame arrived whose `type` this crate does
    /// not know.
    ///
    /// Servers commonly send messages outside the core set, such as the
    /// `ka` keep-alive of `subscriptions-transport-ws`. The connection
    /// is still usable after such a frame, so a read loop can log it and
    /// keep going.
    pub fn is_unknown_message_type(&self) -> bool {
        matches!(
            self,
            Self::Protocol(e) if e.kind() == ErrorKind::UnknownMessageType
        )
    }
}

fn display_payload(payload: &Option<Value>) -> String {
    match payload {
        Some(value) => value.to_string(),
        None => "no payload".to_string(),
    }
}
