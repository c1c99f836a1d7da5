//! Async helpers tying a [`WebSocketConnection`] to the protocol's
//! `send`/`receive`.
//!
//! These cover the connection-level exchange only (`connection_init` →
//! `connection_ack`) and reading typed messages. Deciding when to start
//! or stop operations, and matching results to ids, stays with the
//! caller.

use std::time::Duration;

use gqlws_protocol::{InitMessage, ServerMessage, receive_text, send};
use gqlws_transport::{ConnectConfig, WebSocketConnection};

use crate::GqlWsError;

/// How long [`initialize`] waits for `connection_ack` by default.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection with the given settings.
pub async fn connect(
    config: &ConnectConfig,
) -> Result<WebSocketConnection, GqlWsError> {
    Ok(WebSocketConnection::connect(config).await?)
}

/// Reads the next server message.
///
/// Returns `Ok(None)` when the connection closed cleanly.
pub async fn next_message(
    conn: &WebSocketConnection,
) -> Result<Option<ServerMessage>, GqlWsError> {
    let Some(frame) = conn.recv().await else {
        return Ok(None);
    };
    let message = receive_text(&frame)?;
    tracing::debug!(
        id = %conn.id(),
        message_type = message.message_type(),
        "received message"
    );
    Ok(Some(message))
}

/// Sends `connection_init` and waits for the server's answer.
///
/// # Errors
/// - `ConnectionRejected` with the server's payload on `connection_error`.
/// - `UnexpectedMessage` when any other message arrives first.
/// - `ClosedEarly` when the connection closes first.
/// - `Timeout` when nothing arrives within `ack_timeout`.
pub async fn initialize(
    conn: &WebSocketConnection,
    init: InitMessage,
    ack_timeout: Duration,
) -> Result<(), GqlWsError> {
    send(conn, init)?;

    let answer = tokio::time::timeout(ack_timeout, next_message(conn))
        .await
        .map_err(|_| GqlWsError::Timeout("connection_ack"))??;

    match answer {
        Some(ServerMessage::ConnectionAck(_)) => {
            tracing::info!(id = %conn.id(), "connection acknowledged");
            Ok(())
        }
        Some(ServerMessage::ConnectionError(err)) => {
            tracing::warn!(id = %conn.id(), "connection rejected");
            Err(GqlWsError::ConnectionRejected(err.payload().cloned()))
        }
        Some(other) => Err(GqlWsError::UnexpectedMessage(other.message_type())),
        None => Err(GqlWsError::ClosedEarly("connection_ack")),
    }
}
