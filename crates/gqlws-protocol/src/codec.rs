//! Send and receive paths.
//!
//! ```text
//! send:    OperationMessage ─ branch check ─ encode ─ ensure_open ─ Socket::send_text
//! receive: text frame ─ receive_text (JSON) ─ receive (discriminant) ─ ServerMessage
//! ```

use gqlws_transport::{Socket, ensure_open};
use serde_json::Value;

use crate::{
    ClientMessage, CompleteMessage, ConnectionAckMessage,
    ConnectionErrorMessage, DataMessage, ErrorMessage, Message,
    OperationMessage, ProtocolError, ServerMessage,
};

/// Encodes a client message as compact JSON text.
///
/// # Errors
/// Returns `ProtocolError::Serialization` if encoding fails.
pub fn encode(message: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Serialization)
}

/// Sends a client message over `socket` as one text frame.
///
/// Checks happen in this order, and nothing is written unless all pass:
///
/// 1. the message must be client-originated (`TypeMismatch`),
/// 2. it must encode (`Serialization`),
/// 3. the socket must be open (`Transport(NotReady | UnknownState)`).
///
/// A write failure reported by the socket is returned as
/// `ProtocolError::Transport`.
///
/// ```rust
/// use std::cell::RefCell;
///
/// use gqlws_protocol::{InitMessage, send};
/// use gqlws_transport::{Socket, TransportError};
///
/// struct Recorder(RefCell<Vec<String>>);
///
/// impl Socket for Recorder {
///     fn ready_state(&self) -> u16 { 1 }
///     fn send_text(&self, frame: String) -> Result<(), TransportError> {
///         self.0.borrow_mut().push(frame);
///         Ok(())
///     }
/// }
///
/// let socket = Recorder(RefCell::new(Vec::new()));
/// send(&socket, InitMessage::default()).unwrap();
/// assert_eq!(socket.0.borrow()[0], r#"{"type":"connection_init","payload":{}}"#);
/// ```
pub fn send<S: Socket + ?Sized>(
    socket: &S,
    message: impl Into<OperationMessage>,
) -> Result<(), ProtocolError> {
    let message = match message.into() {
        OperationMessage::Client(message) => message,
        OperationMessage::Server(message) => {
            return Err(ProtocolError::TypeMismatch(format!(
                "{} is not a client message",
                message.display_name()
            )));
        }
    };

    let frame = encode(&message)?;
    ensure_open(socket)?.send_text(frame)?;

    tracing::debug!(
        message_type = message.message_type(),
        id = message.id(),
        "sent message"
    );
    Ok(())
}

/// Rebuilds a server message from an already decoded JSON object.
///
/// Only the `type` field is inspected. `id` and `payload` are copied as
/// they are, absent fields included.
///
/// # Errors
/// Returns `ProtocolError::UnknownMessageType` carrying `raw` when `type`
/// is missing, not a string, or not one of the five server types. A
/// non-object `raw` has no `type` and fails the same way.
pub fn receive(raw: &Value) -> Result<ServerMessage, ProtocolError> {
    let field = |name: &str| raw.get(name).cloned();

    let message: ServerMessage =
        match raw.get("type").and_then(Value::as_str) {
            Some(ConnectionErrorMessage::TYPE) => {
                ConnectionErrorMessage::new(field("payload")).into()
            }
            Some(ConnectionAckMessage::TYPE) => ConnectionAckMessage::new().into(),
            Some(DataMessage::TYPE) => {
                DataMessage::new(field("id"), field("payload")).into()
            }
            Some(ErrorMessage::TYPE) => {
                ErrorMessage::new(field("id"), field("payload")).into()
            }
            Some(CompleteMessage::TYPE) => {
                CompleteMessage::new(field("id")).into()
            }
            _ => {
                tracing::warn!(raw = %raw, "received message of unknown type");
                return Err(ProtocolError::UnknownMessageType(raw.clone()));
            }
        };

    tracing::trace!(message_type = message.message_type(), "received message");
    Ok(message)
}

/// Decodes a text frame as JSON and dispatches it with [`receive`].
///
/// # Errors
/// `ProtocolError::Decode` when the frame is not JSON, otherwise the
/// errors of [`receive`].
pub fn receive_text(frame: &str) -> Result<ServerMessage, ProtocolError> {
    let raw: Value =
        serde_json::from_str(frame).map_err(ProtocolError::Decode)?;
    receive(&raw)
}

impl TryFrom<Value> for ServerMessage {
    type Error = ProtocolError;

    fn try_from(raw: Value) -> Result<Self, ProtocolError> {
        receive(&raw)
    }
}
