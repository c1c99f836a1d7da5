//! Messages a server sends to the client.
//!
//! These are rebuilt from frames that already arrived, so constructors
//! take the received `id` and `payload` verbatim and never fail. A field
//! missing from the frame is `None` and is left out when the message is
//! serialized again.

use serde::Serialize;
use serde_json::Value;

use crate::Message;
use crate::message::message_variant;

/// A message the server is allowed to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// `connection_error`
    #[serde(rename = "connection_error")]
    ConnectionError(ConnectionErrorMessage),
    /// `connection_ack`
    #[serde(rename = "connection_ack")]
    ConnectionAck(ConnectionAckMessage),
    /// `data`
    #[serde(rename = "data")]
    Data(DataMessage),
    /// `error`
    #[serde(rename = "error")]
    Error(ErrorMessage),
    /// `complete`
    #[serde(rename = "complete")]
    Complete(CompleteMessage),
}

impl ServerMessage {
    /// Display name of the server branch.
    pub const BRANCH_NAME: &'static str = "OperationMessageFromServer";

    /// Returns the wire discriminant.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::ConnectionError(_) => ConnectionErrorMessage::TYPE,
            Self::ConnectionAck(_) => ConnectionAckMessage::TYPE,
            Self::Data(_) => DataMessage::TYPE,
            Self::Error(_) => ErrorMessage::TYPE,
            Self::Complete(_) => CompleteMessage::TYPE,
        }
    }

    /// Returns the display name of the concrete variant.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ConnectionError(_) => ConnectionErrorMessage::NAME,
            Self::ConnectionAck(_) => ConnectionAckMessage::NAME,
            Self::Data(_) => DataMessage::NAME,
            Self::Error(_) => ErrorMessage::NAME,
            Self::Complete(_) => CompleteMessage::NAME,
        }
    }

    /// Returns the operation id as received, for the variants that
    /// carry one.
    pub fn id(&self) -> Option<&Value> {
        match self {
            Self::Data(m) => m.id(),
            Self::Error(m) => m.id(),
            Self::Complete(m) => m.id(),
            Self::ConnectionError(_) | Self::ConnectionAck(_) => None,
        }
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The server rejected `connection_init`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

message_variant!(
    ConnectionErrorMessage => ServerMessage::ConnectionError,
    "connection_error"
);

impl ConnectionErrorMessage {
    pub fn new(payload: Option<Value>) -> Self {
        Self { payload }
    }

    /// The error the server reported.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

/// The server accepted `connection_init`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConnectionAckMessage {}

message_variant!(
    ConnectionAckMessage => ServerMessage::ConnectionAck,
    "connection_ack"
);

impl ConnectionAckMessage {
    pub fn new() -> Self {
        Self {}
    }
}

/// One execution result for a running operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

message_variant!(DataMessage => ServerMessage::Data, "data");

impl DataMessage {
    pub fn new(id: Option<Value>, payload: Option<Value>) -> Self {
        Self { id, payload }
    }

    /// The operation id as received.
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// The operation id, when the server sent a string.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    /// The execution result, usually `{"data":…,"errors":…}`.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

/// An operation failed before producing a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

message_variant!(ErrorMessage => ServerMessage::Error, "error");

impl ErrorMessage {
    pub fn new(id: Option<Value>, payload: Option<Value>) -> Self {
        Self { id, payload }
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

/// The operation finished; no more `data` will follow for this id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
}

message_variant!(CompleteMessage => ServerMessage::Complete, "complete");

impl CompleteMessage {
    pub fn new(id: Option<Value>) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    pub fn id_str(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn to_json(message: impl Into<ServerMessage>) -> String {
        serde_json::to_string(&message.into()).unwrap()
    }

    #[test]
    fn test_connection_ack_json_format() {
        assert_eq!(
            to_json(ConnectionAckMessage::new()),
            r#"{"type":"connection_ack"}"#
        );
    }

    #[test]
    fn test_data_json_format() {
        let msg = DataMessage::new(Some(json!("x")), Some(json!({"a": 1})));
        assert_eq!(msg.id_str(), Some("x"));
        assert_eq!(
            to_json(msg),
            r#"{"type":"data","id":"x","payload":{"a":1}}"#
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        assert_eq!(to_json(DataMessage::new(None, None)), r#"{"type":"data"}"#);
        assert_eq!(
            to_json(ConnectionErrorMessage::new(None)),
            r#"{"type":"connection_error"}"#
        );
        assert_eq!(to_json(CompleteMessage::new(None)), r#"{"type":"complete"}"#);
    }

    #[test]
    fn test_fields_are_carried_verbatim() {
        // A numeric id is not rejected or coerced.
        let msg = ErrorMessage::new(Some(json!(5)), Some(json!([{"message": "boom"}])));
        assert_eq!(msg.id(), Some(&json!(5)));
        assert_eq!(msg.id_str(), None);
        assert_eq!(
            to_json(msg),
            r#"{"type":"error","id":5,"payload":[{"message":"boom"}]}"#
        );
    }

    #[test]
    fn test_server_message_accessors() {
        let msg: ServerMessage = CompleteMessage::new(Some(json!("3"))).into();
        assert_eq!(msg.message_type(), "complete");
        assert_eq!(msg.display_name(), "CompleteMessage");
        assert_eq!(msg.id(), Some(&json!("3")));
        assert_eq!(msg.to_string(), "CompleteMessage");

        let ack: ServerMessage = ConnectionAckMessage::new().into();
        assert_eq!(ack.id(), None);
    }

    #[test]
    fn test_serialized_type_matches_message_type() {
        let messages: Vec<ServerMessage> = vec![
            ConnectionErrorMessage::new(Some(json!({}))).into(),
            ConnectionAckMessage::new().into(),
            DataMessage::new(Some(json!("1")), Some(json!({}))).into(),
            ErrorMessage::new(Some(json!("1")), Some(json!({}))).into(),
            CompleteMessage::new(Some(json!("1"))).into(),
        ];
        for msg in messages {
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["type"], msg.message_type());
        }
    }
}
