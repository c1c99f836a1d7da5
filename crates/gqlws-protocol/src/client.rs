//! Messages a client sends to the server.
//!
//! Every constructor validates its arguments and either returns a
//! complete message or an [`InvalidArgument`](ProtocolError::InvalidArgument)
//! error naming the first bad field. Fields are private, so a message
//! never changes after construction.
//!
//! Struct field order is the wire order: serde writes the `type` tag
//! first, then fields as declared (`id` before `payload`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::message::message_variant;
use crate::{Message, ProtocolError, validate};

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// A message the client is allowed to send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// `connection_init`
    #[serde(rename = "connection_init")]
    Init(InitMessage),
    /// `start`
    #[serde(rename = "start")]
    Start(StartMessage),
    /// `stop`
    #[serde(rename = "stop")]
    Stop(StopMessage),
    /// `connection_terminate`
    #[serde(rename = "connection_terminate")]
    ConnectionTerminate(ConnectionTerminateMessage),
}

impl ClientMessage {
    /// Display name of the client branch.
    pub const BRANCH_NAME: &'static str = "OperationMessageFromClient";

    /// Returns the wire discriminant.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Init(_) => InitMessage::TYPE,
            Self::Start(_) => StartMessage::TYPE,
            Self::Stop(_) => StopMessage::TYPE,
            Self::ConnectionTerminate(_) => ConnectionTerminateMessage::TYPE,
        }
    }

    /// Returns the display name of the concrete variant.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Init(_) => InitMessage::NAME,
            Self::Start(_) => StartMessage::NAME,
            Self::Stop(_) => StopMessage::NAME,
            Self::ConnectionTerminate(_) => ConnectionTerminateMessage::NAME,
        }
    }

    /// Returns the operation id for `start` and `stop`.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Start(m) => Some(m.id()),
            Self::Stop(m) => Some(m.id()),
            Self::Init(_) | Self::ConnectionTerminate(_) => None,
        }
    }
}

impl std::fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// InitMessage
// ---------------------------------------------------------------------------

/// Opens the GraphQL session on a freshly connected socket.
///
/// The payload carries connection parameters (auth tokens and the like)
/// and is always an object, `{}` when none are given.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InitMessage {
    payload: Map<String, Value>,
}

message_variant!(InitMessage => ClientMessage::Init, "connection_init");

impl InitMessage {
    /// Builds an init message from optional untyped connection
    /// parameters.
    ///
    /// # Errors
    /// `InvalidArgument` on `payload` when it is given and is not an
    /// object. `null` is treated as not given.
    pub fn new(payload: Option<Value>) -> Result<Self, ProtocolError> {
        Ok(Self {
            payload: validate::optional_object("payload", payload)?,
        })
    }

    /// Builds an init message from an already typed object.
    pub fn with_payload(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    /// Returns the connection parameters.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

// ---------------------------------------------------------------------------
// StartMessage
// ---------------------------------------------------------------------------

/// The operation carried by a [`StartMessage`].
///
/// Serialized as `{"query":…,"variables":…,"operationName":…}` in that
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartPayload {
    query: String,
    variables: Map<String, Value>,
    #[serde(rename = "operationName")]
    operation_name: String,
}

impl StartPayload {
    /// The GraphQL document.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Variables for the operation, `{}` when none were given.
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Operation to run, `""` when none was given.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }
}

/// Starts a GraphQL operation under a client-chosen id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartMessage {
    id: String,
    payload: StartPayload,
}

message_variant!(StartMessage => ClientMessage::Start, "start");

impl StartMessage {
    /// Builds a start message from possibly untyped arguments.
    ///
    /// Checks run in this order and stop at the first failure:
    /// `id` non-empty, `query` non-empty, `variables` an object if
    /// given, `operationName` a string if given. JSON `null` counts as
    /// not given.
    pub fn new(
        id: impl Into<String>,
        query: impl Into<String>,
        variables: Option<Value>,
        operation_name: Option<Value>,
    ) -> Result<Self, ProtocolError> {
        let id = validate::non_empty("id", id.into())?;
        let query = validate::non_empty("query", query.into())?;
        let variables = validate::optional_object("variables", variables)?;
        let operation_name =
            validate::optional_string("operationName", operation_name)?;
        Ok(Self::from_parts(id, query, variables, operation_name))
    }

    /// Starts a typed builder for a start message.
    ///
    /// ```rust
    /// use gqlws_protocol::StartMessage;
    ///
    /// let msg = StartMessage::builder("1", "subscription { ticks }")
    ///     .operation_name("Ticks")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(msg.payload().operation_name(), "Ticks");
    /// ```
    pub fn builder(
        id: impl Into<String>,
        query: impl Into<String>,
    ) -> StartMessageBuilder {
        StartMessageBuilder {
            id: id.into(),
            query: query.into(),
            variables: Map::new(),
            operation_name: String::new(),
        }
    }

    fn from_parts(
        id: String,
        query: String,
        variables: Map<String, Value>,
        operation_name: String,
    ) -> Self {
        Self {
            id,
            payload: StartPayload {
                query,
                variables,
                operation_name,
            },
        }
    }

    /// The operation id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The operation to start.
    pub fn payload(&self) -> &StartPayload {
        &self.payload
    }
}

/// Builder returned by [`StartMessage::builder`].
#[derive(Debug, Clone)]
pub struct StartMessageBuilder {
    id: String,
    query: String,
    variables: Map<String, Value>,
    operation_name: String,
}

impl StartMessageBuilder {
    /// Sets the operation variables.
    pub fn variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    /// Sets the name of the operation to run.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    /// Validates `id` and `query` and builds the message.
    pub fn build(self) -> Result<StartMessage, ProtocolError> {
        let id = validate::non_empty("id", self.id)?;
        let query = validate::non_empty("query", self.query)?;
        Ok(StartMessage::from_parts(
            id,
            query,
            self.variables,
            self.operation_name,
        ))
    }
}

// ---------------------------------------------------------------------------
// StopMessage
// ---------------------------------------------------------------------------

/// Stops the operation with the given id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopMessage {
    id: String,
}

message_variant!(StopMessage => ClientMessage::Stop, "stop");

impl StopMessage {
    /// # Errors
    /// `InvalidArgument` on `id` when it is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ProtocolError> {
        Ok(Self {
            id: validate::non_empty("id", id.into())?,
        })
    }

    /// The operation id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// ConnectionTerminateMessage
// ---------------------------------------------------------------------------

/// Ends the GraphQL session. Carries no fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConnectionTerminateMessage {}

message_variant!(
    ConnectionTerminateMessage => ClientMessage::ConnectionTerminate,
    "connection_terminate"
);

impl ConnectionTerminateMessage {
    pub fn new() -> Self {
        Self {}
    }
}
