//! Error types for the protocol layer.
//!
//! Every failure here is synchronous and reported to the immediate
//! caller. Nothing is retried, and a failed `send` has written nothing.
//!
//! Errors come from three places:
//!
//! - the client message constructors, which check their arguments
//!   before building anything ([`ProtocolError::InvalidArgument`]);
//! - [`send`](crate::send), which checks the message branch, encodes,
//!   and then asks the transport to write;
//! - [`receive`](crate::receive) and [`receive_text`](crate::receive_text),
//!   which reject frames they cannot dispatch.
//!
//! Callers that only care about the category use [`ProtocolError::kind`]
//! rather than matching variants, since readiness failures arrive
//! wrapped in [`ProtocolError::Transport`].

use gqlws_transport::TransportError;
use serde_json::Value;

/// Errors that can occur while building, sending, or receiving messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A constructor argument was missing, empty, or of the wrong JSON
    /// type.
    ///
    /// `field` is the wire name of the offending argument (`id`,
    /// `query`, `variables`, `operationName`, `payload`), so printing
    /// the error shows something like
    /// `invalid variables: expected an object, got an array`.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// A message of the wrong branch was handed to `send`.
    ///
    /// Only client messages can be sent. The check runs before the
    /// readiness check, so a server message is reported as this error
    /// even on a socket that is not open.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The message could not be encoded as JSON.
    #[error("unable to serialize message: {0}")]
    Serialization(#[source] serde_json::Error),

    /// An inbound text frame was not valid JSON.
    #[error("unable to decode frame: {0}")]
    Decode(#[source] serde_json::Error),

    /// An inbound object had a missing or unrecognized `type`.
    ///
    /// The whole object is kept so it can be logged as received.
    #[error("received message of unknown type\n{}", pretty(.0))]
    UnknownMessageType(Value),

    /// The readiness check or the write itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Coarse category of a [`ProtocolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad constructor input.
    InvalidArgument,
    /// Wrong message branch for `send`, or a socket in an unknown state.
    TypeMismatch,
    /// The socket is connecting, closing, or closed.
    NotReady,
    /// The message could not be encoded.
    Serialization,
    /// An inbound frame was not JSON or had an unknown discriminant.
    UnknownMessageType,
    /// Any other transport failure (connect, write, closed channel).
    Transport,
}

impl ProtocolError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Decode(_) | Self::UnknownMessageType(_) => {
                ErrorKind::UnknownMessageType
            }
            Self::Transport(TransportError::NotReady(_)) => ErrorKind::NotReady,
            Self::Transport(TransportError::UnknownState(_)) => {
                ErrorKind::TypeMismatch
            }
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    pub(crate) fn invalid(
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
