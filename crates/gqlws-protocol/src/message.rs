//! The base of the message hierarchy.
//!
//! Every message has a wire discriminant (`type`) and a display name.
//! Messages split into two disjoint branches by which endpoint may send
//! them:
//!
//! ```text
//!                    OperationMessage
//!                   /                \
//!        ClientMessage                ServerMessage
//!  Init | Start | Stop | Terminate    ConnectionError | ConnectionAck
//!                                     | Data | Error | Complete
//! ```

use std::fmt;

use serde::Serialize;

use crate::{ClientMessage, ServerMessage};

/// Identity shared by every concrete message type.
pub trait Message {
    /// The `type` discriminant written on the wire.
    const TYPE: &'static str;

    /// Human-readable name for logs and diagnostics. Never sent.
    const NAME: &'static str;
}

/// Any message of either branch.
///
/// Only [`send`](crate::send) needs this: it accepts any message and
/// rejects the server branch at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationMessage {
    /// Sent by the client.
    Client(ClientMessage),
    /// Sent by the server.
    Server(ServerMessage),
}

impl OperationMessage {
    /// Display name of the base type.
    pub const BASE_NAME: &'static str = "OperationMessage";

    /// Returns the wire discriminant.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::Client(m) => m.message_type(),
            Self::Server(m) => m.message_type(),
        }
    }

    /// Returns the display name of the concrete variant.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Client(m) => m.display_name(),
            Self::Server(m) => m.display_name(),
        }
    }
}

impl From<ClientMessage> for OperationMessage {
    fn from(message: ClientMessage) -> Self {
        Self::Client(message)
    }
}

impl From<ServerMessage> for OperationMessage {
    fn from(message: ServerMessage) -> Self {
        Self::Server(message)
    }
}

impl fmt::Display for OperationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Wires a concrete struct into the hierarchy: its [`Message`] identity,
/// `Display`, and conversions into its branch enum and the base.
macro_rules! message_variant {
    ($ty:ident => $branch:ident::$variant:ident, $wire:literal) => {
        impl $crate::Message for $ty {
            const TYPE: &'static str = $wire;
            const NAME: &'static str = stringify!($ty);
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(
                &self,
                f: &mut ::std::fmt::Formatter<'_>,
            ) -> ::std::fmt::Result {
                f.write_str(<Self as $crate::Message>::NAME)
            }
        }

        impl From<$ty> for $branch {
            fn from(message: $ty) -> Self {
                $branch::$variant(message)
            }
        }

        impl From<$ty> for $crate::OperationMessage {
            fn from(message: $ty) -> Self {
                $crate::OperationMessage::from($branch::$variant(message))
            }
        }
    };
}

pub(crate) use message_variant;
