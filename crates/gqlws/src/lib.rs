//! # gqlws
//!
//! Message contract for GraphQL over WebSocket (`graphql-ws`
//! subprotocol), plus a WebSocket client to carry it.
//!
//! - [`gqlws_protocol`]: message types, validation, `send`/`receive`.
//! - [`gqlws_transport`]: ready state, readiness guard, WebSocket client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gqlws::prelude::*;
//!
//! # async fn run() -> Result<(), GqlWsError> {
//! let conn = gqlws::connect(&ConnectConfig::new("ws://localhost:4000/graphql")).await?;
//! gqlws::initialize(&conn, InitMessage::default(), gqlws::DEFAULT_ACK_TIMEOUT).await?;
//!
//! send(&conn, StartMessage::new("1", "subscription { ticks }", None, None)?)?;
//! while let Some(message) = gqlws::next_message(&conn).await? {
//!     if let ServerMessage::Complete(_) = message {
//!         break;
//!     }
//! }
//! send(&conn, ConnectionTerminateMessage::new())?;
//! conn.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{DEFAULT_ACK_TIMEOUT, connect, initialize, next_message};
pub use error::GqlWsError;

pub use gqlws_protocol;
pub use gqlws_transport;

/// Everything needed to build, send, and receive messages.
pub mod prelude {
    pub use gqlws_protocol::{
        ClientMessage, CompleteMessage, ConnectionAckMessage,
        ConnectionErrorMessage, ConnectionTerminateMessage, DataMessage,
        ErrorKind, ErrorMessage, InitMessage, Message, OperationMessage,
        ProtocolError, ServerMessage, StartMessage, StopMessage, receive,
        receive_text, send,
    };

    pub use gqlws_transport::{
        ConnectConfig, ReadyState, Socket, TransportError,
        WebSocketConnection, ensure_open,
    };

    pub use crate::GqlWsError;
}
