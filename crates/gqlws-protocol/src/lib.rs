//! Wire protocol for `graphql-ws`.
//!
//! This crate defines the messages a GraphQL client and server exchange
//! over one WebSocket connection:
//!
//! - **Client messages** ([`ClientMessage`]): `connection_init`, `start`,
//!   `stop`, `connection_terminate`. Built through validating
//!   constructors.
//! - **Server messages** ([`ServerMessage`]): `connection_error`,
//!   `connection_ack`, `data`, `error`, `complete`. Rebuilt from received
//!   JSON without validation.
//! - **Send/receive** ([`send`], [`receive`], [`receive_text`]): canonical
//!   JSON out through a [`Socket`](gqlws_transport::Socket), typed
//!   messages in.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Wire format
//!
//! One JSON object per text frame, `type` first, then `id`, then
//! `payload`:
//!
//! ```text
//! {"type":"start","id":"1","payload":{"query":"{ a }","variables":{},"operationName":""}}
//! ```
//!
//! Tracking which operation ids are in flight, and when to start or stop
//! them, is left to the caller.

mod client;
mod codec;
mod error;
mod message;
mod server;
mod validate;

pub use client::{
    ClientMessage, ConnectionTerminateMessage, InitMessage, StartMessage,
    StartMessageBuilder, StartPayload, StopMessage,
};
pub use codec::{encode, receive, receive_text, send};
pub use error::{ErrorKind, ProtocolError};
pub use message::{Message, OperationMessage};
pub use server::{
    CompleteMessage, ConnectionAckMessage, ConnectionErrorMessage,
    DataMessage, ErrorMessage, ServerMessage,
};
