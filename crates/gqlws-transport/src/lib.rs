//! Transport boundary for the `graphql-ws` protocol.
//!
//! The protocol layer needs exactly two things from a connection: its
//! current state and a way to write one text frame. The [`Socket`]
//! trait captures that, and [`ensure_open`] is the readiness check the
//! protocol runs before every write.
//!
//! # Feature Flags
//!
//! - `websocket` (default): a WebSocket client built on
//!   `tokio-tungstenite` ([`WebSocketConnection`]).

mod config;
mod error;
mod ready;
#[cfg(feature = "websocket")]
mod websocket;

pub use config::{ConnectConfig, GRAPHQL_WS_PROTOCOL};
pub use error::TransportError;
pub use ready::{ReadyState, ensure_open};
#[cfg(feature = "websocket")]
pub use websocket::{CLOSE_TIMEOUT, WebSocketConnection};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter behind [`ConnectionId::next`]. Starts at 1 so
/// that `ws#0` never shows up in logs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Label attached to every log line about one connection.
///
/// Ids are handed out in connection order and never reused within a
/// process, so grepping the logs for `ws#3` shows one connection's whole
/// life: connect, queued frames, close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocates the next unused id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ws#{}", self.0)
    }
}

/// A connection the protocol layer can write text frames to.
///
/// Both methods are synchronous. Implementations backed by an async
/// connection queue the frame and return immediately, the same way a
/// browser `WebSocket.send` does.
pub trait Socket {
    /// Returns the raw connection state.
    ///
    /// Known values are the discriminants of [`ReadyState`]. Anything
    /// else is reported by [`ensure_open`] as
    /// [`TransportError::UnknownState`].
    fn ready_state(&self) -> u16;

    /// Writes `frame` as a single text frame.
    fn send_text(&self, frame: String) -> Result<(), TransportError>;
}

impl<S: Socket + ?Sized> Socket for &S {
    fn ready_state(&self) -> u16 {
        (**self).ready_state()
    }

    fn send_text(&self, frame: String) -> Result<(), TransportError> {
        (**self).send_text(frame)
    }
}
