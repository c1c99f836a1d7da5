//! Connection state of a socket and the readiness guard used before
//! every send.
//!
//! The four states mirror the numeric `readyState` values a WebSocket
//! exposes in browsers and most client libraries:
//!
//! ```text
//! CONNECTING (0) → OPEN (1) → CLOSING (2) → CLOSED (3)
//! ```
//!
//! Sockets report the raw number. Converting it into [`ReadyState`] is
//! where unknown values are rejected, so nothing downstream ever has to
//! handle a fifth case.

use std::fmt;

use crate::{Socket, TransportError};

/// The lifecycle state of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ReadyState {
    /// The opening handshake has not completed yet.
    Connecting = 0,
    /// Frames can be written.
    Open = 1,
    /// A close frame has been sent or received; no more writes.
    Closing = 2,
    /// The connection is gone.
    Closed = 3,
}

impl ReadyState {
    /// Returns the raw numeric value of this state.
    pub fn as_raw(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for ReadyState {
    type Error = TransportError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Connecting),
            1 => Ok(Self::Open),
            2 => Ok(Self::Closing),
            3 => Ok(Self::Closed),
            other => Err(TransportError::UnknownState(other)),
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Open => write!(f, "OPEN"),
            Self::Closing => write!(f, "CLOSING"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Checks that `socket` is open and hands it back.
///
/// This is a point-in-time check: it reads the state once and never
/// waits for the socket to become ready.
///
/// # Errors
/// - [`TransportError::NotReady`] with the current state when the
///   socket is connecting, closing, or closed.
/// - [`TransportError::UnknownState`] when the socket reports a value
///   outside `0..=3`.
pub fn ensure_open<S: Socket + ?Sized>(
    socket: &S,
) -> Result<&S, TransportError> {
    match ReadyState::try_from(socket.ready_state())? {
        ReadyState::Open => Ok(socket),
        state @ (ReadyState::Connecting
        | ReadyState::Closing
        | ReadyState::Closed) => Err(TransportError::NotReady(state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A socket frozen in one raw state. Writes are never expected.
    #[derive(Debug)]
    struct FixedState(u16);

    impl Socket for FixedState {
        fn ready_state(&self) -> u16 {
            self.0
        }

        fn send_text(&self, _frame: String) -> Result<(), TransportError> {
            unreachable!("the guard never writes")
        }
    }

    #[test]
    fn test_ready_state_from_raw_values() {
        assert_eq!(ReadyState::try_from(0u16).unwrap(), ReadyState::Connecting);
        assert_eq!(ReadyState::try_from(1u16).unwrap(), ReadyState::Open);
        assert_eq!(ReadyState::try_from(2u16).unwrap(), ReadyState::Closing);
        assert_eq!(ReadyState::try_from(3u16).unwrap(), ReadyState::Closed);
    }

    #[test]
    fn test_ready_state_rejects_unknown_raw_value() {
        let err = ReadyState::try_from(4u16).unwrap_err();
        assert!(matches!(err, TransportError::UnknownState(4)));
    }

    #[test]
    fn test_ready_state_as_raw_matches_discriminant() {
        for raw in 0u16..=3 {
            assert_eq!(ReadyState::try_from(raw).unwrap().as_raw(), raw);
        }
    }

    #[test]
    fn test_ready_state_display() {
        assert_eq!(ReadyState::Open.to_string(), "OPEN");
        assert_eq!(ReadyState::Closing.to_string(), "CLOSING");
    }

    #[test]
    fn test_ensure_open_returns_same_socket_when_open() {
        let socket = FixedState(1);
        let returned = ensure_open(&socket).unwrap();
        assert!(std::ptr::eq(returned, &socket));
    }

    #[test]
    fn test_ensure_open_reports_each_non_open_state() {
        let cases = [
            (0, ReadyState::Connecting),
            (2, ReadyState::Closing),
            (3, ReadyState::Closed),
        ];
        for (raw, expected) in cases {
            match ensure_open(&FixedState(raw)) {
                Err(TransportError::NotReady(state)) => {
                    assert_eq!(state, expected)
                }
                other => panic!("state {raw}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_ensure_open_rejects_unknown_state() {
        let err = ensure_open(&FixedState(u16::MAX)).unwrap_err();
        assert!(matches!(err, TransportError::UnknownState(u16::MAX)));
    }
}
