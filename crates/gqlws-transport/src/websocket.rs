//! WebSocket client connection using `tokio-tungstenite`.
//!
//! A connection is split into two halves after the handshake, and each
//! half is driven by its own task:
//!
//! - The **writer** owns the sink. It pulls frames from an unbounded
//!   queue and writes them one at a time, in order. It stops after it
//!   has written a close frame, after a failed write, or once the queue
//!   is empty and the handle is gone.
//! - The **reader** owns the stream. It forwards text frames to
//!   [`WebSocketConnection::recv`] and marks the connection `CLOSED`
//!   when the stream ends.
//!
//! Both tasks share the ready state through an `AtomicU16`, so
//! [`Socket::ready_state`] always reflects what the tasks last saw.
//!
//! ```text
//!   send_text ──▶ [queue] ──▶ writer ──▶ sink ──▶ peer
//!   recv      ◀── [queue] ◀── reader ◀── stream ◀── peer
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{ConnectConfig, ConnectionId, ReadyState, Socket, TransportError};

type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long [`WebSocketConnection::shutdown`] waits for the peer to
/// answer the close frame before giving up on it.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A client WebSocket connection.
///
/// Writes go through [`Socket::send_text`], which queues the frame for
/// the writer task and returns without waiting, the same way a browser
/// `WebSocket.send` does. Inbound text frames are handed out by
/// [`recv`](Self::recv); ping, pong and binary frames are skipped.
///
/// The ready state tracks the real connection: `OPEN` once connected,
/// `CLOSING` after [`close`](Self::close) or when the peer starts the
/// closing handshake, `CLOSED` when the stream ends or a write fails.
///
/// # Ending a connection
///
/// Queued frames only reach the peer while the Tokio runtime keeps the
/// writer task running. Before the runtime goes away (for example when
/// `main` returns), call [`shutdown`](Self::shutdown): it resolves once
/// every queued frame and the close frame have been written.
///
/// Dropping the handle without `shutdown` stops the reader right away.
/// The writer still works through whatever is queued, but nothing waits
/// for it.
pub struct WebSocketConnection {
    id: ConnectionId,
    state: Arc<AtomicU16>,
    outbound: mpsc::UnboundedSender<Message>,
    inbound: Mutex<mpsc::UnboundedReceiver<String>>,
    writer: Option<JoinHandle<Result<(), TransportError>>>,
    reader: Option<JoinHandle<()>>,
}

impl WebSocketConnection {
    /// Opens a connection and completes the upgrade handshake.
    ///
    /// When `config.subprotocol` is set it is sent in the
    /// `Sec-WebSocket-Protocol` header, and `tungstenite` refuses an
    /// upgrade response that does not echo it back.
    ///
    /// Must be called from within a Tokio runtime; the reader and writer
    /// tasks are spawned onto it.
    pub async fn connect(
        config: &ConnectConfig,
    ) -> Result<Self, TransportError> {
        let mut request =
            config.url.as_str().into_client_request().map_err(|e| {
                TransportError::ConnectFailed(e.to_string())
            })?;
        if let Some(protocol) = &config.subprotocol {
            let value = HeaderValue::from_str(protocol).map_err(|e| {
                TransportError::ConnectFailed(e.to_string())
            })?;
            request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, value);
        }

        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| TransportError::ConnectFailed(e.to_string()))?;

        let id = ConnectionId::next();
        tracing::info!(%id, url = %config.url, "websocket connected");

        let state = Arc::new(AtomicU16::new(ReadyState::Open.as_raw()));
        let (sink, stream) = ws.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(write_frames(
            id,
            sink,
            outbound_rx,
            Arc::clone(&state),
        ));
        let reader =
            tokio::spawn(read_frames(id, stream, inbound_tx, Arc::clone(&state)));

        Ok(Self {
            id,
            state,
            outbound,
            inbound: Mutex::new(inbound),
            writer: Some(writer),
            reader: Some(reader),
        })
    }

    /// Receives the next inbound text frame.
    ///
    /// Returns `None` once the connection is closed and every frame
    /// received before the close has been handed out.
    pub async fn recv(&self) -> Option<String> {
        self.inbound.lock().await.recv().await
    }

    /// Starts the closing handshake.
    ///
    /// The state moves to `CLOSING` immediately and to `CLOSED` when the
    /// peer answers. The close frame is queued behind any frame already
    /// sent. Closing an already closing or closed connection is a no-op.
    ///
    /// This does not wait for anything; see [`shutdown`](Self::shutdown).
    pub fn close(&self) -> Result<(), TransportError> {
        if !self.mark_closing() {
            return Ok(());
        }
        tracing::debug!(id = %self.id, "closing websocket");
        self.outbound.send(Message::Close(None)).map_err(|_| {
            TransportError::ConnectionClosed("writer task stopped".into())
        })
    }

    /// Closes the connection and waits until it is finished.
    ///
    /// Resolves once the writer has written every frame queued before
    /// this call followed by a close frame, and the peer has answered
    /// the close (or [`CLOSE_TIMEOUT`] has passed). The state is `CLOSED`
    /// afterwards.
    ///
    /// # Errors
    /// [`TransportError::SendFailed`] when a queued frame could not be
    /// written, so the peer may not have seen it.
    pub async fn shutdown(mut self) -> Result<(), TransportError> {
        if self.mark_closing() {
            tracing::debug!(id = %self.id, "shutting down websocket");
        }
        // The writer stops at the first close frame it sees, so this is
        // harmless when `close` already queued one. A send error means
        // the writer has already stopped.
        let _ = self.outbound.send(Message::Close(None));

        let written = match self.writer.take() {
            Some(writer) => writer.await.unwrap_or_else(|e| {
                Err(TransportError::SendFailed(format!(
                    "{}: writer task failed: {e}",
                    self.id
                )))
            }),
            None => Ok(()),
        };

        if let Some(reader) = self.reader.take() {
            let abort = reader.abort_handle();
            if tokio::time::timeout(CLOSE_TIMEOUT, reader).await.is_err() {
                tracing::debug!(id = %self.id, "peer did not answer close");
                abort.abort();
            }
        }
        self.state.store(ReadyState::Closed.as_raw(), Ordering::Release);
        written
    }

    /// Returns the current state as a [`ReadyState`].
    pub fn state(&self) -> ReadyState {
        // Only this module stores into `state`, always a valid value.
        ReadyState::try_from(self.ready_state()).unwrap_or(ReadyState::Closed)
    }

    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Moves `OPEN` to `CLOSING`. Returns whether this call did it.
    fn mark_closing(&self) -> bool {
        self.state
            .compare_exchange(
                ReadyState::Open.as_raw(),
                ReadyState::Closing.as_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Drop for WebSocketConnection {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

impl Socket for WebSocketConnection {
    fn ready_state(&self) -> u16 {
        self.state.load(Ordering::Acquire)
    }

    fn send_text(&self, frame: String) -> Result<(), TransportError> {
        tracing::trace!(id = %self.id, len = frame.len(), "queue text frame");
        self.outbound.send(Message::text(frame)).map_err(|_| {
            TransportError::SendFailed(format!(
                "{}: writer task stopped",
                self.id
            ))
        })
    }
}

/// Writer task body. Each `send` flushes, so a frame has left the
/// process by the time the next one is taken from the queue.
async fn write_frames(
    id: ConnectionId,
    mut sink: SplitSink<ClientStream, Message>,
    mut queue: mpsc::UnboundedReceiver<Message>,
    state: Arc<AtomicU16>,
) -> Result<(), TransportError> {
    while let Some(msg) = queue.recv().await {
        if msg.is_close() {
            // A peer that already closed may refuse our close frame.
            if let Err(e) = sink.send(msg).await {
                tracing::debug!(%id, error = %e, "close frame not written");
            }
            return Ok(());
        }
        if let Err(e) = sink.send(msg).await {
            tracing::debug!(%id, error = %e, "websocket write failed");
            state.store(ReadyState::Closed.as_raw(), Ordering::Release);
            return Err(TransportError::SendFailed(format!("{id}: {e}")));
        }
    }
    Ok(())
}

/// Reader task body.
///
/// When the peer starts the closing handshake, `tungstenite` queues the
/// close reply and flushes it on the next poll, so the stream is polled
/// until it ends rather than dropped at the close frame. When we started
/// the handshake, the peer's close frame is the reply and reading stops.
async fn read_frames(
    id: ConnectionId,
    mut stream: SplitStream<ClientStream>,
    inbound: mpsc::UnboundedSender<String>,
    state: Arc<AtomicU16>,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                tracing::trace!(%id, len = text.len(), "text frame");
                if inbound.send(text.as_str().to_owned()).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                let peer_started = state
                    .compare_exchange(
                        ReadyState::Open.as_raw(),
                        ReadyState::Closing.as_raw(),
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    )
                    .is_ok();
                if !peer_started {
                    break;
                }
                tracing::debug!(%id, "peer is closing the websocket");
            }
            Ok(_) => continue, // ping/pong/binary
            Err(e) => {
                tracing::warn!(%id, error = %e, "websocket read failed");
                break;
            }
        }
    }
    state.store(ReadyState::Closed.as_raw(), Ordering::Release);
    tracing::debug!(%id, "websocket closed");
}
