//! Integration tests for the WebSocket client connection.
//!
//! Each test binds a real `tokio-tungstenite` server on an OS-assigned
//! port and drives `WebSocketConnection` against it.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use gqlws_transport::{
        ConnectConfig, ReadyState, Socket, TransportError, WebSocketConnection,
        ensure_open,
    };
    use tokio::net::TcpListener;
    use tokio_tungstenite::WebSocketStream;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::handshake::server::{
        ErrorResponse, Request, Response,
    };
    use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;

    type ServerStream = WebSocketStream<tokio::net::TcpStream>;

    /// Handshake callback that accepts whatever subprotocol the client
    /// asked for. The client refuses an upgrade that drops it.
    fn echo_subprotocol(
        req: &Request,
        mut resp: Response,
    ) -> Result<Response, ErrorResponse> {
        if let Some(protocol) = req.headers().get(SEC_WEBSOCKET_PROTOCOL) {
            resp.headers_mut()
                .insert(SEC_WEBSOCKET_PROTOCOL, protocol.clone());
        }
        Ok(resp)
    }

    /// Binds a listener on a random port and returns its `ws://` URL
    /// plus a handle resolving to the server side of the first
    /// connection.
    async fn spawn_server() -> (String, tokio::task::JoinHandle<ServerStream>)
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("should accept");
            tokio_tungstenite::accept_hdr_async(stream, echo_subprotocol)
                .await
                .expect("server handshake")
        });
        (format!("ws://{addr}/graphql"), handle)
    }

    async fn recv_with_timeout(conn: &WebSocketConnection) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(5), conn.recv())
            .await
            .expect("recv timed out")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive_text_frames() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        assert_eq!(conn.state(), ReadyState::Open);
        assert!(conn.id().get() > 0);
        assert!(ensure_open(&conn).is_ok());

        // --- Client sends, server receives ---
        conn.send_text(r#"{"type":"connection_init","payload":{}}"#.into())
            .expect("send should queue");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert_eq!(
            msg.to_text().unwrap(),
            r#"{"type":"connection_init","payload":{}}"#
        );

        // --- Server sends, client receives ---
        server_ws
            .send(Message::text(r#"{"type":"connection_ack"}"#))
            .await
            .unwrap();
        let received = recv_with_timeout(&conn).await.expect("a frame");
        assert_eq!(received, r#"{"type":"connection_ack"}"#);
    }

    #[tokio::test]
    async fn test_client_close_moves_through_closing_to_closed() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        conn.close().expect("close should queue");
        assert_eq!(conn.state(), ReadyState::Closing);
        assert!(matches!(
            ensure_open(&conn),
            Err(TransportError::NotReady(ReadyState::Closing))
        ));

        // Drive the server until it has answered the close frame.
        while let Some(Ok(_)) = server_ws.next().await {}

        assert_eq!(recv_with_timeout(&conn).await, None);
        assert_eq!(conn.state(), ReadyState::Closed);

        // A second close is a no-op.
        conn.close().expect("closing twice is fine");
    }

    #[tokio::test]
    async fn test_server_close_is_answered_and_marks_connection_closed() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        server_ws
            .send(Message::text(r#"{"type":"complete","id":"1"}"#))
            .await
            .unwrap();
        server_ws.close(None).await.unwrap();

        // The client must answer the server's close frame.
        let reply = tokio::time::timeout(Duration::from_secs(5), server_ws.next())
            .await
            .expect("no close reply from client");
        assert!(matches!(reply, Some(Ok(Message::Close(_)))), "got {reply:?}");
        drop(server_ws);

        // Frames received before the close are still handed out.
        assert_eq!(
            recv_with_timeout(&conn).await.as_deref(),
            Some(r#"{"type":"complete","id":"1"}"#)
        );
        assert_eq!(recv_with_timeout(&conn).await, None);
        assert_eq!(conn.state(), ReadyState::Closed);
        assert!(matches!(
            ensure_open(&conn),
            Err(TransportError::NotReady(ReadyState::Closed))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_writes_queued_frames_then_close() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        for n in 0..3 {
            conn.send_text(format!(r#"{{"n":{n}}}"#)).unwrap();
        }
        let peer = tokio::spawn(async move {
            let mut frames = Vec::new();
            while let Some(Ok(frame)) = server_ws.next().await {
                frames.push(frame);
            }
            frames
        });

        conn.shutdown().await.expect("every frame written");

        let frames = peer.await.unwrap();
        assert_eq!(frames.len(), 4, "{frames:?}");
        for (n, frame) in frames[..3].iter().enumerate() {
            assert_eq!(frame.to_text().unwrap(), format!(r#"{{"n":{n}}}"#));
        }
        assert!(frames[3].is_close());
    }

    #[tokio::test]
    async fn test_shutdown_after_peer_closed_returns() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        server_ws.close(None).await.unwrap();
        while let Some(Ok(_)) = server_ws.next().await {}
        drop(server_ws);
        assert_eq!(recv_with_timeout(&conn).await, None);

        tokio::time::timeout(Duration::from_secs(5), conn.shutdown())
            .await
            .expect("shutdown should not hang")
            .expect("nothing was queued");
    }

    #[tokio::test]
    async fn test_dropping_connection_releases_the_socket() {
        let (url, server) = spawn_server().await;
        let conn = WebSocketConnection::connect(&ConnectConfig::new(url))
            .await
            .expect("should connect");
        let mut server_ws = server.await.expect("server task");

        drop(conn);

        // The server sees the TCP connection go away without sending
        // anything to the client first.
        let next = tokio::time::timeout(Duration::from_secs(5), server_ws.next())
            .await
            .expect("client socket still open after drop");
        assert!(
            !matches!(next, Some(Ok(Message::Text(_)))),
            "unexpected frame {next:?}"
        );
    }

    #[tokio::test]
    async fn test_connect_to_unbound_port_fails() {
        // Grab a free port, then release it so nothing is listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ConnectConfig::new(format!("ws://{addr}/graphql"));
        let result = WebSocketConnection::connect(&config).await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let config = ConnectConfig::new("not a url");
        let result = WebSocketConnection::connect(&config).await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
