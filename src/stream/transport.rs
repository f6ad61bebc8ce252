//! WebSocket Transport
//!
//! The live feed talks to sockets through [`Connector`] and [`Connection`].
//! [`WsConnector`] is the tokio-tungstenite implementation.

use async_trait::async_trait;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Something that happened on an open socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame (or a UTF-8 binary frame)
    Message(String),
    /// A transport error; the socket closes right after
    Error(String),
}

/// An open socket
#[async_trait]
pub trait Connection: Send {
    /// Next inbound event, `None` once the socket has closed
    async fn next_event(&mut self) -> Option<TransportEvent>;

    /// Close the socket from our side
    async fn close(&mut self);
}

/// Opens sockets
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, StreamError>;
}

/// Transport errors
#[derive(Error, Debug)]
pub enum StreamError {
    /// The URL cannot be used to open a socket at all
    #[error("Invalid WebSocket URL: {0}")]
    InvalidUrl(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// tokio-tungstenite connector
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Connection>, StreamError> {
        match connect_async(url).await {
            Ok((stream, _response)) => Ok(Box::new(WsConnection {
                stream,
                failed: false,
            })),
            Err(tungstenite::Error::Url(e)) => Err(StreamError::InvalidUrl(e.to_string())),
            Err(tungstenite::Error::HttpFormat(e)) => Err(StreamError::InvalidUrl(e.to_string())),
            Err(e) => Err(StreamError::Connect(e.to_string())),
        }
    }
}

struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    failed: bool,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.failed {
            return None;
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(TransportEvent::Message(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(TransportEvent::Message(text)),
                    Err(_) => {
                        tracing::debug!("Ignoring non-UTF-8 binary frame");
                    }
                },
                Some(Ok(Message::Close(_))) | None => return None,
                // Tungstenite answers pings itself
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.failed = true;
                    return Some(TransportEvent::Error(StreamError::Transport(e.to_string()).to_string()));
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "WebSocket close handshake failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::{Message as WsMessage, WebSocketUpgrade};
    use axum::{routing::get, Router};
    use std::time::Duration;

    /// Serves one socket that sends `frames` and then closes
    async fn spawn_server(frames: Vec<WsMessage>) -> String {
        let app = Router::new().route(
            "/ws/frames",
            get(move |ws: WebSocketUpgrade| {
                let frames = frames.clone();
                async move {
                    ws.on_upgrade(|mut socket| async move {
                        for frame in frames {
                            if socket.send(frame).await.is_err() {
                                return;
                            }
                        }
                        let _ = socket.send(WsMessage::Close(None)).await;
                    })
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("ws://{}/ws/frames", addr)
    }

    async fn next(connection: &mut Box<dyn Connection>) -> Option<TransportEvent> {
        tokio::time::timeout(Duration::from_secs(5), connection.next_event())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_utf8_binary_frames_are_messages() {
        let url = spawn_server(vec![
            WsMessage::Binary(br#"{"x":1}"#.to_vec()),
            WsMessage::Binary(vec![0xff, 0xfe, 0xfd]),
            WsMessage::Text(r#"{"x":2}"#.to_string()),
        ])
        .await;

        let mut connection = WsConnector.connect(&url).await.unwrap();

        assert_eq!(
            next(&mut connection).await,
            Some(TransportEvent::Message(r#"{"x":1}"#.to_string()))
        );
        // The non-UTF-8 frame is skipped rather than reported
        assert_eq!(
            next(&mut connection).await,
            Some(TransportEvent::Message(r#"{"x":2}"#.to_string()))
        );
        assert_eq!(next(&mut connection).await, None);
    }

    #[tokio::test]
    async fn test_non_ws_scheme_is_invalid_url() {
        let err = WsConnector.connect("http://localhost:8000/ws").await.err().unwrap();
        assert!(matches!(err, StreamError::InvalidUrl(_)), "got {:?}", err);
    }
}
