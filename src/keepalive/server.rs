//! Minimal keep-alive endpoints for the host process.
//!
//! Only what the heartbeat transports need: the two sentinel GET routes and a
//! socket accepting timestamp frames. Every request touches the
//! [`IdleMonitor`], whatever its path, the way after-request middleware would.

use super::IdleMonitor;
use crate::types::constants::{OK_BODY, sentinel_paths};
use crate::types::{HeartbeatError, KeepAliveReply, Result, TimestampMessage};
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

/// Largest request head we buffer before giving up on a connection
const MAX_REQUEST_SIZE: usize = 8 * 1024;

const MAX_HEADERS: usize = 32;

/// How long a client may take to send its request head
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP/1.1 responder for the sentinel routes.
pub struct KeepAliveServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    monitor: Arc<IdleMonitor>,
    read_timeout: Duration,
}

impl KeepAliveServer {
    pub async fn bind(addr: impl AsRef<str>, monitor: Arc<IdleMonitor>) -> Result<Self> {
        let listener = TcpListener::bind(addr.as_ref()).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            monitor,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    /// Connections that send no complete request head within `timeout` are dropped
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until the listener fails
    pub async fn run(self) -> Result<()> {
        tracing::info!(address = %self.local_addr, "Keep-alive server listening");

        loop {
            let (stream, peer_addr) = self.listener.accept().await?;
            let monitor = Arc::clone(&self.monitor);
            let read_timeout = self.read_timeout;
            tokio::spawn(async move {
                if let Err(e) = handle_http(stream, &monitor, read_timeout).await {
                    tracing::debug!(peer = %peer_addr, "Keep-alive connection error: {}", e);
                }
            });
        }
    }
}

/// Reads one request head, answers it and closes the connection
async fn handle_http(
    mut stream: TcpStream,
    monitor: &IdleMonitor,
    read_timeout: Duration,
) -> Result<()> {
    let path = match tokio::time::timeout(read_timeout, read_request_path(&mut stream)).await {
        Ok(path) => path?,
        Err(_) => return Err(HeartbeatError::Timeout),
    };
    // EOF before a full head, or a malformed one already answered with 400
    let Some(path) = path else {
        return Ok(());
    };

    monitor.touch().await;
    tracing::debug!("Keep-alive request for {}", path);

    let route = path
        .split('?')
        .next()
        .unwrap_or_default()
        .trim_start_matches('/');

    match route {
        r if r == sentinel_paths::KEEP_ALIVE => {
            let body = serde_json::to_string(&KeepAliveReply::default())?;
            write_response(&mut stream, 200, "OK", "application/json", &body).await
        }
        r if r == sentinel_paths::DUMB_REQUEST => {
            write_response(&mut stream, 200, "OK", "text/plain", OK_BODY).await
        }
        _ => write_response(&mut stream, 404, "Not Found", "text/plain", "").await,
    }
}

async fn read_request_path(stream: &mut TcpStream) -> Result<Option<String>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut request = httparse::Request::new(&mut headers);
        match request.parse(&buf) {
            Ok(httparse::Status::Complete(_)) => {
                return Ok(Some(request.path.unwrap_or("/").to_string()));
            }
            Ok(httparse::Status::Partial) if buf.len() < MAX_REQUEST_SIZE => continue,
            Ok(httparse::Status::Partial) | Err(_) => {
                write_response(stream, 400, "Bad Request", "text/plain", "").await?;
                return Ok(None);
            }
        }
    }
}

async fn write_response(
    stream: &mut TcpStream,
    status: u16,
    reason: &str,
    content_type: &str,
    body: &str,
) -> Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        content_type,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Accepts heartbeat sockets and touches the monitor on every timestamp frame.
pub struct WebSocketKeepAlive {
    listener: TcpListener,
    local_addr: SocketAddr,
    monitor: Arc<IdleMonitor>,
}

impl WebSocketKeepAlive {
    pub async fn bind(addr: impl AsRef<str>, monitor: Arc<IdleMonitor>) -> Result<Self> {
        let listener = TcpListener::bind(addr.as_ref()).await?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
            monitor,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts sockets until the listener fails
    pub async fn run(self) -> Result<()> {
        tracing::info!(address = %self.local_addr, "Keep-alive socket listening");

        loop {
            let (stream, peer_addr) = self.listener.accept().await?;
            let monitor = Arc::clone(&self.monitor);
            tokio::spawn(async move {
                if let Err(e) = handle_socket(stream, &monitor).await {
                    tracing::debug!(peer = %peer_addr, "Keep-alive socket error: {}", e);
                }
            });
        }
    }
}

async fn handle_socket(stream: TcpStream, monitor: &IdleMonitor) -> Result<()> {
    let mut ws_stream = tokio_tungstenite::accept_async(stream).await?;

    while let Some(msg) = ws_stream.next().await {
        match msg? {
            Message::Text(text) => match serde_json::from_str::<TimestampMessage>(text.as_str()) {
                Ok(message) => {
                    monitor.touch().await;
                    tracing::debug!("Heartbeat timestamp {}", message.timestamp);
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed heartbeat frame: {}", e);
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    Ok(())
}
