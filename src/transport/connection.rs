use crate::infrastructure::TaskManager;
use crate::types::{HeartbeatError, Result};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, RwLock};
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};
use url::Url;

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionState {
    Closed,
    Connecting,
    Open,
    Closing,
}

/// Owns the single socket handle the WebSocket transport writes to
pub struct ConnectionManager {
    ws_write: RwLock<Option<WsWriter>>,
    state: Arc<RwLock<ConnectionState>>,
    tasks: Mutex<TaskManager>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            ws_write: RwLock::new(None),
            state: Arc::new(RwLock::new(ConnectionState::Closed)),
            tasks: Mutex::new(TaskManager::new()),
        }
    }

    /// Gets the current connection state
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Sets the connection state
    async fn set_state(&self, new_state: ConnectionState) {
        let mut state = self.state.write().await;
        *state = new_state;
    }

    /// Checks if currently connected
    pub async fn is_connected(&self) -> bool {
        *self.state.read().await == ConnectionState::Open
    }

    /// Opens the socket and spawns a task draining server frames
    pub async fn connect(&self, endpoint: &Url) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let ws_stream = match tokio_tungstenite::connect_async(endpoint.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                self.set_state(ConnectionState::Closed).await;
                return Err(e.into());
            }
        };
        let (write_half, mut read_half) = ws_stream.split();
        *self.ws_write.write().await = Some(write_half);

        // Server frames carry nothing we act on; reading keeps ping/pong and
        // close detection working.
        let state = Arc::clone(&self.state);
        let mut tasks = self.tasks.lock().await;
        tasks.abort_all();
        tasks.spawn(async move {
            while let Some(msg_result) = read_half.next().await {
                match msg_result {
                    Ok(Message::Close(frame)) => {
                        tracing::debug!("Server closed heartbeat socket: {:?}", frame);
                        break;
                    }
                    Ok(Message::Text(text)) => {
                        tracing::debug!("Ignoring server text frame: {}", text.as_str());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("Heartbeat socket read error: {}", e);
                        break;
                    }
                }
            }
            *state.write().await = ConnectionState::Closed;
        });
        drop(tasks);

        self.set_state(ConnectionState::Open).await;
        tracing::info!("Heartbeat socket open at {}", endpoint);
        Ok(())
    }

    /// Sends a text frame through the socket
    pub async fn send_text(&self, text: String) -> Result<()> {
        if !self.is_connected().await {
            return Err(HeartbeatError::NotConnected);
        }

        let mut ws_guard = self.ws_write.write().await;
        let sent = match ws_guard.as_mut() {
            Some(ws) => ws.send(Message::Text(text.into())).await,
            None => return Err(HeartbeatError::NotConnected),
        };
        if let Err(e) = sent {
            *ws_guard = None;
            drop(ws_guard);
            self.set_state(ConnectionState::Closed).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Closes the WebSocket connection gracefully
    pub async fn close(&self) -> Result<()> {
        self.set_state(ConnectionState::Closing).await;
        let reader = std::mem::take(&mut *self.tasks.lock().await);
        reader.shutdown().await;

        let mut ws_guard = self.ws_write.write().await;
        let closed = match ws_guard.as_mut() {
            Some(ws) => ws.close().await,
            None => Ok(()),
        };
        *ws_guard = None;

        self.set_state(ConnectionState::Closed).await;
        closed?;

        Ok(())
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        // The reader task owns the read half; the socket only closes once it is gone
        self.tasks.get_mut().abort_all();
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
