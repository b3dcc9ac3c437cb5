use super::{ConnectionManager, HeartbeatTransport};
use crate::clock::{Clock, MonotonicStamp, SystemClock};
use crate::display::{ElementDisplay, StatusDisplay};
use crate::types::constants::PING_ELEMENT_ID;
use crate::types::{Result, TimestampMessage};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Sends `{"timestamp": <unix seconds>}` over an open socket and mirrors the
/// value into the `ping` display element.
///
/// ```no_run
/// use std::sync::Arc;
/// use webgui_heartbeat::{ElementDisplay, HeartbeatEmitter, WebSocketTransport, websocket_endpoint};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let display = Arc::new(ElementDisplay::new());
/// let transport = WebSocketTransport::new(websocket_endpoint("localhost", 5001)?)
///     .with_display(display.clone())
///     .connect()
///     .await?;
///
/// let emitter = HeartbeatEmitter::builder(transport).build();
/// emitter.start().await;
/// # Ok(())
/// # }
/// ```
pub struct WebSocketTransport {
    endpoint: Url,
    connection: ConnectionManager,
    stamp: MonotonicStamp,
    display: Arc<dyn StatusDisplay>,
}

impl WebSocketTransport {
    /// Prepares the transport; no socket is opened until [`connect`](Self::connect)
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            connection: ConnectionManager::new(),
            stamp: MonotonicStamp::new(Arc::new(SystemClock)),
            display: Arc::new(ElementDisplay::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.stamp = MonotonicStamp::new(clock);
        self
    }

    pub fn with_display(mut self, display: Arc<dyn StatusDisplay>) -> Self {
        self.display = display;
        self
    }

    /// Opens the socket before the first tick
    pub async fn connect(self) -> Result<Self> {
        self.connection.connect(&self.endpoint).await?;
        Ok(self)
    }

    /// Closes the socket and stops its reader task.
    ///
    /// Dropping the transport releases the socket as well; a later beat
    /// reopens it.
    pub async fn close(&self) -> Result<()> {
        self.connection.close().await?;
        tracing::info!("Heartbeat socket to {} closed", self.endpoint);
        Ok(())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }
}

#[async_trait]
impl HeartbeatTransport for WebSocketTransport {
    fn name(&self) -> &'static str {
        "websocket"
    }

    async fn beat(&self) -> Result<()> {
        // A dropped socket gets one reconnect per tick, never more
        if !self.connection.is_connected().await {
            self.connection.connect(&self.endpoint).await?;
        }

        let message = TimestampMessage::new(self.stamp.next());
        self.connection
            .send_text(serde_json::to_string(&message)?)
            .await?;

        self.display
            .set_text(PING_ELEMENT_ID, &message.timestamp.to_string());
        tracing::debug!("Sent heartbeat timestamp {}", message.timestamp);
        Ok(())
    }
}
