//! Interchangeable ways of telling the host process the page is still open.

mod connection;
mod http;
mod websocket;

use crate::types::Result;
use async_trait::async_trait;

pub use connection::{ConnectionManager, ConnectionState};
pub use http::{HttpJsonTransport, HttpPollTransport};
pub use websocket::WebSocketTransport;

/// One liveness signal per call.
///
/// Implementations perform exactly one network operation per [`beat`](Self::beat)
/// and report failure through the returned error; they never retry.
#[async_trait]
pub trait HeartbeatTransport: Send + Sync {
    /// Short label used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Transmit a single heartbeat
    async fn beat(&self) -> Result<()>;
}

#[async_trait]
impl<T: HeartbeatTransport + ?Sized> HeartbeatTransport for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn beat(&self) -> Result<()> {
        (**self).beat().await
    }
}

#[async_trait]
impl<T: HeartbeatTransport + ?Sized> HeartbeatTransport for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn beat(&self) -> Result<()> {
        (**self).beat().await
    }
}
