//! # webgui-heartbeat
//!
//! Keep-alive heartbeats for desktop-embedded web UIs.
//!
//! A page embedded in a desktop shell has to keep telling its local host
//! process that it is still open, or the host shuts itself down. This crate
//! provides both halves of that contract:
//!
//! - [`HeartbeatEmitter`]: fires a liveness signal at a fixed interval over
//!   one of three transports ([`HttpPollTransport`], [`HttpJsonTransport`],
//!   [`WebSocketTransport`]). Failures are swallowed, or routed to an
//!   injectable [`DiagnosticSink`].
//! - [`IdleMonitor`] with [`KeepAliveServer`] / [`WebSocketKeepAlive`]: the
//!   host-side endpoints and the idle watchdog that consumes those signals.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use webgui_heartbeat::{HeartbeatEmitter, HttpPollTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let emitter = HeartbeatEmitter::builder(HttpPollTransport::new("http://127.0.0.1:5000")?)
//!         .with_interval(Duration::from_secs(3))
//!         .build();
//!
//!     emitter.start().await;
//!     tokio::signal::ctrl_c().await?;
//!     emitter.stop().await;
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod diagnostics;
pub mod display;
pub mod heartbeat;
pub mod infrastructure;
pub mod keepalive;
pub mod transport;
pub mod types;

pub use clock::{Clock, MonotonicStamp, SystemClock};
pub use diagnostics::{DiagnosticSink, NoopSink, TracingSink};
pub use display::{ElementDisplay, StatusDisplay};
pub use heartbeat::{
    EmitterState, EmitterStats, HeartbeatEmitter, HeartbeatEmitterBuilder, HeartbeatOptions,
};
pub use infrastructure::{sentinel_url, websocket_endpoint};
pub use keepalive::{IdleMonitor, KeepAliveServer, WebSocketKeepAlive};
pub use transport::{HeartbeatTransport, HttpJsonTransport, HttpPollTransport, WebSocketTransport};
pub use types::{HeartbeatError, KeepAliveReply, Result, TimestampMessage};
