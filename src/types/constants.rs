use std::time::Duration;

/// Sentinel routes served by the host process
pub mod sentinel_paths {
    /// Polled without reading the body; any request keeps the host alive.
    pub const DUMB_REQUEST: &str = "flaskwebgui-dumb-request-for-middleware-keeping-the-server-online";
    /// Polled and answered with a JSON body.
    pub const KEEP_ALIVE: &str = "flaskwebgui-keep-server-alive";
}

/// Display element that mirrors the last WebSocket timestamp
pub const PING_ELEMENT_ID: &str = "ping";

/// Default heartbeat interval
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(3);

/// Interval used by the WebSocket page variant
pub const WEBSOCKET_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Default host-side idle window
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(5);

/// Port the WebSocket page variant connects to
pub const DEFAULT_WEBSOCKET_PORT: u16 = 5001;

/// Default host for local sockets
pub const LOCALHOST: &str = "127.0.0.1";

/// Body returned by the dumb-request route
pub const OK_BODY: &str = "Ok";
