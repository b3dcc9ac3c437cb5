use thiserror::Error;

/// Errors that can occur while emitting or receiving heartbeats.
///
/// Every variant raised while a tick is in flight is a flavour of
/// "heartbeat transmission failed": the emitter hands it to its
/// [`DiagnosticSink`](crate::DiagnosticSink) and carries on.
#[derive(Error, Debug)]
pub enum HeartbeatError {
    /// WebSocket protocol error (handshake failed, socket reset, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP client error (connection refused, malformed response, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The keep-alive endpoint answered with a non-2xx status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error (malformed origin or socket endpoint)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Socket-level I/O error on the host side
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A beat did not resolve within the request timeout
    #[error("Timeout error")]
    Timeout,

    /// Attempted to send over a socket that is not open
    #[error("Not connected")]
    NotConnected,
}

/// Convenience type alias for `Result<T, HeartbeatError>`.
pub type Result<T> = std::result::Result<T, HeartbeatError>;
