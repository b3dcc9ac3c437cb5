use crate::types::HeartbeatError;
use serde_json::Value;

/// Receives what the emitter would otherwise swallow.
///
/// Failures are never surfaced to the end user; a sink only lets callers
/// observe them. The default is [`NoopSink`].
pub trait DiagnosticSink: Send + Sync {
    /// A beat failed to transmit
    fn on_failure(&self, transport: &str, error: &HeartbeatError);

    /// A transport parsed a response body worth reporting
    fn on_response(&self, _transport: &str, _body: &Value) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn on_failure(&self, _transport: &str, _error: &HeartbeatError) {}
}

/// Console sink: forwards to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn on_failure(&self, transport: &str, error: &HeartbeatError) {
        tracing::debug!(transport, "Heartbeat transmission failed: {}", error);
    }

    fn on_response(&self, transport: &str, body: &Value) {
        tracing::debug!(transport, "Keep-alive response: {}", body);
    }
}
