use super::HeartbeatEmitter;
use crate::diagnostics::{DiagnosticSink, NoopSink};
use crate::transport::HeartbeatTransport;
use crate::types::constants::DEFAULT_HEARTBEAT_INTERVAL;
use std::sync::Arc;
use std::time::Duration;

/// Largest gap kept between the default beat timeout and the next tick
const MAX_TIMEOUT_MARGIN: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct HeartbeatOptions {
    /// Fixed period between beats
    pub interval: Duration,
    /// Upper bound on a single beat; `None` picks a bound just under the interval
    pub request_timeout: Option<Duration>,
}

impl Default for HeartbeatOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_HEARTBEAT_INTERVAL,
            request_timeout: None,
        }
    }
}

impl HeartbeatOptions {
    /// Effective per-beat timeout.
    ///
    /// The default ends before the next tick fires (a tenth of the interval
    /// earlier, capped at 100ms), so a stalled beat has released the
    /// in-flight slot by then and no tick is lost.
    pub fn beat_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or_else(|| {
            let margin = (self.interval / 10).min(MAX_TIMEOUT_MARGIN);
            self.interval - margin
        })
    }
}

/// Builder for [`HeartbeatEmitter`]
pub struct HeartbeatEmitterBuilder {
    transport: Arc<dyn HeartbeatTransport>,
    options: HeartbeatOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl HeartbeatEmitterBuilder {
    /// Create a new builder around a shared transport
    pub fn new(transport: Arc<dyn HeartbeatTransport>) -> Self {
        Self {
            transport,
            options: HeartbeatOptions::default(),
            sink: Arc::new(NoopSink),
        }
    }

    pub fn with_options(mut self, options: HeartbeatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.options.interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = Some(timeout);
        self
    }

    /// Where transmission failures go; defaults to [`NoopSink`]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the emitter in the `Idle` state
    pub fn build(self) -> HeartbeatEmitter {
        // tokio::time::interval panics on a zero period
        let mut options = self.options;
        if options.interval.is_zero() {
            tracing::warn!("Zero heartbeat interval requested, using 1ms");
            options.interval = Duration::from_millis(1);
        }

        HeartbeatEmitter::from_parts(self.transport, options, self.sink)
    }
}
