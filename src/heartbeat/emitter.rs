use super::state::{Counters, InFlightGuard};
use super::{EmitterState, EmitterStats, HeartbeatEmitterBuilder, HeartbeatOptions};
use crate::diagnostics::DiagnosticSink;
use crate::infrastructure::TaskManager;
use crate::transport::HeartbeatTransport;
use crate::types::HeartbeatError;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Periodically tells the host process that the page is still open.
///
/// The emitter owns its timer task. [`stop()`](Self::stop) or dropping the
/// emitter cancels the timer and any beat still in flight.
///
/// Beats are fire-and-forget: the timer never waits for the network. A tick
/// that lands while the previous beat is outstanding is skipped, and every
/// beat is bounded by the request timeout, so in-flight work never grows past
/// one request.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use webgui_heartbeat::{HeartbeatEmitter, HttpPollTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpPollTransport::new("http://127.0.0.1:5000")?;
/// let emitter = HeartbeatEmitter::builder(transport)
///     .with_interval(Duration::from_secs(3))
///     .build();
///
/// emitter.start().await;
/// // ... page is open ...
/// emitter.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct HeartbeatEmitter {
    transport: Arc<dyn HeartbeatTransport>,
    options: HeartbeatOptions,
    sink: Arc<dyn DiagnosticSink>,
    state: RwLock<EmitterState>,
    counters: Arc<Counters>,
    in_flight: Arc<AtomicBool>,
    tasks: Arc<Mutex<TaskManager>>,
}

impl HeartbeatEmitter {
    /// Start configuring an emitter for `transport`
    pub fn builder(transport: impl HeartbeatTransport + 'static) -> HeartbeatEmitterBuilder {
        HeartbeatEmitterBuilder::new(Arc::new(transport))
    }

    pub(crate) fn from_parts(
        transport: Arc<dyn HeartbeatTransport>,
        options: HeartbeatOptions,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            transport,
            options,
            sink,
            state: RwLock::new(EmitterState::Idle),
            counters: Arc::new(Counters::default()),
            in_flight: Arc::new(AtomicBool::new(false)),
            tasks: Arc::new(Mutex::new(TaskManager::new())),
        }
    }

    /// Arms the timer. The first beat goes out one interval from now.
    ///
    /// Calling this while already running does nothing.
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        if *state == EmitterState::Running {
            tracing::warn!("Heartbeat emitter already running");
            return;
        }
        *state = EmitterState::Running;

        tracing::info!(
            transport = self.transport.name(),
            "Heartbeat emitter started (interval={:?}, timeout={:?})",
            self.options.interval,
            self.options.beat_timeout()
        );

        let ticker = Ticker {
            first_tick: Instant::now() + self.options.interval,
            transport: Arc::clone(&self.transport),
            options: self.options.clone(),
            sink: Arc::clone(&self.sink),
            counters: Arc::clone(&self.counters),
            in_flight: Arc::clone(&self.in_flight),
            tasks: Arc::downgrade(&self.tasks),
        };
        lock_tasks(&self.tasks).spawn(ticker.run());
    }

    /// Cancels the timer and any in-flight beat, returning once both are gone
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        if *state == EmitterState::Idle {
            return;
        }

        // Wait for the aborts to land so no beat outlives stop()
        let tasks = std::mem::take(&mut *lock_tasks(&self.tasks));
        tasks.shutdown().await;
        *state = EmitterState::Idle;
        tracing::info!(transport = self.transport.name(), "Heartbeat emitter stopped");
    }

    pub async fn state(&self) -> EmitterState {
        *self.state.read().await
    }

    pub async fn is_running(&self) -> bool {
        self.state().await == EmitterState::Running
    }

    pub fn stats(&self) -> EmitterStats {
        self.counters.snapshot()
    }

    pub fn options(&self) -> &HeartbeatOptions {
        &self.options
    }
}

impl Drop for HeartbeatEmitter {
    fn drop(&mut self) {
        lock_tasks(&self.tasks).abort_all();
    }
}

fn lock_tasks(tasks: &Mutex<TaskManager>) -> MutexGuard<'_, TaskManager> {
    tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// State moved into the timer task
struct Ticker {
    first_tick: Instant,
    transport: Arc<dyn HeartbeatTransport>,
    options: HeartbeatOptions,
    sink: Arc<dyn DiagnosticSink>,
    counters: Arc<Counters>,
    in_flight: Arc<AtomicBool>,
    tasks: std::sync::Weak<Mutex<TaskManager>>,
}

impl Ticker {
    async fn run(self) {
        let mut interval_timer = time::interval_at(self.first_tick, self.options.interval);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval_timer.tick().await;

            // Emitter dropped, exit timer task
            let Some(tasks) = self.tasks.upgrade() else {
                break;
            };

            let Some(guard) = InFlightGuard::try_acquire(&self.in_flight) else {
                self.counters.record_skip();
                tracing::warn!(
                    transport = self.transport.name(),
                    "Previous heartbeat still in flight, skipping tick"
                );
                continue;
            };

            self.counters.record_attempt();
            let beat = Self::beat(
                Arc::clone(&self.transport),
                Arc::clone(&self.sink),
                Arc::clone(&self.counters),
                self.options.beat_timeout(),
                guard,
            );
            lock_tasks(&tasks).spawn(beat);
        }
    }

    async fn beat(
        transport: Arc<dyn HeartbeatTransport>,
        sink: Arc<dyn DiagnosticSink>,
        counters: Arc<Counters>,
        timeout: std::time::Duration,
        _guard: InFlightGuard,
    ) {
        let outcome = match time::timeout(timeout, transport.beat()).await {
            Ok(result) => result,
            Err(_) => Err(HeartbeatError::Timeout),
        };

        match outcome {
            Ok(()) => {
                counters.record_success();
                tracing::debug!(transport = transport.name(), "Heartbeat sent");
            }
            Err(e) => {
                counters.record_failure();
                sink.on_failure(transport.name(), &e);
            }
        }
    }
}
