use crate::types::constants::DEFAULT_IDLE_INTERVAL;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

type ExitHook = Box<dyn FnOnce() + Send + 'static>;

/// Host-side watchdog that decides when the UI has gone away.
///
/// Every received heartbeat calls [`touch()`](Self::touch). Once more than
/// `idle_interval` passes without one, [`wait_until_idle()`](Self::wait_until_idle)
/// runs the on-exit hook and resolves; what happens next (shutting the host
/// down) is up to the caller.
pub struct IdleMonitor {
    idle_interval: Duration,
    last_seen: RwLock<Instant>,
    on_exit: Mutex<Option<ExitHook>>,
}

impl IdleMonitor {
    /// The clock starts now, as if a heartbeat had just arrived
    pub fn new(idle_interval: Duration) -> Self {
        Self {
            idle_interval,
            last_seen: RwLock::new(Instant::now()),
            on_exit: Mutex::new(None),
        }
    }

    /// Runs once, right before [`wait_until_idle()`](Self::wait_until_idle) returns
    pub fn with_on_exit(self, hook: impl FnOnce() + Send + 'static) -> Self {
        *self
            .on_exit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Box::new(hook));
        self
    }

    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    /// Record a heartbeat
    pub async fn touch(&self) {
        *self.last_seen.write().await = Instant::now();
    }

    /// Time since the last heartbeat
    pub async fn idle_for(&self) -> Duration {
        self.last_seen.read().await.elapsed()
    }

    pub async fn is_idle(&self) -> bool {
        self.idle_for().await > self.idle_interval
    }

    /// Checks every `idle_interval` until the UI has been silent for longer
    /// than that, then runs the exit hook. Returns the observed silence.
    pub async fn wait_until_idle(&self) -> Duration {
        loop {
            let idle = self.idle_for().await;
            if idle > self.idle_interval {
                tracing::info!("App closed (no heartbeat for {:?})", idle);
                self.run_exit_hook();
                return idle;
            }
            tracing::debug!("Gui still open");
            time::sleep(self.idle_interval).await;
        }
    }

    /// Runs [`wait_until_idle()`](Self::wait_until_idle) in the background
    pub fn spawn(self: Arc<Self>) -> JoinHandle<Duration> {
        tokio::spawn(async move { self.wait_until_idle().await })
    }

    fn run_exit_hook(&self) {
        let hook = self
            .on_exit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(hook) = hook {
            tracing::info!("Executing on-exit hook");
            hook();
        }
    }
}

impl Default for IdleMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_INTERVAL)
    }
}
