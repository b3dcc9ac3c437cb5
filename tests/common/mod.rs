#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use webgui_heartbeat::{Clock, DiagnosticSink, HeartbeatError, HeartbeatTransport, Result};

/// Transport that counts beats, optionally stalling or failing
#[derive(Clone, Default)]
pub struct CountingTransport {
    calls: Arc<AtomicUsize>,
    delay: Duration,
    fail: bool,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HeartbeatTransport for CountingTransport {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn beat(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(HeartbeatError::NotConnected);
        }
        Ok(())
    }
}

/// Sink that keeps everything it is handed
#[derive(Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<String>>,
    responses: Mutex<Vec<Value>>,
}

impl RecordingSink {
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn responses(&self) -> Vec<Value> {
        self.responses.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn on_failure(&self, transport: &str, error: &HeartbeatError) {
        self.failures
            .lock()
            .unwrap()
            .push(format!("{}: {}", transport, error));
    }

    fn on_response(&self, _transport: &str, body: &Value) {
        self.responses.lock().unwrap().push(body.clone());
    }
}

/// Clock replaying a fixed script, repeating the last value once exhausted
pub struct ScriptedClock(Mutex<Vec<i64>>);

impl ScriptedClock {
    pub fn new(script: Vec<i64>) -> Self {
        Self(Mutex::new(script))
    }

    pub fn fixed(now: i64) -> Self {
        Self::new(vec![now])
    }
}

impl Clock for ScriptedClock {
    fn now_unix_secs(&self) -> i64 {
        let mut script = self.0.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script[0]
        }
    }
}

/// A localhost port nothing is listening on
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
