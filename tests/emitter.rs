mod common;

use common::{CountingTransport, RecordingSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use webgui_heartbeat::{EmitterState, HeartbeatEmitter};

#[tokio::test(start_paused = true)]
async fn test_three_and_a_half_intervals_yield_three_or_four_beats() {
    let transport = CountingTransport::new().with_delay(Duration::from_millis(50));
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_millis(1000))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(3500)).await;

    let calls = transport.calls();
    assert!((3..=4).contains(&calls), "unexpected call count {}", calls);
    assert_eq!(emitter.stats().skipped, 0);
    assert_eq!(emitter.stats().succeeded as usize, calls);
}

#[tokio::test(start_paused = true)]
async fn test_first_beat_waits_one_interval() {
    let transport = CountingTransport::new();
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .build();

    assert_eq!(emitter.state().await, EmitterState::Idle);
    emitter.start().await;
    assert_eq!(emitter.state().await, EmitterState::Running);

    sleep(Duration::from_millis(999)).await;
    assert_eq!(transport.calls(), 0);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_reported_and_do_not_halt_ticks() {
    let transport = CountingTransport::new().failing();
    let sink = Arc::new(RecordingSink::default());
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .with_sink(sink.clone())
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(transport.calls(), 3);
    assert_eq!(emitter.stats().failed, 3);
    assert_eq!(sink.failures().len(), 3);
    assert!(sink.failures()[0].starts_with("counting: "));
    assert!(emitter.is_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_slow_beat_skips_ticks_instead_of_overlapping() {
    let transport = CountingTransport::new().with_delay(Duration::from_millis(2500));
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .with_request_timeout(Duration::from_secs(10))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(4500)).await;

    // Beat at 1s runs until 3.5s; ticks at 2s and 3s are skipped
    assert_eq!(transport.calls(), 2);
    let stats = emitter.stats();
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.attempted, 2);
    assert_eq!(stats.succeeded, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_beat_times_out() {
    let transport = CountingTransport::new().with_delay(Duration::from_secs(5));
    let sink = Arc::new(RecordingSink::default());
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .with_request_timeout(Duration::from_millis(500))
        .with_sink(sink.clone())
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(2600)).await;

    assert_eq!(transport.calls(), 2);
    assert_eq!(emitter.stats().failed, 2);
    assert_eq!(emitter.stats().skipped, 0);
    assert!(sink.failures().iter().all(|f| f == "counting: Timeout error"));
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_timer_and_allows_restart() {
    let transport = CountingTransport::new();
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(transport.calls(), 1);

    emitter.stop().await;
    assert_eq!(emitter.state().await, EmitterState::Idle);
    sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.calls(), 1);

    emitter.start().await;
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(transport.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_releases_in_flight_beat() {
    let transport = CountingTransport::new().with_delay(Duration::from_secs(60));
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .with_request_timeout(Duration::from_secs(120))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(1500)).await;
    emitter.stop().await;

    emitter.start().await;
    sleep(Duration::from_millis(1000)).await;

    assert_eq!(transport.calls(), 2);
    assert_eq!(emitter.stats().skipped, 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_a_no_op() {
    let transport = CountingTransport::new();
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .build();

    emitter.start().await;
    emitter.start().await;
    sleep(Duration::from_millis(1500)).await;

    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_emitter_cancels_timer() {
    let transport = CountingTransport::new();
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(1500)).await;
    drop(emitter);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_default_timeout_keeps_one_call_per_interval_against_stalled_endpoint() {
    let transport = CountingTransport::new().with_delay(Duration::from_secs(60));
    let emitter = HeartbeatEmitter::builder(transport.clone())
        .with_interval(Duration::from_secs(1))
        .build();

    emitter.start().await;
    sleep(Duration::from_millis(6500)).await;

    // Each stalled beat times out at +900ms, before the next tick
    let stats = emitter.stats();
    assert_eq!(transport.calls(), 6);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.attempted, 6);
    assert_eq!(stats.failed, 5);
}
