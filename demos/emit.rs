use std::sync::Arc;
use std::time::Duration;
use webgui_heartbeat::types::constants::{
    DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_WEBSOCKET_PORT, LOCALHOST, PING_ELEMENT_ID,
    WEBSOCKET_HEARTBEAT_INTERVAL,
};
use webgui_heartbeat::{
    ElementDisplay, HeartbeatEmitter, HeartbeatTransport, HttpJsonTransport, HttpPollTransport,
    TracingSink, WebSocketTransport, websocket_endpoint,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webgui_heartbeat=debug".into()),
        )
        .init();

    let origin =
        std::env::var("HEARTBEAT_ORIGIN").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let kind = std::env::var("HEARTBEAT_TRANSPORT").unwrap_or_else(|_| "http-poll".to_string());
    let default_interval = if kind == "websocket" {
        WEBSOCKET_HEARTBEAT_INTERVAL
    } else {
        DEFAULT_HEARTBEAT_INTERVAL
    };
    let interval = std::env::var("HEARTBEAT_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default_interval);

    let display = Arc::new(ElementDisplay::new());
    let transport: Box<dyn HeartbeatTransport> = match kind.as_str() {
        "http-json" => Box::new(HttpJsonTransport::new(&origin)?),
        "websocket" => {
            let port = std::env::var("HEARTBEAT_WS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WEBSOCKET_PORT);
            Box::new(
                WebSocketTransport::new(websocket_endpoint(LOCALHOST, port)?)
                    .with_display(display.clone())
                    .connect()
                    .await?,
            )
        }
        _ => Box::new(HttpPollTransport::new(&origin)?),
    };

    println!("💓 Emitting {} heartbeats every {:?}", transport.name(), interval);

    let emitter = HeartbeatEmitter::builder(transport)
        .with_interval(interval)
        .with_sink(Arc::new(TracingSink))
        .build();
    emitter.start().await;

    tokio::signal::ctrl_c().await?;
    emitter.stop().await;

    println!("📊 {:?}", emitter.stats());
    if let Some(ping) = display.text(PING_ELEMENT_ID) {
        println!("🕒 Last ping: {}", ping);
    }

    Ok(())
}
