use std::sync::Arc;
use std::time::Duration;
use webgui_heartbeat::{IdleMonitor, KeepAliveServer, WebSocketKeepAlive};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let http_addr =
        std::env::var("KEEPALIVE_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
    let ws_addr =
        std::env::var("KEEPALIVE_WS_ADDR").unwrap_or_else(|_| "127.0.0.1:5001".to_string());
    let idle_secs: u64 = std::env::var("KEEPALIVE_IDLE_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let monitor = Arc::new(
        IdleMonitor::new(Duration::from_secs(idle_secs))
            .with_on_exit(|| println!("👋 UI went away, shutting down")),
    );

    let http = KeepAliveServer::bind(&http_addr, Arc::clone(&monitor)).await?;
    let ws = WebSocketKeepAlive::bind(&ws_addr, Arc::clone(&monitor)).await?;
    println!("📡 HTTP keep-alive on {}", http.local_addr());
    println!("📡 WebSocket keep-alive on {}", ws.local_addr());

    tokio::select! {
        idle = monitor.wait_until_idle() => println!("⏹  Idle for {:?}", idle),
        result = http.run() => result?,
        result = ws.run() => result?,
    }

    Ok(())
}
