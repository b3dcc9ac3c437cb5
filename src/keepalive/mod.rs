//! The host side of the heartbeat contract.

mod monitor;
mod server;

pub use monitor::IdleMonitor;
pub use server::{KeepAliveServer, WebSocketKeepAlive};
