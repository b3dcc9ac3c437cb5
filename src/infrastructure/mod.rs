// Infrastructure module - background task tracking and endpoint helpers
pub mod http;
pub mod task_manager;

pub use http::{sentinel_url, websocket_endpoint};
pub use task_manager::TaskManager;
