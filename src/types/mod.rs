pub mod constants;
pub mod error;
pub mod message;

pub use error::{HeartbeatError, Result};
pub use message::{KeepAliveReply, TimestampMessage};
