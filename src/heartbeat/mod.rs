mod builder;
mod emitter;
mod state;

pub use builder::{HeartbeatEmitterBuilder, HeartbeatOptions};
pub use emitter::HeartbeatEmitter;
pub use state::{EmitterState, EmitterStats};
