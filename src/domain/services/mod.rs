mod hydration_gate;
mod listen_timer;
mod query_cache;
mod session_store;
mod submissions;
mod voice_capture;

pub use hydration_gate::*;
pub use listen_timer::*;
pub use query_cache::*;
pub use session_store::*;
pub use submissions::*;
pub use voice_capture::*;
