//! Connection lifecycle: the state machine plus reconnection backoff and heartbeat liveness.

pub mod backoff;
pub mod clock;
pub mod manager;

pub use backoff::Backoff;
pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{ConnectionManager, ConnectionState, StatusCallback};
