//! Adapters for the outbound ports.

pub mod clock;
pub mod events;
pub mod store;

pub use clock::{FixedTimeSource, SystemTimeSource};
pub use events::{BroadcastEventSink, NoopEventSink};
pub use store::{InMemoryStateStore, JsonFileStateStore};
