//! Ingestion pipeline.
//!
//! - `Session`: renderer plus lobby page, established once with retry
//! - `CycleRunner`: one cycle (lobby and discovery/events concurrently)
//! - `assemble`: merge a cycle's parts into the published payload
//! - `Poller`: repeat cycles until cancelled

pub mod assemble;
pub mod cycle;
pub mod poll;
pub mod session;

pub use assemble::assemble;
pub use cycle::CycleRunner;
pub use poll::{PollState, Poller};
pub use session::Session;
