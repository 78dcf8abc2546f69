//! Persistence - key-value records for the live session, bincode snapshots
//! for whole-session dumps.

mod records;
mod snapshot;
mod store;

pub use records::*;
pub use snapshot::*;
pub use store::*;
