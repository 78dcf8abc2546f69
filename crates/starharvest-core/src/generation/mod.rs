//! Generation - procedural creation of star systems, planets and resource nodes.

mod names;
mod system;

pub use names::*;
pub use system::*;
