//! Systems - logic that operates on components

mod harvesting;
mod manual;
mod offline;
mod robots;

pub use harvesting::*;
pub use manual::*;
pub use offline::*;
pub use robots::*;
