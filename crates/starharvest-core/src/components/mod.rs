//! Component definitions for the simulation.
//!
//! Components are plain data. World data (systems, planets, nodes) is an
//! owned tree; robots are entities in the registry's `hecs` world. Behavior
//! lives in systems.

mod common;
mod ids;
mod inventory;
mod robot;
mod world;

pub use common::*;
pub use ids::*;
pub use inventory::*;
pub use robot::*;
pub use world::*;
