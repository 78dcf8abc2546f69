//! StarHarvest Core - Idle Resource Economy Engine
//!
//! A procedurally generated star system whose planets carry resource nodes,
//! harvested by hand or by autonomous robots, with closed-form catch-up for
//! the time the game was closed.
//!
//! # Architecture
//!
//! Robots live in an Entity Component System (ECS) world via `hecs`:
//! - **Entities**: Robots
//! - **Components**: Pure data attached to entities (Robot, Position, Serial)
//! - **Systems**: Logic that queries and updates components (harvesting,
//!   manual harvests, offline catch-up)
//!
//! The world itself (systems → planets → nodes) is an owned tree, and
//! [`engine::SessionStore`] owns everything and persists it through a
//! [`persistence::KeyValueStore`].
//!
//! # Example
//!
//! ```rust,no_run
//! use starharvest_core::prelude::*;
//!
//! # fn main() -> Result<(), SessionError> {
//! let store = FileStore::open("save/starharvest.json");
//! let mut session = SessionStore::open(store, SimConfig::default(), 1_700_000_000_000)?;
//!
//! // Catch up on progress made while closed
//! session.resume(1_700_000_000_000)?;
//!
//! // Run simulation
//! let mut now = 1_700_000_000_000;
//! loop {
//!     now += 16;
//!     session.tick(now, 1.0 / 60.0)?; // 60 FPS
//! }
//! # }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SimConfig;
    pub use crate::engine::{GameMode, SessionStore, TickReport};
    pub use crate::error::{ConfigError, SessionError, StoreError};
    pub use crate::persistence::{FileStore, KeyValueStore, MemoryStore};
}
