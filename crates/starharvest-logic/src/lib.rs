//! Pure harvesting economy logic for StarHarvest.
//!
//! This crate contains the game math that is independent of any storage,
//! entity store, or runtime. Functions take plain data and return results,
//! making them unit-testable and shared between the simulation engine and
//! the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Tunable harvesting, offline and upgrade parameters (serde) |
//! | [`constants`] | Default values for every tunable, spawn positions |
//! | [`economy`] | Harvest yields, cooldowns, offline catch-up, upgrade cost |
//! | [`movement`] | Planar approach of a robot toward its target node |

pub mod config;
pub mod constants;
pub mod economy;
pub mod movement;
