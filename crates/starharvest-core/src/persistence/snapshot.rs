//! Whole-session binary snapshots
//!
//! Uses bincode for a compact dump of everything the session owns,
//! including state that the key-value records do not carry (game mode,
//! current planet, in-flight manual harvests).

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::components::{Inventory, PlanetId, Robot, StarMap, SystemId, Vec3};
use crate::engine::GameMode;
use crate::error::SessionError;
use crate::systems::ManualHarvests;

/// Version number for snapshot format (increment when format changes)
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub world_seed: u64,
    pub star_map: StarMap,
    pub current_system: Option<SystemId>,
    pub mode: GameMode,
    pub current_planet: Option<PlanetId>,
    pub player_position: Vec3,
    pub surface_position: Vec3,
    pub inventory: Inventory,
    /// Robots in registry order
    pub robots: Vec<(Robot, Vec3)>,
    pub last_visit: u64,
    pub manual_harvests: ManualHarvests,
}

pub fn write_snapshot<W: Write>(writer: W, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
    bincode::serialize_into(writer, snapshot)?;
    Ok(())
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<SessionSnapshot, SessionError> {
    let snapshot: SessionSnapshot = bincode::deserialize_from(reader)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SessionError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}
