//! The durable JSON records and their fallbacks.
//!
//! Each record is an independent JSON value under its own key. Reading never
//! fails: an absent record yields its default, and a malformed one logs a
//! warning and yields its default too.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::components::{Inventory, ResourceId, Robot, RobotId, RobotTask, Vec3};
use crate::error::StoreError;

/// Record keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Inventory,
    Robots,
    LastVisit,
    WorldSeed,
    ResourceLevels,
}

impl RecordKey {
    pub const ALL: [RecordKey; 5] = [
        RecordKey::Inventory,
        RecordKey::Robots,
        RecordKey::LastVisit,
        RecordKey::WorldSeed,
        RecordKey::ResourceLevels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKey::Inventory => "inventory",
            RecordKey::Robots => "robots",
            RecordKey::LastVisit => "lastVisit",
            RecordKey::WorldSeed => "worldSeed",
            RecordKey::ResourceLevels => "resourceLevels",
        }
    }
}

/// One element of the `robots` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotRecord {
    pub id: RobotId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub task: RobotTask,
    pub efficiency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_resource_id: Option<ResourceId>,
    pub last_harvest_time: u64,
}

impl RobotRecord {
    pub fn from_parts(robot: &Robot, position: Vec3) -> Self {
        Self {
            id: robot.id.clone(),
            name: robot.name.clone(),
            x: position.x,
            y: position.y,
            z: position.z,
            task: robot.task,
            efficiency: robot.efficiency,
            assigned_resource_id: robot.assigned_resource_id.clone(),
            last_harvest_time: robot.last_harvest_time,
        }
    }

    /// Efficiency below 1 in a stored record is raised to 1
    pub fn into_parts(self) -> (Robot, Vec3) {
        let robot = Robot {
            id: self.id,
            name: self.name,
            task: self.task,
            efficiency: self.efficiency.max(1),
            assigned_resource_id: self.assigned_resource_id,
            last_harvest_time: self.last_harvest_time,
        };
        (robot, Vec3::new(self.x, self.y, self.z))
    }
}

/// Everything read back from a store at session start
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecords {
    pub inventory: Inventory,
    pub robots: Vec<(Robot, Vec3)>,
    pub last_visit: u64,
    /// `None` when no world has been persisted yet
    pub world_seed: Option<u64>,
    pub resource_levels: BTreeMap<ResourceId, u32>,
}

/// Read and decode one record. Absent → `None`; malformed or unreadable
/// → warning and `None`.
pub fn read_record<T: DeserializeOwned>(store: &impl KeyValueStore, key: RecordKey) -> Option<T> {
    let raw = match store.get(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("Failed to read record {} ({}). Using default.", key.as_str(), err);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Malformed record {} ({}). Using default.", key.as_str(), err);
            None
        }
    }
}

/// Load every record with its documented fallback
pub fn load_records(store: &impl KeyValueStore, now: u64) -> LoadedRecords {
    let robots: Vec<RobotRecord> = read_record(store, RecordKey::Robots).unwrap_or_default();
    LoadedRecords {
        inventory: read_record(store, RecordKey::Inventory).unwrap_or_default(),
        robots: robots.into_iter().map(RobotRecord::into_parts).collect(),
        last_visit: read_record(store, RecordKey::LastVisit).unwrap_or(now),
        world_seed: read_record(store, RecordKey::WorldSeed),
        resource_levels: read_record(store, RecordKey::ResourceLevels).unwrap_or_default(),
    }
}

pub fn encode_record<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    Ok(serde_json::to_string(value)?)
}

pub fn encode_robots(robots: &[(Robot, Vec3)]) -> Result<String, StoreError> {
    let records: Vec<RobotRecord> = robots
        .iter()
        .map(|(robot, position)| RobotRecord::from_parts(robot, *position))
        .collect();
    encode_record(&records)
}
