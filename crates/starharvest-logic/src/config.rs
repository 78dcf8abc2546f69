//! Tunable parameters for harvesting, offline catch-up and upgrades.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs to name the values it changes.

use serde::{Deserialize, Serialize};

use crate::constants::{economy, harvest, offline};

/// Online harvesting parameters (robots and manual clicks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestTuning {
    pub arrival_threshold: f32,
    pub robot_speed: f32,
    pub robot_cooldown_ms: u64,
    pub manual_amount: u32,
    pub manual_duration_ms: u64,
}

impl Default for HarvestTuning {
    fn default() -> Self {
        Self {
            arrival_threshold: harvest::ARRIVAL_THRESHOLD,
            robot_speed: harvest::ROBOT_SPEED,
            robot_cooldown_ms: harvest::ROBOT_COOLDOWN_MS,
            manual_amount: harvest::MANUAL_HARVEST_AMOUNT,
            manual_duration_ms: harvest::MANUAL_HARVEST_MS,
        }
    }
}

/// Offline catch-up parameters.
///
/// The offline rate is independent of the online cycle rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineTuning {
    pub min_offline_ms: u64,
    pub units_per_hour_per_efficiency: u64,
}

impl Default for OfflineTuning {
    fn default() -> Self {
        Self {
            min_offline_ms: offline::MIN_OFFLINE_MS,
            units_per_hour_per_efficiency: offline::UNITS_PER_HOUR_PER_EFFICIENCY,
        }
    }
}

/// Robot upgrade pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub upgrade_cost_per_level: u64,
    pub starting_efficiency: u32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            upgrade_cost_per_level: economy::UPGRADE_COST_PER_LEVEL,
            starting_efficiency: economy::STARTING_EFFICIENCY,
        }
    }
}
