//! Robot components - autonomous harvesting units.

use serde::{Deserialize, Serialize};

use super::{ResourceId, RobotId};

/// What a robot is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotTask {
    #[default]
    Idle,
    /// Travelling to, or harvesting at, the assigned node
    Gathering,
    /// Reserved. Nothing transitions into or out of this state yet, and
    /// the harvesting systems leave robots in it untouched.
    Returning,
}

impl RobotTask {
    pub fn label(&self) -> &'static str {
        match self {
            RobotTask::Idle => "idle",
            RobotTask::Gathering => "gathering",
            RobotTask::Returning => "returning",
        }
    }
}

/// Core robot component.
///
/// Position lives in its own [`super::Position`] component so movement can
/// be updated without touching harvest state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub name: String,
    pub task: RobotTask,
    /// Units taken per harvest cycle (always at least 1)
    pub efficiency: u32,
    /// Weak reference; the node may no longer exist or may be depleted
    pub assigned_resource_id: Option<ResourceId>,
    /// Epoch ms of the last successful harvest cycle
    pub last_harvest_time: u64,
}

impl Robot {
    pub fn is_gathering(&self) -> bool {
        self.task == RobotTask::Gathering
    }
}
