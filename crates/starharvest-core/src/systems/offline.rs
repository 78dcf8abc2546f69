//! Offline catch-up - closed-form harvesting for the time the game was closed

use serde::{Deserialize, Serialize};
use starharvest_logic::config::OfflineTuning;
use starharvest_logic::economy;

use super::RobotRegistry;
use crate::components::{Inventory, RobotTask, StarMap};

/// Resources gathered while the session was closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineGains {
    pub minerals_gained: u64,
    pub energy_gained: u64,
    pub elapsed_ms: u64,
}

impl OfflineGains {
    pub fn as_inventory(&self) -> Inventory {
        Inventory {
            minerals: self.minerals_gained,
            energy: self.energy_gained,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.minerals_gained == 0 && self.energy_gained == 0
    }
}

/// Fast-forward every gathering robot over the absence `last_visit..now`.
///
/// Returns `None` when the absence is shorter than the reconcile floor; in
/// that case nothing is touched. Otherwise nodes are drained in registry
/// order (a robot sees what earlier robots left) and the summed gains are
/// returned for the caller to credit. Robot task state is left alone: a
/// robot whose node ran dry goes idle on its next live cycle.
pub fn reconcile_offline(
    registry: &RobotRegistry,
    map: &mut StarMap,
    tuning: &OfflineTuning,
    last_visit: u64,
    now: u64,
) -> Option<OfflineGains> {
    let elapsed = economy::elapsed_ms(last_visit, now);
    if !economy::should_reconcile(elapsed, tuning) {
        return None;
    }

    let mut gains = Inventory::new();
    for (robot, _) in registry.entries() {
        if robot.task != RobotTask::Gathering {
            continue;
        }
        let Some(node) = robot
            .assigned_resource_id
            .as_ref()
            .and_then(|id| map.resource_mut(id))
        else {
            continue;
        };
        if node.is_depleted() {
            continue;
        }
        let harvested = economy::offline_yield(robot.efficiency, elapsed, node.amount(), tuning);
        let taken = node.extract(harvested);
        gains.credit(node.kind(), u64::from(taken));
    }

    Some(OfflineGains {
        minerals_gained: gains.minerals,
        energy_gained: gains.energy,
        elapsed_ms: elapsed,
    })
}
