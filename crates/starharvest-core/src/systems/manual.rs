//! Manual harvesting - click-to-harvest with a per-node in-progress window

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starharvest_logic::config::HarvestTuning;
use starharvest_logic::economy;

use crate::components::{Inventory, ResourceId, StarMap};

/// Nodes with a manual harvest in flight, keyed by node, valued by start time.
///
/// A node appears at most once, so a second request inside the window is
/// rejected rather than queued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualHarvests {
    started: BTreeMap<ResourceId, u64>,
}

impl ManualHarvests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a window for `id`. Returns false if one is already open.
    pub fn begin(&mut self, id: ResourceId, now: u64) -> bool {
        if self.started.contains_key(&id) {
            return false;
        }
        self.started.insert(id, now);
        true
    }

    pub fn is_in_progress(&self, id: &ResourceId) -> bool {
        self.started.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.started.len()
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }

    pub fn clear(&mut self) {
        self.started.clear();
    }

    /// Close every window that has run its full duration and credit the
    /// harvest. Nodes that vanished or depleted meanwhile credit nothing.
    ///
    /// Returns what was credited.
    pub fn complete_due(
        &mut self,
        map: &mut StarMap,
        inventory: &mut Inventory,
        tuning: &HarvestTuning,
        now: u64,
    ) -> Inventory {
        let due: Vec<ResourceId> = self
            .started
            .iter()
            .filter(|(_, &start)| economy::elapsed_ms(start, now) >= tuning.manual_duration_ms)
            .map(|(id, _)| id.clone())
            .collect();

        let mut credited = Inventory::new();
        for id in due {
            self.started.remove(&id);
            let Some(node) = map.resource_mut(&id) else {
                continue;
            };
            if node.is_depleted() {
                continue;
            }
            let requested = economy::manual_yield(node.amount(), tuning);
            let taken = u64::from(node.extract(requested));
            inventory.credit(node.kind(), taken);
            credited.credit(node.kind(), taken);
            log::debug!("Manual harvest of {} yielded {} {}", id, taken, node.kind().label());
        }
        credited
    }
}
