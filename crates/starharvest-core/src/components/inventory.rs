//! Player inventory - the resource ledger.

use serde::{Deserialize, Serialize};

use super::ResourceKind;

/// Accumulated resources per kind.
///
/// Only grows, except through [`Inventory::try_spend`] (robot upgrades).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub minerals: u64,
    pub energy: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Mineral => self.minerals,
            ResourceKind::Energy => self.energy,
        }
    }

    fn get_mut(&mut self, kind: ResourceKind) -> &mut u64 {
        match kind {
            ResourceKind::Mineral => &mut self.minerals,
            ResourceKind::Energy => &mut self.energy,
        }
    }

    pub fn credit(&mut self, kind: ResourceKind, amount: u64) {
        let slot = self.get_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    /// Debit `amount` if the balance covers it. Returns false and changes nothing otherwise.
    pub fn try_spend(&mut self, kind: ResourceKind, amount: u64) -> bool {
        let slot = self.get_mut(kind);
        if *slot >= amount {
            *slot -= amount;
            true
        } else {
            false
        }
    }

    /// Add every kind of `other` into this ledger
    pub fn absorb(&mut self, other: &Inventory) {
        for kind in ResourceKind::ALL {
            self.credit(kind, other.get(kind));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.minerals == 0 && self.energy == 0
    }
}
