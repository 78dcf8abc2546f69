//! Pure economy logic: harvest yields, cooldowns, offline catch-up, upgrades.
//!
//! All quantities are non-negative integers. Timestamps are epoch
//! milliseconds; a clock that runs backwards is treated as zero elapsed time.

use crate::config::{EconomyTuning, HarvestTuning, OfflineTuning};
use crate::constants::offline::MS_PER_HOUR;

/// Mineral cost to raise a robot from `efficiency` to `efficiency + 1`.
pub fn upgrade_cost(efficiency: u32, tuning: &EconomyTuning) -> u64 {
    u64::from(efficiency).saturating_mul(tuning.upgrade_cost_per_level)
}

/// Whether `minerals` covers the next upgrade. Soft gate: callers no-op on `false`.
pub fn can_afford_upgrade(minerals: u64, efficiency: u32, tuning: &EconomyTuning) -> bool {
    minerals >= upgrade_cost(efficiency, tuning)
}

/// Milliseconds between two timestamps, saturating at zero.
pub fn elapsed_ms(since: u64, now: u64) -> u64 {
    now.saturating_sub(since)
}

/// A robot may fire a new harvest cycle only once the cooldown has strictly passed.
pub fn cooldown_elapsed(last_harvest_ms: u64, now: u64, tuning: &HarvestTuning) -> bool {
    elapsed_ms(last_harvest_ms, now) > tuning.robot_cooldown_ms
}

/// Units one robot cycle takes from a node holding `remaining`.
pub fn robot_cycle_yield(efficiency: u32, remaining: u32) -> u32 {
    efficiency.min(remaining)
}

/// Units one manual harvest takes from a node holding `remaining`.
pub fn manual_yield(remaining: u32, tuning: &HarvestTuning) -> u32 {
    tuning.manual_amount.min(remaining)
}

/// Absences shorter than the floor are not worth reconciling (rapid reloads).
pub fn should_reconcile(elapsed: u64, tuning: &OfflineTuning) -> bool {
    elapsed >= tuning.min_offline_ms
}

/// Closed-form offline harvest for one robot:
/// `floor(efficiency * hours * rate)`, capped at the node's remaining amount.
///
/// Computed in integer arithmetic so the floor is exact.
pub fn offline_yield(efficiency: u32, elapsed: u64, remaining: u32, tuning: &OfflineTuning) -> u32 {
    let raw = u128::from(efficiency)
        * u128::from(elapsed)
        * u128::from(tuning.units_per_hour_per_efficiency)
        / u128::from(MS_PER_HOUR);
    let capped = raw.min(u128::from(remaining));
    u32::try_from(capped).unwrap_or(remaining)
}
