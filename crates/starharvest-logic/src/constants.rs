//! Game constants: harvest timings, offline rates, upgrade pricing.
//!
//! These are the defaults behind the tunables in [`crate::config`]. Timing
//! values are milliseconds, distances are world units.

pub mod harvest {
    /// Planar distance at which a robot counts as "at" its node.
    pub const ARRIVAL_THRESHOLD: f32 = 0.5;
    /// Robot travel speed in units per second.
    pub const ROBOT_SPEED: f32 = 2.0;
    /// Minimum time between two robot harvest cycles.
    pub const ROBOT_COOLDOWN_MS: u64 = 2_000;
    /// Units extracted by one manual (click) harvest.
    pub const MANUAL_HARVEST_AMOUNT: u32 = 10;
    /// Duration of a manual harvest; the node rejects new requests meanwhile.
    pub const MANUAL_HARVEST_MS: u64 = 1_000;
}

pub mod offline {
    /// Absences shorter than this are not reconciled.
    pub const MIN_OFFLINE_MS: u64 = 60_000;
    pub const MS_PER_HOUR: u64 = 3_600_000;
    /// Offline yield per hour for each point of robot efficiency.
    pub const UNITS_PER_HOUR_PER_EFFICIENCY: u64 = 10;
}

pub mod economy {
    /// Minerals charged per current efficiency level for one upgrade.
    pub const UPGRADE_COST_PER_LEVEL: u64 = 10;
    pub const STARTING_EFFICIENCY: u32 = 1;
}

pub mod spawn {
    /// Where the player starts on a planet surface after landing.
    pub const SURFACE_SPAWN: [f32; 3] = [0.0, 2.0, 0.0];
    /// Surface position while in space.
    pub const SURFACE_ORIGIN: [f32; 3] = [0.0, 0.0, 0.0];
    /// Initial ship position in space.
    pub const SPACE_START: [f32; 3] = [0.0, 0.0, 3000.0];
}
