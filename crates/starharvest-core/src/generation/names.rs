//! Naming and palette utilities

use crate::components::{PlanetId, ResourceId, RobotId, SystemId};

/// Rocky inner-planet colors, cycled by orbit index
pub static ROCKY_COLORS: &[&str] = &["#8B4513", "#A0522D", "#CD853F", "#D2691E"];

/// Gas-giant colors, cycled by index within the outer class
pub static GAS_COLORS: &[&str] = &["#4169E1", "#9370DB", "#FF6347", "#FFD700"];

/// `Sol A`, `Sol B`, ... falling back to numbers past `Z`
pub fn planet_name(system_name: &str, index: u32) -> String {
    match u8::try_from(index).ok().filter(|i| *i < 26) {
        Some(i) => format!("{} {}", system_name, char::from(b'A' + i)),
        None => format!("{} {}", system_name, index + 1),
    }
}

pub fn planet_id(system: &SystemId, index: u32) -> PlanetId {
    PlanetId::new(format!("planet-{}-{}", system, index))
}

pub fn resource_id(system: &SystemId, planet_index: u32, node_index: u32) -> ResourceId {
    ResourceId::new(format!("resource-{}-{}-{}", system, planet_index, node_index))
}

/// `Robot {n}` where `n` is the robot's position in creation order
pub fn robot_name(existing: usize) -> String {
    format!("Robot {}", existing + 1)
}

/// `robot-{now}`; `taken` is consulted so two robots built in the same
/// millisecond still get distinct ids (`robot-{now}-2`, ...).
pub fn robot_id(now: u64, taken: impl Fn(&RobotId) -> bool) -> RobotId {
    let base = RobotId::new(format!("robot-{}", now));
    if !taken(&base) {
        return base;
    }
    (2u32..)
        .map(|n| RobotId::new(format!("robot-{}-{}", now, n)))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

/// Pick a palette entry by cycling through it
pub fn palette_color(palette: &[&str], index: usize) -> String {
    if palette.is_empty() {
        return "#FFFFFF".to_string();
    }
    palette[index % palette.len()].to_string()
}
