//! World structure: star systems, planets, and resource nodes.
//!
//! The world is an owned tree (system → planets → nodes). Nothing outside
//! the tree holds references into it; robots point at nodes by
//! [`ResourceId`] and resolve through [`StarMap`] every cycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PlanetId, ResourceId, SystemId, Vec3};

/// What a node yields when harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Mineral,
    Energy,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Mineral, ResourceKind::Energy];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Mineral => "mineral",
            ResourceKind::Energy => "energy",
        }
    }
}

/// A harvestable deposit on a planet surface.
///
/// `depleted` is true exactly when `amount` is zero, and a depleted node
/// never regains amount. The fields are private so only [`ResourceNode::extract`]
/// and [`ResourceNode::drain_to`] can change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    id: ResourceId,
    kind: ResourceKind,
    position: Vec3,
    amount: u32,
    depleted: bool,
}

impl ResourceNode {
    pub fn new(id: ResourceId, kind: ResourceKind, position: Vec3, amount: u32) -> Self {
        Self {
            id,
            kind,
            position,
            amount,
            depleted: amount == 0,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Remove up to `requested` units and return how many were taken.
    ///
    /// The deduction that empties the node also marks it depleted.
    pub fn extract(&mut self, requested: u32) -> u32 {
        let taken = requested.min(self.amount);
        self.amount -= taken;
        if self.amount == 0 {
            self.depleted = true;
        }
        taken
    }

    /// Lower the remaining amount to `level`. Never raises it.
    pub fn drain_to(&mut self, level: u32) {
        if level < self.amount {
            self.extract(self.amount - level);
        }
    }
}

/// A landable planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    /// Owning system (back-reference by id, never ownership)
    pub system_id: SystemId,
    pub orbit_index: u32,
    /// Distance from the star, in render units
    pub orbit_radius: f32,
    /// Visual radius (presentation only)
    pub radius: f32,
    /// Hex color (presentation only)
    pub color: String,
    pub resources: Vec<ResourceNode>,
}

impl Planet {
    pub fn resource(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.resources.iter().find(|r| r.id() == id)
    }

    pub fn resource_mut(&mut self, id: &ResourceId) -> Option<&mut ResourceNode> {
        self.resources.iter_mut().find(|r| r.id() == id)
    }
}

/// A star system and the planets it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub position: Vec3,
    pub planets: Vec<Planet>,
}

impl StarSystem {
    pub fn planet(&self, id: &PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == *id)
    }
}

/// Every generated star system, with id lookups across all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarMap {
    pub systems: Vec<StarSystem>,
}

impl StarMap {
    pub fn new(systems: Vec<StarSystem>) -> Self {
        Self { systems }
    }

    pub fn system(&self, id: &SystemId) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.id == *id)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.systems.iter().flat_map(|s| s.planets.iter())
    }

    pub fn planet(&self, id: &PlanetId) -> Option<&Planet> {
        self.planets().find(|p| p.id == *id)
    }

    pub fn resource(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.planets().find_map(|p| p.resource(id))
    }

    /// Resolve a node together with the planet it sits on
    pub fn locate(&self, id: &ResourceId) -> Option<(&Planet, &ResourceNode)> {
        self.planets()
            .find_map(|p| p.resource(id).map(|node| (p, node)))
    }

    /// Mutable resolve; yields the owning planet's id alongside the node
    pub fn locate_mut(&mut self, id: &ResourceId) -> Option<(&PlanetId, &mut ResourceNode)> {
        self.systems
            .iter_mut()
            .flat_map(|s| s.planets.iter_mut())
            .find_map(|planet| {
                let Planet { id: planet_id, resources, .. } = planet;
                let planet_id: &PlanetId = planet_id;
                resources
                    .iter_mut()
                    .find(|r| r.id() == id)
                    .map(move |node| (planet_id, node))
            })
    }

    pub fn resource_mut(&mut self, id: &ResourceId) -> Option<&mut ResourceNode> {
        self.locate_mut(id).map(|(_, node)| node)
    }

    /// Remaining amount of every node, keyed by id
    pub fn resource_levels(&self) -> BTreeMap<ResourceId, u32> {
        self.planets()
            .flat_map(|p| p.resources.iter())
            .map(|r| (r.id().clone(), r.amount()))
            .collect()
    }

    /// Lower nodes to previously recorded levels; unknown ids are ignored.
    pub fn apply_resource_levels(&mut self, levels: &BTreeMap<ResourceId, u32>) {
        for (id, level) in levels {
            if let Some(node) = self.resource_mut(id) {
                node.drain_to(*level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: ResourceKind, amount: u32) -> ResourceNode {
        ResourceNode::new(ResourceId::new(id), kind, Vec3::ZERO, amount)
    }

    fn tiny_map() -> StarMap {
        StarMap::new(vec![StarSystem {
            id: SystemId::new("sol"),
            name: "Sol".into(),
            position: Vec3::ZERO,
            planets: vec![
                Planet {
                    id: PlanetId::new("planet-sol-0"),
                    name: "Sol A".into(),
                    system_id: SystemId::new("sol"),
                    orbit_index: 0,
                    orbit_radius: 200.0,
                    radius: 1.0,
                    color: "#8B4513".into(),
                    resources: vec![node("r-0-0", ResourceKind::Mineral, 20)],
                },
                Planet {
                    id: PlanetId::new("planet-sol-1"),
                    name: "Sol B".into(),
                    system_id: SystemId::new("sol"),
                    orbit_index: 1,
                    orbit_radius: 1000.0,
                    radius: 3.0,
                    color: "#4169E1".into(),
                    resources: vec![node("r-1-0", ResourceKind::Energy, 30)],
                },
            ],
        }])
    }

    #[test]
    fn test_extract_partial() {
        let mut n = node("a", ResourceKind::Mineral, 10);
        assert_eq!(n.extract(3), 3);
        assert_eq!(n.amount(), 7);
        assert!(!n.is_depleted());
    }

    #[test]
    fn test_final_extract_marks_depleted() {
        let mut n = node("a", ResourceKind::Mineral, 4);
        assert_eq!(n.extract(10), 4);
        assert_eq!(n.amount(), 0);
        assert!(n.is_depleted());
        // stays depleted
        assert_eq!(n.extract(5), 0);
        assert!(n.is_depleted());
    }

    #[test]
    fn test_zero_amount_node_starts_depleted() {
        assert!(node("a", ResourceKind::Energy, 0).is_depleted());
    }

    #[test]
    fn test_drain_to_never_raises() {
        let mut n = node("a", ResourceKind::Mineral, 10);
        n.drain_to(15);
        assert_eq!(n.amount(), 10);
        n.drain_to(6);
        assert_eq!(n.amount(), 6);
        n.drain_to(0);
        assert!(n.is_depleted());
    }

    #[test]
    fn test_locate_reports_owning_planet() {
        let map = tiny_map();
        let (planet, n) = map.locate(&ResourceId::new("r-1-0")).unwrap();
        assert_eq!(planet.id, PlanetId::new("planet-sol-1"));
        assert_eq!(n.kind(), ResourceKind::Energy);
        assert!(map.locate(&ResourceId::new("missing")).is_none());
    }

    #[test]
    fn test_locate_mut_changes_node() {
        let mut map = tiny_map();
        let (planet_id, n) = map.locate_mut(&ResourceId::new("r-0-0")).unwrap();
        assert_eq!(planet_id.as_str(), "planet-sol-0");
        n.extract(5);
        assert_eq!(map.resource(&ResourceId::new("r-0-0")).unwrap().amount(), 15);
    }

    #[test]
    fn test_resource_levels_roundtrip() {
        let mut map = tiny_map();
        map.resource_mut(&ResourceId::new("r-1-0")).unwrap().extract(30);
        let levels = map.resource_levels();

        let mut fresh = tiny_map();
        fresh.apply_resource_levels(&levels);
        assert_eq!(fresh, map);
        assert!(fresh.resource(&ResourceId::new("r-1-0")).unwrap().is_depleted());
    }
}
