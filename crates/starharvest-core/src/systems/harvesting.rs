//! Robot harvesting system - per-frame movement and harvest cycles

use starharvest_logic::config::HarvestTuning;
use starharvest_logic::economy;
use starharvest_logic::movement::{approach, Approach};

use super::RobotRegistry;
use crate::components::{Inventory, PlanetId, ResourceId, RobotId, RobotTask, StarMap};

/// What one pass of [`robot_harvest_system`] changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestReport {
    /// Resources credited this pass, per kind
    pub credited: Inventory,
    /// Robots that changed task, with the task they moved to
    pub transitions: Vec<(RobotId, RobotTask)>,
    /// Nodes emptied this pass
    pub depleted: Vec<ResourceId>,
    /// Robots that moved but did not harvest
    pub moved: usize,
}

impl HarvestReport {
    /// Movement alone is not worth persisting
    pub fn has_changes(&self) -> bool {
        !self.credited.is_empty() || !self.transitions.is_empty() || !self.depleted.is_empty()
    }
}

/// Advance every gathering robot by one frame.
///
/// Robots are processed in registry order. A robot whose assignment is
/// missing, unresolvable or depleted goes idle. Robots whose node is on
/// another planet are left exactly as they are. Idle and returning robots
/// are not touched.
pub fn robot_harvest_system(
    registry: &mut RobotRegistry,
    map: &mut StarMap,
    inventory: &mut Inventory,
    current_planet: &PlanetId,
    tuning: &HarvestTuning,
    now: u64,
    delta_seconds: f32,
) -> HarvestReport {
    let mut report = HarvestReport::default();

    registry.for_each_ordered_mut(|robot, position| {
        if robot.task != RobotTask::Gathering {
            return;
        }

        let target = match robot.assigned_resource_id.as_ref() {
            Some(id) => map.locate_mut(id),
            None => None,
        }
        .filter(|(_, node)| !node.is_depleted());

        let Some((planet_id, node)) = target else {
            robot.task = RobotTask::Idle;
            report.transitions.push((robot.id.clone(), RobotTask::Idle));
            log::debug!("{} lost its target and went idle", robot.id);
            return;
        };

        if planet_id != current_planet {
            return;
        }

        let node_position = node.position();
        match approach(
            (position.x, position.z),
            (node_position.x, node_position.z),
            tuning.arrival_threshold,
            tuning.robot_speed,
            delta_seconds,
        ) {
            Approach::Advance { x, z } => {
                position.x = x;
                position.z = z;
                position.y = node_position.y;
                report.moved += 1;
            }
            Approach::Arrived => {
                if !economy::cooldown_elapsed(robot.last_harvest_time, now, tuning) {
                    return;
                }
                let requested = economy::robot_cycle_yield(robot.efficiency, node.amount());
                let taken = node.extract(requested);
                inventory.credit(node.kind(), u64::from(taken));
                report.credited.credit(node.kind(), u64::from(taken));
                robot.last_harvest_time = now;

                if node.is_depleted() {
                    report.depleted.push(node.id().clone());
                    robot.task = RobotTask::Idle;
                    report.transitions.push((robot.id.clone(), RobotTask::Idle));
                    log::debug!("{} depleted {} and went idle", robot.id, node.id());
                }
            }
        }
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Planet, ResourceKind, ResourceNode, StarSystem, SystemId, Vec3};
    use starharvest_logic::config::EconomyTuning;

    fn planet(index: u32, nodes: Vec<ResourceNode>) -> Planet {
        Planet {
            id: PlanetId::new(format!("planet-sol-{index}")),
            name: format!("P{index}"),
            system_id: SystemId::new("sol"),
            orbit_index: index,
            orbit_radius: 100.0,
            radius: 1.0,
            color: "#FFFFFF".into(),
            resources: nodes,
        }
    }

    fn node(id: &str, kind: ResourceKind, position: Vec3, amount: u32) -> ResourceNode {
        ResourceNode::new(ResourceId::new(id), kind, position, amount)
    }

    fn map() -> StarMap {
        StarMap::new(vec![StarSystem {
            id: SystemId::new("sol"),
            name: "Sol".into(),
            position: Vec3::ZERO,
            planets: vec![
                planet(
                    0,
                    vec![
                        node("near", ResourceKind::Mineral, Vec3::new(0.0, 0.5, 0.0), 5),
                        node("far", ResourceKind::Energy, Vec3::new(10.0, -0.5, 0.0), 50),
                    ],
                ),
                planet(1, vec![node("elsewhere", ResourceKind::Energy, Vec3::ZERO, 50)]),
            ],
        }])
    }

    fn here() -> PlanetId {
        PlanetId::new("planet-sol-0")
    }

    fn gathering(registry: &mut RobotRegistry, at: Vec3, target: &str) -> RobotId {
        let id = registry.create(at, 0, &EconomyTuning::default());
        registry.assign(&id, ResourceId::new(target));
        id
    }

    fn run(
        registry: &mut RobotRegistry,
        map: &mut StarMap,
        inventory: &mut Inventory,
        now: u64,
        dt: f32,
    ) -> HarvestReport {
        let tuning = HarvestTuning::default();
        robot_harvest_system(registry, map, inventory, &here(), &tuning, now, dt)
    }

    #[test]
    fn test_moves_toward_node_and_snaps_height() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = gathering(&mut registry, Vec3::new(0.0, 2.0, 0.0), "far");

        let report = run(&mut registry, &mut map, &mut inventory, 100, 1.0);
        let (_, position) = registry.get(&id).unwrap();
        assert!((position.x - 2.0).abs() < 1e-4);
        assert_eq!(position.y, -0.5);
        assert_eq!(report.moved, 1);
        assert!(!report.has_changes());
    }

    #[test]
    fn test_step_never_overshoots() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = gathering(&mut registry, Vec3::new(9.0, 0.0, 0.0), "far");

        run(&mut registry, &mut map, &mut inventory, 100, 5.0);
        let (_, position) = registry.get(&id).unwrap();
        assert!((position.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_cooldown_gates_harvest() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        gathering(&mut registry, Vec3::ZERO, "near");

        // created at 0; exactly 2000 ms is not enough
        run(&mut registry, &mut map, &mut inventory, 2_000, 0.016);
        assert_eq!(inventory, Inventory::new());

        let report = run(&mut registry, &mut map, &mut inventory, 2_001, 0.016);
        assert_eq!(inventory.minerals, 1);
        assert_eq!(report.credited.minerals, 1);

        // within the next window nothing happens
        run(&mut registry, &mut map, &mut inventory, 3_500, 0.016);
        assert_eq!(inventory.minerals, 1);
    }

    #[test]
    fn test_depletion_idles_robot_and_others_follow() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let first = gathering(&mut registry, Vec3::ZERO, "near");
        let second = gathering(&mut registry, Vec3::ZERO, "near");
        registry.for_each_ordered_mut(|robot, _| robot.efficiency = 3);

        let report = run(&mut registry, &mut map, &mut inventory, 5_000, 0.016);
        // first takes 3, second takes the remaining 2 and empties the node
        assert_eq!(inventory.minerals, 5);
        let node = map.resource(&ResourceId::new("near")).unwrap();
        assert_eq!(node.amount(), 0);
        assert!(node.is_depleted());
        assert_eq!(report.depleted, vec![ResourceId::new("near")]);
        assert_eq!(registry.get(&first).unwrap().0.task, RobotTask::Gathering);
        assert_eq!(registry.get(&second).unwrap().0.task, RobotTask::Idle);

        // the first robot finds the node depleted on its next cycle
        run(&mut registry, &mut map, &mut inventory, 10_000, 0.016);
        assert_eq!(registry.get(&first).unwrap().0.task, RobotTask::Idle);
        assert_eq!(inventory.minerals, 5);
    }

    #[test]
    fn test_missing_target_goes_idle() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = gathering(&mut registry, Vec3::ZERO, "ghost");
        let report = run(&mut registry, &mut map, &mut inventory, 5_000, 0.016);
        let (robot, _) = registry.get(&id).unwrap();
        assert_eq!(robot.task, RobotTask::Idle);
        assert_eq!(robot.assigned_resource_id, Some(ResourceId::new("ghost")));
        assert_eq!(report.transitions, vec![(id, RobotTask::Idle)]);
    }

    #[test]
    fn test_gathering_without_assignment_goes_idle() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = registry.create(Vec3::ZERO, 0, &EconomyTuning::default());
        registry.set_task(&id, RobotTask::Gathering);
        run(&mut registry, &mut map, &mut inventory, 5_000, 0.016);
        assert_eq!(registry.get(&id).unwrap().0.task, RobotTask::Idle);
    }

    #[test]
    fn test_off_planet_robot_untouched() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = gathering(&mut registry, Vec3::new(3.0, 1.0, 3.0), "elsewhere");
        let before = registry.get(&id).unwrap();

        let report = run(&mut registry, &mut map, &mut inventory, 50_000, 1.0);
        assert_eq!(registry.get(&id).unwrap(), before);
        assert_eq!(map.resource(&ResourceId::new("elsewhere")).unwrap().amount(), 50);
        assert_eq!(report, HarvestReport::default());
    }

    #[test]
    fn test_returning_robot_untouched() {
        let mut registry = RobotRegistry::new();
        let mut map = map();
        let mut inventory = Inventory::new();
        let id = gathering(&mut registry, Vec3::new(5.0, 0.0, 0.0), "near");
        registry.set_task(&id, RobotTask::Returning);
        let before = registry.get(&id).unwrap();

        run(&mut registry, &mut map, &mut inventory, 50_000, 1.0);
        assert_eq!(registry.get(&id).unwrap(), before);
        assert_eq!(inventory, Inventory::new());
    }
}
