//! Robot registry - the ECS world holding every harvesting robot

use hecs::{Entity, World};
use starharvest_logic::config::EconomyTuning;
use starharvest_logic::economy;

use crate::components::{
    Inventory, Position, ResourceId, ResourceKind, Robot, RobotId, RobotTask, Serial, Vec3,
};
use crate::generation::{robot_id, robot_name};

/// Robots are entities with `Robot`, `Position` and `Serial` components.
///
/// Robots are never despawned, so the serial order is also the creation
/// order and the order robots are ticked and persisted in.
pub struct RobotRegistry {
    world: World,
    next_serial: u64,
}

impl Default for RobotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_serial: 0,
        }
    }

    /// Rebuild a registry from persisted entries, keeping their order
    pub fn from_entries(entries: impl IntoIterator<Item = (Robot, Vec3)>) -> Self {
        let mut registry = Self::new();
        for (robot, position) in entries {
            registry.spawn(robot, position);
        }
        registry
    }

    fn spawn(&mut self, robot: Robot, position: Vec3) -> Entity {
        let serial = Serial(self.next_serial);
        self.next_serial += 1;
        self.world.spawn((robot, Position(position), serial))
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    fn find(&self, id: &RobotId) -> Option<Entity> {
        self.world
            .query::<&Robot>()
            .iter()
            .find(|(_, robot)| robot.id == *id)
            .map(|(entity, _)| entity)
    }

    pub fn contains(&self, id: &RobotId) -> bool {
        self.find(id).is_some()
    }

    /// Entities sorted by creation order
    fn ordered(&self) -> Vec<Entity> {
        let mut entities: Vec<(Serial, Entity)> = self
            .world
            .query::<&Serial>()
            .iter()
            .map(|(entity, serial)| (*serial, entity))
            .collect();
        entities.sort_unstable_by_key(|(serial, _)| *serial);
        entities.into_iter().map(|(_, entity)| entity).collect()
    }

    pub fn get(&self, id: &RobotId) -> Option<(Robot, Vec3)> {
        let entity = self.find(id)?;
        let robot = self.world.get::<&Robot>(entity).ok()?;
        let position = self.world.get::<&Position>(entity).ok()?;
        Some(((*robot).clone(), position.0))
    }

    /// Every robot with its position, in creation order
    pub fn entries(&self) -> Vec<(Robot, Vec3)> {
        self.ordered()
            .into_iter()
            .filter_map(|entity| {
                let robot = self.world.get::<&Robot>(entity).ok()?;
                let position = self.world.get::<&Position>(entity).ok()?;
                Some(((*robot).clone(), position.0))
            })
            .collect()
    }

    /// Visit every robot in creation order with mutable access to its
    /// state and position.
    pub fn for_each_ordered_mut(&mut self, mut f: impl FnMut(&mut Robot, &mut Vec3)) {
        for entity in self.ordered() {
            if let Ok((robot, position)) =
                self.world.query_one_mut::<(&mut Robot, &mut Position)>(entity)
            {
                f(robot, &mut position.0);
            }
        }
    }

    /// Build a new idle robot at `position`. Returns its id.
    pub fn create(&mut self, position: Vec3, now: u64, tuning: &EconomyTuning) -> RobotId {
        let id = robot_id(now, |candidate| self.contains(candidate));
        let robot = Robot {
            id: id.clone(),
            name: robot_name(self.len()),
            task: RobotTask::Idle,
            efficiency: tuning.starting_efficiency.max(1),
            assigned_resource_id: None,
            last_harvest_time: now,
        };
        self.spawn(robot, position);
        log::debug!("Created {} at ({:.1}, {:.1}, {:.1})", id, position.x, position.y, position.z);
        id
    }

    fn with_robot<R>(&mut self, id: &RobotId, f: impl FnOnce(&mut Robot) -> R) -> Option<R> {
        let entity = self.find(id)?;
        let mut robot = self.world.get::<&mut Robot>(entity).ok()?;
        Some(f(&mut robot))
    }

    /// Send a robot to gather from `resource`. Unknown robot → false.
    pub fn assign(&mut self, id: &RobotId, resource: ResourceId) -> bool {
        self.with_robot(id, |robot| {
            robot.task = RobotTask::Gathering;
            robot.assigned_resource_id = Some(resource);
        })
        .is_some()
    }

    pub fn set_task(&mut self, id: &RobotId, task: RobotTask) -> bool {
        self.with_robot(id, |robot| robot.task = task).is_some()
    }

    pub fn efficiency(&self, id: &RobotId) -> Option<u32> {
        let entity = self.find(id)?;
        let robot = self.world.get::<&Robot>(entity).ok()?;
        Some(robot.efficiency)
    }

    /// Mineral cost of the robot's next upgrade
    pub fn upgrade_cost(&self, id: &RobotId, tuning: &EconomyTuning) -> Option<u64> {
        self.efficiency(id)
            .map(|efficiency| economy::upgrade_cost(efficiency, tuning))
    }

    /// Spend minerals and raise efficiency by one.
    ///
    /// Either both happen or neither does: an unknown robot or a short
    /// balance leaves the inventory and the robot untouched.
    pub fn upgrade(
        &mut self,
        id: &RobotId,
        inventory: &mut Inventory,
        tuning: &EconomyTuning,
    ) -> bool {
        let Some(efficiency) = self.efficiency(id) else {
            return false;
        };
        if !economy::can_afford_upgrade(inventory.minerals, efficiency, tuning) {
            return false;
        }
        let cost = economy::upgrade_cost(efficiency, tuning);
        if !inventory.try_spend(ResourceKind::Mineral, cost) {
            return false;
        }
        self.with_robot(id, |robot| robot.efficiency = robot.efficiency.saturating_add(1))
            .is_some()
    }
}
