//! Session store - the single owner of all game state and the entry point
//! for every command the presentation layer issues.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use starharvest_logic::constants::spawn;

use crate::components::*;
use crate::config::SimConfig;
use crate::error::{SessionError, StoreError};
use crate::generation::generate_home_system;
use crate::persistence::{
    encode_record, encode_robots, load_records, read_snapshot, write_snapshot, KeyValueStore,
    RecordKey, SessionSnapshot, SNAPSHOT_VERSION,
};
use crate::systems::*;

/// Whether the player is flying between planets or standing on one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Space,
    Planetary,
}

/// What one call to [`SessionStore::tick`] did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Set on the tick that performed the session's offline catch-up
    pub offline: Option<OfflineGains>,
    pub robots: HarvestReport,
    /// Credited by manual harvests that completed this tick
    pub manual: Inventory,
    /// Whether the tick wrote to the store
    pub committed: bool,
}

/// Main session object
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    config: SimConfig,
    world_seed: u64,
    star_map: StarMap,
    current_system: Option<SystemId>,
    mode: GameMode,
    current_planet: Option<PlanetId>,
    player_position: Vec3,
    surface_position: Vec3,
    inventory: Inventory,
    robots: RobotRegistry,
    last_visit: u64,
    manual: ManualHarvests,
    resumed: bool,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Load the persisted records from `store` and build the world.
    ///
    /// A store without a `worldSeed` record gets a fresh random seed, which
    /// is committed straight away. Node levels are only restored onto a
    /// world generated from a persisted seed.
    pub fn open(store: S, config: SimConfig, now: u64) -> Result<Self, SessionError> {
        let records = load_records(&store, now);
        let (world_seed, fresh_seed) = match records.world_seed {
            Some(seed) => (seed, false),
            None => (rand::random(), true),
        };

        let mut session = Self {
            store,
            config,
            world_seed,
            star_map: StarMap::default(),
            current_system: None,
            mode: GameMode::Space,
            current_planet: None,
            player_position: Vec3::from(spawn::SPACE_START),
            surface_position: Vec3::from(spawn::SURFACE_ORIGIN),
            inventory: records.inventory,
            robots: RobotRegistry::from_entries(records.robots),
            last_visit: records.last_visit,
            manual: ManualHarvests::new(),
            resumed: false,
        };
        session.build_world();

        if fresh_seed {
            session.commit(&[RecordKey::WorldSeed])?;
        } else {
            session.star_map.apply_resource_levels(&records.resource_levels);
        }

        log::info!(
            "Session opened: {} robots, {} minerals, {} energy",
            session.robots.len(),
            session.inventory.minerals,
            session.inventory.energy
        );
        Ok(session)
    }

    fn build_world(&mut self) {
        let system = generate_home_system(&self.config.generation, self.world_seed);
        log::info!(
            "Generated {} with {} planets (seed {})",
            system.name,
            system.planets.len(),
            self.world_seed
        );
        self.current_system = Some(system.id.clone());
        self.star_map = StarMap::new(vec![system]);
    }

    /// Replace the world with a newly generated one and return to space.
    ///
    /// Robots keep their assignments; ids that no longer resolve send the
    /// robot idle on its next cycle.
    pub fn generate_world(&mut self, seed: Option<u64>) -> Result<(), SessionError> {
        self.world_seed = seed.unwrap_or_else(rand::random);
        self.build_world();
        self.manual.clear();
        self.return_to_space();
        self.commit(&[RecordKey::WorldSeed, RecordKey::ResourceLevels])
    }

    fn encode(&self, key: RecordKey) -> Result<String, StoreError> {
        match key {
            RecordKey::Inventory => encode_record(&self.inventory),
            RecordKey::Robots => encode_robots(&self.robots.entries()),
            RecordKey::LastVisit => encode_record(&self.last_visit),
            RecordKey::WorldSeed => encode_record(&self.world_seed),
            RecordKey::ResourceLevels => encode_record(&self.star_map.resource_levels()),
        }
    }

    /// Write the given records as one batch
    fn commit(&mut self, keys: &[RecordKey]) -> Result<(), SessionError> {
        let mut batch = Vec::with_capacity(keys.len());
        for key in keys {
            batch.push((key.as_str(), self.encode(*key)?));
        }
        self.store.commit(&batch)?;
        Ok(())
    }

    // --- Navigation ---

    /// Unknown planet → false, nothing changes
    pub fn land_on_planet(&mut self, planet_id: &PlanetId) -> bool {
        if self.star_map.planet(planet_id).is_none() {
            return false;
        }
        self.mode = GameMode::Planetary;
        self.current_planet = Some(planet_id.clone());
        self.surface_position = Vec3::from(spawn::SURFACE_SPAWN);
        log::debug!("Landed on {}", planet_id);
        true
    }

    pub fn return_to_space(&mut self) {
        self.mode = GameMode::Space;
        self.current_planet = None;
        self.surface_position = Vec3::from(spawn::SURFACE_ORIGIN);
    }

    pub fn set_current_system(&mut self, system_id: &SystemId) -> bool {
        if self.star_map.system(system_id).is_none() {
            return false;
        }
        self.current_system = Some(system_id.clone());
        true
    }

    pub fn set_player_position(&mut self, position: Vec3) {
        self.player_position = position;
    }

    pub fn set_surface_position(&mut self, position: Vec3) {
        self.surface_position = position;
    }

    // --- Commands ---

    pub fn add_to_inventory(
        &mut self,
        kind: ResourceKind,
        amount: u64,
    ) -> Result<(), SessionError> {
        self.inventory.credit(kind, amount);
        self.commit(&[RecordKey::Inventory])
    }

    pub fn create_robot(&mut self, position: Vec3, now: u64) -> Result<RobotId, SessionError> {
        let id = self.robots.create(position, now, &self.config.economy);
        self.commit(&[RecordKey::Robots])?;
        Ok(id)
    }

    /// Send a robot to a node. Unknown robot or unknown node → `Ok(false)`.
    ///
    /// A depleted node is accepted; the robot goes idle on its next cycle.
    pub fn assign_robot(
        &mut self,
        robot_id: &RobotId,
        resource_id: &ResourceId,
    ) -> Result<bool, SessionError> {
        if self.star_map.resource(resource_id).is_none() {
            return Ok(false);
        }
        if !self.robots.assign(robot_id, resource_id.clone()) {
            return Ok(false);
        }
        self.commit(&[RecordKey::Robots])?;
        Ok(true)
    }

    pub fn set_robot_task(
        &mut self,
        robot_id: &RobotId,
        task: RobotTask,
    ) -> Result<bool, SessionError> {
        if !self.robots.set_task(robot_id, task) {
            return Ok(false);
        }
        self.commit(&[RecordKey::Robots])?;
        Ok(true)
    }

    /// Spend minerals for one efficiency level. Short balance → `Ok(false)`
    /// with no state change.
    pub fn upgrade_robot(&mut self, robot_id: &RobotId) -> Result<bool, SessionError> {
        if !self.robots.upgrade(robot_id, &mut self.inventory, &self.config.economy) {
            return Ok(false);
        }
        self.commit(&[RecordKey::Inventory, RecordKey::Robots])?;
        Ok(true)
    }

    /// Start a manual harvest on a node of the current planet.
    ///
    /// Rejected in space mode, for nodes elsewhere or unknown, for depleted
    /// nodes, and while the node already has a harvest in progress. The
    /// credit lands on the first tick at or after the window closes.
    pub fn harvest_resource(&mut self, resource_id: &ResourceId, now: u64) -> bool {
        if self.mode != GameMode::Planetary {
            return false;
        }
        let Some(current) = self.current_planet.as_ref() else {
            return false;
        };
        let Some((planet, node)) = self.star_map.locate(resource_id) else {
            return false;
        };
        if planet.id != *current || node.is_depleted() {
            return false;
        }
        self.manual.begin(resource_id.clone(), now)
    }

    /// Run the offline catch-up once per session. Later calls return `Ok(None)`.
    ///
    /// If the catch-up cannot be committed, the gains are rolled back and
    /// the next call tries again.
    pub fn resume(&mut self, now: u64) -> Result<Option<OfflineGains>, SessionError> {
        if self.resumed {
            return Ok(None);
        }
        self.resumed = true;

        let before = (self.inventory, self.last_visit, self.star_map.clone());
        let Some(gains) = reconcile_offline(
            &self.robots,
            &mut self.star_map,
            &self.config.offline,
            self.last_visit,
            now,
        ) else {
            log::debug!(
                "Offline for {} ms, below catch-up threshold",
                now.saturating_sub(self.last_visit)
            );
            return Ok(None);
        };

        self.inventory.absorb(&gains.as_inventory());
        self.last_visit = now;
        let keys = [RecordKey::Inventory, RecordKey::LastVisit, RecordKey::ResourceLevels];
        if let Err(err) = self.commit(&keys) {
            log::warn!("Offline catch-up not saved, rolling back: {}", err);
            (self.inventory, self.last_visit, self.star_map) = before;
            self.resumed = false;
            return Err(err);
        }
        log::info!(
            "Offline for {} ms: +{} minerals, +{} energy",
            gains.elapsed_ms,
            gains.minerals_gained,
            gains.energy_gained
        );
        Ok(Some(gains))
    }

    /// Advance the session by one frame.
    ///
    /// Completes due manual harvests and, while on a planet, moves and
    /// harvests with robots. Commits only when something other than robot
    /// positions changed.
    pub fn tick(&mut self, now: u64, delta_seconds: f32) -> Result<TickReport, SessionError> {
        let mut report = TickReport::default();
        if !self.resumed {
            report.offline = self.resume(now)?;
        }

        report.manual = self.manual.complete_due(
            &mut self.star_map,
            &mut self.inventory,
            &self.config.harvest,
            now,
        );

        if self.mode == GameMode::Planetary {
            if let Some(planet) = self.current_planet.as_ref() {
                report.robots = robot_harvest_system(
                    &mut self.robots,
                    &mut self.star_map,
                    &mut self.inventory,
                    planet,
                    &self.config.harvest,
                    now,
                    delta_seconds,
                );
            }
        }

        if report.robots.has_changes() || !report.manual.is_empty() {
            self.commit(&[RecordKey::Inventory, RecordKey::Robots, RecordKey::ResourceLevels])?;
            report.committed = true;
        }
        Ok(report)
    }

    /// Persist everything and stamp the visit time
    pub fn checkpoint(&mut self, now: u64) -> Result<(), SessionError> {
        self.last_visit = now;
        self.commit(&RecordKey::ALL)
    }

    /// Save the whole session to a writer
    pub fn save_snapshot<W: Write>(&self, writer: W) -> Result<(), SessionError> {
        let snapshot = SessionSnapshot {
            version: SNAPSHOT_VERSION,
            world_seed: self.world_seed,
            star_map: self.star_map.clone(),
            current_system: self.current_system.clone(),
            mode: self.mode,
            current_planet: self.current_planet.clone(),
            player_position: self.player_position,
            surface_position: self.surface_position,
            inventory: self.inventory,
            robots: self.robots.entries(),
            last_visit: self.last_visit,
            manual_harvests: self.manual.clone(),
        };
        write_snapshot(writer, &snapshot)
    }

    /// Replace the session with a saved one and persist its records.
    ///
    /// The offline catch-up runs again on the next resume, measured from
    /// the snapshot's visit time.
    pub fn load_snapshot<R: Read>(&mut self, reader: R) -> Result<(), SessionError> {
        let snapshot = read_snapshot(reader)?;

        self.world_seed = snapshot.world_seed;
        self.star_map = snapshot.star_map;
        self.current_system = snapshot.current_system;
        self.mode = snapshot.mode;
        self.current_planet = snapshot.current_planet;
        self.player_position = snapshot.player_position;
        self.surface_position = snapshot.surface_position;
        self.inventory = snapshot.inventory;
        self.robots = RobotRegistry::from_entries(snapshot.robots);
        self.last_visit = snapshot.last_visit;
        self.manual = snapshot.manual_harvests;
        self.resumed = false;

        self.commit(&RecordKey::ALL)
    }

    // --- Accessors ---

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    pub fn star_map(&self) -> &StarMap {
        &self.star_map
    }

    pub fn star_systems(&self) -> &[StarSystem] {
        &self.star_map.systems
    }

    pub fn current_system(&self) -> Option<&StarSystem> {
        self.current_system
            .as_ref()
            .and_then(|id| self.star_map.system(id))
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current_planet(&self) -> Option<&Planet> {
        self.current_planet
            .as_ref()
            .and_then(|id| self.star_map.planet(id))
    }

    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    pub fn surface_position(&self) -> Vec3 {
        self.surface_position
    }

    pub fn inventory(&self) -> Inventory {
        self.inventory
    }

    /// Every robot with its position, in creation order
    pub fn robots(&self) -> Vec<(Robot, Vec3)> {
        self.robots.entries()
    }

    pub fn robot(&self, robot_id: &RobotId) -> Option<(Robot, Vec3)> {
        self.robots.get(robot_id)
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn upgrade_cost(&self, robot_id: &RobotId) -> Option<u64> {
        self.robots.upgrade_cost(robot_id, &self.config.economy)
    }

    pub fn resource(&self, resource_id: &ResourceId) -> Option<&ResourceNode> {
        self.star_map.resource(resource_id)
    }

    pub fn is_harvesting(&self, resource_id: &ResourceId) -> bool {
        self.manual.is_in_progress(resource_id)
    }

    pub fn last_visit_time(&self) -> u64 {
        self.last_visit
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use std::cell::Cell;
    use std::io;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn session(seed: u64) -> SessionStore<MemoryStore> {
        let mut store = MemoryStore::new();
        store.insert_raw("worldSeed", seed.to_string());
        SessionStore::open(store, SimConfig::default(), 1_000).unwrap()
    }

    #[test]
    fn test_open_empty_store() {
        let session = SessionStore::open(MemoryStore::new(), SimConfig::default(), 5_000).unwrap();
        assert_eq!(session.mode(), GameMode::Space);
        assert_eq!(session.inventory(), Inventory::default());
        assert_eq!(session.robot_count(), 0);
        assert_eq!(session.last_visit_time(), 5_000);
        assert_eq!(session.player_position(), Vec3::new(0.0, 0.0, 3000.0));
        assert_eq!(session.star_systems().len(), 1);
        assert_eq!(session.current_system().unwrap().name, "Sol");
        // the fresh seed is persisted
        let seed = session.world_seed().to_string();
        assert_eq!(session.store().raw("worldSeed"), Some(seed.as_str()));
    }

    #[test]
    fn test_same_seed_same_world() {
        assert_eq!(session(77).star_map(), session(77).star_map());
    }

    #[test]
    fn test_land_and_return() {
        let mut s = session(1);
        let planet = s.star_systems()[0].planets[2].id.clone();
        assert!(s.land_on_planet(&planet));
        assert_eq!(s.mode(), GameMode::Planetary);
        assert_eq!(s.current_planet().unwrap().id, planet);
        assert_eq!(s.surface_position(), Vec3::new(0.0, 2.0, 0.0));

        s.return_to_space();
        assert_eq!(s.mode(), GameMode::Space);
        assert!(s.current_planet().is_none());
        assert_eq!(s.surface_position(), Vec3::ZERO);
    }

    #[test]
    fn test_land_on_unknown_planet_is_noop() {
        let mut s = session(1);
        assert!(!s.land_on_planet(&PlanetId::new("planet-vega-0")));
        assert_eq!(s.mode(), GameMode::Space);
        assert!(s.current_planet().is_none());
    }

    #[test]
    fn test_assign_unknown_resource_rejected() {
        let mut s = session(1);
        let robot = s.create_robot(Vec3::ZERO, 2_000).unwrap();
        let commits = s.store().commits();
        assert!(!s.assign_robot(&robot, &ResourceId::new("resource-sol-99-0")).unwrap());
        assert_eq!(s.robot(&robot).unwrap().0.task, RobotTask::Idle);
        assert_eq!(s.store().commits(), commits);
    }

    #[test]
    fn test_manual_harvest_requires_current_planet() {
        let mut s = session(1);
        let node = s.star_systems()[0].planets[0].resources[0].id().clone();
        assert!(!s.harvest_resource(&node, 2_000));

        let other = s.star_systems()[0].planets[1].id.clone();
        s.land_on_planet(&other);
        assert!(!s.harvest_resource(&node, 2_000));

        let home = s.star_systems()[0].planets[0].id.clone();
        s.land_on_planet(&home);
        assert!(s.harvest_resource(&node, 2_000));
        assert!(s.is_harvesting(&node));
    }

    #[test]
    fn test_generate_world_resets_to_space() {
        let mut s = session(1);
        let planet = s.star_systems()[0].planets[0].id.clone();
        s.land_on_planet(&planet);
        let node = s.star_systems()[0].planets[0].resources[0].id().clone();
        s.harvest_resource(&node, 10);

        s.generate_world(Some(2)).unwrap();
        assert_eq!(s.world_seed(), 2);
        assert_eq!(s.mode(), GameMode::Space);
        assert!(!s.is_harvesting(&node));
        assert_eq!(s.store().raw("worldSeed"), Some("2"));
    }

    #[test]
    fn test_resume_runs_once() {
        let mut s = session(1);
        assert_eq!(s.resume(2_000).unwrap(), None);
        assert!(s.is_resumed());
        assert_eq!(s.resume(10_000_000).unwrap(), None);
        assert_eq!(s.last_visit_time(), 1_000);
    }

    /// Memory store whose commits can be switched to fail
    struct FlakyStore {
        inner: MemoryStore,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn commit(&mut self, batch: &[(&str, String)]) -> Result<(), StoreError> {
            if self.failing.get() {
                return Err(StoreError::Io {
                    path: PathBuf::from("flaky.json"),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.commit(batch)
        }
    }

    #[test]
    fn test_failed_offline_commit_is_not_credited_twice() {
        const T0: u64 = 1_700_000_000_000;
        let later = T0 + 2 * 3_600_000;

        let mut s = session(1);
        let node = s.star_systems()[0].planets[0].resources[0].id().clone();
        let amount = s.resource(&node).unwrap().amount();
        let robot = s.create_robot(Vec3::ZERO, T0).unwrap();
        s.assign_robot(&robot, &node).unwrap();
        s.checkpoint(T0).unwrap();

        let failing = Rc::new(Cell::new(true));
        let store = FlakyStore {
            inner: s.into_store(),
            failing: Rc::clone(&failing),
        };
        let mut s = SessionStore::open(store, SimConfig::default(), later).unwrap();

        assert!(s.resume(later).is_err());
        assert!(!s.is_resumed());
        assert_eq!(s.inventory(), Inventory::default());
        assert_eq!(s.last_visit_time(), T0);
        assert_eq!(s.resource(&node).unwrap().amount(), amount);

        // an ordinary command after the failure must not persist the gains
        failing.set(false);
        s.add_to_inventory(ResourceKind::Mineral, 0).unwrap();
        let reopened = SessionStore::open(s.into_store(), SimConfig::default(), later);
        let mut s = reopened.unwrap();

        let gains = s.resume(later).unwrap().unwrap();
        let credited = gains.minerals_gained + gains.energy_gained;
        assert_eq!(credited, u64::from(amount.min(20)));
        assert_eq!(s.inventory().minerals + s.inventory().energy, credited);
        assert_eq!(s.last_visit_time(), later);

        let mut s = SessionStore::open(s.into_store(), SimConfig::default(), later).unwrap();
        assert_eq!(s.resume(later).unwrap(), None);
        assert_eq!(s.inventory().minerals + s.inventory().energy, credited);
    }

    #[test]
    fn test_tick_in_space_moves_nothing() {
        let mut s = session(1);
        let robot = s.create_robot(Vec3::new(4.0, 2.0, 4.0), 1_000).unwrap();
        let node = s.star_systems()[0].planets[0].resources[0].id().clone();
        s.assign_robot(&robot, &node).unwrap();
        let before = s.robot(&robot).unwrap();

        let report = s.tick(1_500, 1.0).unwrap();
        assert_eq!(s.robot(&robot).unwrap(), before);
        assert!(!report.committed);
    }
}
