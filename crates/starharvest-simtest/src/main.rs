//! StarHarvest Headless Simulation Harness
//!
//! Runs the engine in-process against a file-backed store and validates
//! generation, harvesting, offline catch-up and persistence invariants.
//! No rendering, no input.
//!
//! Usage:
//!   cargo run -p starharvest-simtest
//!   cargo run -p starharvest-simtest -- --verbose --seed 42 --ticks 2000
//!   cargo run -p starharvest-simtest -- --config starharvest.toml --state /tmp/save.json

use std::path::PathBuf;

use starharvest_core::generation::generate_home_system;
use starharvest_core::prelude::*;
use starharvest_logic::config::OfflineTuning;
use starharvest_logic::economy;

const T0: u64 = 1_700_000_000_000;
const HOUR: u64 = 3_600_000;
const FRAME_MS: u64 = 50;

// ── Options ─────────────────────────────────────────────────────────────

struct Options {
    verbose: bool,
    seed: u64,
    ticks: u64,
    config: Option<PathBuf>,
    state: PathBuf,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Options {
            verbose: false,
            seed: 42,
            ticks: 1_200,
            config: None,
            state: std::env::temp_dir()
                .join(format!("starharvest-simtest-{}.json", std::process::id())),
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => options.verbose = true,
                "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(seed) => options.seed = seed,
                    None => log::warn!("--seed needs an integer; keeping {}", options.seed),
                },
                "--ticks" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(ticks) => options.ticks = ticks,
                    None => log::warn!("--ticks needs an integer; keeping {}", options.ticks),
                },
                "--config" => options.config = args.next().map(PathBuf::from),
                "--state" => {
                    if let Some(path) = args.next() {
                        options.state = PathBuf::from(path);
                    }
                }
                other => log::warn!("Ignoring unknown argument {}", other),
            }
        }
        options
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::from_args();
    let config = match &options.config {
        Some(path) => SimConfig::load_or_default(path),
        None => SimConfig::default(),
    };
    println!("=== StarHarvest Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. World generation sweep
    results.extend(validate_generation(&config));

    // 2. Offline catch-up math
    results.extend(validate_offline(&config));

    // 3. Live session on a file store
    results.extend(validate_live_session(&config, &options));

    // 4. Restart and offline catch-up on the same file
    results.extend(validate_restart(&config, &options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Generation ───────────────────────────────────────────────────────

fn validate_generation(config: &SimConfig) -> Vec<TestResult> {
    println!("--- World Generation ---");
    let generation = &config.generation;
    let mut results = Vec::new();

    let systems: Vec<StarSystem> = (0..100)
        .map(|seed| generate_home_system(generation, seed))
        .collect();

    let bad_counts = systems
        .iter()
        .filter(|s| !generation.planet_range().contains(&(s.planets.len() as u32)))
        .count();
    results.push(check(
        "planet_count_in_range",
        bad_counts == 0,
        format!(
            "{} of {} systems outside {:?}",
            bad_counts,
            systems.len(),
            generation.planet_range()
        ),
    ));

    let nodes: Vec<&ResourceNode> = systems
        .iter()
        .flat_map(|s| s.planets.iter())
        .flat_map(|p| p.resources.iter())
        .collect();
    let bad_amounts = nodes
        .iter()
        .filter(|n| !generation.amount_range().contains(&n.amount()) || n.is_depleted())
        .count();
    results.push(check(
        "fresh_node_amounts",
        bad_amounts == 0,
        format!("{} nodes checked, {} bad", nodes.len(), bad_amounts),
    ));

    let misordered = systems
        .iter()
        .filter(|s| s.planets.windows(2).any(|w| w[1].orbit_radius <= w[0].orbit_radius))
        .count();
    results.push(check(
        "orbits_increase_outward",
        misordered == 0,
        format!("{} systems with overlapping orbits", misordered),
    ));

    let deterministic =
        generate_home_system(generation, 1234) == generate_home_system(generation, 1234);
    results.push(check("seeded_generation_repeatable", deterministic, "seed 1234 twice"));

    results
}

// ── 2. Offline ──────────────────────────────────────────────────────────

fn validate_offline(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Offline Catch-up ---");
    let tuning: &OfflineTuning = &config.offline;
    let mut results = Vec::new();

    let two_hours = economy::offline_yield(3, 2 * HOUR, 100, tuning);
    results.push(check(
        "two_hours_efficiency_three",
        two_hours == 60 || tuning != &OfflineTuning::default(),
        format!("{} units", two_hours),
    ));

    let short = economy::should_reconcile(30_000, tuning);
    results.push(check(
        "short_absence_skipped",
        !short || tuning.min_offline_ms <= 30_000,
        format!("30 s absence reconciled: {}", short),
    ));

    let capped = economy::offline_yield(10, 100 * HOUR, 17, tuning);
    results.push(check("yield_capped_by_node", capped <= 17, format!("{} of 17", capped)));

    results
}

// ── 3. Live session ─────────────────────────────────────────────────────

fn validate_live_session(config: &SimConfig, options: &Options) -> Vec<TestResult> {
    println!("--- Live Session ({}) ---", options.state.display());
    let mut results = Vec::new();
    let _ = std::fs::remove_file(&options.state);

    let store = FileStore::open(&options.state);
    let mut session = match SessionStore::open(store, config.clone(), T0) {
        Ok(session) => session,
        Err(e) => {
            results.push(check("session_open", false, format!("open failed: {}", e)));
            return results;
        }
    };
    if let Err(e) = session.generate_world(Some(options.seed)) {
        results.push(check("world_generate", false, e.to_string()));
        return results;
    }

    let first_planet = session
        .star_systems()
        .first()
        .and_then(|s| s.planets.first())
        .cloned();
    let Some(planet) = first_planet else {
        results.push(check("planet_available", false, "no planets generated"));
        return results;
    };
    session.land_on_planet(&planet.id);
    let node_ids: Vec<ResourceId> = planet.resources.iter().map(|r| r.id().clone()).collect();

    let mut robot_ids = Vec::new();
    for (i, node) in node_ids.iter().take(3).enumerate() {
        let outcome = session
            .create_robot(session.surface_position(), T0 + i as u64)
            .and_then(|id| session.assign_robot(&id, node).map(|_| id));
        match outcome {
            Ok(id) => robot_ids.push(id),
            Err(e) => results.push(check("robot_create", false, e.to_string())),
        }
    }

    let start_total: u64 = planet.resources.iter().map(|r| u64::from(r.amount())).sum();
    let mut now = T0;
    let mut commits = 0;
    let mut errors = 0;
    for frame in 0..options.ticks {
        now += FRAME_MS;
        if frame % 40 == 0 {
            if let Some(node) = node_ids.last() {
                session.harvest_resource(node, now);
            }
        }
        match session.tick(now, FRAME_MS as f32 / 1_000.0) {
            Ok(report) => commits += usize::from(report.committed),
            Err(e) => {
                errors += 1;
                log::warn!("tick failed: {}", e);
            }
        }
    }
    results.push(check(
        "ticks_without_error",
        errors == 0,
        format!("{} ticks, {} commits", options.ticks, commits),
    ));

    let remaining: u64 = node_ids
        .iter()
        .filter_map(|id| session.resource(id))
        .map(|n| u64::from(n.amount()))
        .sum();
    let inventory = session.inventory();
    let gathered = inventory.minerals + inventory.energy;
    results.push(check(
        "conservation",
        start_total - remaining == gathered,
        format!("nodes lost {}, inventory gained {}", start_total - remaining, gathered),
    ));

    let consistent = node_ids
        .iter()
        .filter_map(|id| session.resource(id))
        .all(|n| n.is_depleted() == (n.amount() == 0));
    results.push(check("depleted_iff_empty", consistent, "checked every node on the planet"));

    let idle_on_depleted = session.robots().iter().all(|(robot, _)| {
        let depleted = robot
            .assigned_resource_id
            .as_ref()
            .and_then(|id| session.resource(id))
            .map_or(true, |n| n.is_depleted());
        !(robot.is_gathering() && depleted)
    });
    results.push(check(
        "no_robot_gathers_depleted",
        idle_on_depleted,
        format!("{} robots", robot_ids.len()),
    ));

    if let Some(robot) = robot_ids.first() {
        let before = session.inventory();
        let cost = session.upgrade_cost(robot).unwrap_or(0);
        let upgraded = session.upgrade_robot(robot).unwrap_or(false);
        let after = session.inventory();
        let expected = if before.minerals >= cost { cost } else { 0 };
        results.push(check(
            "upgrade_gate",
            upgraded == (before.minerals >= cost) && before.minerals - after.minerals == expected,
            format!("cost {}, had {}, upgraded {}", cost, before.minerals, upgraded),
        ));
    }

    if let Err(e) = session.checkpoint(now) {
        results.push(check("checkpoint", false, e.to_string()));
    }

    results
}

// ── 4. Restart ──────────────────────────────────────────────────────────

fn validate_restart(config: &SimConfig, options: &Options) -> Vec<TestResult> {
    println!("--- Restart ---");
    let mut results = Vec::new();

    let before = match SessionStore::open(FileStore::open(&options.state), config.clone(), T0) {
        Ok(session) => session,
        Err(e) => {
            results.push(check("reopen", false, e.to_string()));
            return results;
        }
    };
    results.push(check(
        "seed_persisted",
        before.world_seed() == options.seed,
        format!("seed {}", before.world_seed()),
    ));
    let last_visit = before.last_visit_time();
    let inventory = before.inventory();
    let robots = before.robots().len();
    drop(before);

    let later = last_visit + 2 * HOUR;
    let store = FileStore::open(&options.state);
    let mut session = match SessionStore::open(store, config.clone(), later) {
        Ok(session) => session,
        Err(e) => {
            results.push(check("reopen_later", false, e.to_string()));
            return results;
        }
    };
    results.push(check(
        "robots_persisted",
        session.robots().len() == robots,
        format!("{} robots", robots),
    ));

    match session.resume(later) {
        Ok(gains) => {
            let gained = gains.map_or(0, |g| g.minerals_gained + g.energy_gained);
            let now_total = session.inventory().minerals + session.inventory().energy;
            results.push(check(
                "offline_gains_credited",
                now_total == inventory.minerals + inventory.energy + gained,
                format!("+{} over two hours", gained),
            ));
            results.push(check(
                "visit_stamped",
                session.last_visit_time() == later,
                format!("last visit {}", session.last_visit_time()),
            ));
        }
        Err(e) => results.push(check("resume", false, e.to_string())),
    }

    let repeat = session.resume(later + HOUR);
    results.push(check(
        "resume_once",
        matches!(repeat, Ok(None)),
        "second resume is a no-op",
    ));

    let _ = std::fs::remove_file(&options.state);
    results
}
