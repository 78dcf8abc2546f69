//! Star system generation - planets on two orbital classes with biased resources
//!
//! The first half of the planets (rounded down) are rocky inner worlds with
//! mineral-leaning deposits; the rest are gas giants leaning toward energy.
//! Inner and outer orbits follow separate arithmetic progressions, and the
//! outer progression always starts beyond the last inner orbit.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::names::{palette_color, planet_id, planet_name, resource_id, GAS_COLORS, ROCKY_COLORS};
use crate::components::{Planet, ResourceKind, ResourceNode, StarSystem, SystemId, Vec3};

/// Configuration for star system generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub system_id: String,
    pub system_name: String,
    pub min_planets: u32,
    pub max_planets: u32,
    /// Inner orbit `i` sits at `(inner_orbit_base + i * inner_orbit_step) * orbit_scale`
    pub inner_orbit_base: f32,
    pub inner_orbit_step: f32,
    /// Outer orbit `k` sits at `(outer_orbit_base + k * outer_orbit_step) * orbit_scale`
    pub outer_orbit_base: f32,
    pub outer_orbit_step: f32,
    pub orbit_scale: f32,
    pub inner_radius_min: f32,
    pub inner_radius_span: f32,
    pub outer_radius_min: f32,
    pub outer_radius_span: f32,
    pub min_nodes: u32,
    pub max_nodes: u32,
    pub min_amount: u32,
    pub max_amount: u32,
    /// Nodes are scattered within this planar radius of the landing site
    pub node_spread: f32,
    /// Nodes sit within `[-node_height, node_height)` vertically
    pub node_height: f32,
    pub inner_mineral_chance: f64,
    pub outer_mineral_chance: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system_id: "sol".to_string(),
            system_name: "Sol".to_string(),
            min_planets: 4,
            max_planets: 8,
            inner_orbit_base: 4.0,
            inner_orbit_step: 3.0,
            outer_orbit_base: 20.0,
            outer_orbit_step: 8.0,
            orbit_scale: 50.0,
            inner_radius_min: 0.5,
            inner_radius_span: 1.0,
            outer_radius_min: 2.5,
            outer_radius_span: 1.5,
            min_nodes: 3,
            max_nodes: 10,
            min_amount: 10,
            max_amount: 59,
            node_spread: 8.0,
            node_height: 1.0,
            inner_mineral_chance: 0.7,
            outer_mineral_chance: 0.3,
        }
    }
}

impl GenerationConfig {
    pub fn planet_range(&self) -> RangeInclusive<u32> {
        self.min_planets..=self.max_planets.max(self.min_planets)
    }

    pub fn node_range(&self) -> RangeInclusive<u32> {
        self.min_nodes..=self.max_nodes.max(self.min_nodes)
    }

    pub fn amount_range(&self) -> RangeInclusive<u32> {
        self.min_amount..=self.max_amount.max(self.min_amount)
    }

    fn inner_orbit(&self, index: u32) -> f32 {
        (self.inner_orbit_base + index as f32 * self.inner_orbit_step) * self.orbit_scale
    }

    /// Outer orbit radius, shifted outward if the configured progression
    /// would start inside the last inner orbit.
    fn outer_orbit(&self, outer_index: u32, inner_count: u32) -> f32 {
        let step = self.outer_orbit_step * self.orbit_scale;
        let configured = (self.outer_orbit_base + outer_index as f32 * self.outer_orbit_step)
            * self.orbit_scale;
        if inner_count == 0 {
            return configured;
        }
        let first_outer = self.outer_orbit_base * self.orbit_scale;
        let last_inner = self.inner_orbit(inner_count - 1);
        if first_outer > last_inner {
            configured
        } else {
            configured + (last_inner - first_outer) + step.max(self.orbit_scale)
        }
    }
}

/// Orbital class of a planet, decided by its index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitClass {
    InnerRocky,
    OuterGas,
}

/// Generate a star system from a seed (reproducible)
pub fn generate_home_system(config: &GenerationConfig, seed: u64) -> StarSystem {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_star_system(config, &mut rng)
}

/// Generate the home star system using the given random source
pub fn generate_star_system(config: &GenerationConfig, rng: &mut impl Rng) -> StarSystem {
    let system_id = SystemId::new(config.system_id.clone());
    let num_planets = rng.gen_range(config.planet_range());
    let inner_count = num_planets / 2;

    let planets = (0..num_planets)
        .map(|index| {
            let class = if index < inner_count {
                OrbitClass::InnerRocky
            } else {
                OrbitClass::OuterGas
            };
            generate_planet(config, &system_id, index, inner_count, class, rng)
        })
        .collect();

    StarSystem {
        id: system_id,
        name: config.system_name.clone(),
        position: Vec3::ZERO,
        planets,
    }
}

fn generate_planet(
    config: &GenerationConfig,
    system_id: &SystemId,
    index: u32,
    inner_count: u32,
    class: OrbitClass,
    rng: &mut impl Rng,
) -> Planet {
    let (orbit_radius, radius, color, mineral_chance) = match class {
        OrbitClass::InnerRocky => (
            config.inner_orbit(index),
            config.inner_radius_min + rng.gen::<f32>() * config.inner_radius_span,
            palette_color(ROCKY_COLORS, index as usize),
            config.inner_mineral_chance,
        ),
        OrbitClass::OuterGas => {
            let outer_index = index - inner_count;
            (
                config.outer_orbit(outer_index, inner_count),
                config.outer_radius_min + rng.gen::<f32>() * config.outer_radius_span,
                palette_color(GAS_COLORS, outer_index as usize),
                config.outer_mineral_chance,
            )
        }
    };

    let num_nodes = rng.gen_range(config.node_range());
    let resources = (0..num_nodes)
        .map(|node_index| {
            let angle = rng.gen::<f32>() * TAU;
            let spread = rng.gen::<f32>() * config.node_spread;
            let position = Vec3::new(
                angle.cos() * spread,
                (rng.gen::<f32>() - 0.5) * 2.0 * config.node_height,
                angle.sin() * spread,
            );
            let kind = if rng.gen_bool(mineral_chance.clamp(0.0, 1.0)) {
                ResourceKind::Mineral
            } else {
                ResourceKind::Energy
            };
            let amount = rng.gen_range(config.amount_range());
            ResourceNode::new(resource_id(system_id, index, node_index), kind, position, amount)
        })
        .collect();

    Planet {
        id: planet_id(system_id, index),
        name: planet_name(&config.system_name, index),
        system_id: system_id.clone(),
        orbit_index: index,
        orbit_radius,
        radius,
        color,
        resources,
    }
}
