//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance in the x/z plane (the surface robots travel on)
    pub fn planar_distance(&self, other: &Self) -> f32 {
        starharvest_logic::movement::planar_distance(self.x, self.z, other.x, other.z)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Spatial position component - where a robot stands on the current surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

/// Creation order of a registry entity.
///
/// `hecs` iteration order is an implementation detail; sorting by serial
/// gives the stable order used for ticking and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Serial(pub u64);
