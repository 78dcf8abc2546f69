//! Pure movement logic: planar approach of a robot toward a resource node.
//!
//! Robots move in the x/z plane; height is owned by the node they approach.
//! A step never carries a robot past its target.

/// Outcome of one approach step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Approach {
    /// Within the arrival threshold; the robot may harvest.
    Arrived,
    /// Still travelling; new planar position after this frame.
    Advance { x: f32, z: f32 },
}

/// Distance between two points ignoring height.
pub fn planar_distance(ax: f32, az: f32, bx: f32, bz: f32) -> f32 {
    let dx = bx - ax;
    let dz = bz - az;
    (dx * dx + dz * dz).sqrt()
}

/// Advance from `(px, pz)` toward `(tx, tz)` by at most `speed * delta_seconds`.
pub fn approach(
    (px, pz): (f32, f32),
    (tx, tz): (f32, f32),
    arrival_threshold: f32,
    speed: f32,
    delta_seconds: f32,
) -> Approach {
    let distance = planar_distance(px, pz, tx, tz);
    if distance <= arrival_threshold {
        return Approach::Arrived;
    }

    let step = (speed * delta_seconds.max(0.0)).min(distance);
    let x = px + (tx - px) / distance * step;
    let z = pz + (tz - pz) / distance * step;
    Approach::Advance { x, z }
}
