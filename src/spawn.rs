//! Spawn context for agent initialization.
//!
//! Every random draw made while populating a flock goes through a
//! [`SpawnContext`], so a fixed seed reproduces the same flock.

use crate::agent::Agent;
use crate::config::FlockConfig;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Slowest initial speed.
const MIN_INITIAL_SPEED: f32 = 2.0;
/// Initial speeds are drawn below this.
const MAX_INITIAL_SPEED: f32 = 5.0;

/// Pick a seed from the system clock.
///
/// Used when the configuration leaves the seed open.
pub fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

/// Seeded random source with helpers for placing new agents.
///
/// ```
/// use flocksim::{FlockConfig, SpawnContext};
///
/// let config = FlockConfig::default();
/// let mut a = SpawnContext::new(9);
/// let mut b = SpawnContext::new(9);
/// assert_eq!(a.spawn_agent(&config), b.spawn_agent(&config));
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a spawn context from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `min..max`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    // ========== Position helpers ==========

    /// Random point inside a box of the given half-extents, centered at origin.
    pub fn random_in_box(&mut self, half_extents: Vec3) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_extents.x..=half_extents.x),
            self.rng.gen_range(-half_extents.y..=half_extents.y),
            self.rng.gen_range(-half_extents.z..=half_extents.z),
        )
    }

    /// Random unit vector, uniformly distributed on the sphere.
    pub fn random_direction(&mut self) -> Vec3 {
        let z: f32 = self.rng.gen_range(-1.0..=1.0);
        let theta = self.rng.gen_range(0.0..TAU);
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), z)
    }

    // ========== Agents ==========

    /// Create one agent according to `config`.
    ///
    /// Agents start at the origin when `start_centered` is set, otherwise
    /// anywhere inside the flight volume. Each heads in a random direction at
    /// a speed between 2 and 5.
    pub fn spawn_agent(&mut self, config: &FlockConfig) -> Agent {
        let position = if config.start_centered {
            Vec3::ZERO
        } else {
            self.random_in_box(config.half_extents())
        };
        let speed = self.random_range(MIN_INITIAL_SPEED, MAX_INITIAL_SPEED);
        let velocity = self.random_direction() * speed;
        let color = config.appearance.sample_color(&mut self.rng);

        Agent::new(position, velocity)
            .with_limits(config.max_force, config.max_speed)
            .with_appearance(config.appearance, color)
    }

    /// Create `count` agents.
    pub fn spawn_agents(&mut self, config: &FlockConfig, count: usize) -> Vec<Agent> {
        (0..count).map(|_| self.spawn_agent(config)).collect()
    }
}
