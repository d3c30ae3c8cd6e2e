//! Agents and their steering rules.
//!
//! Every rule follows the classic steering pattern: work out a desired
//! velocity, scale it to full speed, subtract the current velocity and clamp
//! the result to `max_force`. The rules only read neighbor state, so they can
//! run for every agent against the same snapshot; the writes all happen in
//! [`Agent::integrate`].

use crate::appearance::Appearance;
use crate::config::{FlockConfig, RuleWeights};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Floor on neighbor distance in [`Agent::separation`].
pub const MIN_SEPARATION_DISTANCE: f32 = 0.01;

/// Exploration force as a fraction of `max_force`.
const EXPLORATION_FRACTION: f32 = 0.2;

/// One simulated flockmate.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    /// Current location.
    pub position: Vec3,
    /// Current heading and speed.
    pub velocity: Vec3,
    /// Steering accumulated this tick. Zeroed by [`integrate`](Self::integrate).
    pub acceleration: Vec3,
    /// Upper bound on each steering rule's output.
    pub max_force: f32,
    /// Upper bound on speed, and the speed every rule steers toward.
    pub max_speed: f32,
    /// Colour scheme this agent was spawned with.
    pub appearance: Appearance,
    /// RGB colour (0-1) drawn from `appearance` at spawn.
    pub color: Vec3,
}

/// A flockmate seen from another agent, with the distance between them.
///
/// Values are copied out of the tick's snapshot, so an agent reading its
/// neighbors never touches the neighbors themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the population.
    pub index: usize,
    /// Neighbor position at the start of the tick.
    pub position: Vec3,
    /// Neighbor velocity at the start of the tick.
    pub velocity: Vec3,
    /// Distance from the observing agent.
    pub distance: f32,
}

/// Per-tick inputs to [`Agent::flock`] that do not vary between agents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringParams {
    /// Rule weights.
    pub weights: RuleWeights,
    /// Whether cohesion applies this tick.
    pub cohesion_enabled: bool,
    /// Half the flight volume along each axis.
    pub half_extents: Vec3,
    /// Distance past the volume's faces before boundary steering kicks in.
    pub margin: f32,
    /// Multiplier on the boundary force.
    pub boundary_gain: f32,
}

impl SteeringParams {
    /// Steering parameters for tick `frame` of a simulation.
    pub fn for_frame(config: &FlockConfig, frame: u64) -> Self {
        Self {
            weights: config.weights,
            cohesion_enabled: config.cohesion_active(frame),
            half_extents: config.half_extents(),
            margin: config.boundary.margin,
            boundary_gain: config.boundary.gain,
        }
    }
}

impl Agent {
    /// Create an agent with the default limits (force 0.1, speed 5).
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_force: 0.1,
            max_speed: 5.0,
            appearance: Appearance::Default,
            color: Vec3::splat(50.0 / 255.0),
        }
    }

    /// Override the force and speed limits.
    pub fn with_limits(mut self, max_force: f32, max_speed: f32) -> Self {
        self.max_force = max_force;
        self.max_speed = max_speed;
        self
    }

    /// Set the appearance and the colour drawn from it.
    pub fn with_appearance(mut self, appearance: Appearance, color: Vec3) -> Self {
        self.appearance = appearance;
        self.color = color;
        self
    }

    /// Add a force to this tick's acceleration.
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Turn a desired direction into a bounded steering force.
    fn steer(&self, desired: Vec3) -> Vec3 {
        let desired = desired.normalize_or_zero() * self.max_speed;
        (desired - self.velocity).clamp_length_max(self.max_force)
    }

    /// Steer away from neighbors.
    pub fn separation(&self, neighbors: &[Neighbor]) -> Vec3 {
        if neighbors.is_empty() {
            return Vec3::ZERO;
        }

        let sum: Vec3 = neighbors
            .iter()
            .map(|n| (self.position - n.position) / n.distance.max(MIN_SEPARATION_DISTANCE))
            .sum();
        self.steer(sum / neighbors.len() as f32)
    }

    /// Steer toward the average heading of neighbors.
    pub fn alignment(&self, neighbors: &[Neighbor]) -> Vec3 {
        if neighbors.is_empty() {
            return Vec3::ZERO;
        }

        let sum: Vec3 = neighbors.iter().map(|n| n.velocity).sum();
        self.steer(sum / neighbors.len() as f32)
    }

    /// Steer toward the center of neighbors.
    pub fn cohesion(&self, neighbors: &[Neighbor]) -> Vec3 {
        if neighbors.is_empty() {
            return Vec3::ZERO;
        }

        let sum: Vec3 = neighbors.iter().map(|n| n.position).sum();
        self.steer(sum / neighbors.len() as f32 - self.position)
    }

    /// Push back toward the center on every axis where the agent has drifted
    /// more than `margin` past the volume's faces.
    pub fn boundary_steering(&self, half_extents: Vec3, margin: f32, gain: f32) -> Vec3 {
        let limit = half_extents + Vec3::splat(margin);
        let outside = self.position.abs().cmpgt(limit);
        let push = -self.position / half_extents * self.max_force * gain;
        Vec3::select(outside, push, Vec3::ZERO)
    }

    /// A small random push in the XY plane, used when an agent has no
    /// neighbors so it keeps moving instead of stalling.
    pub fn exploration<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let heading = Vec2::from_angle(rng.gen_range(0.0..TAU));
        (heading * self.max_force * EXPLORATION_FRACTION).extend(0.0)
    }

    /// Combined steering for one tick.
    ///
    /// Pure: reads only `self` and the neighbor values. The result is meant
    /// to be passed to [`apply_force`](Self::apply_force) once every agent has
    /// been evaluated.
    pub fn flock<R: Rng + ?Sized>(
        &self,
        neighbors: &[Neighbor],
        params: &SteeringParams,
        rng: &mut R,
    ) -> Vec3 {
        let weights = &params.weights;
        let mut force = self.separation(neighbors) * weights.separation
            + self.alignment(neighbors) * weights.alignment;

        if params.cohesion_enabled {
            force += self.cohesion(neighbors) * weights.cohesion;
        }

        force += self.boundary_steering(params.half_extents, params.margin, params.boundary_gain);

        if neighbors.is_empty() {
            force += self.exploration(rng);
        }

        force
    }

    /// Advance one tick: move, apply acceleration and friction, clamp speed,
    /// and clear the accumulator.
    ///
    /// With `friction` above 1 the speed grows every tick, so the clamp is
    /// what keeps it bounded.
    pub fn integrate(&mut self, friction: f32) {
        self.position += self.velocity;
        self.velocity += self.acceleration;
        self.velocity *= friction;
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
        self.acceleration = Vec3::ZERO;
    }

    /// Current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
