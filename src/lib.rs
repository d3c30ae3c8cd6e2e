//! # flocksim
//!
//! Flocking agents in a bounded 3D volume, with an octree for neighbor
//! lookup.
//!
//! Each agent steers by three classic rules, separation, alignment and
//! cohesion, computed from the flockmates inside its perception radius.
//! A soft boundary pushes agents back toward the volume, and lone agents
//! wander instead of flying straight.
//!
//! ## Quick Start
//!
//! ```
//! use flocksim::prelude::*;
//!
//! let config = FlockConfig {
//!     population: 50,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config).unwrap();
//!
//! for _ in 0..10 {
//!     let stats = sim.tick();
//!     assert_eq!(stats.indexed + stats.dropped, 50);
//! }
//!
//! // Hand the positions to a renderer.
//! let instances = sim.instances();
//! assert_eq!(instances.len(), 50);
//! ```
//!
//! ## Core Concepts
//!
//! ### Region tree
//!
//! [`RegionTree`] is a point octree over axis-aligned [`Region`]s. Nodes hold
//! up to `capacity` entries and split into eight octants when full. The
//! simulation rebuilds one every tick over [`FlockConfig::index_region`] and
//! answers each agent's perception query from it.
//!
//! ### Steering
//!
//! [`Agent::flock`] combines the weighted rules with boundary steering and,
//! for agents without neighbors, a small random exploration push. Rules read
//! the population as it was at the start of the tick; writes happen only in
//! [`Agent::integrate`].
//!
//! ### Configuration
//!
//! [`FlockConfig`] holds every tunable and round-trips through JSON:
//!
//! ```no_run
//! use flocksim::FlockConfig;
//!
//! let config = FlockConfig::load("flock.json")?;
//! config.save("flock-copy.json")?;
//! # Ok::<(), flocksim::ConfigError>(())
//! ```
//!
//! ## Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `parallel` | Compute steering on rayon's thread pool. Results are identical to the sequential path. |

pub mod agent;
pub mod appearance;
pub mod config;
mod error;
pub mod instance;
pub mod region;
pub mod simulation;
pub mod spawn;
pub mod time;
pub mod tree;

pub use agent::{Agent, Neighbor, SteeringParams};
pub use appearance::Appearance;
pub use bytemuck;
pub use config::{BoundaryConfig, FlockConfig, IndexConfig, RuleWeights};
pub use error::{ConfigError, ParseAppearanceError};
pub use glam::{Vec2, Vec3};
pub use instance::{instance_bytes, AgentInstance};
pub use region::Region;
pub use simulation::{AgentTree, Simulation, TickStats};
pub use spawn::SpawnContext;
pub use time::TickClock;
pub use tree::{RegionTree, TreeEntry, DEFAULT_MAX_DEPTH};

/// Convenient re-exports for common usage.
///
/// ```
/// use flocksim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{Agent, Neighbor};
    pub use crate::appearance::Appearance;
    pub use crate::config::{FlockConfig, RuleWeights};
    pub use crate::instance::AgentInstance;
    pub use crate::region::Region;
    pub use crate::simulation::{Simulation, TickStats};
    pub use crate::time::TickClock;
    pub use crate::tree::RegionTree;
    pub use crate::{Vec2, Vec3};
}
