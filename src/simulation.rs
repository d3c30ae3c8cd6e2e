//! Simulation driver and population management.
//!
//! Each [`Simulation::tick`] runs the same phases in order:
//!
//! 1. Build a fresh [`RegionTree`] over the index region and insert every
//!    agent. Agents outside it are left out of this tick's index.
//! 2. Compute every agent's steering from the population as it stood at the
//!    start of the tick. Nothing is written during this phase, so with the
//!    `parallel` feature it runs on rayon's pool.
//! 3. Apply the forces and integrate every agent.
//!
//! Exploration draws come from an RNG seeded per (seed, frame, agent), so a
//! tick's result does not depend on evaluation order or thread count.

use crate::agent::{Agent, Neighbor, SteeringParams};
use crate::config::FlockConfig;
use crate::error::ConfigError;
use crate::instance::AgentInstance;
use crate::region::Region;
use crate::spawn::{seed_from_clock, SpawnContext};
use crate::tree::RegionTree;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Spatial index over agent indices.
pub type AgentTree = RegionTree<usize>;

/// Summary of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Frame number after the tick (1 for the first tick).
    pub frame: u64,
    /// Agents inserted into the index.
    pub indexed: usize,
    /// Agents outside the index region this tick.
    pub dropped: usize,
    /// Agents that found no neighbors and explored instead.
    pub isolated: usize,
    /// Nodes in the tick's tree.
    pub tree_nodes: usize,
    /// Depth of the tick's tree.
    pub tree_depth: usize,
}

/// A flock of agents and the state needed to step it.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: FlockConfig,
    agents: Vec<Agent>,
    frame: u64,
    seed: u64,
    spawner: SpawnContext,
    paused: bool,
}

impl Simulation {
    /// Validate `config` and spawn `config.population` agents.
    ///
    /// The seed is `config.seed` when set, otherwise one is taken from the
    /// clock.
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        let mut spawner = SpawnContext::new(seed);
        let agents = spawner.spawn_agents(&config, config.population);
        info!(population = agents.len(), seed, "flock created");

        Ok(Self {
            config,
            agents,
            frame: 0,
            seed,
            spawner,
            paused: false,
        })
    }

    /// Run with hand-built agents instead of spawned ones.
    ///
    /// `config.population` is set to the number of agents given.
    pub fn from_agents(mut config: FlockConfig, agents: Vec<Agent>) -> Result<Self, ConfigError> {
        config.validate()?;
        config.population = agents.len();
        let seed = config.seed.unwrap_or_else(seed_from_clock);

        Ok(Self {
            config,
            agents,
            frame: 0,
            seed,
            spawner: SpawnContext::new(seed),
            paused: false,
        })
    }

    /// Replace the seed and start over from frame 0 with a respawned flock.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.config.seed = Some(seed);
        self.reset();
        self
    }

    // ========== Stepping ==========

    /// Advance the flock by one tick.
    ///
    /// A paused simulation does nothing and reports zero work at the
    /// current frame.
    pub fn tick(&mut self) -> TickStats {
        if self.paused {
            return TickStats {
                frame: self.frame,
                ..Default::default()
            };
        }

        self.frame += 1;
        let tree = self.build_tree();
        let indexed = tree.len();
        let dropped = self.agents.len() - indexed;
        if dropped > 0 {
            debug!(frame = self.frame, dropped, "agents outside the index region");
        }

        let params = SteeringParams::for_frame(&self.config, self.frame);
        let steering = self.compute_steering(&tree, &params);

        let mut isolated = 0;
        let friction = self.config.friction;
        for (agent, (force, alone)) in self.agents.iter_mut().zip(steering) {
            agent.apply_force(force);
            agent.integrate(friction);
            isolated += usize::from(alone);
        }

        let stats = TickStats {
            frame: self.frame,
            indexed,
            dropped,
            isolated,
            tree_nodes: tree.node_count(),
            tree_depth: tree.depth(),
        };
        trace!(
            frame = stats.frame,
            indexed,
            dropped,
            isolated,
            tree_nodes = stats.tree_nodes,
            "tick"
        );
        stats
    }

    /// Run `ticks` ticks and return the stats of the last one.
    pub fn run(&mut self, ticks: u64) -> TickStats {
        let mut last = TickStats {
            frame: self.frame,
            ..Default::default()
        };
        for _ in 0..ticks {
            last = self.tick();
        }
        last
    }

    /// Steering force for every agent, paired with whether it was isolated.
    fn compute_steering(&self, tree: &AgentTree, params: &SteeringParams) -> Vec<(Vec3, bool)> {
        #[cfg(feature = "parallel")]
        {
            (0..self.agents.len())
                .into_par_iter()
                .map(|i| self.steer(i, tree, params))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..self.agents.len())
                .map(|i| self.steer(i, tree, params))
                .collect()
        }
    }

    fn steer(&self, index: usize, tree: &AgentTree, params: &SteeringParams) -> (Vec3, bool) {
        let neighbors = self.neighbors_of(index, tree);
        let mut rng = SmallRng::seed_from_u64(exploration_seed(self.seed, self.frame, index));
        let force = self.agents[index].flock(&neighbors, params, &mut rng);
        (force, neighbors.is_empty())
    }

    // ========== Spatial queries ==========

    /// Build the spatial index for the current positions.
    ///
    /// The root covers [`FlockConfig::index_region`]. Agents outside it are
    /// not inserted.
    pub fn build_tree(&self) -> AgentTree {
        let index = &self.config.index;
        let mut tree =
            RegionTree::new(self.config.index_region(), index.capacity).with_max_depth(index.max_depth);
        for (i, agent) in self.agents.iter().enumerate() {
            tree.insert(agent.position, i);
        }
        tree
    }

    /// Agents strictly within perception range of agent `index`, excluding
    /// itself.
    ///
    /// Only agents present in `tree` can be found.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn neighbors_of(&self, index: usize, tree: &AgentTree) -> Vec<Neighbor> {
        let agent = &self.agents[index];
        let perception = self.config.perception;
        let range = Region::cube(agent.position, perception);

        let mut candidates = Vec::new();
        tree.query(&range, &mut candidates);

        candidates
            .into_iter()
            .filter(|&j| j != index)
            .filter_map(|j| {
                let other = &self.agents[j];
                let distance = agent.position.distance(other.position);
                (distance < perception).then_some(Neighbor {
                    index: j,
                    position: other.position,
                    velocity: other.velocity,
                    distance,
                })
            })
            .collect()
    }

    // ========== Population ==========

    /// Grow or shrink the flock to `population` agents.
    ///
    /// New agents are spawned the same way as at creation. Shrinking drops
    /// the most recently added agents.
    pub fn set_population(&mut self, population: usize) {
        let before = self.agents.len();
        if population > before {
            let extra = self.spawner.spawn_agents(&self.config, population - before);
            self.agents.extend(extra);
        } else {
            self.agents.truncate(population);
        }
        self.config.population = population;
        info!(from = before, to = population, "population changed");
    }

    /// Go back to frame 0 and respawn the whole flock from the seed.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.spawner = SpawnContext::new(self.seed);
        self.agents = self.spawner.spawn_agents(&self.config, self.config.population);
        info!(population = self.agents.len(), seed = self.seed, "flock reset");
    }

    // ========== Accessors ==========

    /// Pause or resume ticking.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Whether ticks are currently skipped.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The agents, in population order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access to the agents, for hosts that move agents by hand.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// The configuration the flock runs with.
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Ticks run since creation or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seed behind spawning and exploration.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Render snapshot of every agent.
    pub fn instances(&self) -> Vec<AgentInstance> {
        self.agents.iter().map(AgentInstance::from).collect()
    }
}

/// Mix the run seed, frame and agent index into one RNG seed.
fn exploration_seed(seed: u64, frame: u64, index: usize) -> u64 {
    let mut z = seed
        ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
