//! Simulation configuration.
//!
//! [`FlockConfig`] gathers every tunable the simulation reads. It serialises
//! to JSON so a host can keep presets on disk; missing fields fall back to
//! their defaults when loading.

use crate::appearance::Appearance;
use crate::error::ConfigError;
use crate::region::Region;
use crate::tree::DEFAULT_MAX_DEPTH;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Weights applied to the three flocking rules.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleWeights {
    /// Steer away from crowded flockmates.
    pub separation: f32,
    /// Steer toward the average heading of flockmates.
    pub alignment: f32,
    /// Steer toward the average position of flockmates.
    pub cohesion: f32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            separation: 1.0,
            alignment: 1.0,
            cohesion: 1.0,
        }
    }
}

/// Soft walls around the simulation volume.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundaryConfig {
    /// How far past the volume's faces an agent may drift before it is pushed back.
    pub margin: f32,
    /// Multiplier on the corrective force.
    pub gain: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            gain: 15.0,
        }
    }
}

/// Spatial index parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Agents a tree node holds before subdividing.
    pub capacity: usize,
    /// Depth past which nodes stop subdividing.
    pub max_depth: usize,
    /// Extra room between the volume's faces and the indexed region.
    ///
    /// Agents outside the indexed region are left out of neighbor queries
    /// until boundary steering brings them back.
    pub padding: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            max_depth: DEFAULT_MAX_DEPTH,
            padding: 250.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockConfig {
    /// Number of live agents.
    pub population: usize,
    /// Radius within which another agent counts as a neighbor.
    pub perception: f32,
    /// Rule weights.
    pub weights: RuleWeights,
    /// Full size of the flight volume, centered on the origin.
    pub volume: Vec3,
    /// Spawn every agent at the origin and hold cohesion off for a while.
    pub start_centered: bool,
    /// Ticks without cohesion when `start_centered` is set.
    pub cohesion_warmup_frames: u64,
    /// Colour scheme for spawned agents.
    pub appearance: Appearance,
    /// Upper bound on agent speed.
    pub max_speed: f32,
    /// Upper bound on each steering rule's force.
    pub max_force: f32,
    /// Velocity multiplier applied every tick. Values above 1 speed agents up.
    pub friction: f32,
    /// Boundary steering.
    pub boundary: BoundaryConfig,
    /// Spatial index.
    pub index: IndexConfig,
    /// Seed for every random draw. `None` picks one from the clock.
    pub seed: Option<u64>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            population: 200,
            perception: 125.0,
            weights: RuleWeights::default(),
            volume: Vec3::new(1280.0, 720.0, 720.0),
            start_centered: true,
            cohesion_warmup_frames: 100,
            appearance: Appearance::Default,
            max_speed: 5.0,
            max_force: 0.1,
            friction: 1.01,
            boundary: BoundaryConfig::default(),
            index: IndexConfig::default(),
            seed: None,
        }
    }
}

impl FlockConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("perception", self.perception)?;
        non_negative("weights.separation", self.weights.separation)?;
        non_negative("weights.alignment", self.weights.alignment)?;
        non_negative("weights.cohesion", self.weights.cohesion)?;

        for (axis, size) in ["x", "y", "z"].into_iter().zip(self.volume.to_array()) {
            if !(size.is_finite() && size > 0.0) {
                return Err(ConfigError::invalid(
                    "volume",
                    format!("{axis} size must be positive, got {size}"),
                ));
            }
        }

        positive("max_speed", self.max_speed)?;
        non_negative("max_force", self.max_force)?;
        positive("friction", self.friction)?;
        non_negative("boundary.margin", self.boundary.margin)?;
        non_negative("boundary.gain", self.boundary.gain)?;
        non_negative("index.padding", self.index.padding)?;

        if self.index.capacity == 0 {
            return Err(ConfigError::invalid("index.capacity", "must be at least 1"));
        }
        if self.index.max_depth == 0 {
            return Err(ConfigError::invalid("index.max_depth", "must be at least 1"));
        }
        Ok(())
    }

    /// Half the flight volume along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.volume * 0.5
    }

    /// The flight volume as a region centered on the origin.
    pub fn volume_region(&self) -> Region {
        Region::new(Vec3::ZERO, self.half_extents())
    }

    /// The region covered by the root of each tick's spatial index.
    pub fn index_region(&self) -> Region {
        Region::new(Vec3::ZERO, self.half_extents() + Vec3::splat(self.index.padding))
    }

    /// Whether cohesion applies on tick `frame` (1-based).
    #[inline]
    pub fn cohesion_active(&self, frame: u64) -> bool {
        !self.start_centered || frame > self.cohesion_warmup_frames
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be zero or positive, got {value}")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        FlockConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_negative_perception() {
        let config = FlockConfig {
            perception: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "perception", .. }));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut config = FlockConfig::default();
        config.index.capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "index.capacity", .. }));
    }

    #[test]
    fn test_rejects_flat_volume() {
        let config = FlockConfig {
            volume: Vec3::new(100.0, 0.0, 100.0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("y size"));
    }

    #[test]
    fn test_rejects_nan() {
        let config = FlockConfig {
            max_force: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FlockConfig::from_json(
            r#"{ "population": 12, "weights": { "cohesion": 2.5 }, "appearance": "blues" }"#,
        )
        .unwrap();
        assert_eq!(config.population, 12);
        assert_eq!(config.weights.cohesion, 2.5);
        assert_eq!(config.weights.separation, 1.0);
        assert_eq!(config.appearance, Appearance::Blues);
        assert_eq!(config.perception, 125.0);
    }

    #[test]
    fn test_from_json_validates() {
        let err = FlockConfig::from_json(r#"{ "max_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "max_speed", .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flock.json");

        let config = FlockConfig {
            population: 42,
            seed: Some(7),
            appearance: Appearance::Rainbow,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(FlockConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FlockConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_regions() {
        let config = FlockConfig {
            volume: Vec3::new(200.0, 100.0, 50.0),
            index: IndexConfig {
                padding: 10.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.volume_region().max(), Vec3::new(100.0, 50.0, 25.0));
        assert_eq!(config.index_region().max(), Vec3::new(110.0, 60.0, 35.0));
    }

    #[test]
    fn test_cohesion_warmup() {
        let mut config = FlockConfig {
            cohesion_warmup_frames: 3,
            ..Default::default()
        };
        assert!(!config.cohesion_active(1));
        assert!(!config.cohesion_active(3));
        assert!(config.cohesion_active(4));

        config.start_centered = false;
        assert!(config.cohesion_active(1));
    }
}
