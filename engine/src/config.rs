//! Configuration types for the engine

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Simulation settings owned by a physics world for its whole lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity added to every awake, airborne body each tick (before `gravity_scale`)
    pub gravity: Vec2,
    /// Length of one physics tick in seconds
    pub fixed_timestep: f32,
    /// Upper bound on ticks run for a single frame
    pub max_steps_per_frame: u32,
    /// Bisection steps used to close the gap after a gravity-axis rollback.
    /// Zero keeps the plain rollback.
    pub contact_settle_iterations: u32,
    /// Do queries report trigger colliders?
    pub queries_hit_triggers: bool,
    /// Do raycasts that start inside a collider report that collider?
    pub queries_start_in_colliders: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -50.0),
            fixed_timestep: 0.02,
            max_steps_per_frame: 8,
            contact_settle_iterations: 10,
            queries_hit_triggers: true,
            queries_start_in_colliders: true,
        }
    }
}

impl PhysicsConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading physics config");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the settings a simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
