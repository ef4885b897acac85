//! # Simulation Configuration
//!
//! Concrete configuration types for the physics core and the headless driver.
//! Both load from TOML or RON through the [`Config`] trait, and every field
//! has a default so partial files are accepted.
//!
//! ```toml
//! asteroid_count = 32
//!
//! [physics]
//! timestep = 0.016
//! restitution = 0.9
//! precision = "fast"
//! ```

use serde::{Deserialize, Serialize};

use crate::foundation::math::Precision;
use crate::physics::collision::DEFAULT_RESTITUTION;
use crate::physics::integrator::DEFAULT_DAMPING;

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Physics Configuration
///
/// Parameters for one simulation tick: step length, collision bounciness,
/// drag and the square-root/trigonometry mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed tick length in seconds
    pub timestep: f64,
    /// Coefficient of restitution in `[0, 1]`
    pub restitution: f64,
    /// Velocity multiplier applied once per tick, in `(0, 1]`
    pub linear_damping: f64,
    /// Exact or fast math for distances
    pub precision: Precision,
    /// Upper bound on ticks run for one rendered frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            restitution: DEFAULT_RESTITUTION,
            linear_damping: DEFAULT_DAMPING,
            precision: Precision::Exact,
            max_substeps: 5,
        }
    }
}

impl PhysicsConfig {
    /// Set the tick length
    #[must_use]
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set the coefficient of restitution
    #[must_use]
    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the per-tick damping factor
    #[must_use]
    pub fn with_linear_damping(mut self, linear_damping: f64) -> Self {
        self.linear_damping = linear_damping;
        self
    }

    /// Set the math precision mode
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the substep cap
    #[must_use]
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timestep must be positive and finite, got {}",
                self.timestep
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::Invalid(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if !(self.linear_damping > 0.0 && self.linear_damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "linear_damping must be within (0, 1], got {}",
                self.linear_damping
            )));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// # Simulation Configuration
///
/// Scenario parameters for the headless driver on top of [`PhysicsConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physics tick parameters
    pub physics: PhysicsConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Number of asteroids to scatter
    pub asteroid_count: usize,
    /// Asteroids spawn within `[-extent, extent]` on both axes
    pub world_half_extent: f64,
    /// Number of fixed ticks to simulate
    pub ticks: u32,
    /// Seed for the scenario generator
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            log_level: "info".to_string(),
            asteroid_count: 24,
            world_half_extent: 50.0,
            ticks: 600,
            seed: 0x4D41_5253,
        }
    }
}

impl Config for SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        if !(self.world_half_extent.is_finite() && self.world_half_extent > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world_half_extent must be positive and finite, got {}",
                self.world_half_extent
            )));
        }
        Ok(())
    }
}
