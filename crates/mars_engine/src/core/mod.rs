//! # Core Module
//!
//! Shared configuration types used by the physics core and its drivers.

pub mod config;

pub use config::{Config, ConfigError, ConfigFormat, PhysicsConfig, SimulationConfig};
