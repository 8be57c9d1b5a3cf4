//! World settings and body presets.
//!
//! Loads simulation settings and reusable body descriptions from YAML, so
//! games can tune hitboxes and masses without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── world.yaml
//! └── bodies/
//!     ├── player.yaml
//!     ├── tree.yaml
//!     └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::body::PhysicsBody;
use crate::collision::ShapeKind;
use crate::error::PhysicsError;
use crate::types::{constants, MovementPolicy, Vec2};

/// Error type for preset loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset not found: {0}")]
    NotFound(String),

    #[error("invalid preset: {0}")]
    Invalid(#[from] PhysicsError),

    #[error("sub_steps must be at least 1")]
    ZeroSubSteps,

    #[error("tile_size must be finite and > 0, got {0}")]
    InvalidTileSize(f32),
}

// =============================================================================
// World Settings
// =============================================================================

/// Simulation settings shared by every body of a world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed sub-steps per [`step`](crate::world::PhysicsWorld::step) call
    pub sub_steps: u32,
    /// World units per tile; velocities are in tiles per second
    pub tile_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            sub_steps: constants::DEFAULT_SUB_STEPS,
            tile_size: constants::DEFAULT_TILE_SIZE,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sub_steps == 0 {
            return Err(ConfigError::ZeroSubSteps);
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }
}

// =============================================================================
// Body Presets
// =============================================================================

fn default_one() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Reusable description of a body, minus its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPreset {
    pub name: String,

    /// Hitbox width in world units
    pub width: f32,

    /// Hitbox height in world units
    pub height: f32,

    pub shape: ShapeKind,

    /// Mass in kg
    #[serde(default = "default_one")]
    pub mass: f32,

    /// Coefficient of restitution in [0, 1]
    #[serde(default = "default_one")]
    pub restitution: f32,

    pub movement: MovementPolicy,

    /// Whether contacts change the body's velocity
    #[serde(default = "default_true")]
    pub impulse_response: bool,
}

impl BodyPreset {
    /// Instantiates the preset at `position` (bottom-left of the hitbox).
    pub fn build(&self, position: Vec2) -> Result<PhysicsBody, PhysicsError> {
        let mut body = PhysicsBody::new(
            self.name.clone(),
            position,
            self.width,
            self.height,
            self.shape,
            self.movement,
        )?
        .with_mass(self.mass)?
        .with_restitution(self.restitution)?;
        body.set_impulse_response(self.impulse_response);
        Ok(body)
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Preset loader with configurable base directory.
pub struct PresetLoader {
    base_path: PathBuf,
}

impl PresetLoader {
    /// The base path should contain `world.yaml` and a `bodies/` subdirectory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate `world.yaml`.
    pub fn load_world(&self) -> Result<WorldConfig, ConfigError> {
        let path = self.base_path.join("world.yaml");
        if !path.exists() {
            return Err(ConfigError::NotFound("world".to_string()));
        }
        let config: WorldConfig = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a body preset by name (without .yaml extension).
    ///
    /// The preset is checked by building it once at the origin.
    ///
    /// # Example
    /// ```ignore
    /// let loader = PresetLoader::new("presets");
    /// let player = loader.load_body("player")?.build(Vec2::new(32.0, 48.0))?;
    /// ```
    pub fn load_body(&self, name: &str) -> Result<BodyPreset, ConfigError> {
        let path = self.base_path.join("bodies").join(format!("{name}.yaml"));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let preset: BodyPreset = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
        preset.build(Vec2::ZERO)?;
        log::debug!("loaded body preset '{}' from {}", preset.name, path.display());
        Ok(preset)
    }

    /// Names of all body presets, sorted.
    pub fn list_bodies(&self) -> Result<Vec<String>, ConfigError> {
        let path = self.base_path.join("bodies");
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let file_name = entry?.file_name();
            if let Some(name) = file_name.to_string_lossy().strip_suffix(".yaml") {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
