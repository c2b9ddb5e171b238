//! Simulation configuration.
//!
//! Loop, arena, and encounter parameters, loadable from a toml file.
//! Missing or invalid files fall back to defaults with a log line.

use revenant_ai::config::EnemyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "revenant.toml";

/// Simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Loop Settings ===
    /// Fixed timestep in seconds
    pub tick_dt: f32,
    /// Total simulated seconds
    pub duration: f32,

    // === Arena Settings ===
    /// Radius of the navigable disc
    pub arena_radius: f32,
    /// Enemy spawn position
    pub enemy_spawn: [f32; 3],
    /// Radius of the target's scripted orbit around the arena center
    pub target_orbit_radius: f32,
    /// Orbit angular speed in radians per second
    pub target_orbit_speed: f32,
    /// Sphere occluders as [x, y, z, radius]
    pub occluders: Vec<[f32; 4]>,

    // === Encounter Settings ===
    /// Simulated second at which the calming item is handed over
    /// (negative = never)
    pub calm_at: f32,
    /// Enemy behavior tuning
    pub enemy: EnemyConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_dt: 1.0 / 60.0,
            duration: 30.0,
            arena_radius: 30.0,
            enemy_spawn: [-10.0, 0.0, 0.0],
            target_orbit_radius: 8.0,
            target_orbit_speed: 0.5,
            occluders: vec![[0.0, 0.0, -6.0, 2.0]],
            calm_at: 12.0,
            enemy: EnemyConfig::default(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from the default file location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Saves configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validates and clamps configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_dt = self.tick_dt.clamp(0.001, 0.25);
        self.duration = self.duration.clamp(0.0, 3600.0);
        self.arena_radius = self.arena_radius.clamp(1.0, 1000.0);
        self.target_orbit_radius = self.target_orbit_radius.clamp(0.0, self.arena_radius);
        for occluder in &mut self.occluders {
            occluder[3] = occluder[3].max(0.0);
        }
        self.enemy.validate();
    }
}
