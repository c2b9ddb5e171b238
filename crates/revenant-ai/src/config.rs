//! Behavior tuning parameters.

use revenant_common::LayerMask;
use serde::{Deserialize, Serialize};

/// Tuning block for one enemy archetype.
///
/// Defaults match the shipped enemy: a 10 m patrol ring, 12 m sight range
/// with a 120-degree cone, and a 5 second fuse before enrage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    // === Patrolling ===
    /// Radius around the current position to patrol.
    pub patrol_radius: f32,
    /// Seconds to wait at a reached patrol point.
    pub patrol_wait_time: f32,
    /// Remaining-distance threshold that counts as arrival.
    pub arrive_threshold: f32,

    // === Detection ===
    /// Range within which the target can be seen.
    pub sight_range: f32,
    /// Field-of-view cone angle in degrees.
    pub field_of_view: f32,
    /// Eye height above the agent origin for line-of-sight rays.
    pub eye_height: f32,
    /// Collision layer of the tracked target.
    pub target_layer: LayerMask,

    // === Chasing & Enrage ===
    /// Patrol and normal chase speed.
    pub normal_speed: f32,
    /// Chase speed while enraged.
    pub enraged_speed: f32,
    /// Seconds of chase before the enemy enrages.
    pub time_to_enrage: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 10.0,
            patrol_wait_time: 2.0,
            arrive_threshold: 0.5,
            sight_range: 12.0,
            field_of_view: 120.0,
            eye_height: 1.0,
            target_layer: LayerMask::ALL,
            normal_speed: 3.5,
            enraged_speed: 6.0,
            time_to_enrage: 5.0,
        }
    }
}

impl EnemyConfig {
    /// Sets the sight range.
    #[must_use]
    pub const fn with_sight_range(mut self, range: f32) -> Self {
        self.sight_range = range;
        self
    }

    /// Sets the field-of-view cone angle in degrees.
    #[must_use]
    pub const fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    /// Sets normal and enraged movement speeds.
    #[must_use]
    pub const fn with_speeds(mut self, normal: f32, enraged: f32) -> Self {
        self.normal_speed = normal;
        self.enraged_speed = enraged;
        self
    }

    /// Sets the enrage fuse in seconds.
    #[must_use]
    pub const fn with_time_to_enrage(mut self, seconds: f32) -> Self {
        self.time_to_enrage = seconds;
        self
    }

    /// Sets patrol radius and wait time.
    #[must_use]
    pub const fn with_patrol(mut self, radius: f32, wait_time: f32) -> Self {
        self.patrol_radius = radius;
        self.patrol_wait_time = wait_time;
        self
    }

    /// Sets the target collision layer.
    #[must_use]
    pub const fn with_target_layer(mut self, layer: LayerMask) -> Self {
        self.target_layer = layer;
        self
    }

    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.patrol_radius = self.patrol_radius.max(0.0);
        self.patrol_wait_time = self.patrol_wait_time.max(0.0);
        self.arrive_threshold = self.arrive_threshold.clamp(0.01, 10.0);
        self.sight_range = self.sight_range.max(0.0);
        self.field_of_view = self.field_of_view.clamp(0.0, 360.0);
        self.eye_height = self.eye_height.max(0.0);
        self.normal_speed = self.normal_speed.max(0.0);
        self.enraged_speed = self.enraged_speed.max(0.0);
        self.time_to_enrage = self.time_to_enrage.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_tuning() {
        let config = EnemyConfig::default();
        assert_eq!(config.patrol_radius, 10.0);
        assert_eq!(config.patrol_wait_time, 2.0);
        assert_eq!(config.sight_range, 12.0);
        assert_eq!(config.field_of_view, 120.0);
        assert_eq!(config.normal_speed, 3.5);
        assert_eq!(config.enraged_speed, 6.0);
        assert_eq!(config.time_to_enrage, 5.0);
    }

    #[test]
    fn test_builders() {
        let config = EnemyConfig::default()
            .with_sight_range(20.0)
            .with_field_of_view(90.0)
            .with_speeds(2.0, 8.0)
            .with_time_to_enrage(3.0)
            .with_patrol(5.0, 1.0);

        assert_eq!(config.sight_range, 20.0);
        assert_eq!(config.field_of_view, 90.0);
        assert_eq!(config.normal_speed, 2.0);
        assert_eq!(config.enraged_speed, 8.0);
        assert_eq!(config.time_to_enrage, 3.0);
        assert_eq!(config.patrol_radius, 5.0);
        assert_eq!(config.patrol_wait_time, 1.0);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = EnemyConfig::default();
        config.patrol_radius = -4.0;
        config.field_of_view = 720.0;
        config.arrive_threshold = 0.0;
        config.validate();

        assert_eq!(config.patrol_radius, 0.0);
        assert_eq!(config.field_of_view, 360.0);
        assert_eq!(config.arrive_threshold, 0.01);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EnemyConfig::default().with_sight_range(15.0);
        let text = toml::to_string(&config).expect("serialize");
        let back: EnemyConfig = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let back: EnemyConfig = toml::from_str("sight_range = 25.0").expect("deserialize");
        assert_eq!(back.sight_range, 25.0);
        assert_eq!(back.patrol_radius, 10.0);
    }
}
