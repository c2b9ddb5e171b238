//! Target perception: sight range, field-of-view cone, line of sight.

use glam::Vec3;

use crate::config::EnemyConfig;
use crate::world::{AgentPose, Raycaster, Target};

/// Result of a single perception query.
///
/// Transient: recomputed every tick, never stored across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// Whether the target passed every gate this tick.
    pub visible: bool,
    /// Euclidean distance to the target.
    pub distance: f32,
    /// Angle between the agent's facing and the target, in degrees.
    pub angle: f32,
}

impl Perception {
    /// A query that saw nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            visible: false,
            distance: f32::INFINITY,
            angle: 180.0,
        }
    }
}

/// Tests whether `target` is within sight range, inside the field-of-view
/// cone, and unobstructed.
///
/// The obstruction ray starts at eye height above the agent position and
/// the target must be its first hit. Pure query, no side effects.
pub fn detect<R: Raycaster + ?Sized>(
    pose: &AgentPose,
    target: &Target,
    config: &EnemyConfig,
    ray: &R,
) -> Perception {
    let to_target = target.position - pose.position;
    let distance = to_target.length();
    if distance >= config.sight_range {
        return Perception {
            visible: false,
            distance,
            angle: 180.0,
        };
    }

    // Degenerate geometry (coincident positions, zero facing) never
    // produces a sighting.
    let direction = match to_target.try_normalize() {
        Some(direction) => direction,
        None => {
            return Perception {
                visible: false,
                distance,
                angle: 0.0,
            }
        }
    };
    let forward = match pose.forward.try_normalize() {
        Some(forward) => forward,
        None => {
            return Perception {
                visible: false,
                distance,
                angle: 180.0,
            }
        }
    };

    let angle = forward.dot(direction).clamp(-1.0, 1.0).acos().to_degrees();
    if angle >= config.field_of_view / 2.0 {
        return Perception {
            visible: false,
            distance,
            angle,
        };
    }

    let eye = pose.position + Vec3::Y * config.eye_height;
    let visible = ray
        .raycast(eye, direction, config.sight_range, config.target_layer)
        .map_or(false, |hit| hit.entity == target.id);

    Perception {
        visible,
        distance,
        angle,
    }
}
