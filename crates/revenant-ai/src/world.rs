//! Capability traits the behavior core consumes.
//!
//! The controller never talks to an engine directly. Path following,
//! navigable-surface sampling, and obstruction raycasts are reached
//! through the narrow traits in this module; hosts implement them over
//! whatever navigation and physics stack they run. Mock implementations
//! for tests live at the bottom of the file.

use glam::Vec3;
use revenant_common::{EntityId, LayerMask};

/// Agent transform data, read from the host each tick and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    /// World position of the agent.
    pub position: Vec3,
    /// Facing direction. Need not be normalized.
    pub forward: Vec3,
}

impl AgentPose {
    /// Creates a pose from position and facing.
    #[must_use]
    pub const fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

impl Default for AgentPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

/// The tracked entity an agent may perceive and chase.
///
/// Read-only from the controller's perspective; the host owns the entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Identity of the tracked entity.
    pub id: EntityId,
    /// Current world position.
    pub position: Vec3,
}

impl Target {
    /// Creates a target view.
    #[must_use]
    pub const fn new(id: EntityId, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// A single raycast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity the ray struck first.
    pub entity: EntityId,
    /// Distance from the ray origin to the hit.
    pub distance: f32,
}

/// External path-following capability (navigation agent).
pub trait PathFollower {
    /// Orders the follower toward a new destination.
    fn set_destination(&mut self, destination: Vec3);
    /// Remaining distance along the current path.
    fn remaining_distance(&self) -> f32;
    /// Whether a path request is still being computed.
    fn has_pending_path(&self) -> bool;
    /// Sets the movement speed.
    fn set_speed(&mut self, speed: f32);
}

/// Query for the navigable subset of world geometry.
pub trait NavSurface {
    /// Returns the nearest navigable position within `max_radius` of
    /// `point`, or `None` when no navigable geometry is in range.
    fn sample_nearest(&self, point: Vec3, max_radius: f32) -> Option<Vec3>;
}

/// Obstruction test against world collision geometry.
pub trait Raycaster {
    /// Casts a ray and reports the first hit.
    ///
    /// How `mask` filters candidate geometry is host-defined; the
    /// behavior core only requires that a blocked target is never
    /// reported as the first hit.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Everything a controller needs from the host for one tick.
pub struct AgentContext<'a> {
    /// Agent transform this tick.
    pub pose: AgentPose,
    /// Tracked target, if any is registered.
    pub target: Option<Target>,
    /// Path-following capability for this agent.
    pub follower: &'a mut dyn PathFollower,
    /// Navigable-surface query.
    pub nav: &'a dyn NavSurface,
    /// Obstruction raycaster.
    pub ray: &'a dyn Raycaster,
}

/// Host-side view used to advance a whole roster of agents.
pub trait EnemyWorld {
    /// Builds the tick context for one agent. Returning `None` skips the
    /// agent this tick (e.g. not yet placed in the world).
    fn agent_context(&mut self, id: EntityId) -> Option<AgentContext<'_>>;
}

/// Mock path follower for testing; records commands instead of moving.
#[derive(Debug, Default)]
pub struct MockPathFollower {
    /// Last destination ordered.
    pub destination: Option<Vec3>,
    /// Every destination ordered, in order.
    pub destinations: Vec<Vec3>,
    /// Last speed set.
    pub speed: Option<f32>,
    /// Value reported by `remaining_distance`.
    pub remaining: f32,
    /// Value reported by `has_pending_path`.
    pub pending: bool,
}

impl MockPathFollower {
    /// Creates a new mock follower.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock follower reporting the given remaining distance.
    #[must_use]
    pub fn at_distance(remaining: f32) -> Self {
        Self {
            remaining,
            ..Self::default()
        }
    }
}

impl PathFollower for MockPathFollower {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        self.destinations.push(destination);
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn has_pending_path(&self) -> bool {
        self.pending
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = Some(speed);
    }
}

/// Mock navigable surface for testing.
#[derive(Debug, Default)]
pub struct MockNavSurface {
    /// When true, every sample fails.
    pub unreachable: bool,
    /// Offset applied to snapped points (simulates projection).
    pub snap_offset: Vec3,
}

impl MockNavSurface {
    /// Creates a surface that returns every point unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface with no navigable geometry anywhere.
    #[must_use]
    pub fn nowhere() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }
}

impl NavSurface for MockNavSurface {
    fn sample_nearest(&self, point: Vec3, _max_radius: f32) -> Option<Vec3> {
        if self.unreachable {
            None
        } else {
            Some(point + self.snap_offset)
        }
    }
}

/// Mock raycaster returning a preconfigured hit for every cast.
#[derive(Debug, Default)]
pub struct MockRaycaster {
    /// Hit returned for every cast, regardless of geometry.
    pub hit: Option<RayHit>,
}

impl MockRaycaster {
    /// Creates a raycaster whose rays always strike `entity` first.
    #[must_use]
    pub fn hitting(entity: EntityId, distance: f32) -> Self {
        Self {
            hit: Some(RayHit { entity, distance }),
        }
    }

    /// Creates a raycaster whose rays never hit anything.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }
}

impl Raycaster for MockRaycaster {
    fn raycast(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<RayHit> {
        self.hit
    }
}

/// Mock host backing one shared context for every agent.
#[derive(Debug, Default)]
pub struct MockEnemyWorld {
    /// Pose reported for every agent.
    pub pose: AgentPose,
    /// Target reported for every agent.
    pub target: Option<Target>,
    /// Shared path follower.
    pub follower: MockPathFollower,
    /// Shared navigable surface.
    pub nav: MockNavSurface,
    /// Shared raycaster.
    pub ray: MockRaycaster,
}

impl MockEnemyWorld {
    /// Creates a mock host with no target and rays that miss.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnemyWorld for MockEnemyWorld {
    fn agent_context(&mut self, _id: EntityId) -> Option<AgentContext<'_>> {
        Some(AgentContext {
            pose: self.pose,
            target: self.target,
            follower: &mut self.follower,
            nav: &self.nav,
            ray: &self.ray,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_follower_records_commands() {
        let mut follower = MockPathFollower::new();
        follower.set_destination(Vec3::new(1.0, 0.0, 2.0));
        follower.set_destination(Vec3::new(3.0, 0.0, 4.0));
        follower.set_speed(3.5);

        assert_eq!(follower.destination, Some(Vec3::new(3.0, 0.0, 4.0)));
        assert_eq!(follower.destinations.len(), 2);
        assert_eq!(follower.speed, Some(3.5));
    }

    #[test]
    fn test_mock_nav_surface_snap() {
        let nav = MockNavSurface {
            snap_offset: Vec3::new(0.0, -1.0, 0.0),
            ..MockNavSurface::default()
        };
        let snapped = nav.sample_nearest(Vec3::new(2.0, 1.0, 2.0), 5.0);
        assert_eq!(snapped, Some(Vec3::new(2.0, 0.0, 2.0)));
    }

    #[test]
    fn test_mock_nav_surface_nowhere() {
        let nav = MockNavSurface::nowhere();
        assert_eq!(nav.sample_nearest(Vec3::ZERO, 100.0), None);
    }

    #[test]
    fn test_mock_raycaster() {
        let target = EntityId::new();
        let ray = MockRaycaster::hitting(target, 4.0);
        let hit = ray
            .raycast(Vec3::ZERO, Vec3::Z, 12.0, LayerMask::ALL)
            .expect("configured hit");
        assert_eq!(hit.entity, target);

        assert!(MockRaycaster::missing()
            .raycast(Vec3::ZERO, Vec3::Z, 12.0, LayerMask::ALL)
            .is_none());
    }
}
