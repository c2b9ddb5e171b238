//! Demo arena backing the behavior core's capability traits.
//!
//! A flat navigable disc, a kinematic enemy that walks straight lines
//! toward its ordered destination, sphere occluders for line-of-sight
//! checks, and a target scripted to orbit the arena center. Good enough
//! to drive the full patrol / detect / chase / enrage / calm cycle
//! without an engine.

use glam::Vec3;
use revenant_ai::world::{
    AgentContext, AgentPose, EnemyWorld, NavSurface, PathFollower, RayHit, Raycaster, Target,
};
use revenant_common::{EntityId, LayerMask};

use crate::config::SimConfig;

/// Layer for solid arena geometry.
pub const WORLD_LAYER: LayerMask = LayerMask::layer(0);
/// Layer the target entity lives on.
pub const TARGET_LAYER: LayerMask = LayerMask::layer(3);

/// Kinematic path follower: no planning, just a straight-line walk
/// toward the last ordered destination.
#[derive(Debug)]
pub struct Kinematic {
    position: Vec3,
    forward: Vec3,
    destination: Option<Vec3>,
    speed: f32,
}

impl Kinematic {
    /// Creates a follower at `position`, facing `forward`.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward,
            destination: None,
            speed: 0.0,
        }
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> AgentPose {
        AgentPose::new(self.position, self.forward)
    }

    /// Integrates one timestep of movement.
    pub fn step(&mut self, dt: f32) {
        let destination = match self.destination {
            Some(destination) => destination,
            None => return,
        };
        let to_destination = destination - self.position;
        let distance = to_destination.length();
        if distance < 1e-3 {
            return;
        }
        let step = (self.speed * dt).min(distance);
        let direction = to_destination / distance;
        self.position += direction * step;
        self.forward = direction;
    }
}

impl PathFollower for Kinematic {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| (destination - self.position).length())
    }

    fn has_pending_path(&self) -> bool {
        // Straight-line paths resolve instantly.
        false
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

/// Flat navigable disc of a given radius at y = 0.
#[derive(Debug)]
pub struct DiscSurface {
    radius: f32,
}

impl DiscSurface {
    /// Creates a disc surface.
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl NavSurface for DiscSurface {
    fn sample_nearest(&self, point: Vec3, max_radius: f32) -> Option<Vec3> {
        let mut flat = Vec3::new(point.x, 0.0, point.z);
        let reach = flat.length();
        if reach > self.radius {
            flat *= self.radius / reach;
        }
        ((flat - point).length() <= max_radius).then_some(flat)
    }
}

/// Sphere occluder in the arena.
#[derive(Debug, Clone, Copy)]
struct Occluder {
    id: EntityId,
    center: Vec3,
    radius: f32,
}

/// Collision set for raycasts: the target's body plus the occluders.
///
/// Rays strike the nearest collider; the hit is reported only when that
/// collider's layer is on the query mask, so a blocked target is never
/// reported first.
#[derive(Debug)]
pub struct ColliderSet {
    target_id: EntityId,
    target_position: Vec3,
    target_radius: f32,
    occluders: Vec<Occluder>,
}

impl ColliderSet {
    fn layer_of(&self, entity: EntityId) -> LayerMask {
        if entity == self.target_id {
            TARGET_LAYER
        } else {
            WORLD_LAYER
        }
    }
}

/// Ray/sphere intersection: distance to the nearest crossing, if the ray
/// reaches the sphere travelling forward.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

impl Raycaster for ColliderSet {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;

        let mut nearest: Option<RayHit> = None;
        let mut consider = |entity: EntityId, distance: f32| {
            if distance <= max_distance
                && nearest.map_or(true, |hit| distance < hit.distance)
            {
                nearest = Some(RayHit { entity, distance });
            }
        };

        if let Some(t) = ray_sphere(origin, direction, self.target_position, self.target_radius) {
            consider(self.target_id, t);
        }
        for occluder in &self.occluders {
            if let Some(t) = ray_sphere(origin, direction, occluder.center, occluder.radius) {
                consider(occluder.id, t);
            }
        }

        let hit = nearest?;
        mask.contains(self.layer_of(hit.entity)).then_some(hit)
    }
}

/// Target scripted to orbit the arena center.
#[derive(Debug)]
pub struct OrbitTarget {
    id: EntityId,
    radius: f32,
    angular_speed: f32,
    angle: f32,
}

impl OrbitTarget {
    /// Creates an orbiting target starting at angle zero.
    #[must_use]
    pub fn new(radius: f32, angular_speed: f32) -> Self {
        Self {
            id: EntityId::new(),
            radius,
            angular_speed,
            angle: 0.0,
        }
    }

    /// The target's entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Current world position on the orbit.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            0.0,
            self.angle.sin() * self.radius,
        )
    }

    /// Advances the orbit by one timestep.
    pub fn step(&mut self, dt: f32) {
        self.angle += self.angular_speed * dt;
    }
}

/// The whole demo world.
#[derive(Debug)]
pub struct Arena {
    follower: Kinematic,
    nav: DiscSurface,
    colliders: ColliderSet,
    target: OrbitTarget,
}

impl Arena {
    /// Builds an arena from the simulation config.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        let spawn = Vec3::from_array(config.enemy_spawn);
        // Face the arena center at spawn; a spawn at the exact center
        // just faces +Z.
        let forward = (-spawn).try_normalize().unwrap_or(Vec3::Z);

        let target = OrbitTarget::new(config.target_orbit_radius, config.target_orbit_speed);
        let occluders = config
            .occluders
            .iter()
            .map(|&[x, y, z, radius]| Occluder {
                id: EntityId::new(),
                center: Vec3::new(x, y, z),
                radius,
            })
            .collect();

        Self {
            follower: Kinematic::new(spawn, forward),
            nav: DiscSurface::new(config.arena_radius),
            colliders: ColliderSet {
                target_id: target.id(),
                target_position: target.position(),
                // Standing character approximated by one sphere, fat
                // enough that eye-height rays aimed at the feet connect.
                target_radius: 1.2,
                occluders,
            },
            target,
        }
    }

    /// Current enemy position.
    #[must_use]
    pub fn enemy_position(&self) -> Vec3 {
        self.follower.pose().position
    }

    /// Current target position.
    #[must_use]
    pub fn target_position(&self) -> Vec3 {
        self.target.position()
    }

    /// Advances world motion by one timestep.
    pub fn step(&mut self, dt: f32) {
        self.target.step(dt);
        self.colliders.target_position = self.target.position();
        self.follower.step(dt);
    }
}

impl EnemyWorld for Arena {
    fn agent_context(&mut self, _id: EntityId) -> Option<AgentContext<'_>> {
        Some(AgentContext {
            pose: self.follower.pose(),
            target: Some(Target::new(self.target.id(), self.target.position())),
            follower: &mut self.follower,
            nav: &self.nav,
            ray: &self.colliders,
        })
    }
}
