//! # Revenant AI
//!
//! Engine-agnostic enemy behavior core.
//!
//! This crate provides the per-agent behavior cycle:
//! - Perception (sight range, field-of-view cone, line of sight)
//! - The patrol / chase / enrage state machine
//! - Patrol destination sampling on a navigable surface
//! - Fire-and-forget animation and audio cues
//! - A behavior event bus and a roster for whole-encounter updates
//!
//! An owning simulation loop drives everything with explicit `tick(dt)`
//! calls and implements the capability traits in [`world`]; nothing in
//! here touches an engine directly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod controller;
pub mod cues;
pub mod events;
pub mod patrol;
pub mod perception;
pub mod roster;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::cues::*;
    pub use crate::events::*;
    pub use crate::patrol::*;
    pub use crate::perception::*;
    pub use crate::roster::*;
    pub use crate::world::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use revenant_common::EntityId;

    #[test]
    fn test_full_behavior_cycle() {
        let target_id = EntityId::from_raw(99);
        let mut roster = EnemyRoster::new();
        let enemy = roster.spawn(EnemyConfig::default().with_time_to_enrage(2.0));

        let mut world = MockEnemyWorld::new();
        world.target = Some(Target::new(target_id, Vec3::new(0.0, 0.0, 5.0)));
        world.ray = MockRaycaster::hitting(target_id, 5.0);

        // Detection tick, then two seconds of chase burn the fuse.
        roster.update(1.0, &mut world);
        roster.update(1.0, &mut world);
        roster.update(1.0, &mut world);
        assert!(roster.get(enemy).expect("agent").is_enraged());

        // The calming item always wins.
        assert!(roster.calm(enemy).expect("agent"));
        assert!(!roster.get(enemy).expect("agent").is_chasing());

        let events = roster.drain_events();
        assert!(matches!(events[0], BehaviorEvent::TargetDetected { .. }));
        assert!(matches!(events[1], BehaviorEvent::EnrageTriggered { .. }));
        assert!(matches!(
            events[2],
            BehaviorEvent::CalmedDown {
                was_enraged: true,
                ..
            }
        ));
    }

    #[test]
    fn test_perception_feeds_the_state_machine() {
        let config = EnemyConfig::default();
        let target = Target::new(EntityId::from_raw(5), Vec3::new(0.0, 0.0, 6.0));
        let pose = AgentPose::new(Vec3::ZERO, Vec3::Z);
        let ray = MockRaycaster::hitting(target.id, 6.0);

        let seen = detect(&pose, &target, &config, &ray);
        assert!(seen.visible);

        let mut controller = EnemyController::new(EntityId::from_raw(1), config);
        let mut follower = MockPathFollower::new();
        let nav = MockNavSurface::new();
        let mut ctx = AgentContext {
            pose,
            target: Some(target),
            follower: &mut follower,
            nav: &nav,
            ray: &ray,
        };
        controller.tick(0.016, &mut ctx);
        assert!(controller.is_chasing());
    }
}
