//! The per-agent behavior controller.
//!
//! One controller advances one enemy through the patrol / chase / enrage
//! cycle, once per simulation tick. It owns nothing but behavior state:
//! movement, navigation, and collision stay behind the capability traits
//! in [`crate::world`]. The owning loop calls [`EnemyController::tick`]
//! with the frame's `dt`; the calming interaction arrives between ticks
//! through [`EnemyController::receive_calming_item`].

use std::fmt;

use crossbeam_channel::Sender;
use tracing::debug;

use revenant_common::EntityId;

use crate::config::EnemyConfig;
use crate::cues::{cue, AnimationSink, AudioSink, NullAnimationSink, NullAudioSink};
use crate::events::BehaviorEvent;
use crate::patrol;
use crate::perception;
use crate::world::AgentContext;

/// Top-level behavior state.
///
/// Exactly one variant is active at any tick; enrage exists only inside
/// a chase, so the illegal combinations are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    /// Walking random patrol legs, watching for the target.
    Patrol,
    /// Tracking the target's position directly.
    Chase {
        /// Elevated-speed escalation after the enrage fuse burns down.
        enraged: bool,
    },
}

impl BehaviorState {
    /// Whether this state is any form of chase.
    #[must_use]
    pub const fn is_chasing(self) -> bool {
        matches!(self, Self::Chase { .. })
    }
}

/// Per-agent behavior controller.
pub struct EnemyController {
    id: EntityId,
    config: EnemyConfig,
    state: BehaviorState,
    /// Seconds spent chasing; frozen once enraged, reset on exit.
    time_in_chase: f32,
    /// Countdown while idling at a reached patrol point.
    patrol_wait_remaining: f32,
    /// Set when a transition outside a tick left the follower speed
    /// stale; the next tick pushes the corrected value.
    speed_dirty: bool,
    rng: fastrand::Rng,
    anim: Box<dyn AnimationSink>,
    audio: Box<dyn AudioSink>,
    events: Option<Sender<BehaviorEvent>>,
}

impl EnemyController {
    /// Creates a controller in the patrol state.
    #[must_use]
    pub fn new(id: EntityId, config: EnemyConfig) -> Self {
        Self {
            id,
            config,
            state: BehaviorState::Patrol,
            time_in_chase: 0.0,
            patrol_wait_remaining: 0.0,
            speed_dirty: true,
            rng: fastrand::Rng::with_seed(id.raw()),
            anim: Box::new(NullAnimationSink),
            audio: Box::new(NullAudioSink),
            events: None,
        }
    }

    /// Replaces the animation cue sink.
    #[must_use]
    pub fn with_animation(mut self, sink: impl AnimationSink + 'static) -> Self {
        self.anim = Box::new(sink);
        self
    }

    /// Replaces the audio cue sink.
    #[must_use]
    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(sink);
        self
    }

    /// Wires a behavior-event sender.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<BehaviorEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Reseeds patrol-point sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// The agent this controller drives.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Current behavior state.
    #[must_use]
    pub const fn state(&self) -> BehaviorState {
        self.state
    }

    /// Behavior tuning.
    #[must_use]
    pub const fn config(&self) -> &EnemyConfig {
        &self.config
    }

    /// Seconds spent in the current chase.
    #[must_use]
    pub const fn time_in_chase(&self) -> f32 {
        self.time_in_chase
    }

    /// Whether the agent is chasing (enraged or not).
    #[must_use]
    pub const fn is_chasing(&self) -> bool {
        self.state.is_chasing()
    }

    /// Whether the agent is in the enraged chase.
    #[must_use]
    pub const fn is_enraged(&self) -> bool {
        matches!(self.state, BehaviorState::Chase { enraged: true })
    }

    /// Advances the controller by one tick.
    pub fn tick(&mut self, dt: f32, ctx: &mut AgentContext<'_>) {
        if self.speed_dirty {
            ctx.follower.set_speed(self.current_speed());
            self.speed_dirty = false;
        }

        let was_chasing = self.is_chasing();

        // Perception runs only while not chasing; an active chase tracks
        // the target directly and never re-detects.
        if !was_chasing {
            if let Some(target) = ctx.target {
                let seen = perception::detect(&ctx.pose, &target, &self.config, ctx.ray);
                if seen.visible {
                    self.enter_chase(target.id, ctx);
                }
            }
        }

        match self.state {
            BehaviorState::Patrol => self.tick_patrol(dt, ctx),
            BehaviorState::Chase { enraged } => {
                if let Some(target) = ctx.target {
                    ctx.follower.set_destination(target.position);
                }
                // The detection tick never accumulates chase time, so a
                // single tick cannot detect and enrage together.
                if was_chasing && !enraged {
                    self.time_in_chase += dt;
                    if self.time_in_chase >= self.config.time_to_enrage {
                        self.become_enraged(ctx);
                    }
                }
            }
        }
    }

    /// Hands the calming item to the enemy.
    ///
    /// No-op unless currently chasing; otherwise forces the return to
    /// patrol. Safe to call between ticks: only flags and timers change
    /// here, and the next tick issues the corrected motion commands.
    /// Returns whether the agent was chasing.
    pub fn receive_calming_item(&mut self) -> bool {
        let enraged = match self.state {
            BehaviorState::Chase { enraged } => enraged,
            BehaviorState::Patrol => return false,
        };

        self.state = BehaviorState::Patrol;
        self.time_in_chase = 0.0;
        self.patrol_wait_remaining = 0.0;
        self.speed_dirty = true;
        self.anim.trigger(cue::CALM);
        self.audio.play(cue::CALM);
        self.publish(BehaviorEvent::CalmedDown {
            agent: self.id,
            was_enraged: enraged,
        });
        debug!(
            agent = self.id.raw(),
            was_enraged = enraged,
            "calming item received, returning to patrol"
        );
        true
    }

    fn tick_patrol(&mut self, dt: f32, ctx: &mut AgentContext<'_>) {
        if self.patrol_wait_remaining > 0.0 {
            self.patrol_wait_remaining -= dt;
            if self.patrol_wait_remaining > 0.0 {
                return;
            }
            self.patrol_wait_remaining = 0.0;
            self.issue_patrol_leg(ctx);
            return;
        }

        let arrived = !ctx.follower.has_pending_path()
            && ctx.follower.remaining_distance() < self.config.arrive_threshold;
        if arrived {
            if self.config.patrol_wait_time > 0.0 {
                self.patrol_wait_remaining = self.config.patrol_wait_time;
            } else {
                self.issue_patrol_leg(ctx);
            }
        }
    }

    fn issue_patrol_leg(&mut self, ctx: &mut AgentContext<'_>) {
        let point = patrol::next_patrol_point(
            &mut self.rng,
            ctx.pose.position,
            self.config.patrol_radius,
            ctx.nav,
        );
        ctx.follower.set_destination(point);
        self.anim.trigger(cue::WALK);
        self.publish(BehaviorEvent::PatrolPointChosen {
            agent: self.id,
            destination: point.to_array(),
        });
        debug!(
            agent = self.id.raw(),
            x = point.x,
            y = point.y,
            z = point.z,
            "patrol point chosen"
        );
    }

    fn enter_chase(&mut self, target_id: EntityId, ctx: &mut AgentContext<'_>) {
        self.state = BehaviorState::Chase { enraged: false };
        self.time_in_chase = 0.0;
        self.patrol_wait_remaining = 0.0;
        ctx.follower.set_speed(self.config.normal_speed);
        self.anim.trigger(cue::RUN);
        self.audio.play(cue::ALERT);
        self.publish(BehaviorEvent::TargetDetected {
            agent: self.id,
            target: target_id,
        });
        debug!(
            agent = self.id.raw(),
            target = target_id.raw(),
            "target detected, chasing"
        );
    }

    fn become_enraged(&mut self, ctx: &mut AgentContext<'_>) {
        self.state = BehaviorState::Chase { enraged: true };
        ctx.follower.set_speed(self.config.enraged_speed);
        self.anim.trigger(cue::ENRAGED);
        self.audio.play(cue::ENRAGE);
        self.publish(BehaviorEvent::EnrageTriggered { agent: self.id });
        debug!(agent = self.id.raw(), "enraged, speed raised");
    }

    const fn current_speed(&self) -> f32 {
        match self.state {
            BehaviorState::Chase { enraged: true } => self.config.enraged_speed,
            _ => self.config.normal_speed,
        }
    }

    fn publish(&self, event: BehaviorEvent) {
        if let Some(sender) = &self.events {
            // Non-blocking send - if full, event is dropped
            let _ = sender.try_send(event);
        }
    }
}

impl fmt::Debug for EnemyController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("time_in_chase", &self.time_in_chase)
            .field("patrol_wait_remaining", &self.patrol_wait_remaining)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::{MockAnimationSink, MockAudioSink};
    use crate::events::EventBus;
    use crate::world::{
        AgentContext, AgentPose, MockNavSurface, MockPathFollower, MockRaycaster, Target,
    };
    use glam::Vec3;

    const TARGET: EntityId = EntityId::from_raw(99);
    const WALL: EntityId = EntityId::from_raw(7);

    fn controller() -> EnemyController {
        EnemyController::new(EntityId::from_raw(1), EnemyConfig::default())
    }

    fn visible_target() -> (Option<Target>, MockRaycaster) {
        // Origin agent facing +Z; target 5 units ahead, ray unobstructed.
        let target = Target::new(TARGET, Vec3::new(0.0, 0.0, 5.0));
        (Some(target), MockRaycaster::hitting(TARGET, 5.0))
    }

    fn tick(
        controller: &mut EnemyController,
        dt: f32,
        target: Option<Target>,
        follower: &mut MockPathFollower,
        ray: &MockRaycaster,
    ) {
        let nav = MockNavSurface::new();
        let mut ctx = AgentContext {
            pose: AgentPose::default(),
            target,
            follower,
            nav: &nav,
            ray,
        };
        controller.tick(dt, &mut ctx);
    }

    #[test]
    fn test_starts_patrolling() {
        let enemy = controller();
        assert_eq!(enemy.state(), BehaviorState::Patrol);
        assert!(!enemy.is_chasing());
        assert!(!enemy.is_enraged());
    }

    #[test]
    fn test_first_tick_pushes_normal_speed() {
        let mut enemy = controller();
        let mut follower = MockPathFollower::at_distance(10.0);
        tick(&mut enemy, 0.1, None, &mut follower, &MockRaycaster::missing());
        assert_eq!(follower.speed, Some(3.5));
    }

    #[test]
    fn test_detection_enters_chase_with_zero_timer() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();

        tick(&mut enemy, 1.0, target, &mut follower, &ray);

        assert_eq!(enemy.state(), BehaviorState::Chase { enraged: false });
        assert_eq!(enemy.time_in_chase(), 0.0);
    }

    #[test]
    fn test_obstructed_target_keeps_patrolling() {
        let mut enemy = controller();
        let target = Target::new(TARGET, Vec3::new(0.0, 0.0, 5.0));
        let ray = MockRaycaster::hitting(WALL, 2.0);
        let mut follower = MockPathFollower::at_distance(10.0);

        tick(&mut enemy, 1.0, Some(target), &mut follower, &ray);

        assert_eq!(enemy.state(), BehaviorState::Patrol);
    }

    #[test]
    fn test_missing_target_is_not_an_error() {
        let mut enemy = controller();
        let mut follower = MockPathFollower::at_distance(10.0);
        tick(&mut enemy, 1.0, None, &mut follower, &MockRaycaster::missing());
        assert_eq!(enemy.state(), BehaviorState::Patrol);
    }

    #[test]
    fn test_chase_tracks_target_every_tick() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);

        let moved = Target::new(TARGET, Vec3::new(3.0, 0.0, 8.0));
        tick(&mut enemy, 1.0, Some(moved), &mut follower, &ray);

        assert_eq!(follower.destination, Some(Vec3::new(3.0, 0.0, 8.0)));
    }

    #[test]
    fn test_enrage_fires_when_fuse_first_reached() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);

        // Four seconds in: still a normal chase.
        for _ in 0..4 {
            tick(&mut enemy, 1.0, target, &mut follower, &ray);
        }
        assert_eq!(enemy.state(), BehaviorState::Chase { enraged: false });
        assert_eq!(enemy.time_in_chase(), 4.0);

        // Fifth second reaches the fuse.
        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        assert!(enemy.is_enraged());
        assert_eq!(follower.speed, Some(6.0));
    }

    #[test]
    fn test_chase_timer_frozen_after_enrage() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        for _ in 0..5 {
            tick(&mut enemy, 1.0, target, &mut follower, &ray);
        }
        assert!(enemy.is_enraged());
        assert_eq!(enemy.time_in_chase(), 5.0);

        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        assert_eq!(enemy.time_in_chase(), 5.0);
    }

    #[test]
    fn test_detection_tick_cannot_also_enrage() {
        // A dt larger than the whole fuse on the detection tick must not
        // escalate; the fuse starts burning the following tick.
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();

        tick(&mut enemy, 30.0, target, &mut follower, &ray);
        assert_eq!(enemy.state(), BehaviorState::Chase { enraged: false });

        tick(&mut enemy, 30.0, target, &mut follower, &ray);
        assert!(enemy.is_enraged());
    }

    #[test]
    fn test_calm_returns_to_patrol_and_resets_speed_next_tick() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);

        assert!(enemy.receive_calming_item());
        assert_eq!(enemy.state(), BehaviorState::Patrol);
        assert_eq!(enemy.time_in_chase(), 0.0);

        follower.speed = None;
        follower.remaining = 10.0;
        tick(&mut enemy, 1.0, None, &mut follower, &MockRaycaster::missing());
        assert_eq!(follower.speed, Some(3.5));
    }

    #[test]
    fn test_calm_while_enraged_clears_enrage() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        for _ in 0..5 {
            tick(&mut enemy, 1.0, target, &mut follower, &ray);
        }
        assert!(enemy.is_enraged());

        assert!(enemy.receive_calming_item());
        assert_eq!(enemy.state(), BehaviorState::Patrol);
        assert!(!enemy.is_enraged());
        assert_eq!(enemy.time_in_chase(), 0.0);
    }

    #[test]
    fn test_calm_while_patrolling_is_noop() {
        let anim = MockAnimationSink::new();
        let mut enemy = controller().with_animation(anim.clone());

        assert!(!enemy.receive_calming_item());
        assert_eq!(enemy.state(), BehaviorState::Patrol);
        assert!(anim.triggers().is_empty());
    }

    #[test]
    fn test_patrol_waits_then_issues_new_leg() {
        let mut enemy = controller();
        let mut follower = MockPathFollower::new();
        let ray = MockRaycaster::missing();

        // Arrival (remaining 0) arms the 2 s wait; no destination yet.
        tick(&mut enemy, 0.5, None, &mut follower, &ray);
        assert!(follower.destination.is_none());

        // Countdown runs; still waiting after 1.5 s.
        tick(&mut enemy, 1.5, None, &mut follower, &ray);
        assert!(follower.destination.is_none());

        // Wait expires: a patrol destination goes out.
        tick(&mut enemy, 0.6, None, &mut follower, &ray);
        let destination = follower.destination.expect("patrol leg issued");
        assert!(destination.length() <= 10.0 + 1e-3);
    }

    #[test]
    fn test_no_new_leg_while_en_route() {
        let mut enemy = controller();
        let mut follower = MockPathFollower::at_distance(6.0);
        let ray = MockRaycaster::missing();

        for _ in 0..10 {
            tick(&mut enemy, 1.0, None, &mut follower, &ray);
        }
        assert!(follower.destination.is_none());
    }

    #[test]
    fn test_no_new_leg_while_path_pending() {
        let mut enemy = controller();
        let mut follower = MockPathFollower::new();
        follower.pending = true;
        let ray = MockRaycaster::missing();

        for _ in 0..10 {
            tick(&mut enemy, 1.0, None, &mut follower, &ray);
        }
        assert!(follower.destination.is_none());
    }

    #[test]
    fn test_zero_wait_time_issues_immediately() {
        let config = EnemyConfig::default().with_patrol(10.0, 0.0);
        let mut enemy = EnemyController::new(EntityId::from_raw(1), config);
        let mut follower = MockPathFollower::new();
        let ray = MockRaycaster::missing();

        tick(&mut enemy, 0.1, None, &mut follower, &ray);
        assert!(follower.destination.is_some());
    }

    #[test]
    fn test_detection_interrupts_patrol_wait() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();

        // Arm the wait with no target around.
        tick(&mut enemy, 0.5, None, &mut follower, &MockRaycaster::missing());
        // Target shows up mid-wait.
        tick(&mut enemy, 0.5, target, &mut follower, &ray);
        assert!(enemy.is_chasing());
    }

    #[test]
    fn test_cue_sequence_across_the_cycle() {
        let anim = MockAnimationSink::new();
        let audio = MockAudioSink::new();
        let mut enemy = controller()
            .with_animation(anim.clone())
            .with_audio(audio.clone());

        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        for _ in 0..5 {
            tick(&mut enemy, 1.0, target, &mut follower, &ray);
        }
        enemy.receive_calming_item();

        assert_eq!(anim.triggers(), vec![cue::RUN, cue::ENRAGED, cue::CALM]);
        assert_eq!(audio.cues(), vec![cue::ALERT, cue::ENRAGE, cue::CALM]);
    }

    #[test]
    fn test_events_published_in_order() {
        let bus = EventBus::default();
        let mut enemy = controller().with_events(bus.sender());

        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);
        for _ in 0..5 {
            tick(&mut enemy, 1.0, target, &mut follower, &ray);
        }
        enemy.receive_calming_item();

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                BehaviorEvent::TargetDetected {
                    agent: enemy.id(),
                    target: TARGET,
                },
                BehaviorEvent::EnrageTriggered { agent: enemy.id() },
                BehaviorEvent::CalmedDown {
                    agent: enemy.id(),
                    was_enraged: true,
                },
            ]
        );
    }

    #[test]
    fn test_losing_sight_does_not_end_chase() {
        let mut enemy = controller();
        let (target, ray) = visible_target();
        let mut follower = MockPathFollower::new();
        tick(&mut enemy, 1.0, target, &mut follower, &ray);

        // Target walks far out of sight range; chase is sticky.
        let gone = Target::new(TARGET, Vec3::new(0.0, 0.0, 500.0));
        for _ in 0..20 {
            tick(&mut enemy, 1.0, Some(gone), &mut follower, &MockRaycaster::missing());
        }
        assert!(enemy.is_chasing());
    }
}
