//! Animation and audio cue dispatch.
//!
//! Cues are fire-and-forget feedback: a trigger name handed to whatever
//! animation or audio backend the host runs. They carry no return value
//! and never influence control flow. Controllers always hold a sink; the
//! null implementations stand in when no backend is wired up.

use parking_lot::Mutex;
use std::sync::Arc;

/// Cue names emitted by the controller.
pub mod cue {
    /// Patrol leg started (animation).
    pub const WALK: &str = "Walk";
    /// Chase started (animation).
    pub const RUN: &str = "Run";
    /// Enrage escalation (animation).
    pub const ENRAGED: &str = "Enraged";
    /// Calmed back to patrol (animation and audio).
    pub const CALM: &str = "Calm";
    /// Target spotted (audio).
    pub const ALERT: &str = "Alert";
    /// Enrage sting (audio).
    pub const ENRAGE: &str = "Enrage";
}

/// Animation cue sink.
pub trait AnimationSink {
    /// Fires an animation trigger. Failures are the sink's problem.
    fn trigger(&mut self, cue: &str);
}

/// Audio cue sink.
pub trait AudioSink {
    /// Plays a one-shot sound cue. Failures are the sink's problem.
    fn play(&mut self, cue: &str);
}

/// Sink that drops every animation cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnimationSink;

impl AnimationSink for NullAnimationSink {
    fn trigger(&mut self, _cue: &str) {}
}

/// Sink that drops every audio cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play(&mut self, _cue: &str) {}
}

/// Recording animation sink for tests. Clones share one buffer, so a
/// test can keep a handle after handing the sink to a controller.
#[derive(Debug, Default, Clone)]
pub struct MockAnimationSink {
    triggers: Arc<Mutex<Vec<String>>>,
}

impl MockAnimationSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers received so far, in order.
    #[must_use]
    pub fn triggers(&self) -> Vec<String> {
        self.triggers.lock().clone()
    }
}

impl AnimationSink for MockAnimationSink {
    fn trigger(&mut self, cue: &str) {
        self.triggers.lock().push(cue.to_string());
    }
}

/// Recording audio sink for tests. Clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct MockAudioSink {
    cues: Arc<Mutex<Vec<String>>>,
}

impl MockAudioSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<String> {
        self.cues.lock().clone()
    }
}

impl AudioSink for MockAudioSink {
    fn play(&mut self, cue: &str) {
        self.cues.lock().push(cue.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sinks_swallow_everything() {
        let mut anim = NullAnimationSink;
        let mut audio = NullAudioSink;
        anim.trigger(cue::RUN);
        audio.play(cue::ALERT);
    }

    #[test]
    fn test_mock_sinks_record_in_order() {
        let anim = MockAnimationSink::new();
        let mut handle = anim.clone();
        handle.trigger(cue::WALK);
        handle.trigger(cue::RUN);

        assert_eq!(anim.triggers(), vec![cue::WALK, cue::RUN]);

        let audio = MockAudioSink::new();
        let mut handle = audio.clone();
        handle.play(cue::ALERT);
        assert_eq!(audio.cues(), vec![cue::ALERT]);
    }
}
