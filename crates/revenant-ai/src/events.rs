//! Behavior event bus.
//!
//! Controllers publish their state transitions so other systems (music
//! direction, scoring, encounter pacing) can react without reaching into
//! agent state.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use revenant_common::EntityId;

/// Behavior transitions broadcast by controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorEvent {
    /// Agent spotted its target and started chasing.
    TargetDetected {
        /// Agent that detected.
        agent: EntityId,
        /// Entity that was spotted.
        target: EntityId,
    },
    /// Agent escalated to the enraged chase.
    EnrageTriggered {
        /// Agent that enraged.
        agent: EntityId,
    },
    /// Agent received the calming item and returned to patrol.
    CalmedDown {
        /// Agent that calmed.
        agent: EntityId,
        /// Whether it was enraged when calmed.
        was_enraged: bool,
    },
    /// Agent picked a new patrol destination.
    PatrolPointChosen {
        /// Agent that picked.
        agent: EntityId,
        /// Chosen destination.
        destination: [f32; 3],
    },
}

/// Event bus for broadcasting behavior events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<BehaviorEvent>,
    /// Receiver for collecting events
    receiver: Receiver<BehaviorEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: BehaviorEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<BehaviorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<BehaviorEvent> {
        self.sender.clone()
    }
}
