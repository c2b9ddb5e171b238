//! Roster of live enemy agents.
//!
//! Owns every [`EnemyController`] in an encounter, advances them as a
//! group against a host-provided [`EnemyWorld`], and routes the calming
//! interaction by agent id.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use revenant_common::EntityId;

use crate::config::EnemyConfig;
use crate::controller::EnemyController;
use crate::events::{BehaviorEvent, EventBus};
use crate::world::EnemyWorld;

/// Error types for roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Agent not found
    #[error("agent not found: {0:?}")]
    NotFound(EntityId),
    /// Agent already registered
    #[error("agent already registered: {0:?}")]
    AlreadyRegistered(EntityId),
}

/// Result type for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Owns and advances every live enemy controller.
#[derive(Debug)]
pub struct EnemyRoster {
    /// All live controllers
    agents: HashMap<EntityId, EnemyController>,
    /// Shared behavior event bus
    events: EventBus,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
            events: EventBus::default(),
        }
    }

    /// Returns the number of live agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns whether there are no live agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Gets an agent's controller.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EnemyController> {
        self.agents.get(&id)
    }

    /// Gets mutable access to an agent's controller.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EnemyController> {
        self.agents.get_mut(&id)
    }

    /// Returns an iterator over all agents.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EnemyController)> {
        self.agents.iter().map(|(&id, controller)| (id, controller))
    }

    /// Spawns a new agent with a fresh id, wired to the roster's event
    /// bus.
    pub fn spawn(&mut self, config: EnemyConfig) -> EntityId {
        let id = EntityId::new();
        let controller = EnemyController::new(id, config).with_events(self.events.sender());
        self.agents.insert(id, controller);
        info!(agent = id.raw(), "enemy spawned");
        id
    }

    /// Registers a controller for an existing entity.
    pub fn register(&mut self, id: EntityId, config: EnemyConfig) -> RosterResult<()> {
        if self.agents.contains_key(&id) {
            return Err(RosterError::AlreadyRegistered(id));
        }
        let controller = EnemyController::new(id, config).with_events(self.events.sender());
        self.agents.insert(id, controller);
        info!(agent = id.raw(), "enemy registered");
        Ok(())
    }

    /// Removes an agent, returning its controller.
    pub fn despawn(&mut self, id: EntityId) -> RosterResult<EnemyController> {
        let controller = self.agents.remove(&id).ok_or(RosterError::NotFound(id))?;
        info!(agent = id.raw(), "enemy despawned");
        Ok(controller)
    }

    /// Routes the calming item to one agent.
    ///
    /// Returns `Ok(true)` when the agent was chasing and calmed down,
    /// `Ok(false)` when it was already patrolling.
    pub fn calm(&mut self, id: EntityId) -> RosterResult<bool> {
        let controller = self.agents.get_mut(&id).ok_or(RosterError::NotFound(id))?;
        Ok(controller.receive_calming_item())
    }

    /// Advances every agent by one tick.
    ///
    /// Agents the host cannot build a context for are skipped this tick.
    pub fn update<W: EnemyWorld + ?Sized>(&mut self, dt: f32, world: &mut W) {
        for (&id, controller) in &mut self.agents {
            if let Some(mut ctx) = world.agent_context(id) {
                controller.tick(dt, &mut ctx);
            }
        }
    }

    /// Drains behavior events published since the last call.
    pub fn drain_events(&self) -> Vec<BehaviorEvent> {
        self.events.drain()
    }
}
