//! Per-actor automation records and their timer entries.

use std::collections::HashMap;

use crate::error::{AutomationError, ErrorSeverity};
use crate::schedule::TimerWheel;
use crate::state::{ActorId, AutomationState, Tick};

/// Errors raised by registry bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("actor {0} already has an automation record")]
    AlreadyRegistered(ActorId),

    #[error("actor {0} has no automation record")]
    NotRegistered(ActorId),
}

impl AutomationError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::AlreadyRegistered(_) => ErrorSeverity::Validation,
            RegistryError::NotRegistered(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::AlreadyRegistered(_) => "REGISTRY_ALREADY_REGISTERED",
            RegistryError::NotRegistered(_) => "REGISTRY_NOT_REGISTERED",
        }
    }
}

/// Owns every automation record together with the timer wheel, so removing an
/// actor clears both tables in one call.
#[derive(Clone, Debug, Default)]
pub struct AutomationRegistry {
    states: HashMap<ActorId, AutomationState>,
    wheel: TimerWheel,
}

impl AutomationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wheel(wheel: TimerWheel) -> Self {
        Self {
            states: HashMap::new(),
            wheel,
        }
    }

    pub fn start(&mut self, actor: ActorId, state: AutomationState) -> Result<(), RegistryError> {
        if self.states.contains_key(&actor) {
            return Err(RegistryError::AlreadyRegistered(actor));
        }
        self.states.insert(actor, state);
        Ok(())
    }

    pub fn get(&self, actor: ActorId) -> Option<&AutomationState> {
        self.states.get(&actor)
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.states.contains_key(&actor)
    }

    /// Applies `mutator` to the actor's record and returns its result.
    pub fn update<R>(
        &mut self,
        actor: ActorId,
        mutator: impl FnOnce(&mut AutomationState) -> R,
    ) -> Result<R, RegistryError> {
        self.states
            .get_mut(&actor)
            .map(mutator)
            .ok_or(RegistryError::NotRegistered(actor))
    }

    /// Removes the record and the wheel entry. Returns the removed record.
    pub fn stop(&mut self, actor: ActorId) -> Option<AutomationState> {
        self.wheel.cancel(actor);
        self.states.remove(&actor)
    }

    /// Schedules a registered actor. Unregistered actors are never put on the wheel.
    pub fn schedule_at(&mut self, actor: ActorId, delay: i64) -> Result<Tick, RegistryError> {
        if !self.states.contains_key(&actor) {
            return Err(RegistryError::NotRegistered(actor));
        }
        Ok(self.wheel.schedule_at(actor, delay))
    }

    pub fn cancel(&mut self, actor: ActorId) -> Option<Tick> {
        self.wheel.cancel(actor)
    }

    pub fn wheel(&self) -> &TimerWheel {
        &self.wheel
    }

    pub(crate) fn wheel_mut(&mut self) -> &mut TimerWheel {
        &mut self.wheel
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.states.keys().copied()
    }
}
