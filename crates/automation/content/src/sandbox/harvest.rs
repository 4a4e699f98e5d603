use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use automation_core::{
    ActorId, Env, HarvestDefinition, HarvestSubsystem, HarvestSystemId, HarvestTarget, ItemId,
    OracleError, TaskScheduler, TileId,
};

use super::state::SandboxState;

/// How a delegated harvest attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarvestResult {
    /// One unit gathered; the spot still holds more.
    Completed,
    /// The spot is empty.
    Depleted,
    /// The attempt could not be carried out.
    Aborted,
}

/// A harvest outcome waiting to be reported to the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub actor: ActorId,
    pub system: HarvestSystemId,
    pub result: HarvestResult,
}

impl HarvestOutcome {
    /// Reports the outcome through the matching scheduler callback.
    pub fn deliver(&self, scheduler: &mut TaskScheduler, env: Env<'_>) -> bool {
        match self.result {
            HarvestResult::Completed => scheduler.harvest_completed(env, self.actor),
            HarvestResult::Depleted => scheduler.harvest_depleted(env, self.actor),
            HarvestResult::Aborted => scheduler.harvest_aborted(env, self.actor),
        }
    }
}

/// A harvest subsystem that resolves each attempt immediately and queues the
/// outcome, standing in for the host's timed gathering.
#[derive(Debug)]
pub struct SandboxHarvest {
    id: HarvestSystemId,
    definitions: HashMap<TileId, HarvestDefinition>,
    per_spot: u32,
    state: Rc<RefCell<SandboxState>>,
}

impl SandboxHarvest {
    pub(crate) fn new(
        id: HarvestSystemId,
        definitions: HashMap<TileId, HarvestDefinition>,
        per_spot: u32,
        state: Rc<RefCell<SandboxState>>,
    ) -> Self {
        Self {
            id,
            definitions,
            per_spot,
            state,
        }
    }

    fn remaining(&self, state: &SandboxState, target: &HarvestTarget) -> u32 {
        state
            .banks
            .get(&(self.id, target.position))
            .copied()
            .unwrap_or(self.per_spot)
    }

    fn resolve(
        &self,
        state: &mut SandboxState,
        actor: ActorId,
        tool: ItemId,
        target: &HarvestTarget,
    ) -> HarvestResult {
        let Some(definition) = self.definitions.get(&target.tile).copied() else {
            return HarvestResult::Aborted;
        };
        let remaining = self.remaining(state, target);
        if remaining == 0 {
            return HarvestResult::Depleted;
        }

        match state.items.get(&tool) {
            Some(item) if item.uses != Some(0) => {}
            _ => return HarvestResult::Aborted,
        }
        if state.add_to_pack(actor, definition.resource, 1).is_err() {
            return HarvestResult::Aborted;
        }
        if state.spend_use(tool).is_err() {
            return HarvestResult::Aborted;
        }

        let left = remaining - 1;
        state.banks.insert((self.id, target.position), left);
        tracing::trace!(%actor, system = %self.id, position = %target.position, left, "harvested");
        if left == 0 {
            HarvestResult::Depleted
        } else {
            HarvestResult::Completed
        }
    }
}

impl HarvestSubsystem for SandboxHarvest {
    fn id(&self) -> HarvestSystemId {
        self.id
    }

    fn definition(&self, tile: TileId) -> Option<HarvestDefinition> {
        self.definitions.get(&tile).copied()
    }

    fn resources_available(
        &self,
        _actor: ActorId,
        _tool: ItemId,
        _definition: &HarvestDefinition,
        target: &HarvestTarget,
    ) -> bool {
        self.remaining(&self.state.borrow(), target) > 0
    }

    fn begin_attempt(
        &self,
        actor: ActorId,
        tool: ItemId,
        target: &HarvestTarget,
    ) -> Result<(), OracleError> {
        let mut state = self.state.borrow_mut();
        if !state.actors.contains_key(&actor) {
            return Err(OracleError::ActorNotFound(actor));
        }
        let result = self.resolve(&mut state, actor, tool, target);
        state.outcomes.push(HarvestOutcome {
            actor,
            system: self.id,
            result,
        });
        Ok(())
    }
}
