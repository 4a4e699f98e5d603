//! In-memory host implementing every oracle the scheduler consumes.
//!
//! The sandbox is built from a [`Scenario`] and keeps all of its state behind
//! one `RefCell`, shared with its harvest subsystems. Harvest attempts are
//! resolved on the spot and their outcomes queued until the caller drains
//! them and reports each one back to the scheduler.

mod harvest;
mod oracles;
mod state;

pub use harvest::{HarvestOutcome, HarvestResult, SandboxHarvest};
pub use state::{ActorFlags, Location, SentNotice, unit_weight};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use automation_core::{
    ActorId, Env, FixtureKind, GroundTile, HarvestDefinition, ItemCategory, ItemId, Notice,
    PcgRng, Position, StaticTile, TaskScheduler, TileId, WorldItem,
};

use crate::loaders::{ItemSpec, Scenario};
use state::{ActorRecord, ItemRecord, SandboxState};

/// Scenario-backed host.
#[derive(Debug)]
pub struct Sandbox {
    state: Rc<RefCell<SandboxState>>,
    subsystems: Vec<SandboxHarvest>,
    rng: PcgRng,
}

impl Sandbox {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let mut state = SandboxState::default();

        for &(x, y, id, z, terrain) in &scenario.ground {
            state
                .ground
                .insert(Position::new(x, y), GroundTile::new(TileId(id), z, terrain));
        }
        for &(x, y, id, z, terrain) in &scenario.statics {
            let stack = state.statics.entry(Position::new(x, y)).or_default();
            if stack.try_push(StaticTile::new(TileId(id), z, terrain)).is_err() {
                tracing::warn!(x, y, "static stack full, tile ignored");
            }
        }
        state.blocked_sight = scenario
            .blocked_sight
            .iter()
            .map(|&(x, y)| Position::new(x, y))
            .collect();

        for fixture in &scenario.fixtures {
            let id = state.allocate_id();
            let position = Position::new(fixture.position.0, fixture.position.1);
            state.fixtures.insert(
                id,
                WorldItem {
                    id,
                    position,
                    z: fixture.z,
                    kind: fixture.kind,
                },
            );
        }

        for spec in &scenario.actors {
            let actor = ActorId(spec.id);
            let mut flags = ActorFlags::empty();
            flags.set(ActorFlags::ALIVE, spec.alive);
            flags.set(ActorFlags::BACKPACK, spec.backpack);
            flags.set(ActorFlags::VALID_MAP, spec.valid_map);

            state.actors.insert(
                actor,
                ActorRecord {
                    position: Position::new(spec.position.0, spec.position.1),
                    flags,
                    hunger: spec.hunger,
                    thirst: spec.thirst,
                    base_weight: spec.base_weight,
                    max_weight: spec.max_weight,
                    skills: spec.skills.iter().copied().collect(),
                },
            );

            for (hand, item) in &spec.hands {
                place(&mut state, item, Location::Hand(actor, *hand));
            }
            for item in &spec.pack {
                place(&mut state, item, Location::Pack(actor));
            }
        }

        let state = Rc::new(RefCell::new(state));
        let subsystems = scenario
            .harvest
            .iter()
            .map(|spec| {
                let definitions = spec
                    .tiles
                    .iter()
                    .map(|&(tile, resource, skill)| {
                        (TileId(tile), HarvestDefinition { resource, skill })
                    })
                    .collect::<HashMap<_, _>>();
                SandboxHarvest::new(spec.system, definitions, spec.per_spot, Rc::clone(&state))
            })
            .collect();

        Self {
            state,
            subsystems,
            rng: PcgRng,
        }
    }

    /// Every oracle wired to this sandbox.
    pub fn env(&self) -> Env<'_> {
        Env::with_all(self, self, self, self, self, self)
    }

    /// Removes and returns the queued harvest outcomes, oldest first.
    pub fn drain_harvest_outcomes(&self) -> Vec<HarvestOutcome> {
        std::mem::take(&mut self.state.borrow_mut().outcomes)
    }

    /// Reports every queued outcome to `scheduler`. Returns how many were accepted.
    pub fn settle_harvests(&self, scheduler: &mut TaskScheduler) -> usize {
        self.drain_harvest_outcomes()
            .iter()
            .filter(|outcome| outcome.deliver(scheduler, self.env()))
            .count()
    }

    /// Removes and returns every notice delivered so far.
    pub fn take_notices(&self) -> Vec<SentNotice> {
        std::mem::take(&mut self.state.borrow_mut().notices)
    }

    pub fn notices_for(&self, actor: ActorId) -> Vec<Notice> {
        self.state
            .borrow()
            .notices
            .iter()
            .filter(|sent| sent.actor == actor)
            .map(|sent| sent.notice.clone())
            .collect()
    }

    pub fn move_actor(&self, actor: ActorId, position: Position) {
        if let Some(record) = self.state.borrow_mut().actors.get_mut(&actor) {
            record.position = position;
        }
    }

    pub fn set_hunger(&self, actor: ActorId, hunger: u32, thirst: u32) {
        if let Some(record) = self.state.borrow_mut().actors.get_mut(&actor) {
            record.hunger = hunger;
            record.thirst = thirst;
        }
    }

    pub fn actor_flags(&self, actor: ActorId) -> ActorFlags {
        self.state
            .borrow()
            .actors
            .get(&actor)
            .map(|record| record.flags)
            .unwrap_or_default()
    }

    /// Total units of `category` in the actor's pack.
    pub fn pack_amount(&self, actor: ActorId, category: ItemCategory) -> u32 {
        self.state
            .borrow()
            .items
            .values()
            .filter(|item| item.location == Location::Pack(actor) && item.category == category)
            .map(|item| item.amount)
            .sum()
    }

    /// Total units of `category` lying on the ground at `position`.
    pub fn ground_amount(&self, position: Position, category: ItemCategory) -> u32 {
        self.state
            .borrow()
            .items
            .values()
            .filter(|item| {
                item.location == Location::Ground(position) && item.category == category
            })
            .map(|item| item.amount)
            .sum()
    }

    /// Uses left on an item, if it still exists and wears out.
    pub fn uses_left(&self, item: ItemId) -> Option<u32> {
        self.state.borrow().items.get(&item).and_then(|item| item.uses)
    }

    /// Deletes an item wherever it is.
    pub fn destroy_item(&self, item: ItemId) -> bool {
        self.state.borrow_mut().items.remove(&item).is_some()
    }

    pub fn fixtures(&self) -> Vec<WorldItem> {
        self.state.borrow().fixtures.values().copied().collect()
    }

    pub fn fixture(&self, id: ItemId) -> Option<WorldItem> {
        self.state.borrow().fixtures.get(&id).copied()
    }

    pub fn remove_fixture(&self, id: ItemId) -> bool {
        self.state.borrow_mut().fixtures.remove(&id).is_some()
    }

    /// Current fill of a flour mill.
    pub fn mill_contents(&self, id: ItemId) -> Option<u32> {
        match self.fixture(id)?.kind {
            FixtureKind::FlourMill { current, .. } => Some(current),
            _ => None,
        }
    }
}

fn place(state: &mut SandboxState, spec: &ItemSpec, location: Location) -> ItemId {
    let id = state.allocate_id();
    state.items.insert(
        id,
        ItemRecord {
            category: spec.category,
            amount: spec.amount,
            uses: spec.uses,
            weight: spec.weight.unwrap_or_else(|| unit_weight(spec.category)),
            location,
        },
    );
    id
}
