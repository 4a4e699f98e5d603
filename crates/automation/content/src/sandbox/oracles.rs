use automation_core::{
    ActorId, ActorOracle, FixtureKind, GroundTile, Hand, HarvestOracle, HarvestSubsystem,
    HarvestSystemId, InventoryError, InventoryOracle, ItemCategory, ItemId, ItemInfo, Notice,
    NoticeSeverity, NotificationSink, OracleError, Position, RngOracle, Skill, StaticTiles,
    Vitals, WorldItem, WorldOracle,
};

use super::Sandbox;
use super::state::{ActorFlags, Location, NOURISHMENT, SentNotice, VITAL_MAX};

impl WorldOracle for Sandbox {
    fn ground_tile(&self, position: Position) -> Option<GroundTile> {
        Some(self.state.borrow().ground_tile(position))
    }

    fn static_tiles(&self, position: Position) -> StaticTiles {
        self.state
            .borrow()
            .statics
            .get(&position)
            .cloned()
            .unwrap_or_default()
    }

    fn line_of_sight(&self, _actor: ActorId, position: Position, _z: i8) -> bool {
        !self.state.borrow().blocked_sight.contains(&position)
    }

    fn items_in_range(&self, center: Position, radius: u32) -> Vec<WorldItem> {
        let state = self.state.borrow();
        let fixtures = state.fixtures.values().copied();
        let stacks = state.items.iter().filter_map(|(id, item)| match item.location {
            Location::Ground(position) => Some(WorldItem {
                id: *id,
                position,
                z: state.ground_tile(position).z,
                kind: FixtureKind::Other,
            }),
            _ => None,
        });

        let mut found: Vec<_> = fixtures
            .chain(stacks)
            .filter(|item| center.grid_distance(item.position) <= radius)
            .collect();
        found.sort_by_key(|item| item.id);
        found
    }

    fn world_item(&self, id: ItemId) -> Option<WorldItem> {
        let state = self.state.borrow();
        if let Some(fixture) = state.fixtures.get(&id) {
            return Some(*fixture);
        }
        match state.items.get(&id)?.location {
            Location::Ground(position) => Some(WorldItem {
                id,
                position,
                z: state.ground_tile(position).z,
                kind: FixtureKind::Other,
            }),
            _ => None,
        }
    }

    fn carve_corpse(
        &self,
        actor: ActorId,
        corpse: ItemId,
        knife: ItemId,
    ) -> Result<(), OracleError> {
        let mut state = self.state.borrow_mut();
        if !state.items.contains_key(&knife) {
            return Err(OracleError::FixtureRejected {
                item: corpse,
                reason: "knife is gone",
            });
        }
        let fixture = state
            .fixtures
            .get_mut(&corpse)
            .ok_or(OracleError::WorldItemNotFound(corpse))?;
        match &mut fixture.kind {
            FixtureKind::Corpse { carved, .. } if !*carved => *carved = true,
            _ => {
                return Err(OracleError::FixtureRejected {
                    item: corpse,
                    reason: "not an uncarved corpse",
                });
            }
        }
        tracing::trace!(%actor, %corpse, "corpse carved");
        Ok(())
    }

    fn cut_hides(&self, actor: ActorId, corpse: ItemId) -> Result<bool, OracleError> {
        let mut state = self.state.borrow_mut();
        let fixture = state
            .fixtures
            .get_mut(&corpse)
            .ok_or(OracleError::WorldItemNotFound(corpse))?;
        let FixtureKind::Corpse {
            carved: true,
            has_hides,
        } = &mut fixture.kind
        else {
            return Ok(false);
        };
        if !*has_hides {
            return Ok(false);
        }
        *has_hides = false;

        state
            .add_to_pack(actor, ItemCategory::Leather, 1)
            .map_err(|_| OracleError::ActorNotFound(actor))?;
        Ok(true)
    }

    fn fill_mill(&self, _actor: ActorId, mill: ItemId, amount: u32) -> Result<(), OracleError> {
        let mut state = self.state.borrow_mut();
        let fixture = state
            .fixtures
            .get_mut(&mill)
            .ok_or(OracleError::WorldItemNotFound(mill))?;
        match &mut fixture.kind {
            FixtureKind::FlourMill { current, capacity } if *current + amount <= *capacity => {
                *current += amount;
                Ok(())
            }
            _ => Err(OracleError::FixtureRejected {
                item: mill,
                reason: "mill cannot take that much wheat",
            }),
        }
    }
}

impl ActorOracle for Sandbox {
    fn position(&self, actor: ActorId) -> Option<Position> {
        self.state.borrow().actors.get(&actor).map(|record| record.position)
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.actor_flags(actor).contains(ActorFlags::ALIVE)
    }

    fn has_backpack(&self, actor: ActorId) -> bool {
        self.actor_flags(actor).contains(ActorFlags::BACKPACK)
    }

    fn in_valid_map(&self, actor: ActorId) -> bool {
        self.actor_flags(actor).contains(ActorFlags::VALID_MAP)
    }

    fn is_automating(&self, actor: ActorId) -> bool {
        self.actor_flags(actor).contains(ActorFlags::AUTOMATING)
    }

    fn set_automating(&self, actor: ActorId, automating: bool) {
        if let Some(record) = self.state.borrow_mut().actors.get_mut(&actor) {
            record.flags.set(ActorFlags::AUTOMATING, automating);
        }
    }

    fn vitals(&self, actor: ActorId) -> Option<Vitals> {
        self.state.borrow().vitals(actor)
    }

    fn skill(&self, actor: ActorId, skill: Skill) -> u32 {
        self.state
            .borrow()
            .actors
            .get(&actor)
            .and_then(|record| record.skills.get(&skill).copied())
            .unwrap_or(0)
    }

    fn eat(&self, actor: ActorId, food: ItemId) -> bool {
        let mut state = self.state.borrow_mut();
        if state.consume(food, 1).is_err() {
            return false;
        }
        match state.actors.get_mut(&actor) {
            Some(record) => {
                record.hunger = (record.hunger + NOURISHMENT).min(VITAL_MAX);
                true
            }
            None => false,
        }
    }

    fn drink(&self, actor: ActorId, water: ItemId) -> bool {
        let mut state = self.state.borrow_mut();
        if !matches!(state.items.get(&water).and_then(|item| item.uses), Some(n) if n > 0) {
            return false;
        }
        if state.spend_use(water).is_err() {
            return false;
        }
        match state.actors.get_mut(&actor) {
            Some(record) => {
                record.thirst = (record.thirst + NOURISHMENT).min(VITAL_MAX);
                true
            }
            None => false,
        }
    }
}

impl InventoryOracle for Sandbox {
    fn held(&self, actor: ActorId, hand: Hand) -> Option<ItemInfo> {
        self.state
            .borrow()
            .held(actor, hand)
            .map(|(id, item)| item.info(id))
    }

    fn items_by_category(&self, actor: ActorId, category: ItemCategory) -> Vec<ItemInfo> {
        self.state
            .borrow()
            .items
            .iter()
            .filter(|(_, item)| {
                item.location == Location::Pack(actor) && item.category == category
            })
            .map(|(id, item)| item.info(*id))
            .collect()
    }

    fn item(&self, id: ItemId) -> Option<ItemInfo> {
        self.state.borrow().items.get(&id).map(|item| item.info(id))
    }

    fn consume(&self, item: ItemId, amount: u32) -> Result<(), InventoryError> {
        self.state.borrow_mut().consume(item, amount)
    }

    fn split_to_ground(
        &self,
        actor: ActorId,
        item: ItemId,
        amount: u32,
    ) -> Result<ItemId, InventoryError> {
        self.state.borrow_mut().split_to_ground(actor, item, amount)
    }

    fn create_in_pack(
        &self,
        actor: ActorId,
        category: ItemCategory,
    ) -> Result<ItemId, InventoryError> {
        self.state.borrow_mut().add_to_pack(actor, category, 1)
    }

    fn spend_use(&self, item: ItemId) -> Result<u32, InventoryError> {
        self.state.borrow_mut().spend_use(item)
    }
}

impl HarvestOracle for Sandbox {
    fn subsystem(&self, id: HarvestSystemId) -> Option<&dyn HarvestSubsystem> {
        self.subsystems
            .iter()
            .find(|system| system.id() == id)
            .map(|system| system as &dyn HarvestSubsystem)
    }

    /// Sturdy shovels dig special veins when the scenario defines them.
    fn mining_system(&self, _actor: ActorId, tool: ItemId) -> HarvestSystemId {
        let sturdy = self
            .state
            .borrow()
            .items
            .get(&tool)
            .is_some_and(|item| item.category == ItemCategory::SturdyShovel);
        if sturdy && self.subsystem(HarvestSystemId::DynamicMining).is_some() {
            HarvestSystemId::DynamicMining
        } else {
            HarvestSystemId::Mining
        }
    }
}

impl NotificationSink for Sandbox {
    fn notify(&self, actor: ActorId, severity: NoticeSeverity, text: &str) {
        tracing::trace!(%actor, %severity, text, "notice");
        self.state.borrow_mut().notices.push(SentNotice {
            actor,
            notice: Notice::new(severity, text),
        });
    }
}

impl RngOracle for Sandbox {
    fn next_u32(&self, seed: u64) -> u32 {
        self.rng.next_u32(seed)
    }
}
