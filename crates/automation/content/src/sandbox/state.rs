use std::collections::{BTreeMap, HashMap, HashSet};

use automation_core::{
    ActorId, GroundTile, Hand, HarvestSystemId, InventoryError, ItemCategory, ItemId, ItemInfo,
    Notice, Position, Skill, StaticTiles, TerrainKind, TileId, Vitals, WorldItem,
};
use bitflags::bitflags;

use super::harvest::HarvestOutcome;

/// Ground used for every cell the scenario leaves out.
pub(crate) const DEFAULT_GROUND: GroundTile = GroundTile::new(TileId(3), 0, TerrainKind::Ground);

/// Hunger or thirst restored by one bite or sip.
pub(crate) const NOURISHMENT: u32 = 6;
pub(crate) const VITAL_MAX: u32 = 20;

bitflags! {
    /// Boolean actor attributes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ActorFlags: u8 {
        const ALIVE = 1 << 0;
        const BACKPACK = 1 << 1;
        const VALID_MAP = 1 << 2;
        /// The persisted automating flag.
        const AUTOMATING = 1 << 3;
    }
}

#[derive(Clone, Debug)]
pub struct ActorRecord {
    pub position: Position,
    pub flags: ActorFlags,
    pub hunger: u32,
    pub thirst: u32,
    pub base_weight: u32,
    pub max_weight: u32,
    pub skills: HashMap<Skill, u32>,
}

/// Where an item currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Hand(ActorId, Hand),
    Pack(ActorId),
    Ground(Position),
}

#[derive(Clone, Debug)]
pub struct ItemRecord {
    pub category: ItemCategory,
    pub amount: u32,
    pub uses: Option<u32>,
    /// Weight per unit.
    pub weight: u32,
    pub location: Location,
}

impl ItemRecord {
    pub fn info(&self, id: ItemId) -> ItemInfo {
        ItemInfo {
            id,
            category: self.category,
            amount: self.amount,
            uses_remaining: self.uses,
        }
    }

    /// Tools carry a use counter and never stack.
    fn stacks(&self) -> bool {
        self.uses.is_none()
    }
}

/// Default weight per unit of a category.
pub fn unit_weight(category: ItemCategory) -> u32 {
    match category {
        ItemCategory::Ore => 10,
        ItemCategory::Log | ItemCategory::BigFish => 5,
        ItemCategory::Pickaxe
        | ItemCategory::Shovel
        | ItemCategory::OreShovel
        | ItemCategory::SturdyShovel
        | ItemCategory::Axe => 4,
        ItemCategory::WheatSheaf | ItemCategory::SackFlour => 2,
        _ => 1,
    }
}

/// A notice as it was delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentNotice {
    pub actor: ActorId,
    pub notice: Notice,
}

/// Everything the sandbox host knows. Shared with the harvest subsystems.
#[derive(Debug, Default)]
pub struct SandboxState {
    pub actors: BTreeMap<ActorId, ActorRecord>,
    pub items: BTreeMap<ItemId, ItemRecord>,
    pub fixtures: BTreeMap<ItemId, WorldItem>,
    pub ground: HashMap<Position, GroundTile>,
    pub statics: HashMap<Position, StaticTiles>,
    pub blocked_sight: HashSet<Position>,
    /// Harvests left per spot; spots not listed still hold the full amount.
    pub banks: HashMap<(HarvestSystemId, Position), u32>,
    pub outcomes: Vec<HarvestOutcome>,
    pub notices: Vec<SentNotice>,
    next_id: u32,
}

impl SandboxState {
    pub fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    pub fn ground_tile(&self, position: Position) -> GroundTile {
        self.ground.get(&position).copied().unwrap_or(DEFAULT_GROUND)
    }

    pub fn held(&self, actor: ActorId, hand: Hand) -> Option<(ItemId, &ItemRecord)> {
        self.items
            .iter()
            .find(|(_, item)| item.location == Location::Hand(actor, hand))
            .map(|(id, item)| (*id, item))
    }

    /// First pack item of `category`, in creation order.
    pub fn find_in_pack(
        &self,
        actor: ActorId,
        category: ItemCategory,
    ) -> Option<(ItemId, &ItemRecord)> {
        self.items
            .iter()
            .find(|(_, item)| item.location == Location::Pack(actor) && item.category == category)
            .map(|(id, item)| (*id, item))
    }

    pub fn carried_weight(&self, actor: ActorId) -> u32 {
        self.items
            .values()
            .filter(|item| item.location == Location::Pack(actor))
            .map(|item| item.amount * item.weight)
            .sum()
    }

    pub fn vitals(&self, actor: ActorId) -> Option<Vitals> {
        let record = self.actors.get(&actor)?;
        Some(Vitals {
            hunger: record.hunger,
            thirst: record.thirst,
            weight: record.base_weight + self.carried_weight(actor),
            max_weight: record.max_weight,
        })
    }

    pub fn consume(&mut self, id: ItemId, amount: u32) -> Result<(), InventoryError> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(InventoryError::ItemMissing(id))?;
        if amount > item.amount {
            return Err(InventoryError::InsufficientAmount {
                item: id,
                requested: amount,
                available: item.amount,
            });
        }
        item.amount -= amount;
        if item.amount == 0 {
            self.items.remove(&id);
        }
        Ok(())
    }

    pub fn split_to_ground(
        &mut self,
        actor: ActorId,
        id: ItemId,
        amount: u32,
    ) -> Result<ItemId, InventoryError> {
        let position = self
            .actors
            .get(&actor)
            .map(|record| record.position)
            .ok_or(InventoryError::NoBackpack(actor))?;
        let item = self
            .items
            .get_mut(&id)
            .ok_or(InventoryError::ItemMissing(id))?;
        if !item.stacks() {
            return Err(InventoryError::NotSplittable(id));
        }
        if amount > item.amount {
            return Err(InventoryError::InsufficientAmount {
                item: id,
                requested: amount,
                available: item.amount,
            });
        }

        if amount == item.amount {
            item.location = Location::Ground(position);
            return Ok(id);
        }

        item.amount -= amount;
        let dropped = ItemRecord {
            amount,
            location: Location::Ground(position),
            ..item.clone()
        };
        let new_id = self.allocate_id();
        self.items.insert(new_id, dropped);
        Ok(new_id)
    }

    /// Adds `amount` of `category` to the pack, merging into an existing stack.
    pub fn add_to_pack(
        &mut self,
        actor: ActorId,
        category: ItemCategory,
        amount: u32,
    ) -> Result<ItemId, InventoryError> {
        let has_pack = self
            .actors
            .get(&actor)
            .is_some_and(|record| record.flags.contains(ActorFlags::BACKPACK));
        if !has_pack {
            return Err(InventoryError::NoBackpack(actor));
        }

        let existing = self
            .find_in_pack(actor, category)
            .filter(|(_, item)| item.stacks())
            .map(|(id, _)| id);
        if let Some(id) = existing {
            if let Some(item) = self.items.get_mut(&id) {
                item.amount += amount;
            }
            return Ok(id);
        }

        let id = self.allocate_id();
        self.items.insert(
            id,
            ItemRecord {
                category,
                amount,
                uses: None,
                weight: unit_weight(category),
                location: Location::Pack(actor),
            },
        );
        Ok(id)
    }

    /// Spends one use. Items without a counter never wear out.
    pub fn spend_use(&mut self, id: ItemId) -> Result<u32, InventoryError> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(InventoryError::ItemMissing(id))?;
        match item.uses.as_mut() {
            Some(uses) => {
                *uses = uses.saturating_sub(1);
                Ok(*uses)
            }
            None => Ok(u32::MAX),
        }
    }
}
