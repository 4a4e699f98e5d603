use crate::action::ActionKind;
use crate::error::{AutomationError, ErrorSeverity};
use crate::state::{ActorId, ItemId};

/// Inventory store owned by the host simulation.
///
/// Lookups by category search the actor's backpack. Each mutating call is
/// expected to be atomic on the host side.
pub trait InventoryOracle {
    /// Item held in the given hand slot.
    fn held(&self, actor: ActorId, hand: Hand) -> Option<ItemInfo>;

    /// Backpack items of `category`, in backpack order.
    fn items_by_category(&self, actor: ActorId, category: ItemCategory) -> Vec<ItemInfo>;

    /// First backpack item of `category`.
    fn find_by_category(&self, actor: ActorId, category: ItemCategory) -> Option<ItemInfo> {
        self.items_by_category(actor, category).into_iter().next()
    }

    /// First backpack item of `category` that is not worn out.
    fn find_usable(&self, actor: ActorId, category: ItemCategory) -> Option<ItemInfo> {
        self.items_by_category(actor, category)
            .into_iter()
            .find(|item| !item.is_worn_out())
    }

    /// Resolves an item id; `None` once the item has been deleted.
    fn item(&self, id: ItemId) -> Option<ItemInfo>;

    /// Removes `amount` from a stack, deleting it when it reaches zero.
    fn consume(&self, item: ItemId, amount: u32) -> Result<(), InventoryError>;

    /// Splits `amount` off a stack and places the new stack at the actor's feet.
    fn split_to_ground(
        &self,
        actor: ActorId,
        item: ItemId,
        amount: u32,
    ) -> Result<ItemId, InventoryError>;

    /// Creates one item of `category` in the actor's backpack.
    fn create_in_pack(&self, actor: ActorId, category: ItemCategory)
    -> Result<ItemId, InventoryError>;

    /// Spends one use of a tool and returns the uses left.
    fn spend_use(&self, item: ItemId) -> Result<u32, InventoryError>;
}

/// Equipment slot a tool may be held in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hand {
    One,
    Two,
}

/// Snapshot of an item as reported by the inventory store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInfo {
    pub id: ItemId,
    pub category: ItemCategory,
    pub amount: u32,
    /// Remaining charges for tools that wear out.
    pub uses_remaining: Option<u32>,
}

impl ItemInfo {
    pub fn is_worn_out(&self) -> bool {
        matches!(self.uses_remaining, Some(0))
    }
}

/// Item classes the scheduler reasons about.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    FishingPole,
    Pickaxe,
    Shovel,
    OreShovel,
    SturdyShovel,
    Hatchet,
    Axe,
    SkinningKnife,
    Scissors,
    CookingTool,
    Food,
    Waterskin,
    Ore,
    Log,
    Fish,
    FishSteak,
    BigFish,
    Leather,
    Hides,
    WheatSheaf,
    SackFlour,
    Dough,
    BreadLoaf,
    Other,
}

impl ItemCategory {
    /// Shovel variants that may be used for mining straight from the backpack.
    pub const PACK_SHOVELS: [ItemCategory; 3] = [
        ItemCategory::Shovel,
        ItemCategory::OreShovel,
        ItemCategory::SturdyShovel,
    ];

    pub const fn is_mining_tool(self) -> bool {
        matches!(
            self,
            ItemCategory::Pickaxe
                | ItemCategory::Shovel
                | ItemCategory::OreShovel
                | ItemCategory::SturdyShovel
        )
    }

    /// Axes in the host's weapon taxonomy. A pickaxe counts as an axe here,
    /// which is why lumberjacking also rejects mining tools.
    pub const fn is_axe(self) -> bool {
        matches!(
            self,
            ItemCategory::Hatchet | ItemCategory::Axe | ItemCategory::Pickaxe
        )
    }

    pub const fn is_lumber_tool(self) -> bool {
        self.is_axe() && !self.is_mining_tool()
    }

    /// Action implied by holding this tool, used to recover a lost record.
    pub const fn implied_action(self) -> Option<ActionKind> {
        if matches!(self, ItemCategory::FishingPole) {
            Some(ActionKind::Fishing)
        } else if self.is_mining_tool() {
            Some(ActionKind::Mining)
        } else if self.is_lumber_tool() {
            Some(ActionKind::Lumberjacking)
        } else {
            None
        }
    }
}

/// Errors reported by the inventory store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("item {0} no longer exists")]
    ItemMissing(ItemId),

    #[error("item {item} holds {available}, needed {requested}")]
    InsufficientAmount {
        item: ItemId,
        requested: u32,
        available: u32,
    },

    #[error("item {0} cannot be split")]
    NotSplittable(ItemId),

    #[error("actor {0} has no backpack")]
    NoBackpack(ActorId),
}

impl AutomationError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InventoryError::InsufficientAmount { .. } => ErrorSeverity::Recoverable,
            InventoryError::ItemMissing(_)
            | InventoryError::NotSplittable(_)
            | InventoryError::NoBackpack(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::ItemMissing(_) => "INVENTORY_ITEM_MISSING",
            InventoryError::InsufficientAmount { .. } => "INVENTORY_INSUFFICIENT_AMOUNT",
            InventoryError::NotSplittable(_) => "INVENTORY_NOT_SPLITTABLE",
            InventoryError::NoBackpack(_) => "INVENTORY_NO_BACKPACK",
        }
    }
}
