/// Automation constants and tunable parameters.
///
/// Everything here is fixed at compile time; the scheduler has no persisted
/// configuration of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AutomationConfig;

impl AutomationConfig {
    // ===== scheduler clock =====
    /// Highest value of the cyclic tick clock. The wheel holds `MAX_TICK + 1` slots.
    pub const MAX_TICK: u16 = 30;

    // ===== per-kind delays, in ticks (one tick per second) =====
    pub const DELAY_FISHING: u32 = 3;
    pub const DELAY_MINING: u32 = 2;
    pub const DELAY_LUMBERJACKING: u32 = 2;
    pub const DELAY_SKINNING: u32 = 3;
    pub const DELAY_MILLING: u32 = 3;
    pub const DELAY_CRAFTING: u32 = 3;
    /// Used when the action kind cannot be resolved.
    pub const DELAY_DEFAULT: u32 = Self::DELAY_MINING;

    // ===== search radii, in tiles =====
    pub const HARVEST_RADIUS_DEFAULT: u32 = 4;
    pub const HARVEST_RADIUS_MINING_LUMBERJACKING: u32 = 2;
    pub const SKINNING_SEARCH_RADIUS: u32 = 3;
    pub const MILL_SEARCH_RADIUS: u32 = 3;
    pub const WATER_FIXTURE_RADIUS: u32 = 2;
    pub const WATER_TILE_RADIUS: u32 = 1;
    pub const OVEN_SEARCH_RADIUS: u32 = 2;

    // ===== carrying capacity =====
    /// Overloaded once carried weight reaches this percentage of capacity.
    pub const OVERLOAD_PERCENT: u32 = 110;
    pub const DROP_LOSS_MINIMUM: u32 = 1;
    pub const DROP_LOSS_DIVISOR: u32 = 10;

    // ===== hunger and thirst =====
    pub const EAT_BELOW: u32 = 15;
    pub const DRINK_BELOW: u32 = 15;
    /// Automation stops when hunger is at or below this value.
    pub const HUNGER_FLOOR: u32 = 3;
    /// Automation stops when thirst is at or below this value.
    pub const THIRST_FLOOR: u32 = 3;

    // ===== skill bands =====
    pub const BYPRODUCT_SKILL_MIN: u32 = 0;
    pub const BYPRODUCT_SKILL_MAX: u32 = 50;
    pub const DOUGH_SKILL_MIN: u32 = 0;
    pub const DOUGH_SKILL_MAX: u32 = 60;
    pub const BREAD_SKILL_MIN: u32 = 30;
    pub const BREAD_SKILL_MAX: u32 = 80;

    // ===== map layout =====
    /// Added to a static tile's graphic id before it is looked up in harvest tables.
    pub const STATIC_TILE_ID_OFFSET: u16 = 0x4000;
    /// Maximum number of static tiles stacked on a single cell.
    pub const MAX_STATICS_PER_TILE: usize = 8;

    // ===== commands =====
    pub const COMMAND_PREFIX: &'static str = ".auto-";
    pub const STOP_COMMAND: &'static str = ".stop";
}
