//! The repeatable actions an actor can automate.

use crate::config::AutomationConfig;
use crate::env::{HarvestSystemId, ItemCategory, TerrainKind, TileLayer};

/// Category of repeatable task being automated.
///
/// The kind decides which guards apply, the delay between runs, and which
/// tiles count as a valid harvest target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Fishing,
    Mining,
    Lumberjacking,
    Skinning,
    Milling,
    MakeDough,
    MakeBread,
}

/// A built-in one-ingredient cooking recipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recipe {
    pub input: ItemCategory,
    pub input_amount: u32,
    pub product: ItemCategory,
    pub min_skill: u32,
    pub max_skill: u32,
    /// Name used in crafting notices.
    pub name: &'static str,
}

const DOUGH: Recipe = Recipe {
    input: ItemCategory::SackFlour,
    input_amount: 1,
    product: ItemCategory::Dough,
    min_skill: AutomationConfig::DOUGH_SKILL_MIN,
    max_skill: AutomationConfig::DOUGH_SKILL_MAX,
    name: "dough",
};

const BREAD: Recipe = Recipe {
    input: ItemCategory::Dough,
    input_amount: 1,
    product: ItemCategory::BreadLoaf,
    min_skill: AutomationConfig::BREAD_SKILL_MIN,
    max_skill: AutomationConfig::BREAD_SKILL_MAX,
    name: "bread",
};

/// Fish stacks shed when a fishing actor is overloaded. One is picked at random.
const FISH_RESOURCES: &[ItemCategory] = &[
    ItemCategory::Fish,
    ItemCategory::FishSteak,
    ItemCategory::BigFish,
];

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Fishing,
        ActionKind::Mining,
        ActionKind::Lumberjacking,
        ActionKind::Skinning,
        ActionKind::Milling,
        ActionKind::MakeDough,
        ActionKind::MakeBread,
    ];

    /// Ticks between two runs of this action.
    pub const fn delay(self) -> u32 {
        match self {
            ActionKind::Fishing => AutomationConfig::DELAY_FISHING,
            ActionKind::Mining => AutomationConfig::DELAY_MINING,
            ActionKind::Lumberjacking => AutomationConfig::DELAY_LUMBERJACKING,
            ActionKind::Skinning => AutomationConfig::DELAY_SKINNING,
            ActionKind::Milling => AutomationConfig::DELAY_MILLING,
            ActionKind::MakeDough | ActionKind::MakeBread => AutomationConfig::DELAY_CRAFTING,
        }
    }

    /// Delay for an optional kind, falling back to the default constant.
    pub const fn delay_or_default(kind: Option<ActionKind>) -> u32 {
        match kind {
            Some(kind) => kind.delay(),
            None => AutomationConfig::DELAY_DEFAULT,
        }
    }

    /// True for actions that delegate to an external harvest subsystem.
    pub const fn is_harvest(self) -> bool {
        matches!(
            self,
            ActionKind::Fishing | ActionKind::Mining | ActionKind::Lumberjacking
        )
    }

    pub const fn is_cooking(self) -> bool {
        matches!(self, ActionKind::MakeDough | ActionKind::MakeBread)
    }

    /// Target search radius, for harvest actions only.
    pub const fn search_radius(self) -> Option<u32> {
        match self {
            ActionKind::Fishing => Some(AutomationConfig::HARVEST_RADIUS_DEFAULT),
            ActionKind::Mining | ActionKind::Lumberjacking => {
                Some(AutomationConfig::HARVEST_RADIUS_MINING_LUMBERJACKING)
            }
            _ => None,
        }
    }

    /// Whether a tile of `terrain` on `layer` is a candidate target for this action.
    pub const fn accepts(self, layer: TileLayer, terrain: TerrainKind) -> bool {
        match (self, layer, terrain) {
            (ActionKind::Fishing, _, TerrainKind::Water) => true,
            (ActionKind::Mining, TileLayer::Ground, TerrainKind::Rock) => true,
            (ActionKind::Lumberjacking, TileLayer::Static, TerrainKind::Tree) => true,
            _ => false,
        }
    }

    /// Default harvest subsystem for this action.
    ///
    /// Mining may be rebound to [`HarvestSystemId::DynamicMining`] by the harvest
    /// oracle depending on the tool.
    pub const fn harvest_system(self) -> Option<HarvestSystemId> {
        match self {
            ActionKind::Fishing => Some(HarvestSystemId::Fishing),
            ActionKind::Mining => Some(HarvestSystemId::Mining),
            ActionKind::Lumberjacking => Some(HarvestSystemId::Lumberjacking),
            _ => None,
        }
    }

    /// Recipe for the cooking actions.
    pub const fn recipe(self) -> Option<Recipe> {
        match self {
            ActionKind::MakeDough => Some(DOUGH),
            ActionKind::MakeBread => Some(BREAD),
            _ => None,
        }
    }

    /// Resource stacks that may be shed when the actor is overloaded.
    ///
    /// Fishing yields several stack types; the executor picks one at random.
    pub const fn overload_resources(self) -> &'static [ItemCategory] {
        match self {
            ActionKind::Fishing => FISH_RESOURCES,
            ActionKind::Mining => &[ItemCategory::Ore],
            ActionKind::Lumberjacking => &[ItemCategory::Log],
            ActionKind::Skinning => &[ItemCategory::Leather],
            ActionKind::Milling => &[ItemCategory::WheatSheaf],
            ActionKind::MakeDough => &[ItemCategory::Dough],
            ActionKind::MakeBread => &[ItemCategory::BreadLoaf],
        }
    }

    /// Name shown to players when listing available actions.
    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::Fishing => "Auto-Fish",
            ActionKind::Mining => "Auto-Mine",
            ActionKind::Lumberjacking => "Auto-Chop",
            ActionKind::Skinning => "Auto-Skin",
            ActionKind::Milling => "Auto-Mill",
            ActionKind::MakeDough => "Auto-Dough",
            ActionKind::MakeBread => "Auto-Bake",
        }
    }
}
