use crate::env::{ItemCategory, OracleError, Skill};
use crate::state::{ActorId, HarvestTarget, ItemId, TileId};

/// Harvest subsystems the host can provide.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HarvestSystemId {
    Fishing,
    Mining,
    /// Mining variant bound to special veins; chosen by the host per tool.
    DynamicMining,
    Lumberjacking,
}

/// What a subsystem yields from a class of tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarvestDefinition {
    pub resource: ItemCategory,
    pub skill: Skill,
}

/// Registry of the host's harvest subsystems.
pub trait HarvestOracle {
    fn subsystem(&self, id: HarvestSystemId) -> Option<&dyn HarvestSubsystem>;

    /// Subsystem that mines with `tool`. Hosts with special veins override this.
    fn mining_system(&self, _actor: ActorId, _tool: ItemId) -> HarvestSystemId {
        HarvestSystemId::Mining
    }
}

/// One per-resource gathering service.
///
/// The scheduler only asks for definitions and availability while searching,
/// then hands a located target over with [`HarvestSubsystem::begin_attempt`].
/// The subsystem reports the outcome later through the scheduler's harvest
/// callbacks.
pub trait HarvestSubsystem {
    fn id(&self) -> HarvestSystemId;

    /// Definition keyed by tile id. Static tiles are looked up with the offset applied.
    fn definition(&self, tile: TileId) -> Option<HarvestDefinition>;

    fn resources_available(
        &self,
        actor: ActorId,
        tool: ItemId,
        definition: &HarvestDefinition,
        target: &HarvestTarget,
    ) -> bool;

    fn begin_attempt(
        &self,
        actor: ActorId,
        tool: ItemId,
        target: &HarvestTarget,
    ) -> Result<(), OracleError>;
}
