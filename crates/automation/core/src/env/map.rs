use arrayvec::ArrayVec;

use crate::config::AutomationConfig;
use crate::env::OracleError;
use crate::state::{ActorId, ItemId, Position, TileId};

/// Static tiles stacked on one cell, bottom to top.
pub type StaticTiles = ArrayVec<StaticTile, { AutomationConfig::MAX_STATICS_PER_TILE }>;

/// World and map oracle.
///
/// Tile data is read-only. The fixture operations at the bottom are the narrow
/// mutations the built-in skinning and milling handlers need; the host makes
/// each call atomic.
pub trait WorldOracle {
    fn ground_tile(&self, position: Position) -> Option<GroundTile>;

    fn static_tiles(&self, position: Position) -> StaticTiles;

    fn line_of_sight(&self, actor: ActorId, position: Position, z: i8) -> bool;

    /// World items within Chebyshev `radius` of `center`, in a stable order.
    fn items_in_range(&self, center: Position, radius: u32) -> Vec<WorldItem>;

    /// Looks up a single world item, or `None` once it has been removed.
    fn world_item(&self, id: ItemId) -> Option<WorldItem>;

    fn carve_corpse(&self, actor: ActorId, corpse: ItemId, knife: ItemId)
    -> Result<(), OracleError>;

    /// Cuts the hides left in a carved corpse. Returns false when nothing was cut.
    fn cut_hides(&self, actor: ActorId, corpse: ItemId) -> Result<bool, OracleError>;

    /// Moves `amount` wheat sheaves worth of grain into a flour mill.
    fn fill_mill(&self, actor: ActorId, mill: ItemId, amount: u32) -> Result<(), OracleError>;
}

/// Which of the two tile layers a tile belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileLayer {
    /// The terrain mesh; one tile per cell.
    Ground,
    /// Overlay statics such as trees, rocks and shallow water.
    Static,
}

/// Canonical terrain classes the target search cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Water,
    Rock,
    Tree,
    #[default]
    Ground,
    Other,
}

/// Ground-layer tile of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundTile {
    pub id: TileId,
    pub z: i8,
    pub terrain: TerrainKind,
}

impl GroundTile {
    pub const fn new(id: TileId, z: i8, terrain: TerrainKind) -> Self {
        Self { id, z, terrain }
    }
}

/// Static overlay tile on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    /// Raw graphic id without the static offset.
    pub id: TileId,
    pub z: i8,
    pub terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(id: TileId, z: i8, terrain: TerrainKind) -> Self {
        Self { id, z, terrain }
    }
}

/// An item lying in the world near an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldItem {
    pub id: ItemId,
    pub position: Position,
    pub z: i8,
    pub kind: FixtureKind,
}

/// Classes of world item the built-in handlers interact with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixtureKind {
    Corpse { carved: bool, has_hides: bool },
    FlourMill { current: u32, capacity: u32 },
    WaterSource,
    Oven,
    Other,
}

impl FixtureKind {
    pub const fn is_water_source(self) -> bool {
        matches!(self, FixtureKind::WaterSource)
    }

    pub const fn is_oven(self) -> bool {
        matches!(self, FixtureKind::Oven)
    }

    pub const fn is_flour_mill(self) -> bool {
        matches!(self, FixtureKind::FlourMill { .. })
    }
}
