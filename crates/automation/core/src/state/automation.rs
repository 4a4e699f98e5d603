use crate::action::ActionKind;
use crate::env::{HarvestSystemId, TileLayer};
use crate::state::{ItemId, Position, TileId};

/// A harvestable location acquired by the target search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarvestTarget {
    /// Layer the matching tile was found on.
    pub layer: TileLayer,
    pub position: Position,
    pub z: i8,
    /// Key the harvest definition was resolved from. Static tiles carry the offset.
    pub tile: TileId,
}

/// Per-actor automation record.
///
/// Holds ids and coordinates only; every reference is resolved through the
/// oracles on use because the host may delete the underlying object at any time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomationState {
    /// Absent only when the record has lost its context and must be recovered.
    pub kind: Option<ActionKind>,
    /// Tool or fixture driving the action. Skinning runs without one.
    pub tool: Option<ItemId>,
    pub target: Option<HarvestTarget>,
    pub harvest_system: Option<HarvestSystemId>,
    /// Actor position when automation started; moving away stops the loop.
    pub anchor: Position,
}

impl AutomationState {
    pub fn new(kind: ActionKind, anchor: Position) -> Self {
        Self {
            kind: Some(kind),
            tool: None,
            target: None,
            harvest_system: None,
            anchor,
        }
    }

    pub fn with_tool(mut self, tool: Option<ItemId>) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_harvest_system(mut self, system: Option<HarvestSystemId>) -> Self {
        self.harvest_system = system;
        self
    }

    pub fn with_target(mut self, target: Option<HarvestTarget>) -> Self {
        self.target = target;
        self
    }
}
