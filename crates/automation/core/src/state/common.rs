use std::fmt;

use crate::config::AutomationConfig;

/// Identity of a host actor taking part in automation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a host item (tool, stack, fixture or corpse).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// Elevation lives on the tiles themselves; an actor's position is planar so
/// that movement detection only looks at x and y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev distance, the range metric used for nearby item queries.
    pub fn grid_distance(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One slot of the bounded scheduler clock, always in `[0, MAX_TICK]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u16);

impl Tick {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(AutomationConfig::MAX_TICK);

    /// Number of distinct slots on the wheel.
    pub const SLOTS: u32 = AutomationConfig::MAX_TICK as u32 + 1;

    /// Returns the slot `delay` ticks after this one, wrapping past [`Tick::MAX`].
    pub fn wrapping_add(self, delay: u32) -> Tick {
        let slot = (self.0 as u32 + delay % Self::SLOTS) % Self::SLOTS;
        Tick(slot as u16)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw tile graphic id as stored by the host map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub u16);

impl TileId {
    /// Key used by harvest definitions for a tile found on the static layer.
    pub const fn as_static_key(self) -> TileId {
        TileId(self.0.wrapping_add(AutomationConfig::STATIC_TILE_ID_OFFSET))
    }
}
