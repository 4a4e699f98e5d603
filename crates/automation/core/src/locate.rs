//! Local-grid search for a harvestable tile.
//!
//! The scan walks columns left to right and rows top to bottom inside a disk
//! around the actor. The actor's own column is never examined. The ground
//! layer is searched over the whole disk before the static layer, and the
//! first qualifying cell wins, so identical worlds always yield the same
//! target.

use crate::action::ActionKind;
use crate::config::AutomationConfig;
use crate::env::{
    Env, FixtureKind, HarvestSubsystem, OracleError, TerrainKind, TileLayer, WorldItem,
    WorldOracle,
};
use crate::state::{ActorId, HarvestTarget, ItemId, Position};

/// Offsets visited by the scan, in order.
///
/// Yields `(dx, dy)` for `dx` in `-r..=r` (skipping `0`) and `dy` in `-r..=r`,
/// keeping only cells with `dx² + dy² <= r²`. The x offset is the outer loop,
/// so the order is column-major: every `dy` of one column before the next `dx`.
pub fn scan_offsets(radius: u32) -> impl Iterator<Item = (i32, i32)> {
    let r = radius as i32;
    let squared = i64::from(r) * i64::from(r);
    (-r..=r)
        .filter(|&dx| dx != 0)
        .flat_map(move |dx| (-r..=r).map(move |dy| (dx, dy)))
        .filter(move |&(dx, dy)| i64::from(dx * dx + dy * dy) <= squared)
}

/// Finds harvest targets around an actor.
#[derive(Clone, Copy, Debug)]
pub struct TargetLocator<'a> {
    env: Env<'a>,
}

impl<'a> TargetLocator<'a> {
    pub fn new(env: Env<'a>) -> Self {
        Self { env }
    }

    /// Returns the first cell within `radius` that `system` can harvest with `tool`.
    ///
    /// `Ok(None)` means nothing in range qualifies; the caller treats it as a
    /// terminal "no resources" condition.
    pub fn find(
        &self,
        actor: ActorId,
        kind: ActionKind,
        tool: ItemId,
        system: &dyn HarvestSubsystem,
        radius: u32,
    ) -> Result<Option<HarvestTarget>, OracleError> {
        let world = self.env.world()?;
        let origin = self.origin(actor)?;

        let found = self
            .scan_ground(world, actor, origin, kind, tool, system, radius)
            .or_else(|| self.scan_statics(world, actor, origin, kind, tool, system, radius));

        match &found {
            Some(target) => tracing::debug!(
                %actor,
                %kind,
                position = %target.position,
                layer = ?target.layer,
                "target acquired"
            ),
            None => tracing::debug!(%actor, %kind, radius, "no target in range"),
        }
        Ok(found)
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_ground(
        &self,
        world: &dyn WorldOracle,
        actor: ActorId,
        origin: Position,
        kind: ActionKind,
        tool: ItemId,
        system: &dyn HarvestSubsystem,
        radius: u32,
    ) -> Option<HarvestTarget> {
        scan_offsets(radius).find_map(|(dx, dy)| {
            let position = origin.offset(dx, dy);
            let tile = world.ground_tile(position)?;
            if !kind.accepts(TileLayer::Ground, tile.terrain) {
                return None;
            }
            let target = HarvestTarget {
                layer: TileLayer::Ground,
                position,
                z: tile.z,
                tile: tile.id,
            };
            qualifies(world, actor, tool, system, &target).then_some(target)
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_statics(
        &self,
        world: &dyn WorldOracle,
        actor: ActorId,
        origin: Position,
        kind: ActionKind,
        tool: ItemId,
        system: &dyn HarvestSubsystem,
        radius: u32,
    ) -> Option<HarvestTarget> {
        scan_offsets(radius).find_map(|(dx, dy)| {
            let position = origin.offset(dx, dy);
            world
                .static_tiles(position)
                .into_iter()
                .filter(|tile| kind.accepts(TileLayer::Static, tile.terrain))
                .map(|tile| HarvestTarget {
                    layer: TileLayer::Static,
                    position,
                    z: tile.z,
                    tile: tile.id.as_static_key(),
                })
                .find(|target| qualifies(world, actor, tool, system, target))
        })
    }

    /// Whether a ground tile of water lies within `radius`, using the same scan.
    pub fn water_tile_nearby(&self, actor: ActorId, radius: u32) -> Result<bool, OracleError> {
        let world = self.env.world()?;
        let origin = self.origin(actor)?;

        Ok(scan_offsets(radius).any(|(dx, dy)| {
            world
                .ground_tile(origin.offset(dx, dy))
                .is_some_and(|tile| tile.terrain == TerrainKind::Water)
        }))
    }

    /// Water for dough: a water fixture nearby, or a water ground tile right beside the actor.
    pub fn water_nearby(&self, actor: ActorId) -> Result<bool, OracleError> {
        let fixture = self
            .fixtures_near(actor, AutomationConfig::WATER_FIXTURE_RADIUS)?
            .iter()
            .any(|item| item.kind.is_water_source());
        if fixture {
            return Ok(true);
        }
        self.water_tile_nearby(actor, AutomationConfig::WATER_TILE_RADIUS)
    }

    pub fn oven_nearby(&self, actor: ActorId) -> Result<bool, OracleError> {
        Ok(self
            .fixtures_near(actor, AutomationConfig::OVEN_SEARCH_RADIUS)?
            .iter()
            .any(|item| item.kind.is_oven()))
    }

    /// Closest flour mill in range; ties keep the host's order.
    pub fn nearest_mill(&self, actor: ActorId) -> Result<Option<WorldItem>, OracleError> {
        let origin = self.origin(actor)?;
        Ok(self
            .fixtures_near(actor, AutomationConfig::MILL_SEARCH_RADIUS)?
            .into_iter()
            .filter(|item| item.kind.is_flour_mill())
            .min_by_key(|item| origin.grid_distance(item.position)))
    }

    /// Corpses in skinning range, in the host's order.
    pub fn corpses_near(&self, actor: ActorId) -> Result<Vec<WorldItem>, OracleError> {
        Ok(self
            .fixtures_near(actor, AutomationConfig::SKINNING_SEARCH_RADIUS)?
            .into_iter()
            .filter(|item| matches!(item.kind, FixtureKind::Corpse { .. }))
            .collect())
    }

    fn fixtures_near(&self, actor: ActorId, radius: u32) -> Result<Vec<WorldItem>, OracleError> {
        let origin = self.origin(actor)?;
        Ok(self.env.world()?.items_in_range(origin, radius))
    }

    fn origin(&self, actor: ActorId) -> Result<Position, OracleError> {
        self.env
            .actors()?
            .position(actor)
            .ok_or(OracleError::ActorNotFound(actor))
    }
}

fn qualifies(
    world: &dyn WorldOracle,
    actor: ActorId,
    tool: ItemId,
    system: &dyn HarvestSubsystem,
    target: &HarvestTarget,
) -> bool {
    let Some(definition) = system.definition(target.tile) else {
        return false;
    };
    world.line_of_sight(actor, target.position, target.z)
        && system.resources_available(actor, tool, &definition, target)
}
