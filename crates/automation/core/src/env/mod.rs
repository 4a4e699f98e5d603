//! Traits describing the host simulation.
//!
//! The scheduler never owns actors, items or tiles. It reaches them through
//! these oracles, and the [`Env`] aggregate bundles them so the executor and
//! the locator can be handed everything at once without coupling to a
//! concrete host.
mod actors;
mod error;
mod harvest;
mod items;
mod map;
mod notify;
mod rng;

pub use actors::{ActorOracle, Skill, SurvivalFlags, Vitals, skill_check_passes};
pub use error::OracleError;
pub use harvest::{HarvestDefinition, HarvestOracle, HarvestSubsystem, HarvestSystemId};
pub use items::{Hand, InventoryError, InventoryOracle, ItemCategory, ItemInfo};
pub use map::{
    FixtureKind, GroundTile, StaticTile, StaticTiles, TerrainKind, TileLayer, WorldItem,
    WorldOracle,
};
pub use notify::{NoticeSeverity, NotificationSink};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::state::ActorId;

/// Aggregates the host oracles needed by the scheduler.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    world: Option<&'a dyn WorldOracle>,
    actors: Option<&'a dyn ActorOracle>,
    inventory: Option<&'a dyn InventoryOracle>,
    harvest: Option<&'a dyn HarvestOracle>,
    notices: Option<&'a dyn NotificationSink>,
    rng: Option<&'a dyn RngOracle>,
}

impl<'a> Env<'a> {
    pub fn new(
        world: Option<&'a dyn WorldOracle>,
        actors: Option<&'a dyn ActorOracle>,
        inventory: Option<&'a dyn InventoryOracle>,
        harvest: Option<&'a dyn HarvestOracle>,
        notices: Option<&'a dyn NotificationSink>,
        rng: Option<&'a dyn RngOracle>,
    ) -> Self {
        Self {
            world,
            actors,
            inventory,
            harvest,
            notices,
            rng,
        }
    }

    pub fn with_all(
        world: &'a dyn WorldOracle,
        actors: &'a dyn ActorOracle,
        inventory: &'a dyn InventoryOracle,
        harvest: &'a dyn HarvestOracle,
        notices: &'a dyn NotificationSink,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self::new(
            Some(world),
            Some(actors),
            Some(inventory),
            Some(harvest),
            Some(notices),
            Some(rng),
        )
    }

    pub fn empty() -> Self {
        Self {
            world: None,
            actors: None,
            inventory: None,
            harvest: None,
            notices: None,
            rng: None,
        }
    }

    /// Returns the WorldOracle, or an error if not available.
    pub fn world(&self) -> Result<&'a dyn WorldOracle, OracleError> {
        self.world.ok_or(OracleError::WorldNotAvailable)
    }

    /// Returns the ActorOracle, or an error if not available.
    pub fn actors(&self) -> Result<&'a dyn ActorOracle, OracleError> {
        self.actors.ok_or(OracleError::ActorsNotAvailable)
    }

    /// Returns the InventoryOracle, or an error if not available.
    pub fn inventory(&self) -> Result<&'a dyn InventoryOracle, OracleError> {
        self.inventory.ok_or(OracleError::InventoryNotAvailable)
    }

    /// Returns the HarvestOracle, or an error if not available.
    pub fn harvest(&self) -> Result<&'a dyn HarvestOracle, OracleError> {
        self.harvest.ok_or(OracleError::HarvestNotAvailable)
    }

    pub fn notices(&self) -> Result<&'a dyn NotificationSink, OracleError> {
        self.notices.ok_or(OracleError::NoticesNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a dyn RngOracle, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Sends a notice if a sink is wired; notices are best effort.
    pub fn notify(&self, actor: ActorId, severity: NoticeSeverity, text: &str) {
        if let Some(sink) = self.notices {
            sink.notify(actor, severity, text);
        } else {
            tracing::warn!(%actor, text, "notice dropped: no notification sink");
        }
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("world", &self.world.is_some())
            .field("actors", &self.actors.is_some())
            .field("inventory", &self.inventory.is_some())
            .field("harvest", &self.harvest.is_some())
            .field("notices", &self.notices.is_some())
            .field("rng", &self.rng.is_some())
            .finish()
    }
}
