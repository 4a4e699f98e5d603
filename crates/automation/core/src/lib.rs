//! Tick-driven automation of repeatable in-game actions.
//!
//! Actors opt into an action (fishing, mining, milling, baking ...) and the
//! [`TaskScheduler`] re-runs it on a cyclic [`TimerWheel`] until a guard stops
//! it. All world, inventory and actor state stays with the host and is read
//! through the oracle traits bundled in [`Env`].
pub mod action;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod execute;
pub mod locate;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod state;

pub use action::{ActionKind, Recipe};
pub use command::{Command, CommandError, Dispatched, Verb};
pub use config::AutomationConfig;
pub use env::{
    ActorOracle, Env, FixtureKind, GroundTile, Hand, HarvestDefinition, HarvestOracle,
    HarvestSubsystem, HarvestSystemId, InventoryError, InventoryOracle, ItemCategory, ItemInfo,
    NoticeSeverity, NotificationSink, OracleError, PcgRng, RngOracle, RollContext, Skill,
    StaticTile, StaticTiles, SurvivalFlags, TerrainKind, TileLayer, Vitals, WorldItem,
    WorldOracle, compute_seed,
};
pub use error::{AutomationError, ErrorSeverity};
pub use execute::{ActionExecutor, ExecuteError, Notice, Step, StopReason};
pub use locate::{TargetLocator, scan_offsets};
pub use registry::{AutomationRegistry, RegistryError};
pub use schedule::{TickClock, TimerWheel};
pub use scheduler::{StartError, TaskScheduler, TickReport};
pub use state::{ActorId, AutomationState, HarvestTarget, ItemId, Position, Tick, TileId};
