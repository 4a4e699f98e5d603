//! Identifiers and the per-actor automation record.
//!
//! Nothing in here owns host objects: actors, items and tiles are referenced
//! by id or coordinate and resolved through the oracles in [`crate::env`].
mod automation;
mod common;

pub use automation::{AutomationState, HarvestTarget};
pub use common::{ActorId, ItemId, Position, Tick, TileId};
