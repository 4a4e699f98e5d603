//! Oracle access errors.

use crate::error::{AutomationError, ErrorSeverity};
use crate::state::{ActorId, ItemId};

/// Errors that occur when reaching the host through the oracles.
///
/// A missing oracle means the scheduler was wired incorrectly. The remaining
/// variants are raised by host operations that found their subject gone or
/// in an unexpected state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("WorldOracle not available")]
    WorldNotAvailable,

    #[error("ActorOracle not available")]
    ActorsNotAvailable,

    #[error("InventoryOracle not available")]
    InventoryNotAvailable,

    #[error("HarvestOracle not available")]
    HarvestNotAvailable,

    #[error("NotificationSink not available")]
    NoticesNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    /// Actor is unknown to the host.
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    /// World item was removed or never existed.
    #[error("world item {0} not found")]
    WorldItemNotFound(ItemId),

    /// World item exists but is not in a state the operation accepts.
    #[error("world item {item} rejected the operation: {reason}")]
    FixtureRejected { item: ItemId, reason: &'static str },
}

impl AutomationError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            WorldNotAvailable | ActorsNotAvailable | InventoryNotAvailable
            | HarvestNotAvailable | NoticesNotAvailable | RngNotAvailable => ErrorSeverity::Internal,

            ActorNotFound(_) | WorldItemNotFound(_) | FixtureRejected { .. } => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            WorldNotAvailable => "ORACLE_WORLD_NOT_AVAILABLE",
            ActorsNotAvailable => "ORACLE_ACTORS_NOT_AVAILABLE",
            InventoryNotAvailable => "ORACLE_INVENTORY_NOT_AVAILABLE",
            HarvestNotAvailable => "ORACLE_HARVEST_NOT_AVAILABLE",
            NoticesNotAvailable => "ORACLE_NOTICES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ActorNotFound(_) => "ORACLE_ACTOR_NOT_FOUND",
            WorldItemNotFound(_) => "ORACLE_WORLD_ITEM_NOT_FOUND",
            FixtureRejected { .. } => "ORACLE_FIXTURE_REJECTED",
        }
    }
}
