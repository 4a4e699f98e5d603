//! Scenario data and an in-memory host for the automation scheduler.
//!
//! - Scenario files (data-driven via RON)
//! - A sandbox host implementing every oracle trait of `automation-core`
//!
//! The client runs the scheduler against the sandbox, and so do the scenario
//! tests in `tests/`.

pub mod loaders;
pub mod sandbox;

pub use loaders::{
    ActorSpec, FixtureSpec, HarvestSpec, ItemSpec, LoadResult, Scenario, ScenarioLoader,
};
pub use sandbox::{
    ActorFlags, HarvestOutcome, HarvestResult, Location, Sandbox, SandboxHarvest, SentNotice,
};
