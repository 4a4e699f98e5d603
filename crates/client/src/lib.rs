//! Terminal front end for the automation scheduler.
//!
//! Loads a scenario into the sandbox host, ticks the scheduler on a fixed
//! heartbeat and feeds typed lines to the chat command parser.

pub mod config;
pub mod logging;
pub mod session;

pub use config::ClientConfig;
pub use session::Session;
