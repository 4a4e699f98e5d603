//! Client runtime configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use automation_core::ActorId;

/// Scenario shipped with the client, used when none is configured.
pub const DEFAULT_SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/demo.ron");

/// Settings for one client run.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Scenario RON file to load.
    pub scenario: PathBuf,
    /// Wall-clock time between scheduler ticks.
    pub heartbeat: Duration,
    /// Actor controlled from stdin.
    pub actor: ActorId,
    /// When set, logs are also written to `automation.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scenario: PathBuf::from(DEFAULT_SCENARIO),
            heartbeat: Duration::from_millis(1000),
            actor: ActorId(1),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AUTOMATION_SCENARIO` - Scenario path (default: bundled demo)
    /// - `AUTOMATION_HEARTBEAT_MS` - Tick period in milliseconds (default: 1000)
    /// - `AUTOMATION_ACTOR` - Controlled actor id (default: 1)
    /// - `AUTOMATION_LOG_DIR` - Directory for a log file (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("AUTOMATION_SCENARIO") {
            config.scenario = path;
        }
        if let Some(millis) = read_env::<u64>("AUTOMATION_HEARTBEAT_MS") {
            config.heartbeat = Duration::from_millis(millis.max(1));
        }
        if let Some(actor) = read_env::<u32>("AUTOMATION_ACTOR") {
            config.actor = ActorId(actor);
        }
        config.log_dir = read_env::<PathBuf>("AUTOMATION_LOG_DIR");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_bundled_demo() {
        let config = ClientConfig::default();
        assert!(config.scenario.ends_with("scenarios/demo.ron"));
        assert!(config.scenario.exists());
        assert_eq!(config.heartbeat, Duration::from_secs(1));
        assert_eq!(config.actor, ActorId(1));
        assert!(config.log_dir.is_none());
    }
}
