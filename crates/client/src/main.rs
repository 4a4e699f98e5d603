//! Automation client binary.
//!
//! ```bash
//! AUTOMATION_HEARTBEAT_MS=250 cargo run -p automation-client
//! ```
//!
//! Type `.auto-list` to see the available actions, `.auto-fish` (or any other
//! verb) to start one, `.stop` to stop it and `quit` to leave.

use anyhow::Result;
use automation_client::{ClientConfig, Session, logging};
use automation_content::ScenarioLoader;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    logging::setup_logging(config.log_dir.as_deref())?;

    let scenario = ScenarioLoader::load(&config.scenario)?;
    tracing::info!(
        scenario = %config.scenario.display(),
        actor = %config.actor,
        heartbeat_ms = config.heartbeat.as_millis() as u64,
        "Starting automation client"
    );

    let mut session = Session::new(&scenario, config.actor);
    let mut heartbeat = tokio::time::interval(config.heartbeat);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                let report = session.heartbeat();
                tracing::trace!(tick = %report.tick, dispatched = report.dispatched, "heartbeat");
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().eq_ignore_ascii_case("quit") {
                    break;
                }
                session.input(&line);
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        for line in session.drain_output() {
            println!("{line}");
        }
    }

    tracing::info!(
        actions_run = session.scheduler().nonce(),
        automating = session.scheduler().registry().len(),
        "Client shutdown complete"
    );
    Ok(())
}
