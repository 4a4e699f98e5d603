//! One interactive run: the sandbox host, the scheduler and the controlled actor.
use automation_content::{Sandbox, Scenario, SentNotice};
use automation_core::{
    ActorId, AutomationError, NoticeSeverity, TaskScheduler, TickReport,
    command::{self, Dispatched},
};

pub struct Session {
    sandbox: Sandbox,
    scheduler: TaskScheduler,
    actor: ActorId,
}

impl Session {
    pub fn new(scenario: &Scenario, actor: ActorId) -> Self {
        Self {
            sandbox: Sandbox::from_scenario(scenario),
            scheduler: TaskScheduler::new(scenario.seed),
            actor,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Runs one scheduler tick and reports harvests that finished during it.
    pub fn heartbeat(&mut self) -> TickReport {
        let report = self.scheduler.tick(self.sandbox.env());
        self.sandbox.settle_harvests(&mut self.scheduler);
        report
    }

    /// Handles one line typed by the player.
    pub fn input(&mut self, line: &str) -> Option<Dispatched> {
        let result = command::dispatch(&mut self.scheduler, self.sandbox.env(), self.actor, line);
        self.sandbox.settle_harvests(&mut self.scheduler);

        match result {
            Ok(Dispatched::Ignored) => {
                tracing::debug!(line, "not a command");
                None
            }
            Ok(dispatched) => {
                tracing::debug!(?dispatched, "command handled");
                Some(dispatched)
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, "command failed");
                None
            }
        }
    }

    /// Notices delivered since the last call, formatted for the terminal.
    pub fn drain_output(&self) -> Vec<String> {
        self.sandbox
            .take_notices()
            .into_iter()
            .map(|sent| render(&sent))
            .collect()
    }
}

fn render(sent: &SentNotice) -> String {
    let text = &sent.notice.text;
    match sent.notice.severity {
        NoticeSeverity::Speech => format!("{} says: {}", sent.actor, text),
        NoticeSeverity::Normal => format!("{}: {}", sent.actor, text),
        severity => format!("[{}] {}: {}", severity, sent.actor, text),
    }
}
