//! Chat verbs that start and stop automation.
//!
//! Commands look like `.auto-fish` (prefix matched case-insensitively) plus
//! the bare `.stop`. Anything else is not a command and is left alone.

use std::str::FromStr;

use crate::action::ActionKind;
use crate::config::AutomationConfig;
use crate::env::{Env, NoticeSeverity};
use crate::error::{AutomationError, ErrorSeverity};
use crate::execute::Step;
use crate::scheduler::{StartError, TaskScheduler};
use crate::state::ActorId;

/// Verbs accepted after the command prefix.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Verb {
    List,
    Fish,
    Mine,
    Chop,
    Skin,
    Mill,
    Dough,
    Bake,
}

impl Verb {
    /// Action started by this verb; `None` for `list`.
    pub const fn action(self) -> Option<ActionKind> {
        match self {
            Verb::List => None,
            Verb::Fish => Some(ActionKind::Fishing),
            Verb::Mine => Some(ActionKind::Mining),
            Verb::Chop => Some(ActionKind::Lumberjacking),
            Verb::Skin => Some(ActionKind::Skinning),
            Verb::Mill => Some(ActionKind::Milling),
            Verb::Dough => Some(ActionKind::MakeDough),
            Verb::Bake => Some(ActionKind::MakeBread),
        }
    }
}

/// A recognised command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Start(ActionKind),
    Stop,
}

/// What [`dispatch`] did with a line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// The text was not a command.
    Ignored,
    Listed,
    Started(Step),
    /// Whether an active automation was actually stopped.
    Stopped(bool),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown automation verb '{0}'")]
    UnknownVerb(String),

    #[error(transparent)]
    Start(#[from] StartError),
}

impl AutomationError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommandError::UnknownVerb(_) => ErrorSeverity::Validation,
            CommandError::Start(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CommandError::UnknownVerb(_) => "COMMAND_UNKNOWN_VERB",
            CommandError::Start(err) => err.error_code(),
        }
    }
}

/// Parses one line of chat. `Ok(None)` means the text is not a command.
pub fn parse(text: &str) -> Result<Option<Command>, CommandError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(AutomationConfig::STOP_COMMAND) {
        return Ok(Some(Command::Stop));
    }

    let prefix = AutomationConfig::COMMAND_PREFIX;
    let Some(head) = text.get(..prefix.len()) else {
        return Ok(None);
    };
    if !head.eq_ignore_ascii_case(prefix) {
        return Ok(None);
    }

    let rest = &text[prefix.len()..];
    let verb = Verb::from_str(rest).map_err(|_| CommandError::UnknownVerb(rest.to_string()))?;
    Ok(Some(match verb.action() {
        Some(kind) => Command::Start(kind),
        None => Command::List,
    }))
}

/// Parses `text` and carries it out for `actor`.
pub fn dispatch(
    scheduler: &mut TaskScheduler,
    env: Env<'_>,
    actor: ActorId,
    text: &str,
) -> Result<Dispatched, CommandError> {
    let Some(command) = parse(text)? else {
        return Ok(Dispatched::Ignored);
    };

    match command {
        Command::List => {
            list_actions(env, actor);
            Ok(Dispatched::Listed)
        }
        Command::Start(kind) => Ok(Dispatched::Started(scheduler.start(env, actor, kind)?)),
        Command::Stop => Ok(Dispatched::Stopped(scheduler.stop(env, actor))),
    }
}

fn list_actions(env: Env<'_>, actor: ActorId) {
    let labels = |filter: fn(&ActionKind) -> bool| {
        ActionKind::ALL
            .iter()
            .filter(|kind| filter(kind))
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    env.notify(
        actor,
        NoticeSeverity::Normal,
        "I can do the following automatic actions:",
    );
    env.notify(actor, NoticeSeverity::Normal, &labels(|kind| kind.is_harvest()));
    env.notify(actor, NoticeSeverity::Normal, &labels(|kind| !kind.is_harvest()));
}
