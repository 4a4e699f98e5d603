//! Public entry points: start, stop, tick and the harvest callbacks.

use crate::action::ActionKind;
use crate::env::{
    Env, Hand, InventoryOracle, ItemCategory, ItemInfo, NoticeSeverity, OracleError,
};
use crate::error::{AutomationError, ErrorSeverity};
use crate::execute::{
    ActionExecutor, Notice, Step, StopReason, bound_system, usable_cooking_tool,
};
use crate::locate::TargetLocator;
use crate::registry::{AutomationRegistry, RegistryError};
use crate::schedule::{TickClock, TimerWheel};
use crate::state::{ActorId, AutomationState, ItemId, Tick};

/// Reasons a start request is refused. Nothing is registered when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("actor {0} is already automating")]
    AlreadyAutomating(ActorId),

    #[error("actor {0} has no backpack")]
    NoBackpack(ActorId),

    #[error("actor {0} is dead")]
    Dead(ActorId),

    #[error("actor {0} is on a map without automation")]
    InvalidLocation(ActorId),

    #[error("no fishing pole in hand")]
    NeedFishingPole,

    #[error("no mining tool in hand or shovel in the pack")]
    NeedMiningTool,

    #[error("no axe in either hand")]
    NeedAxe,

    #[error("skinning knife or scissors missing from the pack")]
    NeedSkinningTools,

    #[error("no wheat in the pack")]
    NeedWheat,

    #[error("no flour mill in range")]
    NeedFlourMill,

    #[error("no water source in range")]
    NeedWater,

    #[error("no oven in range")]
    NeedOven,

    #[error("no usable cooking tool for {0}")]
    NeedCookingTool(&'static str),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl StartError {
    /// Player-facing explanation. Host faults are reported as a tool problem.
    pub fn notice(&self) -> Notice {
        use NoticeSeverity::{Error, Speech};
        match self {
            StartError::AlreadyAutomating(_) | StartError::Registry(_) => Notice::new(
                Error,
                "You are already doing an automatic task. To stop it, type '.stop'.",
            ),
            StartError::NoBackpack(_) => {
                Notice::new(Error, "You do not have a backpack for some reason.")
            }
            StartError::Dead(_) => Notice::new(Error, "You are dead and cannot do that."),
            StartError::InvalidLocation(_) => {
                Notice::new(Error, "You are in an invalid location!")
            }
            StartError::NeedFishingPole => {
                Notice::new(Error, "You need to hold a fishing pole to fish.")
            }
            StartError::NeedMiningTool => Notice::new(
                Error,
                "You need to equip a pickaxe or carry a shovel to mine.",
            ),
            StartError::NeedAxe => Notice::new(Error, "You need to hold an axe to chop trees."),
            StartError::NeedSkinningTools => Notice::new(
                Error,
                "You need a knife and scissors in your backpack to do that.",
            ),
            StartError::NeedWheat => {
                Notice::new(Error, "You need wheat in your backpack to grind flour!")
            }
            StartError::NeedFlourMill => {
                Notice::new(Error, "You need to be near a flour mill to grind wheat.")
            }
            StartError::NeedWater => {
                Notice::new(Error, "You need a water source nearby to make dough.")
            }
            StartError::NeedOven => Notice::new(Error, "You need an oven nearby to bake bread."),
            StartError::NeedCookingTool(name) => {
                Notice::new(Error, format!("You need the proper tool to make {name}."))
            }
            StartError::Oracle(_) => Notice::new(Speech, "There is a problem with my tool."),
        }
    }
}

impl AutomationError for StartError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StartError::Oracle(err) => err.severity(),
            StartError::Registry(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StartError::AlreadyAutomating(_) => "START_ALREADY_AUTOMATING",
            StartError::NoBackpack(_) => "START_NO_BACKPACK",
            StartError::Dead(_) => "START_DEAD",
            StartError::InvalidLocation(_) => "START_INVALID_LOCATION",
            StartError::NeedFishingPole => "START_NEED_FISHING_POLE",
            StartError::NeedMiningTool => "START_NEED_MINING_TOOL",
            StartError::NeedAxe => "START_NEED_AXE",
            StartError::NeedSkinningTools => "START_NEED_SKINNING_TOOLS",
            StartError::NeedWheat => "START_NEED_WHEAT",
            StartError::NeedFlourMill => "START_NEED_FLOUR_MILL",
            StartError::NeedWater => "START_NEED_WATER",
            StartError::NeedOven => "START_NEED_OVEN",
            StartError::NeedCookingTool(_) => "START_NEED_COOKING_TOOL",
            StartError::Oracle(err) => err.error_code(),
            StartError::Registry(err) => err.error_code(),
        }
    }
}

/// Summary of one heartbeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Actors taken from the due bucket.
    pub dispatched: usize,
    pub stopped: usize,
    pub rescheduled: usize,
    /// Actors handed to a harvest subsystem.
    pub delegated: usize,
}

/// Owns every automation record and drives them from the heartbeat.
///
/// The host is passed in on each call as an [`Env`]; the scheduler keeps no
/// reference to it between calls.
#[derive(Clone, Debug, Default)]
pub struct TaskScheduler {
    registry: AutomationRegistry,
    seed: u64,
    nonce: u64,
}

impl TaskScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            registry: AutomationRegistry::new(),
            seed,
            nonce: 0,
        }
    }

    /// Starts with the clock at `tick` instead of zero.
    pub fn with_clock(seed: u64, tick: Tick) -> Self {
        Self {
            registry: AutomationRegistry::with_wheel(TimerWheel::with_clock(
                TickClock::starting_at(tick),
            )),
            seed,
            nonce: 0,
        }
    }

    /// Resumes from existing records, for example ones restored by the host.
    pub fn with_registry(seed: u64, registry: AutomationRegistry) -> Self {
        Self {
            registry,
            seed,
            nonce: 0,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.registry.wheel().current()
    }

    pub fn registry(&self) -> &AutomationRegistry {
        &self.registry
    }

    pub fn wheel(&self) -> &TimerWheel {
        self.registry.wheel()
    }

    pub fn state(&self, actor: ActorId) -> Option<&AutomationState> {
        self.registry.get(actor)
    }

    pub fn is_automating(&self, actor: ActorId) -> bool {
        self.registry.contains(actor)
    }

    /// Number of actions dispatched so far; feeds the roll seeds.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Validates the actor and its tools, registers it, and runs the first
    /// action immediately.
    ///
    /// On refusal the actor is told why and nothing is registered.
    pub fn start(
        &mut self,
        env: Env<'_>,
        actor: ActorId,
        kind: ActionKind,
    ) -> Result<Step, StartError> {
        match self.try_start(env, actor, kind) {
            Ok(state) => {
                tracing::info!(%actor, %kind, tool = ?state.tool, anchor = %state.anchor, "automation started");
                let step = self.dispatch(env, actor);
                self.apply(env, actor, step.clone());
                Ok(step)
            }
            Err(err) => {
                tracing::debug!(%actor, %kind, code = err.error_code(), error = %err, "start refused");
                let notice = err.notice();
                env.notify(actor, notice.severity, &notice.text);
                Err(err)
            }
        }
    }

    fn try_start(
        &mut self,
        env: Env<'_>,
        actor: ActorId,
        kind: ActionKind,
    ) -> Result<AutomationState, StartError> {
        let actors = env.actors()?;
        if actors.is_automating(actor) || self.registry.contains(actor) {
            return Err(StartError::AlreadyAutomating(actor));
        }
        if !actors.has_backpack(actor) {
            return Err(StartError::NoBackpack(actor));
        }
        if !actors.is_alive(actor) {
            return Err(StartError::Dead(actor));
        }
        if !actors.in_valid_map(actor) {
            return Err(StartError::InvalidLocation(actor));
        }

        let tool = resolve_tool(env, actor, kind)?;
        let system = match tool {
            Some(tool) => bound_system(&env, actor, kind, tool)?,
            None => None,
        };
        let anchor = actors
            .position(actor)
            .ok_or(OracleError::ActorNotFound(actor))?;

        let state = AutomationState::new(kind, anchor)
            .with_tool(tool)
            .with_harvest_system(system);
        self.registry.start(actor, state.clone())?;
        actors.set_automating(actor, true);
        Ok(state)
    }

    /// Stops the actor on request. Repeated calls are no-ops.
    ///
    /// Returns true when something was stopped.
    pub fn stop(&mut self, env: Env<'_>, actor: ActorId) -> bool {
        let flagged = env
            .actors()
            .map(|actors| actors.is_automating(actor))
            .unwrap_or(false);
        if !flagged && !self.registry.contains(actor) {
            return false;
        }
        self.halt(env, actor, StopReason::Requested);
        true
    }

    /// Advances the clock one slot and runs every actor due on it.
    pub fn tick(&mut self, env: Env<'_>) -> TickReport {
        let wheel = self.registry.wheel_mut();
        let tick = wheel.advance();
        let due = wheel.take_due();

        let mut report = TickReport {
            tick,
            dispatched: due.len(),
            ..TickReport::default()
        };

        for actor in due {
            let step = self.dispatch(env, actor);
            match self.apply(env, actor, step) {
                Applied::Rescheduled => report.rescheduled += 1,
                Applied::Delegated => report.delegated += 1,
                Applied::Stopped => report.stopped += 1,
            }
        }

        if report.dispatched > 0 {
            tracing::debug!(
                tick = %report.tick,
                dispatched = report.dispatched,
                rescheduled = report.rescheduled,
                delegated = report.delegated,
                stopped = report.stopped,
                "tick"
            );
        }
        report
    }

    /// The harvest attempt finished; run again after the action's delay.
    pub fn harvest_completed(&mut self, env: Env<'_>, actor: ActorId) -> bool {
        let Some(kind) = self.registry.get(actor).map(|state| state.kind) else {
            tracing::debug!(%actor, "harvest completion for an actor no longer automating");
            return false;
        };
        self.apply(env, actor, Step::Reschedule(ActionKind::delay_or_default(kind)));
        true
    }

    /// The located spot ran dry; search again on the next run.
    pub fn harvest_depleted(&mut self, env: Env<'_>, actor: ActorId) -> bool {
        let Ok(kind) = self.registry.update(actor, |state| {
            state.target = None;
            state.kind
        }) else {
            return false;
        };
        tracing::debug!(%actor, "harvest spot depleted");
        self.apply(env, actor, Step::Reschedule(ActionKind::delay_or_default(kind)));
        true
    }

    /// The harvest subsystem gave up on the attempt.
    pub fn harvest_aborted(&mut self, env: Env<'_>, actor: ActorId) -> bool {
        if !self.registry.contains(actor) {
            return false;
        }
        self.apply(env, actor, Step::Halt(StopReason::ToolProblem));
        true
    }

    fn dispatch(&mut self, env: Env<'_>, actor: ActorId) -> Step {
        self.nonce += 1;
        let executor = ActionExecutor::new(env, self.seed, self.nonce);
        match executor.run(&mut self.registry, actor) {
            Ok(step) => step,
            Err(err) => {
                tracing::warn!(
                    %actor,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    error = %err,
                    "action failed"
                );
                Step::Halt(StopReason::ToolProblem)
            }
        }
    }

    fn apply(&mut self, env: Env<'_>, actor: ActorId, step: Step) -> Applied {
        match step {
            Step::Reschedule(delay) => match self.registry.schedule_at(actor, i64::from(delay)) {
                Ok(_) => Applied::Rescheduled,
                Err(err) => {
                    tracing::warn!(%actor, error = %err, "reschedule without a record");
                    self.halt(env, actor, StopReason::ToolProblem);
                    Applied::Stopped
                }
            },
            Step::Delegated => Applied::Delegated,
            Step::Halt(reason) => {
                self.halt(env, actor, reason);
                Applied::Stopped
            }
        }
    }

    fn halt(&mut self, env: Env<'_>, actor: ActorId, reason: StopReason) {
        let removed = self.registry.stop(actor);
        match env.actors() {
            Ok(actors) => actors.set_automating(actor, false),
            Err(err) => tracing::warn!(%actor, error = %err, "could not clear automating flag"),
        }
        if let Some(notice) = reason.notice() {
            env.notify(actor, notice.severity, &notice.text);
        }
        tracing::info!(
            %actor,
            reason = reason.as_str(),
            kind = ?removed.and_then(|state| state.kind),
            "automation stopped"
        );
    }
}

enum Applied {
    Rescheduled,
    Delegated,
    Stopped,
}

/// Finds the tool or fixture an action starts with, checking its prerequisites.
fn resolve_tool(
    env: Env<'_>,
    actor: ActorId,
    kind: ActionKind,
) -> Result<Option<ItemId>, StartError> {
    let inventory = env.inventory()?;
    let locator = TargetLocator::new(env);

    let tool = match kind {
        ActionKind::Fishing => inventory
            .held(actor, Hand::One)
            .filter(|item| item.category == ItemCategory::FishingPole)
            .ok_or(StartError::NeedFishingPole)?,
        ActionKind::Mining => inventory
            .held(actor, Hand::One)
            .filter(|item| item.category.is_mining_tool())
            .or_else(|| pack_shovel(inventory, actor))
            .ok_or(StartError::NeedMiningTool)?,
        ActionKind::Lumberjacking => [Hand::One, Hand::Two]
            .into_iter()
            .filter_map(|hand| inventory.held(actor, hand))
            .find(|item| item.category.is_lumber_tool())
            .ok_or(StartError::NeedAxe)?,
        ActionKind::Skinning => {
            let knife = inventory.find_by_category(actor, ItemCategory::SkinningKnife);
            let scissors = inventory.find_by_category(actor, ItemCategory::Scissors);
            if knife.is_none() || scissors.is_none() {
                return Err(StartError::NeedSkinningTools);
            }
            return Ok(None);
        }
        ActionKind::Milling => {
            if inventory
                .find_by_category(actor, ItemCategory::WheatSheaf)
                .is_none()
            {
                return Err(StartError::NeedWheat);
            }
            let mill = locator
                .nearest_mill(actor)?
                .ok_or(StartError::NeedFlourMill)?;
            return Ok(Some(mill.id));
        }
        ActionKind::MakeDough | ActionKind::MakeBread => {
            let (present, missing, name) = match kind {
                ActionKind::MakeBread => (locator.oven_nearby(actor)?, StartError::NeedOven, "bread"),
                _ => (locator.water_nearby(actor)?, StartError::NeedWater, "dough"),
            };
            if !present {
                return Err(missing);
            }
            usable_cooking_tool(inventory, actor).ok_or(StartError::NeedCookingTool(name))?
        }
    };
    Ok(Some(tool.id))
}

fn pack_shovel(inventory: &dyn InventoryOracle, actor: ActorId) -> Option<ItemInfo> {
    ItemCategory::PACK_SHOVELS
        .into_iter()
        .find_map(|category| inventory.find_by_category(actor, category))
}
