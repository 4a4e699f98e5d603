//! Per-tick behaviour of a due actor.
//!
//! [`ActionExecutor::run`] applies the guards in a fixed order and then
//! dispatches on the action kind. It never touches the wheel itself: the
//! returned [`Step`] tells the scheduler whether to reschedule, wait for a
//! harvest callback, or stop.

use crate::action::ActionKind;
use crate::config::AutomationConfig;
use crate::env::{
    Env, FixtureKind, Hand, HarvestSystemId, InventoryError, InventoryOracle, ItemCategory,
    ItemInfo, NoticeSeverity, OracleError, RollContext, Skill, SurvivalFlags, compute_seed,
};
use crate::error::{AutomationError, ErrorSeverity};
use crate::locate::TargetLocator;
use crate::registry::{AutomationRegistry, RegistryError};
use crate::state::{ActorId, AutomationState, ItemId};

/// What the scheduler must do with an actor after it ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Put the actor back on the wheel after `delay` ticks.
    Reschedule(u32),
    /// A harvest subsystem owns the actor until it calls back.
    Delegated,
    /// Remove every trace of the actor.
    Halt(StopReason),
}

/// Terminal outcomes. Each maps to at most one player notice.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// The host cleared the automating flag; nothing is announced.
    Deregistered,
    /// The actor asked to stop.
    Requested,
    ForgotAction,
    Overweight,
    Starving,
    Moved,
    NoResources,
    FinishedHere,
    ToolProblem,
    OutOfTools,
    SkillTooLow,
    /// A recipe input ran out; carries the recipe name.
    MissingResources(&'static str),
    /// The water source or oven the recipe needs is gone.
    FixtureGone(ActionKind),
}

/// A message addressed to the actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn new(severity: NoticeSeverity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn notice(&self) -> Option<Notice> {
        use NoticeSeverity::{Error, Normal, Speech};
        let notice = match self {
            StopReason::Deregistered => return None,
            StopReason::Requested => Notice::new(Normal, "* Automatic action stopped! *"),
            StopReason::ForgotAction => Notice::new(Speech, "I forgot what I was doing..."),
            StopReason::Overweight => Notice::new(
                Error,
                "You are carrying far more than you can bear!",
            ),
            StopReason::Starving => Notice::new(
                Error,
                "I am too hungry or thirsty to do this right now.",
            ),
            StopReason::Moved => Notice::new(Error, "You moved and stopped the action."),
            StopReason::NoResources => Notice::new(Error, "No resources could be found nearby."),
            StopReason::FinishedHere => Notice::new(Speech, "*I think I am done here.*"),
            StopReason::ToolProblem => Notice::new(Speech, "There is a problem with my tool."),
            StopReason::OutOfTools => Notice::new(
                Speech,
                "*Ugh! I am out of tools.* My tool is worn out and there is no other in my pack.",
            ),
            StopReason::SkillTooLow => Notice::new(Speech, "I don't know how to make this yet."),
            StopReason::MissingResources(name) => Notice::new(
                Speech,
                format!("Hmm... something is missing to make this. ({name})"),
            ),
            StopReason::FixtureGone(ActionKind::MakeBread) => {
                Notice::new(Error, "You need an oven nearby to bake bread.")
            }
            StopReason::FixtureGone(_) => {
                Notice::new(Error, "You need a water source nearby to make dough.")
            }
        };
        Some(notice)
    }
}

/// Failures raised while running an actor.
///
/// Every variant ends the actor's automation with the tool-problem notice.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AutomationError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Oracle(err) => err.severity(),
            ExecuteError::Inventory(err) => err.severity(),
            ExecuteError::Registry(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Oracle(err) => err.error_code(),
            ExecuteError::Inventory(err) => err.error_code(),
            ExecuteError::Registry(err) => err.error_code(),
        }
    }
}

/// Harvest subsystem an action binds to. Mining defers to the host, which may
/// pick a special vein system for the tool.
pub(crate) fn bound_system(
    env: &Env<'_>,
    actor: ActorId,
    kind: ActionKind,
    tool: ItemId,
) -> Result<Option<HarvestSystemId>, OracleError> {
    match kind {
        ActionKind::Mining => Ok(Some(env.harvest()?.mining_system(actor, tool))),
        _ => Ok(kind.harvest_system()),
    }
}

/// First cooking tool in the pack that still has uses.
pub(crate) fn usable_cooking_tool(
    inventory: &dyn InventoryOracle,
    actor: ActorId,
) -> Option<ItemInfo> {
    inventory.find_usable(actor, ItemCategory::CookingTool)
}

/// Runs one action for one actor against the host.
#[derive(Clone, Copy, Debug)]
pub struct ActionExecutor<'a> {
    env: Env<'a>,
    base_seed: u64,
    nonce: u64,
}

impl<'a> ActionExecutor<'a> {
    /// `nonce` must differ for every dispatched action so rolls do not repeat.
    pub fn new(env: Env<'a>, base_seed: u64, nonce: u64) -> Self {
        Self {
            env,
            base_seed,
            nonce,
        }
    }

    pub fn run(
        &self,
        registry: &mut AutomationRegistry,
        actor: ActorId,
    ) -> Result<Step, ExecuteError> {
        let actors = self.env.actors()?;
        if !actors.is_automating(actor) {
            return Ok(Step::Halt(StopReason::Deregistered));
        }

        let state = registry
            .get(actor)
            .cloned()
            .ok_or(RegistryError::NotRegistered(actor))?;

        let kind = match state.kind {
            Some(kind) => kind,
            None => match self.recover(registry, actor, &state)? {
                Some(kind) => kind,
                None => return Ok(Step::Halt(StopReason::ForgotAction)),
            },
        };

        let flags = self.survival_flags(actor)?;
        self.feed(actor, flags)?;
        if flags.must_stop() {
            return Ok(Step::Halt(StopReason::Starving));
        }

        let position = actors
            .position(actor)
            .ok_or(OracleError::ActorNotFound(actor))?;
        if position != state.anchor {
            tracing::debug!(%actor, anchor = %state.anchor, %position, "actor moved");
            return Ok(Step::Halt(StopReason::Moved));
        }

        if flags.contains(SurvivalFlags::OVERLOADED) {
            return self.shed_load(actor, kind);
        }

        match kind {
            ActionKind::Skinning => self.skin(actor),
            ActionKind::Milling => self.mill(actor, state.tool),
            ActionKind::MakeDough | ActionKind::MakeBread => {
                self.cook(registry, actor, kind, state.tool)
            }
            ActionKind::Fishing | ActionKind::Mining | ActionKind::Lumberjacking => {
                self.harvest(registry, actor, kind)
            }
        }
    }

    /// Rebuilds a record that lost its kind from the tool it still holds.
    fn recover(
        &self,
        registry: &mut AutomationRegistry,
        actor: ActorId,
        state: &AutomationState,
    ) -> Result<Option<ActionKind>, ExecuteError> {
        let inventory = self.env.inventory()?;
        let tool = state
            .tool
            .and_then(|id| inventory.item(id))
            .or_else(|| inventory.held(actor, Hand::One))
            .or_else(|| inventory.held(actor, Hand::Two));

        let Some((tool, kind)) =
            tool.and_then(|tool| tool.category.implied_action().map(|kind| (tool, kind)))
        else {
            tracing::warn!(%actor, "automation record lost its action and no tool implies one");
            return Ok(None);
        };

        let system = bound_system(&self.env, actor, kind, tool.id)?;
        registry.update(actor, |state| {
            state.kind = Some(kind);
            state.tool = Some(tool.id);
            if state.harvest_system.is_none() {
                state.harvest_system = system;
            }
        })?;

        tracing::warn!(%actor, %kind, tool = %tool.id, "recovered automation record from held tool");
        Ok(Some(kind))
    }

    /// Sampled once per run, before the actor eats or drinks.
    fn survival_flags(&self, actor: ActorId) -> Result<SurvivalFlags, ExecuteError> {
        let vitals = self
            .env
            .actors()?
            .vitals(actor)
            .ok_or(OracleError::ActorNotFound(actor))?;
        Ok(vitals.flags())
    }

    /// Drops part of one resource stack at the actor's feet.
    fn shed_load(&self, actor: ActorId, kind: ActionKind) -> Result<Step, ExecuteError> {
        let inventory = self.env.inventory()?;
        let rng = self.env.rng()?;

        let resources = kind.overload_resources();
        let pick = rng.pick(self.seed(actor, RollContext::DropResource), resources.len());
        let stack = resources
            .get(pick)
            .and_then(|&category| inventory.find_by_category(actor, category))
            .filter(|stack| stack.amount > 0);

        let Some(stack) = stack else {
            return Ok(Step::Halt(StopReason::Overweight));
        };

        let cap = stack.amount / AutomationConfig::DROP_LOSS_DIVISOR;
        let loss = if cap > AutomationConfig::DROP_LOSS_MINIMUM {
            rng.range(
                self.seed(actor, RollContext::DropAmount),
                AutomationConfig::DROP_LOSS_MINIMUM,
                cap,
            )
        } else {
            AutomationConfig::DROP_LOSS_MINIMUM
        };
        let loss = loss.min(stack.amount);

        if let Err(err) = inventory.split_to_ground(actor, stack.id, loss) {
            tracing::warn!(%actor, error = %err, code = err.error_code(), "overload drop failed");
            return Ok(Step::Halt(StopReason::Overweight));
        }

        tracing::debug!(%actor, item = %stack.id, category = %stack.category, loss, "shed load");
        self.env.notify(actor, NoticeSeverity::Speech, "*argh!*");
        self.env.notify(
            actor,
            NoticeSeverity::Error,
            "You are too heavy and drop some items on the ground.",
        );
        Ok(Step::Reschedule(kind.delay()))
    }

    /// Eats and drinks from the pack when below the comfort thresholds.
    fn feed(&self, actor: ActorId, flags: SurvivalFlags) -> Result<(), ExecuteError> {
        let actors = self.env.actors()?;
        let inventory = self.env.inventory()?;

        if flags.contains(SurvivalFlags::HUNGRY) {
            if let Some(food) = inventory.find_by_category(actor, ItemCategory::Food) {
                if !actors.eat(actor, food.id) {
                    tracing::debug!(%actor, food = %food.id, "host refused to feed actor");
                }
            }
        }

        if flags.contains(SurvivalFlags::THIRSTY) {
            // Empty waterskins report no uses left.
            if let Some(water) = inventory.find_usable(actor, ItemCategory::Waterskin) {
                if !actors.drink(actor, water.id) {
                    tracing::debug!(%actor, water = %water.id, "host refused to let actor drink");
                }
            }
        }
        Ok(())
    }

    fn harvest(
        &self,
        registry: &mut AutomationRegistry,
        actor: ActorId,
        kind: ActionKind,
    ) -> Result<Step, ExecuteError> {
        let state = registry
            .get(actor)
            .cloned()
            .ok_or(RegistryError::NotRegistered(actor))?;
        let inventory = self.env.inventory()?;

        let Some(tool) = state.tool.and_then(|id| inventory.item(id)) else {
            return Ok(Step::Halt(StopReason::ToolProblem));
        };

        let harvest = self.env.harvest()?;
        let Some(system) = state
            .harvest_system
            .or(kind.harvest_system())
            .and_then(|id| harvest.subsystem(id))
        else {
            tracing::warn!(%actor, %kind, "harvest subsystem unavailable, retrying later");
            return Ok(Step::Reschedule(AutomationConfig::DELAY_DEFAULT));
        };

        let target = match state.target {
            Some(target) => target,
            None => {
                let radius = kind
                    .search_radius()
                    .unwrap_or(AutomationConfig::HARVEST_RADIUS_DEFAULT);
                let found =
                    TargetLocator::new(self.env).find(actor, kind, tool.id, system, radius)?;
                let Some(target) = found else {
                    return Ok(Step::Halt(StopReason::NoResources));
                };
                registry.update(actor, |state| state.target = Some(target))?;
                target
            }
        };

        system.begin_attempt(actor, tool.id, &target)?;
        tracing::debug!(%actor, %kind, system = %system.id(), position = %target.position, "harvest delegated");
        Ok(Step::Delegated)
    }

    fn skin(&self, actor: ActorId) -> Result<Step, ExecuteError> {
        let world = self.env.world()?;
        let corpses = TargetLocator::new(self.env).corpses_near(actor)?;

        let uncarved = corpses.iter().find(|corpse| {
            matches!(corpse.kind, FixtureKind::Corpse { carved: false, .. })
                && world.line_of_sight(actor, corpse.position, corpse.z)
        });

        if let Some(corpse) = uncarved {
            let Some(knife) = self
                .env
                .inventory()?
                .find_by_category(actor, ItemCategory::SkinningKnife)
            else {
                return Ok(Step::Halt(StopReason::ToolProblem));
            };
            world.carve_corpse(actor, corpse.id, knife.id)?;
            self.check_skill(
                actor,
                Skill::Forensics,
                AutomationConfig::BYPRODUCT_SKILL_MIN,
                AutomationConfig::BYPRODUCT_SKILL_MAX,
            )?;
            return Ok(Step::Reschedule(AutomationConfig::DELAY_SKINNING));
        }

        let with_hides = corpses.iter().filter(|corpse| {
            matches!(
                corpse.kind,
                FixtureKind::Corpse {
                    carved: true,
                    has_hides: true
                }
            )
        });
        for corpse in with_hides {
            let cut = world.cut_hides(actor, corpse.id)?;
            self.check_skill(
                actor,
                Skill::Tailoring,
                AutomationConfig::BYPRODUCT_SKILL_MIN,
                AutomationConfig::BYPRODUCT_SKILL_MAX,
            )?;
            if cut {
                return Ok(Step::Reschedule(AutomationConfig::DELAY_SKINNING));
            }
        }

        Ok(Step::Halt(StopReason::FinishedHere))
    }

    fn mill(&self, actor: ActorId, mill: Option<ItemId>) -> Result<Step, ExecuteError> {
        let world = self.env.world()?;
        let inventory = self.env.inventory()?;

        let Some(mill) = mill.and_then(|id| world.world_item(id)) else {
            return Ok(Step::Halt(StopReason::FinishedHere));
        };
        let FixtureKind::FlourMill { current, capacity } = mill.kind else {
            return Ok(Step::Halt(StopReason::FinishedHere));
        };
        let Some(wheat) = inventory.find_by_category(actor, ItemCategory::WheatSheaf) else {
            return Ok(Step::Halt(StopReason::FinishedHere));
        };

        let needs = capacity.saturating_sub(current).min(wheat.amount);
        if needs == 0 {
            return Ok(Step::Halt(StopReason::FinishedHere));
        }

        world.fill_mill(actor, mill.id, needs)?;
        inventory.consume(wheat.id, needs)?;
        self.check_skill(
            actor,
            Skill::Cooking,
            AutomationConfig::BYPRODUCT_SKILL_MIN,
            AutomationConfig::BYPRODUCT_SKILL_MAX,
        )?;

        tracing::debug!(%actor, mill = %mill.id, needs, "milled wheat");
        Ok(Step::Reschedule(AutomationConfig::DELAY_MILLING))
    }

    fn cook(
        &self,
        registry: &mut AutomationRegistry,
        actor: ActorId,
        kind: ActionKind,
        tool: Option<ItemId>,
    ) -> Result<Step, ExecuteError> {
        let Some(recipe) = kind.recipe() else {
            return Ok(Step::Halt(StopReason::ToolProblem));
        };

        let locator = TargetLocator::new(self.env);
        let fixture_present = match kind {
            ActionKind::MakeBread => locator.oven_nearby(actor)?,
            _ => locator.water_nearby(actor)?,
        };
        if !fixture_present {
            return Ok(Step::Halt(StopReason::FixtureGone(kind)));
        }

        let inventory = self.env.inventory()?;
        let tool = match tool
            .and_then(|id| inventory.item(id))
            .filter(|tool| !tool.is_worn_out())
        {
            Some(tool) => tool,
            None => {
                let Some(replacement) = usable_cooking_tool(inventory, actor) else {
                    return Ok(Step::Halt(StopReason::OutOfTools));
                };
                registry.update(actor, |state| state.tool = Some(replacement.id))?;
                tracing::debug!(%actor, tool = %replacement.id, "switched to replacement tool");
                replacement
            }
        };

        if self.env.actors()?.skill(actor, Skill::Cooking) < recipe.min_skill {
            return Ok(Step::Halt(StopReason::SkillTooLow));
        }

        let Some(input) = inventory
            .find_by_category(actor, recipe.input)
            .filter(|stack| stack.amount >= recipe.input_amount)
        else {
            return Ok(Step::Halt(StopReason::MissingResources(recipe.name)));
        };

        inventory.consume(input.id, recipe.input_amount)?;

        if self.check_skill(actor, Skill::Cooking, recipe.min_skill, recipe.max_skill)? {
            inventory.create_in_pack(actor, recipe.product)?;
            self.env.notify(
                actor,
                NoticeSeverity::Normal,
                &format!("Yay! I made some food ({}).", recipe.name),
            );
        } else {
            self.env.notify(
                actor,
                NoticeSeverity::Error,
                "You failed and wasted some resources.",
            );
        }

        let uses_left = inventory.spend_use(tool.id)?;
        tracing::debug!(%actor, recipe = recipe.name, uses_left, "cooked");
        Ok(Step::Reschedule(AutomationConfig::DELAY_CRAFTING))
    }

    fn check_skill(
        &self,
        actor: ActorId,
        skill: Skill,
        min: u32,
        max: u32,
    ) -> Result<bool, OracleError> {
        let roll = self
            .env
            .rng()?
            .roll_d100(self.seed(actor, RollContext::SkillCheck));
        Ok(self.env.actors()?.check_skill(actor, skill, min, max, roll))
    }

    fn seed(&self, actor: ActorId, context: RollContext) -> u64 {
        compute_seed(self.base_seed, self.nonce, actor.0, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_deregistration_is_silent() {
        assert!(StopReason::Deregistered.notice().is_none());
        for reason in [
            StopReason::Requested,
            StopReason::ForgotAction,
            StopReason::Overweight,
            StopReason::Starving,
            StopReason::Moved,
            StopReason::NoResources,
            StopReason::FinishedHere,
            StopReason::ToolProblem,
            StopReason::OutOfTools,
            StopReason::SkillTooLow,
            StopReason::MissingResources("dough"),
            StopReason::FixtureGone(ActionKind::MakeDough),
        ] {
            assert!(reason.notice().is_some(), "{} must announce itself", reason.as_str());
        }
    }

    #[test]
    fn fixture_notice_names_the_missing_fixture() {
        let oven = StopReason::FixtureGone(ActionKind::MakeBread).notice().unwrap();
        let water = StopReason::FixtureGone(ActionKind::MakeDough).notice().unwrap();
        assert!(oven.text.contains("oven"));
        assert!(water.text.contains("water"));
    }

    #[test]
    fn missing_resource_notice_names_recipe() {
        let notice = StopReason::MissingResources("bread").notice().unwrap();
        assert_eq!(notice.severity, NoticeSeverity::Speech);
        assert!(notice.text.ends_with("(bread)"));
        assert_eq!(StopReason::MissingResources("bread").as_str(), "missing_resources");
    }
}
