use bitflags::bitflags;

use crate::config::AutomationConfig;
use crate::state::{ActorId, ItemId, Position};

/// Host view of the actors that may run automation.
///
/// Queries about an unknown actor answer as if the actor were absent:
/// `None` for positions and vitals, `false` for predicates.
pub trait ActorOracle {
    fn position(&self, actor: ActorId) -> Option<Position>;

    fn is_alive(&self, actor: ActorId) -> bool;

    fn has_backpack(&self, actor: ActorId) -> bool;

    /// Whether the actor stands on a map where automation is allowed.
    fn in_valid_map(&self, actor: ActorId) -> bool;

    /// The persisted automating flag. It is the only automation state the
    /// host keeps across restarts.
    fn is_automating(&self, actor: ActorId) -> bool;

    fn set_automating(&self, actor: ActorId, automating: bool);

    fn vitals(&self, actor: ActorId) -> Option<Vitals>;

    /// Current skill value in whole points, 0 to 100.
    fn skill(&self, actor: ActorId, skill: Skill) -> u32;

    /// Resolves a skill check from a d100 `roll` and lets the host apply gains.
    ///
    /// The default succeeds with chance `(value - min) / (max - min)`, never
    /// below `min` and always at or above `max`.
    fn check_skill(&self, actor: ActorId, skill: Skill, min: u32, max: u32, roll: u32) -> bool {
        skill_check_passes(self.skill(actor, skill), min, max, roll)
    }

    /// Eats one unit of `food`. Returns false when the host refused.
    fn eat(&self, actor: ActorId, food: ItemId) -> bool;

    /// Drinks from `water`. Returns false when the host refused.
    fn drink(&self, actor: ActorId, water: ItemId) -> bool;
}

/// Deterministic form of the linear skill chance used by [`ActorOracle::check_skill`].
pub fn skill_check_passes(value: u32, min: u32, max: u32, roll: u32) -> bool {
    if value < min {
        return false;
    }
    if value >= max || max <= min {
        return true;
    }
    // roll is 1..=100; success when roll/100 <= (value-min)/(max-min)
    roll * (max - min) <= (value - min) * 100
}

/// Skills the built-in handlers check.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Skill {
    Cooking,
    Forensics,
    Tailoring,
    Fishing,
    Mining,
    Lumberjacking,
}

/// Survival numbers the guards read each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hunger: u32,
    pub thirst: u32,
    /// Total weight carried in the backpack.
    pub weight: u32,
    pub max_weight: u32,
}

bitflags! {
    /// Survival conditions derived from [`Vitals`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SurvivalFlags: u8 {
        /// Carrying at least the overload share of capacity.
        const OVERLOADED = 1 << 0;
        /// Below the eating threshold.
        const HUNGRY = 1 << 1;
        /// Below the drinking threshold.
        const THIRSTY = 1 << 2;
        /// At or below the hunger floor; automation must stop.
        const STARVING = 1 << 3;
        /// At or below the thirst floor; automation must stop.
        const PARCHED = 1 << 4;
    }
}

impl Vitals {
    pub fn is_overloaded(&self) -> bool {
        self.weight as u64 * 100 >= self.max_weight as u64 * AutomationConfig::OVERLOAD_PERCENT as u64
    }

    pub fn flags(&self) -> SurvivalFlags {
        let mut flags = SurvivalFlags::empty();
        flags.set(SurvivalFlags::OVERLOADED, self.is_overloaded());
        flags.set(SurvivalFlags::HUNGRY, self.hunger < AutomationConfig::EAT_BELOW);
        flags.set(SurvivalFlags::THIRSTY, self.thirst < AutomationConfig::DRINK_BELOW);
        flags.set(
            SurvivalFlags::STARVING,
            self.hunger <= AutomationConfig::HUNGER_FLOOR,
        );
        flags.set(
            SurvivalFlags::PARCHED,
            self.thirst <= AutomationConfig::THIRST_FLOOR,
        );
        flags
    }
}

impl SurvivalFlags {
    /// Either floor has been reached.
    pub fn must_stop(self) -> bool {
        self.intersects(SurvivalFlags::STARVING | SurvivalFlags::PARCHED)
    }
}
