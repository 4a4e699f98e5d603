//! Scenario loader.
//!
//! A scenario describes a small patch of world: terrain, statics, fixtures,
//! harvest tables and the actors standing in it, with their hands and packs.
//! Omitted actor fields take the values of a healthy, unburdened player.

use std::collections::HashSet;
use std::path::Path;

use automation_core::{
    AutomationConfig, FixtureKind, Hand, HarvestSystemId, ItemCategory, Skill, TerrainKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Full contents of a scenario RON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Base seed for the scheduler's rolls.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    /// Ground overrides: (x, y, tile id, z, terrain). Other cells are plain ground.
    #[serde(default)]
    pub ground: Vec<(i32, i32, u16, i8, TerrainKind)>,
    /// Statics, bottom to top per cell: (x, y, tile id, z, terrain).
    #[serde(default)]
    pub statics: Vec<(i32, i32, u16, i8, TerrainKind)>,
    #[serde(default)]
    pub fixtures: Vec<FixtureSpec>,
    #[serde(default)]
    pub harvest: Vec<HarvestSpec>,
    /// Cells an actor cannot see.
    #[serde(default)]
    pub blocked_sight: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub position: (i32, i32),
    #[serde(default = "default_vital")]
    pub hunger: u32,
    #[serde(default = "default_vital")]
    pub thirst: u32,
    /// Weight carried besides the listed pack items.
    #[serde(default)]
    pub base_weight: u32,
    #[serde(default = "default_capacity")]
    pub max_weight: u32,
    #[serde(default)]
    pub skills: Vec<(Skill, u32)>,
    #[serde(default)]
    pub hands: Vec<(Hand, ItemSpec)>,
    #[serde(default)]
    pub pack: Vec<ItemSpec>,
    #[serde(default = "yes")]
    pub alive: bool,
    #[serde(default = "yes")]
    pub backpack: bool,
    #[serde(default = "yes")]
    pub valid_map: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub category: ItemCategory,
    #[serde(default = "one")]
    pub amount: u32,
    /// Remaining uses for tools that wear out.
    #[serde(default)]
    pub uses: Option<u32>,
    /// Weight per unit; the sandbox default for the category when absent.
    #[serde(default)]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSpec {
    pub position: (i32, i32),
    #[serde(default)]
    pub z: i8,
    pub kind: FixtureKind,
}

/// One harvest subsystem and the tiles it can work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestSpec {
    pub system: HarvestSystemId,
    /// (definition key, resource, skill). Static tiles are keyed with the static offset.
    pub tiles: Vec<(u16, ItemCategory, Skill)>,
    /// Harvests each spot yields before it is depleted.
    #[serde(default = "default_per_spot")]
    pub per_spot: u32,
}

fn default_vital() -> u32 {
    20
}

fn default_capacity() -> u32 {
    400
}

fn default_per_spot() -> u32 {
    10
}

fn yes() -> bool {
    true
}

fn one() -> u32 {
    1
}

impl Scenario {
    /// Rejects scenarios the sandbox cannot represent.
    pub fn validate(&self) -> LoadResult<()> {
        let mut ids = HashSet::new();
        for actor in &self.actors {
            if !ids.insert(actor.id) {
                anyhow::bail!("Duplicate actor id {} in scenario", actor.id);
            }
            let mut hands = HashSet::new();
            for (hand, _) in &actor.hands {
                if !hands.insert(*hand) {
                    anyhow::bail!("Actor {} holds two items in hand {:?}", actor.id, hand);
                }
            }
        }

        let mut stacks = std::collections::HashMap::new();
        for &(x, y, ..) in &self.statics {
            let count = stacks.entry((x, y)).or_insert(0usize);
            *count += 1;
            if *count > AutomationConfig::MAX_STATICS_PER_TILE {
                anyhow::bail!(
                    "Cell ({}, {}) stacks more than {} statics",
                    x,
                    y,
                    AutomationConfig::MAX_STATICS_PER_TILE
                );
            }
        }

        let mut systems = HashSet::new();
        for spec in &self.harvest {
            if !systems.insert(spec.system) {
                anyhow::bail!("Harvest system {} defined twice", spec.system);
            }
        }

        for fixture in &self.fixtures {
            if let FixtureKind::FlourMill { current, capacity } = fixture.kind {
                if current > capacity {
                    anyhow::bail!(
                        "Flour mill at {:?} holds {} over its capacity {}",
                        fixture.position,
                        current,
                        capacity
                    );
                }
            }
        }
        Ok(())
    }
}

/// Loader for scenario RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load and validate a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a scenario from RON text.
    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"(
        seed: 9,
        actors: [
            (
                id: 1,
                position: (10, 10),
                hands: [(One, (category: FishingPole, uses: Some(20)))],
                pack: [(category: Food, amount: 3)],
            ),
        ],
        ground: [(12, 10, 168, -5, Water)],
        fixtures: [(position: (11, 11), kind: FlourMill(current: 0, capacity: 10))],
        harvest: [(system: Fishing, tiles: [(168, Fish, Fishing)])],
    )"#;

    #[test]
    fn omitted_fields_take_defaults() {
        let scenario = ScenarioLoader::parse(MINIMAL).unwrap();
        assert_eq!(scenario.seed, 9);

        let actor = &scenario.actors[0];
        assert_eq!(actor.hunger, 20);
        assert_eq!(actor.max_weight, 400);
        assert!(actor.alive && actor.backpack && actor.valid_map);
        assert_eq!(actor.hands[0].1.uses, Some(20));
        assert_eq!(actor.pack[0].amount, 3);
        assert_eq!(scenario.harvest[0].per_spot, 10);
        assert!(scenario.statics.is_empty());
    }

    #[test]
    fn duplicate_actor_is_rejected() {
        let text = r#"(actors: [(id: 1, position: (0, 0)), (id: 1, position: (1, 1))])"#;
        let err = ScenarioLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate actor id 1"));
    }

    #[test]
    fn overfull_mill_is_rejected() {
        let text = r#"(fixtures: [(position: (0, 0), kind: FlourMill(current: 11, capacity: 10))])"#;
        assert!(ScenarioLoader::parse(text).is_err());
    }

    #[test]
    fn malformed_text_reports_parse_failure() {
        let err = ScenarioLoader::parse("(actors: [").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse scenario RON"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let scenario = ScenarioLoader::load(file.path()).unwrap();
        assert_eq!(scenario.actors.len(), 1);
        assert_eq!(scenario.fixtures.len(), 1);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ron");
        let err = ScenarioLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.ron"));
    }
}
