//! End-to-end runs of the scheduler against the sandbox host.

use automation_content::{HarvestResult, Sandbox, ScenarioLoader};
use automation_core::{
    ActionKind, ActorId, ActorOracle, AutomationRegistry, AutomationState, Hand,
    HarvestSystemId, InventoryOracle, ItemCategory, NoticeSeverity, Position, StartError, Step,
    StopReason, TaskScheduler, Tick, TileLayer, command,
};

const HERO: ActorId = ActorId(1);

fn setup(text: &str) -> (Sandbox, TaskScheduler) {
    let scenario = ScenarioLoader::parse(text).expect("scenario parses");
    let sandbox = Sandbox::from_scenario(&scenario);
    let scheduler = TaskScheduler::new(scenario.seed);
    (sandbox, scheduler)
}

/// Runs `count` heartbeats, reporting harvest outcomes after each one.
fn run_ticks(sandbox: &Sandbox, scheduler: &mut TaskScheduler, count: usize) {
    for _ in 0..count {
        scheduler.tick(sandbox.env());
        sandbox.settle_harvests(scheduler);
    }
}

fn last_notice(sandbox: &Sandbox) -> String {
    sandbox
        .notices_for(HERO)
        .last()
        .map(|notice| notice.text.clone())
        .unwrap_or_default()
}

const FISHING: &str = r#"(
    seed: 7,
    actors: [
        (
            id: 1,
            position: (10, 10),
            hands: [(One, (category: FishingPole, uses: Some(20)))],
            pack: [(category: Food, amount: 2), (category: Waterskin, uses: Some(3))],
        ),
    ],
    ground: [(12, 10, 168, -5, Water)],
    harvest: [(system: Fishing, tiles: [(168, Fish, Fishing)], per_spot: 3)],
)"#;

#[test]
fn fishing_start_delegates_and_reschedules_on_completion() {
    let (sandbox, mut scheduler) = setup(FISHING);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    assert_eq!(step, Step::Delegated);
    assert!(sandbox.is_automating(HERO));

    let state = scheduler.state(HERO).unwrap();
    let target = state.target.unwrap();
    assert_eq!(target.position, Position::new(12, 10));
    assert_eq!(target.layer, TileLayer::Ground);
    assert!(
        !scheduler.wheel().is_scheduled(HERO),
        "delegated actors wait for the callback"
    );

    let outcomes = sandbox.drain_harvest_outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result, HarvestResult::Completed);
    assert!(outcomes[0].deliver(&mut scheduler, sandbox.env()));

    assert_eq!(scheduler.wheel().scheduled_tick(HERO), Some(Tick(3)));
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Fish), 1);
    assert!(
        sandbox.notices_for(HERO).is_empty(),
        "continuing is silent"
    );
}

#[test]
fn fishing_stops_once_the_spot_is_empty() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    sandbox.settle_harvests(&mut scheduler);

    // Second and third catches land on ticks 3 and 6; the spot runs dry on the third.
    run_ticks(&sandbox, &mut scheduler, 6);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Fish), 3);
    assert!(scheduler.is_automating(HERO));
    assert_eq!(scheduler.state(HERO).unwrap().target, None);

    run_ticks(&sandbox, &mut scheduler, 3);
    assert!(!scheduler.is_automating(HERO));
    assert!(!sandbox.is_automating(HERO));
    assert!(scheduler.wheel().is_empty());
    assert_eq!(last_notice(&sandbox), "No resources could be found nearby.");

    let pole = sandbox.held(HERO, Hand::One).unwrap();
    assert_eq!(pole.uses_remaining, Some(17));
}

#[test]
fn mining_with_empty_hands_is_refused() {
    let text = r#"(
        actors: [(id: 1, position: (4, 4))],
        harvest: [(system: Mining, tiles: [(220, Ore, Mining)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let err = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap_err();
    assert_eq!(err, StartError::NeedMiningTool);

    assert!(scheduler.registry().is_empty());
    assert!(scheduler.wheel().is_empty());
    assert!(!sandbox.is_automating(HERO));

    let notices = sandbox.notices_for(HERO);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Error);
    assert_eq!(
        notices[0].text,
        "You need to equip a pickaxe or carry a shovel to mine."
    );
}

#[test]
fn pack_shovel_is_enough_to_mine() {
    let text = r#"(
        actors: [(id: 1, position: (4, 4), pack: [(category: Shovel, uses: Some(5))])],
        ground: [(5, 4, 220, 0, Rock)],
        harvest: [(system: Mining, tiles: [(220, Ore, Mining)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(step, Step::Delegated);
    assert_eq!(sandbox.settle_harvests(&mut scheduler), 1);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Ore), 1);
}

const OVERLOADED_MINER: &str = r#"(
    seed: 11,
    actors: [
        (
            id: 1,
            position: (10, 10),
            max_weight: 400,
            hands: [(One, (category: Pickaxe, uses: Some(30)))],
            pack: [(category: Ore, amount: 50, weight: Some(10))],
        ),
    ],
    ground: [(11, 10, 220, 0, Rock)],
    harvest: [(system: Mining, tiles: [(220, Ore, Mining)])],
)"#;

#[test]
fn overweight_actor_drops_part_of_a_stack_and_carries_on() {
    let (sandbox, mut scheduler) = setup(OVERLOADED_MINER);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(step, Step::Reschedule(ActionKind::Mining.delay()));
    assert!(scheduler.wheel().is_scheduled(HERO));

    let kept = sandbox.pack_amount(HERO, ItemCategory::Ore);
    let dropped = sandbox.ground_amount(Position::new(10, 10), ItemCategory::Ore);
    assert!((1..=5).contains(&dropped), "lost {dropped} ore");
    assert_eq!(kept + dropped, 50);

    let notices = sandbox.notices_for(HERO);
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].severity, NoticeSeverity::Speech);
    assert_eq!(notices[0].text, "*argh!*");
    assert_eq!(
        notices[1].text,
        "You are too heavy and drop some items on the ground."
    );
    assert!(
        sandbox.drain_harvest_outcomes().is_empty(),
        "no harvest while overloaded"
    );
}

#[test]
fn overload_drop_is_deterministic_per_seed() {
    let dropped = || {
        let (sandbox, mut scheduler) = setup(OVERLOADED_MINER);
        scheduler
            .start(sandbox.env(), HERO, ActionKind::Mining)
            .unwrap();
        sandbox.ground_amount(Position::new(10, 10), ItemCategory::Ore)
    };
    assert_eq!(dropped(), dropped());
}

#[test]
fn overloaded_without_resources_to_drop_stops() {
    let text = r#"(
        actors: [
            (
                id: 1,
                position: (10, 10),
                base_weight: 500,
                hands: [(One, (category: Pickaxe))],
            ),
        ],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::Overweight));
    assert!(!scheduler.is_automating(HERO));
    assert_eq!(
        last_notice(&sandbox),
        "You are carrying far more than you can bear!"
    );
}

#[test]
fn moving_away_stops_and_clears_the_wheel() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    sandbox.settle_harvests(&mut scheduler);
    assert!(scheduler.wheel().is_scheduled(HERO));

    sandbox.move_actor(HERO, Position::new(11, 10));
    run_ticks(&sandbox, &mut scheduler, 3);

    assert!(!scheduler.is_automating(HERO));
    assert!(!scheduler.wheel().is_scheduled(HERO));
    assert!(scheduler.wheel().is_empty());
    assert!(!sandbox.is_automating(HERO));
    assert_eq!(last_notice(&sandbox), "You moved and stopped the action.");
}

#[test]
fn ground_water_wins_over_nearer_static_water() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), hands: [(One, (category: FishingPole))])],
        ground: [(14, 10, 168, -5, Water)],
        statics: [(11, 10, 0x1797, -5, Water)],
        harvest: [(system: Fishing, tiles: [(168, Fish, Fishing), (0x5797, Fish, Fishing)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();

    let target = scheduler.state(HERO).unwrap().target.unwrap();
    assert_eq!(target.layer, TileLayer::Ground);
    assert_eq!(target.position, Position::new(14, 10));
}

#[test]
fn static_targets_are_keyed_with_the_offset() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), hands: [(One, (category: FishingPole))])],
        statics: [(11, 10, 0x1797, -5, Water)],
        harvest: [(system: Fishing, tiles: [(0x5797, Fish, Fishing)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();

    let target = scheduler.state(HERO).unwrap().target.unwrap();
    assert_eq!(target.layer, TileLayer::Static);
    assert_eq!(target.tile.0, 0x5797);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Fish), 1);
}

#[test]
fn water_in_the_actors_own_column_is_never_found() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), hands: [(One, (category: FishingPole))])],
        ground: [(10, 12, 168, -5, Water), (10, 8, 168, -5, Water)],
        harvest: [(system: Fishing, tiles: [(168, Fish, Fishing)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::NoResources));
    assert!(!scheduler.is_automating(HERO));
}

#[test]
fn blocked_sight_skips_a_spot() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), hands: [(One, (category: FishingPole))])],
        ground: [(11, 10, 168, -5, Water), (12, 10, 168, -5, Water)],
        blocked_sight: [(11, 10)],
        harvest: [(system: Fishing, tiles: [(168, Fish, Fishing)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();

    let target = scheduler.state(HERO).unwrap().target.unwrap();
    assert_eq!(target.position, Position::new(12, 10));
}

#[test]
fn stop_is_idempotent_and_late_callbacks_are_ignored() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();

    assert!(scheduler.stop(sandbox.env(), HERO));
    assert_eq!(last_notice(&sandbox), "* Automatic action stopped! *");
    let count = sandbox.notices_for(HERO).len();

    assert!(!scheduler.stop(sandbox.env(), HERO));
    assert_eq!(sandbox.notices_for(HERO).len(), count);

    assert_eq!(sandbox.settle_harvests(&mut scheduler), 0);
    assert!(scheduler.wheel().is_empty());
    assert!(!sandbox.is_automating(HERO));
}

#[test]
fn second_start_is_refused_while_automating() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();

    let err = scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap_err();
    assert_eq!(err, StartError::AlreadyAutomating(HERO));
    assert!(last_notice(&sandbox).contains(".stop"));
    assert!(scheduler.is_automating(HERO));
}

#[test]
fn clearing_the_host_flag_stops_silently() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    sandbox.settle_harvests(&mut scheduler);

    sandbox.set_automating(HERO, false);
    run_ticks(&sandbox, &mut scheduler, 3);

    assert!(!scheduler.is_automating(HERO));
    assert!(sandbox.notices_for(HERO).is_empty());
}

#[test]
fn starving_actor_eats_then_stops() {
    let (sandbox, mut scheduler) = setup(FISHING);
    sandbox.set_hunger(HERO, 2, 20);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::Starving));

    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Food), 1);
    assert_eq!(sandbox.vitals(HERO).unwrap().hunger, 8);
    assert_eq!(
        last_notice(&sandbox),
        "I am too hungry or thirsty to do this right now."
    );
}

#[test]
fn thirsty_actor_drinks_and_continues() {
    let (sandbox, mut scheduler) = setup(FISHING);
    sandbox.set_hunger(HERO, 20, 10);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    assert_eq!(step, Step::Delegated);
    assert_eq!(sandbox.vitals(HERO).unwrap().thirst, 16);

    let skin = sandbox
        .find_by_category(HERO, ItemCategory::Waterskin)
        .unwrap();
    assert_eq!(skin.uses_remaining, Some(2));
}

#[test]
fn milling_fills_the_mill_and_finishes() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), pack: [(category: WheatSheaf, amount: 5)])],
        fixtures: [(position: (11, 10), kind: FlourMill(current: 0, capacity: 4))],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    let mill = sandbox.fixtures()[0].id;

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Milling)
        .unwrap();
    assert_eq!(step, Step::Reschedule(ActionKind::Milling.delay()));
    assert_eq!(sandbox.mill_contents(mill), Some(4));
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::WheatSheaf), 1);

    run_ticks(&sandbox, &mut scheduler, 3);
    assert!(!scheduler.is_automating(HERO));
    assert_eq!(last_notice(&sandbox), "*I think I am done here.*");
}

#[test]
fn milling_needs_a_mill_in_range() {
    let text = r#"(
        actors: [(id: 1, position: (10, 10), pack: [(category: WheatSheaf, amount: 5)])],
        fixtures: [(position: (20, 10), kind: FlourMill(current: 0, capacity: 4))],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let err = scheduler
        .start(sandbox.env(), HERO, ActionKind::Milling)
        .unwrap_err();
    assert_eq!(err, StartError::NeedFlourMill);
}

const BAKER: &str = r#"(
    actors: [
        (
            id: 1,
            position: (10, 10),
            skills: [(Cooking, 100)],
            pack: [
                (category: CookingTool, uses: Some(2)),
                (category: Dough, amount: 3),
            ],
        ),
    ],
    fixtures: [(position: (11, 10), kind: Oven)],
)"#;

#[test]
fn baking_wears_out_the_tool_then_stops() {
    let (sandbox, mut scheduler) = setup(BAKER);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::MakeBread)
        .unwrap();
    assert_eq!(step, Step::Reschedule(ActionKind::MakeBread.delay()));
    assert_eq!(last_notice(&sandbox), "Yay! I made some food (bread).");

    run_ticks(&sandbox, &mut scheduler, 3);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::BreadLoaf), 2);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Dough), 1);

    run_ticks(&sandbox, &mut scheduler, 3);
    assert!(!scheduler.is_automating(HERO));
    assert!(last_notice(&sandbox).contains("out of tools"));
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Dough), 1);
}

#[test]
fn baking_switches_to_a_spare_tool() {
    let text = r#"(
        actors: [
            (
                id: 1,
                position: (10, 10),
                skills: [(Cooking, 100)],
                pack: [
                    (category: CookingTool, uses: Some(1)),
                    (category: CookingTool, uses: Some(5)),
                    (category: Dough, amount: 3),
                ],
            ),
        ],
        fixtures: [(position: (11, 10), kind: Oven)],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::MakeBread)
        .unwrap();
    let first = scheduler.state(HERO).unwrap().tool;

    run_ticks(&sandbox, &mut scheduler, 3);
    assert!(scheduler.is_automating(HERO));
    assert_ne!(scheduler.state(HERO).unwrap().tool, first);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::BreadLoaf), 2);
}

#[test]
fn baking_stops_when_the_oven_disappears() {
    let (sandbox, mut scheduler) = setup(BAKER);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::MakeBread)
        .unwrap();

    let oven = sandbox.fixtures()[0].id;
    assert!(sandbox.remove_fixture(oven));
    run_ticks(&sandbox, &mut scheduler, 3);

    assert!(!scheduler.is_automating(HERO));
    assert_eq!(last_notice(&sandbox), "You need an oven nearby to bake bread.");
}

#[test]
fn bread_needs_enough_skill() {
    let text = r#"(
        actors: [
            (
                id: 1,
                position: (10, 10),
                skills: [(Cooking, 10)],
                pack: [(category: CookingTool, uses: Some(5)), (category: Dough, amount: 3)],
            ),
        ],
        fixtures: [(position: (11, 10), kind: Oven)],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::MakeBread)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::SkillTooLow));
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Dough), 3);
}

#[test]
fn making_dough_without_flour_reports_missing_resources() {
    let text = r#"(
        actors: [
            (
                id: 1,
                position: (10, 10),
                skills: [(Cooking, 50)],
                pack: [(category: CookingTool, uses: Some(5))],
            ),
        ],
        ground: [(11, 10, 168, -5, Water)],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::MakeDough)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::MissingResources("dough")));
    assert_eq!(
        last_notice(&sandbox),
        "Hmm... something is missing to make this. (dough)"
    );
}

#[test]
fn skinning_carves_then_cuts_hides() {
    let text = r#"(
        actors: [
            (
                id: 1,
                position: (10, 10),
                pack: [(category: SkinningKnife), (category: Scissors)],
            ),
        ],
        fixtures: [(position: (11, 11), kind: Corpse(carved: false, has_hides: true))],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Skinning)
        .unwrap();
    assert_eq!(step, Step::Reschedule(ActionKind::Skinning.delay()));

    run_ticks(&sandbox, &mut scheduler, 3);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Leather), 1);
    assert!(scheduler.is_automating(HERO));

    run_ticks(&sandbox, &mut scheduler, 3);
    assert!(!scheduler.is_automating(HERO));
    assert_eq!(last_notice(&sandbox), "*I think I am done here.*");
}

#[test]
fn lost_harvest_tool_ends_with_a_tool_problem() {
    let (sandbox, mut scheduler) = setup(FISHING);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Fishing)
        .unwrap();
    sandbox.settle_harvests(&mut scheduler);

    let pole = sandbox.held(HERO, Hand::One).unwrap().id;
    assert!(sandbox.destroy_item(pole));
    run_ticks(&sandbox, &mut scheduler, 3);

    assert!(!scheduler.is_automating(HERO));
    assert_eq!(last_notice(&sandbox), "There is a problem with my tool.");
}

#[test]
fn chat_commands_drive_the_scheduler() {
    let (sandbox, mut scheduler) = setup(FISHING);

    let listed = command::dispatch(&mut scheduler, sandbox.env(), HERO, ".auto-list").unwrap();
    assert_eq!(listed, command::Dispatched::Listed);
    assert_eq!(sandbox.notices_for(HERO).len(), 3);
    assert!(last_notice(&sandbox).contains("Auto-Bake"));

    let started = command::dispatch(&mut scheduler, sandbox.env(), HERO, ".Auto-Fish").unwrap();
    assert_eq!(started, command::Dispatched::Started(Step::Delegated));

    let ignored = command::dispatch(&mut scheduler, sandbox.env(), HERO, "hello").unwrap();
    assert_eq!(ignored, command::Dispatched::Ignored);

    let stopped = command::dispatch(&mut scheduler, sandbox.env(), HERO, ".stop").unwrap();
    assert_eq!(stopped, command::Dispatched::Stopped(true));
    assert!(!scheduler.is_automating(HERO));
}

#[test]
fn actors_sharing_a_bucket_run_in_start_order() {
    let text = r#"(
        actors: [
            (id: 1, position: (10, 10), pack: [(category: WheatSheaf, amount: 9)]),
            (id: 2, position: (30, 30), pack: [(category: WheatSheaf, amount: 9)]),
        ],
        fixtures: [
            (position: (11, 10), kind: FlourMill(current: 0, capacity: 30)),
            (position: (31, 30), kind: FlourMill(current: 0, capacity: 30)),
        ],
    )"#;
    let (sandbox, mut scheduler) = setup(text);
    scheduler
        .start(sandbox.env(), ActorId(2), ActionKind::Milling)
        .unwrap();
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Milling)
        .unwrap();

    let due = scheduler.wheel().bucket(Tick(3)).to_vec();
    assert_eq!(due, vec![ActorId(2), HERO]);

    scheduler.tick(sandbox.env());
    scheduler.tick(sandbox.env());
    let report = scheduler.tick(sandbox.env());
    assert_eq!(report.tick, Tick(3));
    assert_eq!(report.dispatched, 2);
    assert_eq!(report.stopped, 2, "both packs emptied on the first run");
}

const OVERLOADED_HUNGRY_MINER: &str = r#"(
    seed: 11,
    actors: [
        (
            id: 1,
            position: (10, 10),
            max_weight: 400,
            hands: [(One, (category: Pickaxe, uses: Some(30)))],
            pack: [(category: Ore, amount: 50, weight: Some(10)), (category: Food, amount: 3)],
        ),
    ],
    ground: [(11, 10, 220, 0, Rock)],
    harvest: [(system: Mining, tiles: [(220, Ore, Mining)])],
)"#;

#[test]
fn overloaded_starving_actor_eats_and_stops_without_dropping() {
    let (sandbox, mut scheduler) = setup(OVERLOADED_HUNGRY_MINER);
    sandbox.set_hunger(HERO, 2, 20);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(step, Step::Halt(StopReason::Starving));

    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Food), 2);
    assert_eq!(sandbox.vitals(HERO).unwrap().hunger, 8);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Ore), 50);
    assert_eq!(sandbox.ground_amount(Position::new(10, 10), ItemCategory::Ore), 0);
    assert!(!scheduler.is_automating(HERO));
    assert_eq!(
        sandbox.notices_for(HERO).len(),
        1,
        "only the stop is announced"
    );
}

#[test]
fn overloaded_actor_who_moved_stops_without_dropping() {
    let (sandbox, mut scheduler) = setup(OVERLOADED_HUNGRY_MINER);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    let carried = sandbox.pack_amount(HERO, ItemCategory::Ore);
    assert!(carried < 50, "first run sheds load in place");

    let away = Position::new(30, 30);
    sandbox.move_actor(HERO, away);
    run_ticks(&sandbox, &mut scheduler, ActionKind::Mining.delay() as usize);

    assert!(!scheduler.is_automating(HERO));
    assert!(scheduler.wheel().is_empty());
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Ore), carried);
    assert_eq!(sandbox.ground_amount(away, ItemCategory::Ore), 0);
    assert_eq!(last_notice(&sandbox), "You moved and stopped the action.");
}

#[test]
fn overloaded_actor_keeps_eating_between_drops() {
    let (sandbox, mut scheduler) = setup(OVERLOADED_HUNGRY_MINER);
    scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    sandbox.set_hunger(HERO, 10, 20);

    run_ticks(&sandbox, &mut scheduler, ActionKind::Mining.delay() as usize);

    assert!(scheduler.is_automating(HERO));
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Food), 2);
    assert_eq!(sandbox.vitals(HERO).unwrap().hunger, 16);
}

/// Registers `HERO` with a record that lost its action kind, due on tick 1.
fn desynced(sandbox: &Sandbox, seed: u64) -> TaskScheduler {
    let mut state = AutomationState::new(ActionKind::Fishing, Position::new(10, 10));
    state.kind = None;

    let mut registry = AutomationRegistry::new();
    registry.start(HERO, state).unwrap();
    registry.schedule_at(HERO, 1).unwrap();
    sandbox.set_automating(HERO, true);
    TaskScheduler::with_registry(seed, registry)
}

#[test]
fn lost_action_is_recovered_from_the_held_tool() {
    let (sandbox, _) = setup(FISHING);
    let mut scheduler = desynced(&sandbox, 7);

    let report = scheduler.tick(sandbox.env());
    assert_eq!(report.dispatched, 1);
    assert_eq!(report.delegated, 1);

    let pole = sandbox.held(HERO, Hand::One).unwrap();
    let state = scheduler.state(HERO).unwrap();
    assert_eq!(state.kind, Some(ActionKind::Fishing));
    assert_eq!(state.tool, Some(pole.id));
    assert_eq!(state.harvest_system, Some(HarvestSystemId::Fishing));
    assert_eq!(state.target.map(|t| t.position), Some(Position::new(12, 10)));

    assert_eq!(sandbox.settle_harvests(&mut scheduler), 1);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Fish), 1);
    assert_eq!(scheduler.wheel().scheduled_tick(HERO), Some(Tick(4)));
    assert!(sandbox.notices_for(HERO).is_empty());
}

#[test]
fn lost_action_without_a_telling_tool_is_forgotten() {
    let (sandbox, _) = setup(r#"(actors: [(id: 1, position: (10, 10))])"#);
    let mut scheduler = desynced(&sandbox, 1);

    let report = scheduler.tick(sandbox.env());
    assert_eq!(report.stopped, 1);

    assert!(!scheduler.is_automating(HERO));
    assert!(scheduler.wheel().is_empty());
    assert!(!sandbox.is_automating(HERO));
    let notices = sandbox.notices_for(HERO);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Speech);
    assert_eq!(notices[0].text, "I forgot what I was doing...");
}

const VEIN_MINER: &str = r#"(
    actors: [(id: 1, position: (4, 4), hands: [(One, (category: SturdyShovel, uses: Some(5)))])],
    ground: [(5, 4, 220, 0, Rock)],
    harvest: [
        (system: Mining, tiles: [(220, Ore, Mining)]),
        (system: DynamicMining, tiles: [(220, Ore, Mining)]),
    ],
)"#;

#[test]
fn sturdy_shovel_binds_the_vein_subsystem() {
    let (sandbox, mut scheduler) = setup(VEIN_MINER);

    let step = scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(step, Step::Delegated);
    assert_eq!(
        scheduler.state(HERO).unwrap().harvest_system,
        Some(HarvestSystemId::DynamicMining)
    );

    let outcomes = sandbox.drain_harvest_outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].system, HarvestSystemId::DynamicMining);
    assert_eq!(sandbox.pack_amount(HERO, ItemCategory::Ore), 1);
}

#[test]
fn sturdy_shovel_falls_back_to_plain_mining() {
    let text = r#"(
        actors: [(id: 1, position: (4, 4), hands: [(One, (category: SturdyShovel, uses: Some(5)))])],
        ground: [(5, 4, 220, 0, Rock)],
        harvest: [(system: Mining, tiles: [(220, Ore, Mining)])],
    )"#;
    let (sandbox, mut scheduler) = setup(text);

    scheduler
        .start(sandbox.env(), HERO, ActionKind::Mining)
        .unwrap();
    assert_eq!(
        scheduler.state(HERO).unwrap().harvest_system,
        Some(HarvestSystemId::Mining)
    );
}
