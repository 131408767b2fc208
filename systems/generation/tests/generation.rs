use ice_maze_core::CellKind;
use ice_maze_system_generation::{
    generate, Difficulty, GenerationError, GenerationPlan, GenerationTuning,
};
use ice_maze_system_movement::simulate;

fn relaxed_plan(level: u8) -> GenerationPlan {
    let difficulty = Difficulty::new(level).expect("valid difficulty");
    let tuning = GenerationTuning {
        min_size: Some(14),
        max_size: Some(18),
        min_turns: Some(2),
        max_attempts: None,
    };
    GenerationPlan::resolve(difficulty, &tuning).expect("valid plan")
}

#[test]
fn difficulty_outside_range_is_rejected() {
    assert_eq!(Difficulty::new(0), Err(GenerationError::InvalidDifficulty(0)));
    assert_eq!(Difficulty::new(6), Err(GenerationError::InvalidDifficulty(6)));
    for level in 1..=5 {
        assert_eq!(Difficulty::new(level).map(|d| d.get()), Ok(level));
    }
}

#[test]
fn plan_scales_with_difficulty() {
    let difficulty = Difficulty::new(3).expect("valid difficulty");
    let plan = GenerationPlan::resolve(difficulty, &GenerationTuning::default())
        .expect("default plan");

    assert_eq!(plan.min_size(), 14);
    assert_eq!(plan.max_size(), 39);
    assert_eq!(plan.min_turns(), 18);
    assert_eq!(plan.max_attempts(), 1_000);
    assert_eq!(plan.difficulty(), difficulty);
}

#[test]
fn tuning_overrides_only_named_fields() {
    let tuning: GenerationTuning =
        toml::from_str("min_turns = 4\nmax_attempts = 25\n").expect("tuning parses");
    let difficulty = Difficulty::new(1).expect("valid difficulty");
    let plan = GenerationPlan::resolve(difficulty, &tuning).expect("valid plan");

    assert_eq!(plan.min_turns(), 4);
    assert_eq!(plan.max_attempts(), 25);
    assert_eq!(plan.min_size(), 10);
    assert_eq!(plan.max_size(), 23);
}

#[test]
fn unknown_tuning_keys_are_rejected() {
    let parsed: Result<GenerationTuning, _> = toml::from_str("seed = 4\n");
    assert!(parsed.is_err(), "unknown keys must not be silently ignored");
}

#[test]
fn inconsistent_tuning_is_rejected() {
    let difficulty = Difficulty::new(2).expect("valid difficulty");

    let inverted = GenerationTuning {
        min_size: Some(20),
        max_size: Some(12),
        ..GenerationTuning::default()
    };
    assert!(matches!(
        GenerationPlan::resolve(difficulty, &inverted),
        Err(GenerationError::InvalidTuning(_))
    ));

    let huge = GenerationTuning {
        max_size: Some(70_000),
        ..GenerationTuning::default()
    };
    assert!(matches!(
        GenerationPlan::resolve(difficulty, &huge),
        Err(GenerationError::InvalidTuning(_))
    ));

    let largest = GenerationTuning {
        max_size: Some(1_024),
        ..GenerationTuning::default()
    };
    assert_eq!(
        GenerationPlan::resolve(difficulty, &largest).map(|plan| plan.max_size()),
        Ok(1_024)
    );

    let tiny = GenerationTuning {
        min_size: Some(3),
        ..GenerationTuning::default()
    };
    assert!(matches!(
        GenerationPlan::resolve(difficulty, &tiny),
        Err(GenerationError::InvalidTuning(_))
    ));
}

#[test]
fn generated_map_is_solvable_and_hard_enough() {
    for level in 1..=5 {
        let plan = relaxed_plan(level);
        let map = generate(&plan, 0x5eed_0000 + u64::from(level)).expect("map generated");

        assert!(map.solution.turns() >= plan.min_turns());
        assert!(map.attempts >= 1 && map.attempts <= plan.max_attempts());
        assert!((14..=18).contains(&map.grid.columns()));
        assert!((14..=18).contains(&map.grid.rows()));
        assert_eq!(map.grid.kind_at(map.entrance), Some(CellKind::Entrance));
        assert_eq!(map.grid.kind_at(map.exit), Some(CellKind::Exit));

        let mut cell = map.entrance;
        for direction in map.solution.inputs() {
            cell = simulate(&map.grid, cell, *direction)
                .resting_cell()
                .expect("solution inputs always move the actor");
        }
        assert_eq!(cell, map.exit, "solution must lead to the exit");
    }
}

#[test]
fn same_seed_generates_same_map() {
    let plan = relaxed_plan(4);

    let first = generate(&plan, 42).expect("map generated");
    let second = generate(&plan, 42).expect("map generated");

    assert_eq!(first, second, "generation diverged between runs");
}

#[test]
fn impossible_turn_target_exhausts_attempts() {
    let difficulty = Difficulty::new(1).expect("valid difficulty");
    let tuning = GenerationTuning {
        min_size: Some(6),
        max_size: Some(6),
        min_turns: Some(10_000),
        max_attempts: Some(3),
    };
    let plan = GenerationPlan::resolve(difficulty, &tuning).expect("valid plan");

    assert_eq!(
        generate(&plan, 9),
        Err(GenerationError::AttemptsExhausted { attempts: 3 })
    );
}
