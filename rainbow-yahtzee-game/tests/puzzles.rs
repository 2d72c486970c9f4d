use rainbow_yahtzee_game::puzzle::{catalog, validate_puzzle};
use rainbow_yahtzee_game::{
    Category, FailReason, GameMode, ObjectiveStatus, Puzzle, PuzzleAttempt, PuzzleError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn preset_puzzle(dice: [u8; 5], constraints: &str, kind: &str, value: &str) -> Puzzle {
    let json = format!(
        r#"{{"id":"custom","title":"Custom","gameMode":"classic","difficulty":"easy",
            "initialDice":{dice:?},
            "constraints":{constraints},
            "objective":{{"type":"{kind}","value":{value}}}}}"#
    );
    let puzzle: Puzzle = serde_json::from_str(&json).unwrap();
    validate_puzzle(&puzzle).unwrap();
    puzzle
}

#[test]
fn preset_three_of_a_kind_solves_immediately() {
    let puzzle = preset_puzzle([3, 3, 3, 5, 5], "{}", "specific_category", r#""threeOfKind""#);
    let mut attempt = PuzzleAttempt::new(&puzzle);
    assert_eq!(attempt.select(Category::ThreeOfKind), Ok(ObjectiveStatus::Solved));
    assert_eq!(attempt.completed()[&Category::ThreeOfKind], 19);

    let outcome = attempt.outcome().unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.score, 19);
}

#[test]
fn preset_pair_scores_zero_in_three_of_a_kind() {
    let puzzle = catalog().get("classic-easy-1").unwrap();
    assert_eq!(puzzle.initial_dice, vec![3, 3, 2, 5, 6]);
    let mut attempt = PuzzleAttempt::new(puzzle);
    assert_eq!(
        attempt.select(Category::ThreeOfKind),
        Ok(ObjectiveStatus::Failed(FailReason::ZeroScore))
    );
}

#[test]
fn minimum_objective_loses_on_final_roll_without_selection() {
    let puzzle = preset_puzzle(
        [1, 2, 3, 4, 5],
        r#"{"requiredCategories":["sixes"],"lockedDiceIndices":[0,1,2,3,4]}"#,
        "category_minimum",
        "24",
    );
    let mut attempt = PuzzleAttempt::new(&puzzle);
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    attempt.roll(&mut rng).unwrap();
    assert_eq!(attempt.status(), ObjectiveStatus::InProgress);
    attempt.roll(&mut rng).unwrap();
    assert_eq!(attempt.turn().hand().dice, [1, 2, 3, 4, 5]);
    assert!(attempt.turn().is_final_roll());

    assert_eq!(attempt.status(), ObjectiveStatus::Failed(FailReason::NoOuts));
    assert!(attempt.completed().is_empty());
    assert!(!attempt.outcome().unwrap().success);
    assert_eq!(attempt.select(Category::Sixes), Err(PuzzleError::AttemptOver));
}

#[test]
fn every_catalog_puzzle_can_be_played_to_an_end() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xD1CE);
    for puzzle in &catalog().puzzles {
        let mut attempt = PuzzleAttempt::new(puzzle);
        let mut guard = 0;
        while !attempt.is_over() {
            guard += 1;
            assert!(guard < 50, "{} never finished", puzzle.id);
            if attempt.turn().rolls_left() > 0 {
                attempt.roll(&mut rng).unwrap();
                if attempt.is_over() {
                    break;
                }
            }
            let (best, _) = attempt
                .potentials()
                .into_iter()
                .max_by_key(|&(_, score)| score)
                .unwrap();
            if attempt.turn().is_final_roll() {
                attempt.select(best).unwrap();
            }
        }
        let outcome = attempt.outcome().unwrap();
        assert_eq!(outcome.puzzle_id, puzzle.id);
        assert_eq!(outcome.mode, puzzle.game_mode);
        assert_eq!(outcome.success, outcome.fail_reason.is_none());
    }
}

#[test]
fn rainbow_preset_keeps_colors() {
    let puzzle = catalog().get("rainbow-easy-2").unwrap();
    let attempt = PuzzleAttempt::new(puzzle);
    assert_eq!(attempt.turn().mode(), GameMode::Rainbow);
    assert_eq!(attempt.potentials(), vec![(Category::RainbowBonus, 0)]);
    assert!(attempt.turn().hand().colors.iter().all(|c| !c.is_neutral()));
}
