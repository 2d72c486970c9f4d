use rainbow_yahtzee_game::constants::DICE_PER_HAND;
use rainbow_yahtzee_game::scoring::{
    face_counts, score_full_house, score_rainbow_bonus, score_yahtzee,
};
use rainbow_yahtzee_game::{Category, DiceColor, GameMode, Hand, Scorecard, score_category};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn every_hand() -> impl Iterator<Item = [u8; DICE_PER_HAND]> {
    (0..6_u32.pow(5)).map(|mut n| {
        let mut dice = [0_u8; DICE_PER_HAND];
        for die in &mut dice {
            *die = u8::try_from(n % 6).unwrap() + 1;
            n /= 6;
        }
        dice
    })
}

#[test]
fn yahtzee_iff_five_equal() {
    for dice in every_hand() {
        let equal = dice.iter().all(|&d| d == dice[0]);
        assert_eq!(score_yahtzee(&dice) == 50, equal, "{dice:?}");
    }
}

#[test]
fn full_house_iff_two_and_three() {
    for dice in every_hand() {
        let mut counts: Vec<u8> = face_counts(&dice).into_iter().filter(|&c| c > 0).collect();
        counts.sort_unstable();
        let expected = counts == [2, 3];
        assert_eq!(score_full_house(&dice) == 25, expected, "{dice:?}");
    }
}

#[test]
fn rainbow_bonus_iff_five_distinct_colors() {
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    for _ in 0..2_000 {
        let colors: [DiceColor; DICE_PER_HAND] =
            std::array::from_fn(|_| DiceColor::PALETTE[rng.gen_range(0..DiceColor::PALETTE.len())]);
        let mut distinct = colors.to_vec();
        distinct.sort();
        distinct.dedup();
        assert_eq!(score_rainbow_bonus(&colors) == 50, distinct.len() == 5, "{colors:?}");
    }
}

#[test]
fn chance_and_kinds_never_exceed_thirty() {
    for dice in every_hand() {
        let hand = Hand::classic(dice);
        for category in [Category::Chance, Category::ThreeOfKind, Category::FourOfKind] {
            assert!(score_category(category, &hand) <= 30);
        }
    }
}

#[test]
fn grand_total_ignores_fill_order() {
    let mut rng = SmallRng::seed_from_u64(77);
    for mode in GameMode::ALL {
        let entries: Vec<(Category, u16)> = mode
            .categories()
            .iter()
            .map(|&c| (c, rng.gen_range(0..=50)))
            .collect();
        let reference = Scorecard::from_scores(mode, entries.clone()).unwrap();
        for _ in 0..20 {
            let mut shuffled = entries.clone();
            shuffled.shuffle(&mut rng);
            let mut card = Scorecard::new(mode);
            for (category, score) in shuffled {
                card.fill(category, score).unwrap();
            }
            assert_eq!(card.grand_total(), reference.grand_total());
            assert_eq!(card.totals(), reference.totals());
        }
    }
}

#[test]
fn upper_bonus_threshold() {
    let upper = |entries: &[(Category, u16)]| {
        Scorecard::from_scores(GameMode::Classic, entries.iter().copied()).unwrap()
    };

    let just_below = upper(&[
        (Category::Aces, 2),
        (Category::Twos, 4),
        (Category::Threes, 1),
        (Category::Fives, 25),
        (Category::Sixes, 30),
    ]);
    assert_eq!(just_below.upper_subtotal(), 62);
    assert_eq!(just_below.upper_bonus(), 0);

    let seven = upper(&[(Category::Aces, 3), (Category::Twos, 4)]);
    assert_eq!(seven.upper_subtotal(), 7);
    assert_eq!(seven.upper_bonus(), 0);

    let exact = upper(&[
        (Category::Aces, 3),
        (Category::Twos, 6),
        (Category::Threes, 9),
        (Category::Fours, 12),
        (Category::Fives, 15),
        (Category::Sixes, 18),
    ]);
    assert_eq!(exact.upper_subtotal(), 63);
    assert_eq!(exact.upper_bonus(), 35);
}
