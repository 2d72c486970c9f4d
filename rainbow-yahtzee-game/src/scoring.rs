//! Pure scoring functions for every category of both rulesets.
//!
//! Nothing here holds state; callers pass a [`Hand`] and receive the points
//! that hand would earn in a category. Unrolled faces (`0`) never match a
//! pattern, so a blank hand scores zero everywhere.

use crate::category::Category;
use crate::constants::{
    ALL_COLOR_SCORE, FOUR_COLOR_MIX_SCORE, FULL_HOUSE_SCORE, LARGE_STRAIGHT_RUNS,
    LARGE_STRAIGHT_SCORE, MAX_FACE, RAINBOW_BONUS_SCORE, SMALL_STRAIGHT_RUNS,
    SMALL_STRAIGHT_SCORE, THREE_COLOR_MIX_SCORE, YAHTZEE_SCORE,
};
use crate::dice::{Colors, Dice, DiceColor, Hand};

/// Occurrences of each face, indexed by face value (index 0 counts unrolled dice).
#[must_use]
pub fn face_counts(dice: &Dice) -> [u8; MAX_FACE as usize + 1] {
    let mut counts = [0_u8; MAX_FACE as usize + 1];
    for &face in dice {
        if let Some(slot) = counts.get_mut(usize::from(face)) {
            *slot += 1;
        }
    }
    counts
}

fn rolled_counts(dice: &Dice) -> impl Iterator<Item = u8> {
    face_counts(dice).into_iter().skip(1).filter(|&n| n > 0)
}

fn has_face(dice: &Dice, face: u8) -> bool {
    face != 0 && dice.contains(&face)
}

fn dice_sum(dice: &Dice) -> u16 {
    dice.iter().map(|&face| u16::from(face)).sum()
}

/// Upper-section score: matching dice times the face value.
#[must_use]
pub fn score_upper(dice: &Dice, face: u8) -> u16 {
    if face == 0 {
        return 0;
    }
    let matches = dice.iter().filter(|&&d| d == face).count();
    u16::try_from(matches).unwrap_or(0) * u16::from(face)
}

/// Sum of all dice when at least `min` share a face.
#[must_use]
pub fn score_of_a_kind(dice: &Dice, min: u8) -> u16 {
    if rolled_counts(dice).any(|n| n >= min) {
        dice_sum(dice)
    } else {
        0
    }
}

#[must_use]
pub fn score_full_house(dice: &Dice) -> u16 {
    let mut counts: Vec<u8> = rolled_counts(dice).collect();
    counts.sort_unstable();
    if counts == [2, 3] { FULL_HOUSE_SCORE } else { 0 }
}

#[must_use]
pub fn score_small_straight(dice: &Dice) -> u16 {
    let hit = SMALL_STRAIGHT_RUNS
        .iter()
        .any(|run| run.iter().all(|&face| has_face(dice, face)));
    if hit { SMALL_STRAIGHT_SCORE } else { 0 }
}

#[must_use]
pub fn score_large_straight(dice: &Dice) -> u16 {
    let hit = LARGE_STRAIGHT_RUNS
        .iter()
        .any(|run| run.iter().all(|&face| has_face(dice, face)));
    if hit { LARGE_STRAIGHT_SCORE } else { 0 }
}

#[must_use]
pub fn score_yahtzee(dice: &Dice) -> u16 {
    if Hand::classic(*dice).is_five_of_a_kind() {
        YAHTZEE_SCORE
    } else {
        0
    }
}

#[must_use]
pub fn score_chance(dice: &Dice) -> u16 {
    dice_sum(dice)
}

/// Number of distinct non-neutral colors showing.
#[must_use]
pub fn distinct_colors(colors: &Colors) -> usize {
    DiceColor::PALETTE
        .iter()
        .filter(|color| colors.contains(color))
        .count()
}

/// 50 when every die shows `color`. Neutral never qualifies.
#[must_use]
pub fn score_all_color(colors: &Colors, color: DiceColor) -> u16 {
    if !color.is_neutral() && colors.iter().all(|&c| c == color) {
        ALL_COLOR_SCORE
    } else {
        0
    }
}

/// Mix score when exactly `distinct` colors are present.
#[must_use]
pub fn score_color_mix(colors: &Colors, distinct: usize) -> u16 {
    if colors.iter().any(|c| c.is_neutral()) || distinct_colors(colors) != distinct {
        return 0;
    }
    match distinct {
        3 => THREE_COLOR_MIX_SCORE,
        4 => FOUR_COLOR_MIX_SCORE,
        _ => 0,
    }
}

/// 50 when the five dice show the five palette colors exactly once each.
#[must_use]
pub fn score_rainbow_bonus(colors: &Colors) -> u16 {
    if distinct_colors(colors) == DiceColor::PALETTE.len() {
        RAINBOW_BONUS_SCORE
    } else {
        0
    }
}

/// Highest score any hand can earn in `category`.
#[must_use]
pub const fn max_score(category: Category) -> u16 {
    match category.face() {
        Some(face) => face as u16 * 5,
        None => match category {
            Category::ThreeOfKind | Category::FourOfKind | Category::Chance => 30,
            Category::FullHouse => FULL_HOUSE_SCORE,
            Category::SmallStraight => SMALL_STRAIGHT_SCORE,
            Category::LargeStraight => LARGE_STRAIGHT_SCORE,
            Category::Yahtzee => YAHTZEE_SCORE,
            Category::ThreeColorMix => THREE_COLOR_MIX_SCORE,
            Category::FourColorMix => FOUR_COLOR_MIX_SCORE,
            Category::RainbowBonus => RAINBOW_BONUS_SCORE,
            _ => ALL_COLOR_SCORE,
        },
    }
}

/// Score `hand` in `category`.
#[must_use]
pub fn score_category(category: Category, hand: &Hand) -> u16 {
    let dice = &hand.dice;
    let colors = &hand.colors;
    match category {
        Category::Aces
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => score_upper(dice, category.face().unwrap_or(0)),
        Category::ThreeOfKind => score_of_a_kind(dice, 3),
        Category::FourOfKind => score_of_a_kind(dice, 4),
        Category::FullHouse => score_full_house(dice),
        Category::SmallStraight => score_small_straight(dice),
        Category::LargeStraight => score_large_straight(dice),
        Category::Yahtzee => score_yahtzee(dice),
        Category::Chance => score_chance(dice),
        Category::AllRed
        | Category::AllBlue
        | Category::AllGreen
        | Category::AllYellow
        | Category::AllPurple => {
            category
                .color()
                .map_or(0, |color| score_all_color(colors, color))
        }
        Category::ThreeColorMix => score_color_mix(colors, 3),
        Category::FourColorMix => score_color_mix(colors, 4),
        Category::RainbowBonus => score_rainbow_bonus(colors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DiceColor::{Blue, Green, Purple, Red, Yellow};

    #[test]
    fn upper_counts_matching_faces() {
        assert_eq!(score_upper(&[3, 3, 2, 5, 3], 3), 9);
        assert_eq!(score_upper(&[1, 2, 4, 5, 6], 3), 0);
        assert_eq!(score_upper(&[0, 0, 0, 0, 0], 0), 0);
    }

    #[test]
    fn of_a_kind_sums_all_dice() {
        assert_eq!(score_of_a_kind(&[3, 3, 2, 5, 3], 3), 16);
        assert_eq!(score_of_a_kind(&[3, 3, 2, 5, 3], 4), 0);
        assert_eq!(score_of_a_kind(&[6, 6, 6, 6, 1], 4), 25);
        assert_eq!(score_of_a_kind(&[0, 0, 0, 0, 0], 3), 0);
    }

    #[test]
    fn full_house_requires_two_and_three() {
        assert_eq!(score_full_house(&[2, 2, 5, 5, 5]), 25);
        assert_eq!(score_full_house(&[5, 5, 5, 5, 5]), 0);
        assert_eq!(score_full_house(&[2, 2, 5, 5, 1]), 0);
    }

    #[test]
    fn straights() {
        assert_eq!(score_small_straight(&[1, 2, 3, 4, 6]), 30);
        assert_eq!(score_small_straight(&[6, 4, 3, 5, 3]), 30);
        assert_eq!(score_small_straight(&[1, 2, 3, 5, 6]), 0);
        assert_eq!(score_large_straight(&[5, 4, 3, 2, 1]), 40);
        assert_eq!(score_large_straight(&[2, 3, 4, 5, 6]), 40);
        assert_eq!(score_large_straight(&[1, 2, 3, 4, 6]), 0);
        assert_eq!(score_small_straight(&[1, 2, 3, 4, 5]), 30);
    }

    #[test]
    fn yahtzee_and_chance() {
        assert_eq!(score_yahtzee(&[4, 4, 4, 4, 4]), 50);
        assert_eq!(score_yahtzee(&[0, 0, 0, 0, 0]), 0);
        assert_eq!(score_chance(&[1, 2, 3, 4, 6]), 16);
    }

    #[test]
    fn color_categories() {
        assert_eq!(score_all_color(&[Red; 5], Red), 50);
        assert_eq!(score_all_color(&[Red, Red, Red, Red, Blue], Red), 0);
        assert_eq!(score_all_color(&[DiceColor::Neutral; 5], DiceColor::Neutral), 0);
        assert_eq!(score_color_mix(&[Red, Red, Blue, Green, Green], 3), 20);
        assert_eq!(score_color_mix(&[Red, Yellow, Blue, Green, Green], 4), 30);
        assert_eq!(score_color_mix(&[Red, Yellow, Blue, Green, Green], 3), 0);
        assert_eq!(score_rainbow_bonus(&[Red, Blue, Green, Yellow, Purple]), 50);
        assert_eq!(score_rainbow_bonus(&[Red, Blue, Green, Yellow, Yellow]), 0);
    }

    #[test]
    fn classic_hand_scores_zero_in_color_categories() {
        let hand = Hand::classic([1, 2, 3, 4, 5]);
        for category in Category::COLOR {
            assert_eq!(score_category(category, &hand), 0, "{category}");
        }
    }

    #[test]
    fn dispatch_matches_direct_functions() {
        let hand = Hand::rainbow([6, 6, 6, 2, 2], [Purple; 5]);
        assert_eq!(score_category(Category::Sixes, &hand), 18);
        assert_eq!(score_category(Category::FullHouse, &hand), 25);
        assert_eq!(score_category(Category::ThreeOfKind, &hand), 22);
        assert_eq!(score_category(Category::AllPurple, &hand), 50);
        assert_eq!(score_category(Category::AllRed, &hand), 0);
        assert_eq!(score_category(Category::Chance, &hand), 22);
    }
}
