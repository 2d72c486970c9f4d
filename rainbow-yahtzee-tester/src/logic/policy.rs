use std::fmt;

use rainbow_yahtzee_game::constants::{DICE_PER_HAND, MAX_FACE};
use rainbow_yahtzee_game::scoring::max_score;
use rainbow_yahtzee_game::{Category, DiceColor, Hand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Dice to keep before the next roll.
    fn holds(&mut self, hand: &Hand, open: &[Category]) -> [bool; DICE_PER_HAND];

    /// Category to score from the open categories and what each would pay.
    fn pick_category(&mut self, potentials: &[(Category, u16)]) -> Option<Category>;

    /// Stop rolling early. Defaults to standing on any hand that already
    /// pays the most its category can.
    fn stands(&mut self, potentials: &[(Category, u16)]) -> bool {
        potentials
            .iter()
            .any(|&(category, score)| score > 0 && score == max_score(category))
    }
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameplayStrategy {
    /// Chase the most common face and take the best paying box.
    Greedy,
    /// Chase the most common color when a color box is open.
    ColorChaser,
    /// Hold and score at random.
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Greedy, Self::ColorChaser, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greedy => "Greedy",
            Self::ColorChaser => "Color Chaser",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Greedy => Box::new(GreedyPolicy),
            Self::ColorChaser => Box::new(ColorChaserPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct GreedyPolicy;
struct ColorChaserPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x5EED_D1CE),
        }
    }
}

/// Face showing most often, higher faces winning ties.
fn most_common_face(hand: &Hand) -> u8 {
    (1..=MAX_FACE)
        .max_by_key(|&face| (hand.dice.iter().filter(|&&d| d == face).count(), face))
        .unwrap_or(MAX_FACE)
}

fn most_common_color(hand: &Hand) -> Option<(DiceColor, usize)> {
    DiceColor::PALETTE
        .iter()
        .map(|&color| (color, hand.colors.iter().filter(|&&c| c == color).count()))
        .max_by_key(|&(_, count)| count)
}

fn hold_face(hand: &Hand) -> [bool; DICE_PER_HAND] {
    let face = most_common_face(hand);
    std::array::from_fn(|i| hand.dice[i] == face)
}

/// Best paying category; when nothing pays, sacrifice the box worth least.
fn best_category(potentials: &[(Category, u16)]) -> Option<Category> {
    let best = potentials.iter().max_by_key(|&&(_, score)| score)?;
    if best.1 > 0 {
        return Some(best.0);
    }
    potentials
        .iter()
        .min_by_key(|&&(category, _)| max_score(category))
        .map(|&(category, _)| category)
}

impl PlayerPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn holds(&mut self, hand: &Hand, _open: &[Category]) -> [bool; DICE_PER_HAND] {
        hold_face(hand)
    }

    fn pick_category(&mut self, potentials: &[(Category, u16)]) -> Option<Category> {
        best_category(potentials)
    }
}

impl PlayerPolicy for ColorChaserPolicy {
    fn name(&self) -> &'static str {
        "Color Chaser"
    }

    fn holds(&mut self, hand: &Hand, open: &[Category]) -> [bool; DICE_PER_HAND] {
        let color_open = open.iter().any(|c| c.is_color());
        match most_common_color(hand) {
            Some((color, count)) if color_open && count >= 2 => {
                std::array::from_fn(|i| hand.colors[i] == color)
            }
            _ => hold_face(hand),
        }
    }

    fn pick_category(&mut self, potentials: &[(Category, u16)]) -> Option<Category> {
        let color_hit = potentials
            .iter()
            .filter(|(category, score)| category.is_color() && *score > 0)
            .max_by_key(|&&(_, score)| score);
        color_hit.map(|&(category, _)| category).or_else(|| best_category(potentials))
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn holds(&mut self, _hand: &Hand, _open: &[Category]) -> [bool; DICE_PER_HAND] {
        std::array::from_fn(|_| self.rng.gen_bool(0.5))
    }

    fn pick_category(&mut self, potentials: &[(Category, u16)]) -> Option<Category> {
        if potentials.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..potentials.len());
        potentials.get(index).map(|&(category, _)| category)
    }

    fn stands(&mut self, _potentials: &[(Category, u16)]) -> bool {
        self.rng.gen_bool(0.2)
    }
}
