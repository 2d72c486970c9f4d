//! Rules constants for Rainbow Yahtzee scoring and turn flow.
//!
//! Category payouts, the upper bonus and the statistic thresholds used by
//! the achievement tallies. Both rulesets read the same table.

// Dice ---------------------------------------------------------------------
pub const DICE_PER_HAND: usize = 5;
pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;
pub const MAX_ROLLS_PER_TURN: u8 = 3;

// Fixed-value categories ---------------------------------------------------
pub const FULL_HOUSE_SCORE: u16 = 25;
pub const SMALL_STRAIGHT_SCORE: u16 = 30;
pub const LARGE_STRAIGHT_SCORE: u16 = 40;
pub const YAHTZEE_SCORE: u16 = 50;

// Color categories ---------------------------------------------------------
pub const ALL_COLOR_SCORE: u16 = 50;
pub const THREE_COLOR_MIX_SCORE: u16 = 20;
pub const FOUR_COLOR_MIX_SCORE: u16 = 30;
pub const RAINBOW_BONUS_SCORE: u16 = 50;

// Aggregates ---------------------------------------------------------------
pub const UPPER_BONUS_THRESHOLD: u32 = 63;
pub const UPPER_BONUS_SCORE: u32 = 35;
pub const BONUS_YAHTZEE_SCORE: u32 = 100;

// Straights ----------------------------------------------------------------
pub(crate) const SMALL_STRAIGHT_RUNS: [[u8; 4]; 3] = [[1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]];
pub(crate) const LARGE_STRAIGHT_RUNS: [[u8; 5]; 2] = [[1, 2, 3, 4, 5], [2, 3, 4, 5, 6]];

// Statistics thresholds ----------------------------------------------------
pub(crate) const STAT_THREE_OF_KIND_HIGH: u16 = 20;
pub(crate) const STAT_FOUR_OF_KIND_HIGH: u16 = 25;
pub(crate) const STAT_FOUR_OF_KIND_ELITE: u16 = 30;
pub(crate) const STAT_CLASSIC_ELITE_SCORE: u32 = 275;
pub(crate) const STAT_RAINBOW_ELITE_SCORE: u32 = 400;

