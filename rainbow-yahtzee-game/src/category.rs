//! Rulesets and scorecard categories.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dice::DiceColor;

/// Ruleset a game or puzzle is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Rainbow,
}

impl GameMode {
    pub const ALL: [Self; 2] = [Self::Classic, Self::Rainbow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Rainbow => "rainbow",
        }
    }

    #[must_use]
    pub const fn is_rainbow(self) -> bool {
        matches!(self, Self::Rainbow)
    }

    /// Every category a scorecard of this ruleset carries, in card order.
    #[must_use]
    pub const fn categories(self) -> &'static [Category] {
        match self {
            Self::Classic => &Category::CLASSIC,
            Self::Rainbow => &Category::ALL,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Self::Classic),
            "rainbow" => Ok(Self::Rainbow),
            _ => Err(()),
        }
    }
}

/// Section of the scorecard a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Upper,
    Lower,
    Color,
}

/// One scoring slot on a scorecard. Serialized with the camelCase keys used
/// by saved scorecards and puzzle definitions (`threeOfKind`, `allRed`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Aces,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfKind,
    FourOfKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
    AllRed,
    AllBlue,
    AllGreen,
    AllYellow,
    AllPurple,
    ThreeColorMix,
    FourColorMix,
    RainbowBonus,
}

impl Category {
    pub const UPPER: [Self; 6] = [
        Self::Aces,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
    ];

    pub const LOWER: [Self; 7] = [
        Self::ThreeOfKind,
        Self::FourOfKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    pub const COLOR: [Self; 8] = [
        Self::AllRed,
        Self::AllBlue,
        Self::AllGreen,
        Self::AllYellow,
        Self::AllPurple,
        Self::ThreeColorMix,
        Self::FourColorMix,
        Self::RainbowBonus,
    ];

    /// The five single-color categories.
    pub const ALL_COLORS: [Self; 5] = [
        Self::AllRed,
        Self::AllBlue,
        Self::AllGreen,
        Self::AllYellow,
        Self::AllPurple,
    ];

    pub const CLASSIC: [Self; 13] = [
        Self::Aces,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfKind,
        Self::FourOfKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    pub const ALL: [Self; 21] = [
        Self::Aces,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfKind,
        Self::FourOfKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
        Self::AllRed,
        Self::AllBlue,
        Self::AllGreen,
        Self::AllYellow,
        Self::AllPurple,
        Self::ThreeColorMix,
        Self::FourColorMix,
        Self::RainbowBonus,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aces => "aces",
            Self::Twos => "twos",
            Self::Threes => "threes",
            Self::Fours => "fours",
            Self::Fives => "fives",
            Self::Sixes => "sixes",
            Self::ThreeOfKind => "threeOfKind",
            Self::FourOfKind => "fourOfKind",
            Self::FullHouse => "fullHouse",
            Self::SmallStraight => "smallStraight",
            Self::LargeStraight => "largeStraight",
            Self::Yahtzee => "yahtzee",
            Self::Chance => "chance",
            Self::AllRed => "allRed",
            Self::AllBlue => "allBlue",
            Self::AllGreen => "allGreen",
            Self::AllYellow => "allYellow",
            Self::AllPurple => "allPurple",
            Self::ThreeColorMix => "threeColorMix",
            Self::FourColorMix => "fourColorMix",
            Self::RainbowBonus => "rainbowBonus",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aces => "Aces",
            Self::Twos => "Twos",
            Self::Threes => "Threes",
            Self::Fours => "Fours",
            Self::Fives => "Fives",
            Self::Sixes => "Sixes",
            Self::ThreeOfKind => "3 of a Kind",
            Self::FourOfKind => "4 of a Kind",
            Self::FullHouse => "Full House",
            Self::SmallStraight => "Small Straight",
            Self::LargeStraight => "Large Straight",
            Self::Yahtzee => "Yahtzee",
            Self::Chance => "Chance",
            Self::AllRed => "All Red",
            Self::AllBlue => "All Blue",
            Self::AllGreen => "All Green",
            Self::AllYellow => "All Yellow",
            Self::AllPurple => "All Purple",
            Self::ThreeColorMix => "3-Color Mix",
            Self::FourColorMix => "4-Color Mix",
            Self::RainbowBonus => "Rainbow Bonus",
        }
    }

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::Aces | Self::Twos | Self::Threes | Self::Fours | Self::Fives | Self::Sixes => {
                Section::Upper
            }
            Self::ThreeOfKind
            | Self::FourOfKind
            | Self::FullHouse
            | Self::SmallStraight
            | Self::LargeStraight
            | Self::Yahtzee
            | Self::Chance => Section::Lower,
            _ => Section::Color,
        }
    }

    /// Scored from die colors rather than faces.
    #[must_use]
    pub const fn is_color(self) -> bool {
        matches!(self.section(), Section::Color)
    }

    /// Face value counted by an upper-section category.
    #[must_use]
    pub const fn face(self) -> Option<u8> {
        match self {
            Self::Aces => Some(1),
            Self::Twos => Some(2),
            Self::Threes => Some(3),
            Self::Fours => Some(4),
            Self::Fives => Some(5),
            Self::Sixes => Some(6),
            _ => None,
        }
    }

    /// Color required by a single-color category.
    #[must_use]
    pub const fn color(self) -> Option<DiceColor> {
        match self {
            Self::AllRed => Some(DiceColor::Red),
            Self::AllBlue => Some(DiceColor::Blue),
            Self::AllGreen => Some(DiceColor::Green),
            Self::AllYellow => Some(DiceColor::Yellow),
            Self::AllPurple => Some(DiceColor::Purple),
            _ => None,
        }
    }

    /// Whether a scorecard of `mode` carries this category.
    #[must_use]
    pub const fn belongs_to(self, mode: GameMode) -> bool {
        match mode {
            GameMode::Classic => !self.is_color(),
            GameMode::Rainbow => true,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_category_counts() {
        assert_eq!(GameMode::Classic.categories().len(), 13);
        assert_eq!(GameMode::Rainbow.categories().len(), 21);
        assert!(
            GameMode::Classic
                .categories()
                .iter()
                .all(|c| !c.is_color())
        );
    }

    #[test]
    fn serde_keys_match_display() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{category}\""));
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn sections_partition_categories() {
        let upper = Category::ALL
            .iter()
            .filter(|c| c.section() == Section::Upper)
            .count();
        let lower = Category::ALL
            .iter()
            .filter(|c| c.section() == Section::Lower)
            .count();
        assert_eq!((upper, lower), (6, 7));
        assert_eq!(Category::Sixes.face(), Some(6));
        assert_eq!(Category::AllPurple.color(), Some(DiceColor::Purple));
        assert!(!Category::RainbowBonus.belongs_to(GameMode::Classic));
    }
}
