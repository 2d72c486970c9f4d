//! Share codes for seeded games.
//!
//! A code reads `MODE-WORDNN` (`CL-PIPS42`, `RB-PRISM07`). The word index and
//! number live in the low 16 bits of the seed; the upper bits are a hash of
//! those plus the mode, so Classic and Rainbow codes never share dice.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::category::GameMode;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Uppercase letters only, so `prism`, `Prism` and `PRISM` match.
fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "PIPS", "CUBE", "ROLL", "HOLD", "REROLL", "CHANCE", "HOUSE", "STRAIT", "ACES", "TWOS",
    "THREES", "FOURS", "FIVES", "SIXES", "JOKER", "BONUS", "PRISM", "SPECTRA", "CRIMSON", "COBALT",
    "JADE", "AMBER", "VIOLET", "SCARLET", "INDIGO", "TEAL", "CORAL", "GOLD", "SILVER", "COPPER",
    "FELT", "TABLE", "CUP", "SHAKE", "TUMBLE", "LUCKY", "STREAK", "COMBO", "TRIPLE", "QUAD",
    "PAIR", "RUN", "LADDER", "SUMMIT", "TALLY", "LEDGER", "CARD", "BOX", "SLOT", "TOKEN",
    "ARC", "HALO", "BEAM", "GLOW", "SPARK", "FLARE", "DAWN", "DUSK", "MIST", "RAIN",
    "CLOUD", "STORM", "ORBIT", "COMET",
];

const fn mode_tag(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Classic => "CL",
        GameMode::Rainbow => "RB",
    }
}

fn mode_from_tag(tag: &str) -> Option<GameMode> {
    match tag.to_ascii_uppercase().as_str() {
        "CL" => Some(GameMode::Classic),
        "RB" => Some(GameMode::Rainbow),
        _ => None,
    }
}

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    let nn = u8::try_from((packed >> 9) & 0x7F).unwrap_or(0);
    (packed & 0x01FF, nn)
}

fn compose_seed(mode: GameMode, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [lo, hi] = packed.to_le_bytes();
    let tag = if mode.is_rainbow() { b'R' } else { b'C' };
    let buf = [b'R', b'Y', b'D', b'I', b'C', b'E', tag, lo, hi, 0xA5];
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render `seed` as a share code. Only the low 16 bits select the word and
/// number, so codes are stable for seeds produced by [`decode_to_seed`].
#[must_use]
pub fn encode_friendly(mode: GameMode, seed: u64) -> String {
    let packed = u16::try_from(seed & 0xFFFF).unwrap_or(0);
    let (wi, nn) = unpack(packed);
    let word = WORD_LIST.get(usize::from(wi)).copied().unwrap_or(WORD_LIST[0]);
    format!("{}-{word}{:02}", mode_tag(mode), nn % 100)
}

/// Decode a share code into its mode and the seed it stands for.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(GameMode, u64)> {
    let s = code.trim();
    let (tag, rest) = s.split_once('-')?;
    let mode = mode_from_tag(tag)?;
    if rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = normalize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| normalize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some((mode, compose_seed(mode, wi, nn)))
}

/// Fresh share code from caller-supplied entropy.
#[must_use]
pub fn generate_code_from_entropy(mode: GameMode, entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_friendly(mode, compose_seed(mode, wi, nn))
}

/// Parse a share code into `GameMode` and seed.
#[must_use]
pub fn parse_share_code(code: &str) -> Option<(GameMode, u64)> {
    decode_to_seed(code)
}

/// Deterministic dice stream for a seed.
#[must_use]
pub fn rng_from_seed(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}
