use anyhow::{Context, Result, bail};
use rainbow_yahtzee_game::seed::WORD_LIST;
use rainbow_yahtzee_game::{GameMode, encode_friendly, parse_share_code};
use std::collections::HashMap;

/// Seed resolved from a CLI token, with the share code it came from.
#[derive(Debug, Clone)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    pub source_mode: Option<GameMode>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            source_mode: None,
        }
    }

    #[must_use]
    pub const fn from_share_code(seed: u64, mode: GameMode, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            source_mode: Some(mode),
        }
    }

    /// Share codes carry their mode; bare numbers play in any mode.
    #[must_use]
    pub fn matches_mode(&self, mode: GameMode) -> bool {
        self.source_mode.is_none_or(|source| source == mode)
    }

    #[must_use]
    pub fn share_code_for_mode(&self, mode: GameMode) -> String {
        if let (Some(code), Some(source_mode)) = (&self.code, self.source_mode)
            && source_mode == mode
        {
            return code.clone();
        }
        encode_friendly(mode, self.seed)
    }
}

/// Resolve CLI seed tokens into seeds.
///
/// Accepts integers, share codes like `RB-PRISM07`, and `all`, which expands
/// to every share code in both modes.
///
/// # Errors
///
/// Returns an error for a token that is neither a number nor a share code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }
        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }
        if let Some((mode, seed)) = parse_share_code(token) {
            pending.push(SeedInfo::from_share_code(seed, mode, token.to_uppercase()));
            continue;
        }
        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, Option<GameMode>), usize> = HashMap::new();
    for info in pending {
        let key = (info.seed, info.source_mode);
        match index.get(&key).and_then(|&i| deduped.get_mut(i)) {
            Some(entry) => {
                if entry.code.is_none() && info.code.is_some() {
                    *entry = info;
                }
            }
            None => {
                index.insert(key, deduped.len());
                deduped.push(info);
            }
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }
    Ok(deduped)
}

fn all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100 * GameMode::ALL.len());
    for word in WORD_LIST {
        for suffix in 0..100 {
            for tag in ["CL", "RB"] {
                let code = format!("{tag}-{word}{suffix:02}");
                let (mode, seed) = parse_share_code(&code)
                    .with_context(|| format!("failed to parse share code: {code}"))?;
                seeds.push(SeedInfo::from_share_code(seed, mode, code));
            }
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_share_code() {
        let raw = vec!["42".to_string(), "-7".to_string(), "rb-prism07".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        let coded = seeds
            .iter()
            .find(|s| s.code.as_deref() == Some("RB-PRISM07"))
            .unwrap();
        assert_eq!(coded.source_mode, Some(GameMode::Rainbow));
        assert!(!coded.matches_mode(GameMode::Classic));
        assert_eq!(coded.share_code_for_mode(GameMode::Rainbow), "RB-PRISM07");
    }

    #[test]
    fn duplicates_collapse_and_empty_input_defaults() {
        let seeds = resolve_seed_inputs(&["5".to_string(), "5".to_string()]).unwrap();
        assert_eq!(seeds.len(), 1);
        let fallback = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(fallback[0].seed, 1337);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&["XX-NOPE".to_string()]).is_err());
    }

    #[test]
    fn expands_all_share_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert!(seeds.len() <= WORD_LIST.len() * 100 * 2);
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }
}
