use anyhow::{Result, bail};

/// Seed used when the caller supplies none.
pub const DEFAULT_SEED: u64 = 1337;

/// Split a comma-separated CLI value into trimmed, non-empty tokens.
#[must_use]
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve CLI seed tokens into canonical seeds.
///
/// Negative integers are folded to their absolute value, duplicates are
/// dropped keeping the first occurrence, and an empty list yields
/// [`DEFAULT_SEED`].
///
/// # Errors
///
/// Returns an error for tokens that are not integers.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let seed = if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> Vec<String> {
        split_csv(raw)
    }

    #[test]
    fn resolves_numeric_and_negative_seeds() {
        let seeds = resolve_seed_inputs(&tokens("42, -7, 18446744073709551615")).unwrap();
        assert_eq!(seeds, vec![42, 7, u64::MAX]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let seeds = resolve_seed_inputs(&tokens("5,3,-5,3,9")).unwrap();
        assert_eq!(seeds, vec![5, 3, 9]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_inputs(&tokens(" , ,")).unwrap(), vec![DEFAULT_SEED]);
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage_tokens() {
        let err = resolve_seed_inputs(&tokens("12,trout")).unwrap_err();
        assert!(err.to_string().contains("trout"));
    }

    #[test]
    fn split_csv_trims_and_skips_blanks() {
        assert_eq!(split_csv(" idle, ,hold,"), vec!["idle", "hold"]);
    }
}
