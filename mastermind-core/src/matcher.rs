//! Matching engine
//!
//! Scores a guess against a secret with Mastermind rules: an exact match is
//! the same colour at the same position, an approximate match is a shared
//! colour at different positions. Every peg takes part in at most one match.

use crate::config::GameConfig;
use crate::sequence::{Sequence, SequenceError, MAX_SEQ_LEN};

/// Secret slot already matched (never a colour code)
const SECRET_CONSUMED: u8 = 0;
/// Guess slot already matched (distinct from the secret sentinel)
const GUESS_CONSUMED: u8 = u8::MAX;

/// Result of scoring one guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatchResult {
    /// Right colour, right position
    pub exact: u8,
    /// Right colour, wrong position
    pub approximate: u8,
}

impl MatchResult {
    /// Check whether every one of `seqlen` pegs matched exactly
    pub fn is_solved(&self, seqlen: u8) -> bool {
        self.exact == seqlen
    }
}

/// Score `guess` against `secret`
///
/// Both sequences are expected to have the same length; extra pegs of the
/// longer one are ignored. Duplicate colours are resolved by consuming the
/// first unmatched secret peg in ascending position order.
pub fn score(secret: &Sequence, guess: &Sequence) -> MatchResult {
    let len = secret.len().min(guess.len());

    let mut secret_work = [SECRET_CONSUMED; MAX_SEQ_LEN];
    let mut guess_work = [GUESS_CONSUMED; MAX_SEQ_LEN];
    secret_work[..len].copy_from_slice(&secret.as_slice()[..len]);
    guess_work[..len].copy_from_slice(&guess.as_slice()[..len]);

    let mut result = MatchResult::default();

    for i in 0..len {
        if secret_work[i] == guess_work[i] {
            result.exact += 1;
            secret_work[i] = SECRET_CONSUMED;
            guess_work[i] = GUESS_CONSUMED;
        }
    }

    for g in guess_work[..len].iter_mut() {
        if *g == GUESS_CONSUMED {
            continue;
        }
        if let Some(s) = secret_work[..len].iter_mut().find(|s| **s == *g) {
            result.approximate += 1;
            *s = SECRET_CONSUMED;
            *g = GUESS_CONSUMED;
        }
    }

    result
}

/// Score two decimal-encoded sequences without any hardware
///
/// Both values are decoded with the configured sequence length and colour
/// count before scoring.
pub fn score_encoded(
    secret: u32,
    guess: u32,
    config: &GameConfig,
) -> Result<MatchResult, SequenceError> {
    let secret = Sequence::decode(secret, config.seqlen, config.colors)?;
    let guess = Sequence::decode(guess, config.seqlen, config.colors)?;
    Ok(score(&secret, &guess))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seq(pegs: &[u8]) -> Sequence {
        Sequence::from_slice(pegs, 9).unwrap()
    }

    fn score_of(secret: &[u8], guess: &[u8]) -> (u8, u8) {
        let r = score(&seq(secret), &seq(guess));
        (r.exact, r.approximate)
    }

    #[test]
    fn test_reversed_guess() {
        assert_eq!(score_of(&[1, 2, 3], &[3, 2, 1]), (1, 2));
    }

    #[test]
    fn test_exact_pass_consumes_duplicates() {
        assert_eq!(score_of(&[1, 1, 2], &[1, 2, 2]), (2, 0));
    }

    #[test]
    fn test_permutations() {
        assert_eq!(score_of(&[1, 2, 3], &[3, 1, 2]), (0, 3));
        assert_eq!(score_of(&[1, 2, 3], &[2, 3, 1]), (0, 3));
        assert_eq!(score_of(&[1, 2, 3], &[1, 2, 3]), (3, 0));
    }

    #[test]
    fn test_no_common_colour() {
        assert_eq!(score_of(&[1, 1, 1], &[2, 2, 2]), (0, 0));
    }

    #[test]
    fn test_secret_peg_matched_once() {
        // One 2 in the secret can satisfy only one of the guessed 2s
        assert_eq!(score_of(&[2, 1, 1], &[3, 2, 2]), (0, 1));
        assert_eq!(score_of(&[1, 1, 2, 2], &[2, 2, 1, 1]), (0, 4));
    }

    #[test]
    fn test_swap_with_duplicates() {
        // Exact count is symmetric, approximate need not be checked beyond the bound
        let ab = score_of(&[1, 1, 3], &[1, 3, 3]);
        let ba = score_of(&[1, 3, 3], &[1, 1, 3]);
        assert_eq!(ab.0, ba.0);
        assert_eq!(ab, (2, 0));
        assert_eq!(ba, (2, 0));
    }

    #[test]
    fn test_score_encoded() {
        let config = GameConfig::default();
        let r = score_encoded(123, 321, &config).unwrap();
        assert_eq!(r, MatchResult { exact: 1, approximate: 2 });
        assert!(!r.is_solved(config.seqlen));

        let r = score_encoded(231, 231, &config).unwrap();
        assert!(r.is_solved(config.seqlen));
    }

    #[test]
    fn test_score_encoded_rejects_malformed() {
        let config = GameConfig::default();
        assert_eq!(
            score_encoded(1234, 123, &config),
            Err(SequenceError::MalformedSecretLength {
                expected: 3,
                found: 4
            })
        );
        assert!(score_encoded(123, 124, &config).is_err());
    }

    fn pegs(colors: u8) -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(1..=colors, 1..=MAX_SEQ_LEN)
    }

    fn pair(colors: u8) -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
        pegs(colors).prop_flat_map(move |a| {
            let len = a.len();
            (Just(a), prop::collection::vec(1..=colors, len))
        })
    }

    proptest! {
        #[test]
        fn prop_self_score_is_all_exact(a in pegs(9)) {
            let r = score(&seq(&a), &seq(&a));
            prop_assert_eq!(r.exact as usize, a.len());
            prop_assert_eq!(r.approximate, 0);
        }

        #[test]
        fn prop_total_bounded_by_length((a, b) in pair(6)) {
            let r = score(&seq(&a), &seq(&b));
            prop_assert!(r.exact as usize + r.approximate as usize <= a.len());
        }

        #[test]
        fn prop_exact_is_symmetric((a, b) in pair(4)) {
            let ab = score(&seq(&a), &seq(&b));
            let ba = score(&seq(&b), &seq(&a));
            prop_assert_eq!(ab.exact, ba.exact);
        }

        #[test]
        fn prop_solved_iff_identical((a, b) in pair(3)) {
            let r = score(&seq(&a), &seq(&b));
            prop_assert_eq!(r.is_solved(a.len() as u8), a == b);
        }

        #[test]
        fn prop_total_is_colour_overlap((a, b) in pair(5)) {
            let r = score(&seq(&a), &seq(&b));
            let overlap: usize = (1..=5u8)
                .map(|c| {
                    let in_a = a.iter().filter(|&&x| x == c).count();
                    let in_b = b.iter().filter(|&&x| x == c).count();
                    in_a.min(in_b)
                })
                .sum();
            prop_assert_eq!(r.exact as usize + r.approximate as usize, overlap);
        }
    }
}
