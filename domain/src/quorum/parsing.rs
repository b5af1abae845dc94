//! Oracle response parsing for voting and verification.
//!
//! These functions extract structured decisions from free-form oracle
//! output. They are pure text pattern matching with no I/O.
//! A response that does not match is never an error: it simply carries no
//! vote, or counts as an invalid verdict.
//!
//! # Functions
//!
//! | Function | Use Case | Pattern |
//! |----------|----------|---------|
//! | [`parse_vote_choice`] | Batch vote ballot | "best choice is N" |
//! | [`tally_votes`] | Batch vote scores | many ballots → counts |
//! | [`parse_verification`] | Verifier verdict | "reasoning is valid" |

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static VOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)best choice is\D*?(\d+)").expect("vote pattern is a valid regex")
});

/// Phrase whose presence marks a verification as successful
pub const VALID_PHRASE: &str = "reasoning is valid";

/// Parse a ballot, returning the 1-based choice number.
///
/// Takes the first integer after "best choice is" (case-insensitive,
/// across newlines).
///
/// # Examples
///
/// ```
/// use tq_domain::quorum::parsing::parse_vote_choice;
///
/// assert_eq!(parse_vote_choice("Analysis...\nThe best choice is 2"), Some(2));
/// assert_eq!(parse_vote_choice("The best choice is Choice 3."), Some(3));
/// assert_eq!(parse_vote_choice("no clear winner"), None);
/// ```
pub fn parse_vote_choice(response: &str) -> Option<usize> {
    VOTE_PATTERN
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Count ballots into one score per candidate.
///
/// Non-matching ballots and out-of-range choices contribute nothing and are
/// logged.
pub fn tally_votes(responses: &[String], n_candidates: usize) -> Vec<f64> {
    let mut votes = vec![0.0; n_candidates];
    for response in responses {
        match parse_vote_choice(response) {
            Some(choice) if (1..=n_candidates).contains(&choice) => votes[choice - 1] += 1.0,
            Some(choice) => {
                warn!(
                    "Vote for choice {} ignored: only {} candidates",
                    choice, n_candidates
                );
            }
            None => warn!("Vote did not match: {:?}", response),
        }
    }
    votes
}

/// Parse a verifier response.
///
/// Valid iff the response contains "reasoning is valid" in any case. The
/// absence of the phrase is the failure signal.
///
/// # Returns
///
/// `(valid, full_response_as_rationale)`
pub fn parse_verification(response: &str) -> (bool, String) {
    let valid = response.to_lowercase().contains(VALID_PHRASE);
    (valid, response.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse_vote_choice Tests ====================

    #[test]
    fn test_vote_choice_basic() {
        assert_eq!(parse_vote_choice("... the best choice is 2 ..."), Some(2));
        assert_eq!(parse_vote_choice("THE BEST CHOICE IS 1"), Some(1));
    }

    #[test]
    fn test_vote_choice_multiline() {
        let response = "Choice 1 is weak.\nChoice 2 is strong.\nThe best choice is\n2";
        assert_eq!(parse_vote_choice(response), Some(2));
    }

    #[test]
    fn test_vote_choice_multi_digit() {
        assert_eq!(parse_vote_choice("The best choice is 12."), Some(12));
    }

    #[test]
    fn test_vote_choice_no_match() {
        assert_eq!(parse_vote_choice("no clear winner"), None);
        assert_eq!(parse_vote_choice("The best choice is unclear"), None);
        assert_eq!(parse_vote_choice(""), None);
    }

    // ==================== tally_votes Tests ====================

    #[test]
    fn test_tally_counts_zero_based() {
        let responses = vec!["... the best choice is 2 ...".to_string()];
        assert_eq!(tally_votes(&responses, 3), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_tally_ignores_unparseable() {
        let responses = vec![
            "no clear winner".to_string(),
            "The best choice is 1".to_string(),
            "The best choice is 1".to_string(),
        ];
        assert_eq!(tally_votes(&responses, 2), vec![2.0, 0.0]);
    }

    #[test]
    fn test_tally_ignores_out_of_range() {
        let responses = vec![
            "The best choice is 0".to_string(),
            "The best choice is 4".to_string(),
        ];
        assert_eq!(tally_votes(&responses, 3), vec![0.0, 0.0, 0.0]);
    }

    // ==================== parse_verification Tests ====================

    #[test]
    fn test_verification_valid() {
        let (valid, rationale) = parse_verification("All steps check out. Reasoning is Valid");
        assert!(valid);
        assert!(rationale.contains("All steps"));
    }

    #[test]
    fn test_verification_invalid_phrase() {
        let (valid, _) = parse_verification("Step 2 is wrong. Reasoning is Invalid");
        assert!(!valid);
    }

    #[test]
    fn test_verification_missing_phrase_is_invalid() {
        let (valid, _) = parse_verification("Looks fine to me.");
        assert!(!valid);
    }
}
