use serde::Serialize;

use super::types::Position;

const DENIED: &str = "Challenge not allowed.";

/// Outcome of checking a proposed challenge against the proximity rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeVerdict {
    pub valid: bool,
    pub message: String,
}

impl ChallengeVerdict {
    fn allowed(message: &str) -> Self {
        Self {
            valid: true,
            message: message.to_string(),
        }
    }

    fn denied(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
        }
    }
}

/// Checks whether `challenger_pos` may challenge `challenged_pos` in a pool of
/// `total` entities.
///
/// Branches are evaluated in a fixed order (1, 2, 3, last, 4+) so that small
/// pools, where "last" overlaps the top three, resolve to the fixed rules first.
pub fn validate(
    challenger_pos: Position,
    challenged_pos: Position,
    total: Position,
) -> ChallengeVerdict {
    let verdict = if challenger_pos == 1 {
        check_first(challenged_pos)
    } else if challenger_pos == 2 {
        check_fixed_set(
            challenged_pos,
            &[1, 3, 4],
            "Position 2 may challenge positions 1, 3 and 4.",
        )
    } else if challenger_pos == 3 {
        check_fixed_set(
            challenged_pos,
            &[1, 2, 4],
            "Position 3 may challenge positions 1, 2 and 4.",
        )
    } else if challenger_pos == total {
        check_last(challenged_pos, total)
    } else if challenger_pos >= 4 {
        check_three_above(challenger_pos, challenged_pos)
    } else {
        ChallengeVerdict::denied(DENIED)
    };

    log::debug!(
        "challenge {} -> {} (of {}): valid={}",
        challenger_pos,
        challenged_pos,
        total,
        verdict.valid
    );
    verdict
}

fn check_first(challenged_pos: Position) -> ChallengeVerdict {
    if (2..=6).contains(&challenged_pos) {
        ChallengeVerdict::allowed("Challenge allowed: position 1 may challenge positions 2 to 6.")
    } else {
        ChallengeVerdict::denied("Position 1 may only challenge positions 2 to 6.")
    }
}

fn check_fixed_set(challenged_pos: Position, allowed: &[Position], rule: &str) -> ChallengeVerdict {
    if allowed.contains(&challenged_pos) {
        ChallengeVerdict::allowed(&format!("Challenge allowed: {rule}"))
    } else {
        ChallengeVerdict::denied(rule)
    }
}

fn check_last(challenged_pos: Position, total: Position) -> ChallengeVerdict {
    if challenged_pos >= total - 5 && challenged_pos < total {
        ChallengeVerdict::allowed(
            "Challenge allowed: last place may challenge the five positions above.",
        )
    } else {
        ChallengeVerdict::denied(
            "Last place may only challenge the five positions immediately above.",
        )
    }
}

fn check_three_above(challenger_pos: Position, challenged_pos: Position) -> ChallengeVerdict {
    if challenged_pos >= challenger_pos - 3 && challenged_pos < challenger_pos {
        ChallengeVerdict::allowed(
            "Challenge allowed: may challenge the three positions immediately above.",
        )
    } else {
        ChallengeVerdict::denied("Only the three positions immediately above may be challenged.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed_targets(challenger: Position, total: Position) -> Vec<Position> {
        (1..=total)
            .filter(|&p| validate(challenger, p, total).valid)
            .collect()
    }

    #[test]
    fn test_first_place_reaches_two_to_six() {
        assert_eq!(allowed_targets(1, 20), vec![2, 3, 4, 5, 6]);
        assert!(!validate(1, 7, 20).valid);
        assert!(!validate(1, 1, 20).valid);
    }

    #[test]
    fn test_second_and_third_fixed_sets() {
        assert_eq!(allowed_targets(2, 20), vec![1, 3, 4]);
        assert_eq!(allowed_targets(3, 20), vec![1, 2, 4]);
    }

    #[test]
    fn test_last_place_reaches_five_above() {
        assert_eq!(allowed_targets(20, 20), vec![15, 16, 17, 18, 19]);
        assert!(validate(20, 15, 20).valid);
        assert!(!validate(20, 14, 20).valid);
    }

    #[test]
    fn test_middle_reaches_three_above() {
        assert_eq!(allowed_targets(10, 20), vec![7, 8, 9]);
        assert_eq!(allowed_targets(4, 20), vec![1, 2, 3]);
        assert!(!validate(10, 11, 20).valid);
    }

    #[test]
    fn test_small_pool_keeps_fixed_rules_first() {
        // With three entities, position 3 is also last; the fixed rule wins.
        assert_eq!(allowed_targets(3, 3), vec![1, 2]);
        // Position 2 of 2 is last, but still governed by its fixed set.
        assert_eq!(allowed_targets(2, 2), vec![1]);
        // Position 5 of 5 uses the last-place rule and may reach position 1.
        assert_eq!(allowed_targets(5, 5), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_denied_verdicts_explain_the_rule() {
        let verdict = validate(2, 5, 20);
        assert!(!verdict.valid);
        assert_eq!(
            verdict.message,
            "Position 2 may challenge positions 1, 3 and 4."
        );
    }
}
