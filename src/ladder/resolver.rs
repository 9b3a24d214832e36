use serde::Serialize;

use super::types::{Position, SetScore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("a match has 2 or 3 sets, got {0}")]
    WrongSetCount(usize),

    #[error("invalid result: one side must win exactly 2 sets")]
    NoWinner,

    #[error("could not parse score text: {0}")]
    Unparsable(String),
}

/// Everything the ladder needs to apply a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub score_text: String,
    pub challenger_won: bool,
    pub challenger_sets: u32,
    pub challenged_sets: u32,
    pub new_challenger_position: Position,
    pub new_challenged_position: Position,
    pub positions_swapped: bool,
}

/// Resolves a best-of-three result between two ranked entities.
pub fn resolve(
    challenger_pos: Position,
    challenged_pos: Position,
    sets: &[SetScore],
) -> Result<MatchOutcome, ScoreError> {
    let (challenger_sets, challenged_sets) = count_sets(sets)?;
    let challenger_won = challenger_sets > challenged_sets;
    let positions_swapped = should_swap(challenger_won, challenger_pos, challenged_pos);

    let (new_challenger_position, new_challenged_position) = if positions_swapped {
        (challenged_pos, challenger_pos)
    } else {
        (challenger_pos, challenged_pos)
    };

    Ok(MatchOutcome {
        score_text: format_score_text(sets),
        challenger_won,
        challenger_sets,
        challenged_sets,
        new_challenger_position,
        new_challenged_position,
        positions_swapped,
    })
}

/// Counts sets per side and checks the result is a completed best-of-three.
pub fn count_sets(sets: &[SetScore]) -> Result<(u32, u32), ScoreError> {
    if !(2..=3).contains(&sets.len()) {
        return Err(ScoreError::WrongSetCount(sets.len()));
    }

    let challenger_sets = sets.iter().filter(|(a, b)| a > b).count() as u32;
    let challenged_sets = sets.len() as u32 - challenger_sets;

    let decided = (challenger_sets == 2 && challenged_sets < 2)
        || (challenged_sets == 2 && challenger_sets < 2);
    if !decided {
        return Err(ScoreError::NoWinner);
    }

    Ok((challenger_sets, challenged_sets))
}

/// A climbing winner takes the higher spot; a #1 challenger who loses cedes it.
fn should_swap(challenger_won: bool, challenger_pos: Position, challenged_pos: Position) -> bool {
    if challenger_won && challenger_pos > challenged_pos {
        return true;
    }
    !challenger_won && challenger_pos == 1
}

pub fn format_score_text(sets: &[SetScore]) -> String {
    sets.iter()
        .map(|(a, b)| format!("{a}-{b}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_score_text(text: &str) -> Result<Vec<SetScore>, ScoreError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|set| parse_set(set).ok_or_else(|| ScoreError::Unparsable(text.to_string())))
        .collect()
}

fn parse_set(set: &str) -> Option<SetScore> {
    let (a, b) = set.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_sets_are_read_from_the_challenger_side() {
        let outcome = resolve(5, 2, &[(6, 4), (6, 3)]).unwrap();
        // First value of each set is the challenger's games.
        assert!(outcome.challenger_won);
        assert!(outcome.positions_swapped);
        assert_eq!(
            (
                outcome.new_challenger_position,
                outcome.new_challenged_position
            ),
            (2, 5)
        );
    }

    #[test]
    fn test_lower_ranked_challenger_loses_without_swap() {
        let outcome = resolve(5, 2, &[(4, 6), (3, 6)]).unwrap();
        assert!(!outcome.challenger_won);
        assert!(!outcome.positions_swapped);
        assert_eq!(
            (
                outcome.new_challenger_position,
                outcome.new_challenged_position
            ),
            (5, 2)
        );
    }

    #[test]
    fn test_climbing_challenger_swaps() {
        let outcome = resolve(5, 3, &[(6, 4), (3, 6), (6, 2)]).unwrap();
        assert!(outcome.challenger_won);
        assert!(outcome.positions_swapped);
        assert_eq!(outcome.new_challenger_position, 3);
        assert_eq!(outcome.new_challenged_position, 5);
        assert_eq!(outcome.score_text, "6-4, 3-6, 6-2");
        assert_eq!((outcome.challenger_sets, outcome.challenged_sets), (2, 1));
    }

    #[test]
    fn test_first_place_losing_swaps() {
        let outcome = resolve(1, 4, &[(2, 6), (3, 6)]).unwrap();
        assert!(!outcome.challenger_won);
        assert!(outcome.positions_swapped);
        assert_eq!(
            (
                outcome.new_challenger_position,
                outcome.new_challenged_position
            ),
            (4, 1)
        );
    }

    #[test]
    fn test_higher_ranked_winner_stays() {
        let outcome = resolve(2, 4, &[(6, 1), (6, 1)]).unwrap();
        assert!(outcome.challenger_won);
        assert!(!outcome.positions_swapped);
    }

    #[test]
    fn test_rejects_bad_set_counts() {
        assert_eq!(resolve(3, 2, &[(6, 4)]), Err(ScoreError::WrongSetCount(1)));
        assert_eq!(
            resolve(3, 2, &[(6, 4), (6, 4), (6, 4), (6, 4)]),
            Err(ScoreError::WrongSetCount(4))
        );
    }

    #[test]
    fn test_rejects_undecided_results() {
        assert_eq!(resolve(3, 2, &[(6, 4), (4, 6)]), Err(ScoreError::NoWinner));
        assert_eq!(
            resolve(3, 2, &[(6, 4), (6, 3), (6, 2)]),
            Err(ScoreError::NoWinner)
        );
    }

    #[test]
    fn test_tied_set_counts_for_challenged() {
        let outcome = resolve(4, 3, &[(6, 6), (6, 6)]).unwrap();
        assert!(!outcome.challenger_won);
    }

    #[test]
    fn test_score_text_parses_back() {
        let sets = vec![(7, 6), (4, 6), (10, 8)];
        assert_eq!(parse_score_text(&format_score_text(&sets)).unwrap(), sets);
        assert!(parse_score_text("6-x, 6-2").is_err());
    }
}
