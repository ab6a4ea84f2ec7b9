//! Heuristic evaluation of live sequence counts
//!
//! The score is a weighted difference of the two players' histograms, seen
//! from one player's perspective. A completed window for either side
//! short-circuits to a saturating sentinel.

use crate::board::Player;

use super::sequences::SequenceCounts;

/// Search and evaluation score. Infinite values are forced results.
pub type Score = f64;

/// Sentinel for a won position
pub const WIN: Score = f64::INFINITY;

/// Sentinel for a lost position
pub const LOSS: Score = f64::NEG_INFINITY;

/// Score of a drawn or move-less node
pub const DRAW: Score = 0.0;

/// Evaluate `counts` from `perspective`.
///
/// X's win is checked before O's, so a malformed board where both sides own
/// a full window always resolves in X's favour.
///
/// `weights[i]` scales the difference in live windows holding `i` marks.
/// Index 0 (empty cells) and index K (wins) never contribute; missing
/// entries count as zero.
#[must_use]
pub fn evaluate(counts: &SequenceCounts, perspective: Player, weights: &[f64]) -> Score {
    if counts.has_won(Player::X) {
        return if perspective == Player::X { WIN } else { LOSS };
    }
    if counts.has_won(Player::O) {
        return if perspective == Player::O { WIN } else { LOSS };
    }

    let mine = counts.histogram(perspective);
    let theirs = counts.histogram(perspective.opponent());

    (1..counts.win_length())
        .map(|i| {
            let weight = weights.get(i).copied().unwrap_or(0.0);
            weight * (f64::from(mine[i]) - f64::from(theirs[i]))
        })
        .sum()
}

/// True for the win/loss sentinels
#[inline]
pub fn is_decisive(score: Score) -> bool {
    score.is_infinite()
}
