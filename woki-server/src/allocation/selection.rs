//! Deterministic Selection (确定性选择)
//!
//! Total order over candidates so that the same inputs always pick the same
//! seating, regardless of generation order.

use std::cmp::Ordering;

use crate::allocation::candidates::Candidate;

/// Candidate ranking: best first.
///
/// Score descending, then combinations before singles on ties, then earlier
/// start, then fewer tables, then lexicographic table ids as the final
/// tie-break.
pub fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.seating.is_single().cmp(&b.seating.is_single()))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.seating.table_count().cmp(&b.seating.table_count()))
        .then_with(|| a.seating.table_ids().cmp(b.seating.table_ids()))
}

/// The single best candidate, if any
pub fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().min_by(rank)
}
