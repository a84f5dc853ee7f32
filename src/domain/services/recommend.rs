use std::collections::HashMap;

use crate::domain::models::{place::PlaceCandidate, point::Point};

/// A provider result paired with its provider rank and the requester's prior
/// visit total.
#[derive(Debug, Clone)]
pub struct ScoredPlace {
    pub candidate: PlaceCandidate,
    /// Position in the provider's result list, 0-based. Lower means the
    /// provider considered it more relevant.
    pub index: usize,
    pub visits: i64,
}

impl ScoredPlace {
    /// Additive score: prior visit count discounted by provider rank.
    fn score(&self) -> i64 {
        self.visits - self.index as i64
    }
}

/// Orders provider candidates by descending `visits - index`: heavily visited
/// places first, provider order as the discount and tie-break.
pub fn rank(candidates: Vec<PlaceCandidate>, visit_totals: &HashMap<String, i64>) -> Vec<ScoredPlace> {
    let mut scored: Vec<ScoredPlace> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let visits = visit_totals.get(&candidate.id).copied().unwrap_or(0);
            ScoredPlace { candidate, index, visits }
        })
        .collect();

    scored.sort_by_key(|p| (std::cmp::Reverse(p.score()), p.index));
    scored
}

/// Distance from the requester to a ranked place, recomputed per request.
pub fn distance_from(origin: &Point, place: &ScoredPlace) -> f64 {
    origin.distance_miles(&place.candidate.coords)
}
