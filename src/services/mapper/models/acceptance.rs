use serde::Serialize;

use crate::services::config::{GateParams, MapperConfig, Thresholds};
use crate::services::mapper::models::types::{sort_matches_deterministic, MatchStatus, ScoredMatch};

pub const REVIEW_FLAG_NEAR_TIE: &str = "near_tie";

/// Map a composite score to a status. Boundaries are inclusive.
pub fn classify_score(score: f64, thresholds: &Thresholds) -> MatchStatus {
    if score >= thresholds.mapped {
        MatchStatus::Mapped
    } else if score >= thresholds.review {
        MatchStatus::NeedsReview
    } else {
        MatchStatus::NoMatch
    }
}

/// Every candidate within `delta` of the best score, score desc / id asc.
/// Non-empty whenever `matches` is non-empty; the best is always first.
pub fn collect_near_ties(matches: &[ScoredMatch], delta: f64) -> Vec<ScoredMatch> {
    let mut ordered = matches.to_vec();
    sort_matches_deterministic(&mut ordered);
    let Some(best_score) = ordered.first().map(|best| best.score) else {
        return Vec::new();
    };
    let floor = best_score - delta;
    ordered
        .into_iter()
        .enumerate()
        .take_while(|(index, candidate)| *index == 0 || candidate.score >= floor)
        .map(|(_, candidate)| candidate)
        .collect()
}

/// Accepted outcome for one ingredient.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub best: Option<ScoredMatch>,
    pub status: MatchStatus,
    /// Near-ties kept for persistence (capped at `near_tie_limit`).
    pub near_ties: Vec<ScoredMatch>,
    /// Full number of near-ties before capping.
    pub near_tie_count: usize,
    pub review_flag: Option<&'static str>,
}

/// Classify the best of `matches` and collect its near-ties.
pub fn evaluate_matches(matches: &[ScoredMatch], config: &MapperConfig) -> MatchOutcome {
    let GateParams {
        near_tie_delta,
        near_tie_limit,
        ..
    } = config.gates;

    let mut near_ties = collect_near_ties(matches, near_tie_delta);
    let near_tie_count = near_ties.len();
    let best = near_ties.first().cloned();
    let status = best
        .as_ref()
        .map(|candidate| classify_score(candidate.score, &config.thresholds))
        .unwrap_or(MatchStatus::NoMatch);
    near_ties.truncate(near_tie_limit.max(1));

    let review_flag = (near_tie_count > 1 && status != MatchStatus::NoMatch)
        .then_some(REVIEW_FLAG_NEAR_TIE);

    MatchOutcome {
        best,
        status,
        near_ties,
        near_tie_count,
        review_flag,
    }
}

#[cfg(test)]
#[path = "../tests/models/acceptance_tests.rs"]
mod tests;
