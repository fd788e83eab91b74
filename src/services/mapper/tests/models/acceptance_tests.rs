use super::*;
use crate::services::mapper::models::types::{MatchReason, Signal, SignalBreakdown};

fn scored(fdc_id: i64, score: f64) -> ScoredMatch {
    ScoredMatch {
        fdc_id,
        score,
        reason: MatchReason::Dominant(Signal::Overlap),
        signals: SignalBreakdown::default(),
    }
}

#[test]
fn test_classify_score_boundaries() {
    let thresholds = Thresholds::default();
    assert_eq!(classify_score(0.80, &thresholds), MatchStatus::Mapped);
    assert_eq!(classify_score(0.79999, &thresholds), MatchStatus::NeedsReview);
    assert_eq!(classify_score(0.40, &thresholds), MatchStatus::NeedsReview);
    assert_eq!(classify_score(0.39999, &thresholds), MatchStatus::NoMatch);
    assert_eq!(classify_score(1.0, &thresholds), MatchStatus::Mapped);
    assert_eq!(classify_score(0.0, &thresholds), MatchStatus::NoMatch);
}

#[test]
fn test_near_ties_within_delta_sorted() {
    let matches = vec![scored(9, 0.70), scored(3, 0.86), scored(7, 0.82), scored(1, 0.82)];
    let ties = collect_near_ties(&matches, 0.05);
    let ids: Vec<i64> = ties.iter().map(|m| m.fdc_id).collect();
    assert_eq!(ids, vec![3, 1, 7]);
}

#[test]
fn test_near_ties_always_contain_best() {
    let single = collect_near_ties(&[scored(4, 0.1)], 0.0);
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].fdc_id, 4);

    let spread = collect_near_ties(&[scored(1, 0.9), scored(2, 0.5)], 0.05);
    assert_eq!(spread.len(), 1);
    assert_eq!(spread[0].fdc_id, 1);

    assert!(collect_near_ties(&[], 0.05).is_empty());
}

#[test]
fn test_evaluate_caps_persisted_near_ties_but_keeps_count() {
    let mut config = MapperConfig::default();
    config.gates.near_tie_limit = 3;
    let matches: Vec<ScoredMatch> = (1..=10).map(|id| scored(id, 0.05)).collect();
    let outcome = evaluate_matches(&matches, &config);
    assert_eq!(outcome.near_tie_count, 10);
    assert_eq!(outcome.near_ties.len(), 3);
    assert_eq!(outcome.status, MatchStatus::NoMatch);
    assert_eq!(outcome.review_flag, None);
}

#[test]
fn test_evaluate_flags_near_tie_for_reviewable_status() {
    let config = MapperConfig::default();
    let outcome = evaluate_matches(&[scored(2, 0.86), scored(1, 0.85)], &config);
    assert_eq!(outcome.status, MatchStatus::Mapped);
    assert_eq!(outcome.best.as_ref().map(|b| b.fdc_id), Some(2));
    assert_eq!(outcome.review_flag, Some(REVIEW_FLAG_NEAR_TIE));

    let clear = evaluate_matches(&[scored(2, 0.86), scored(1, 0.5)], &config);
    assert_eq!(clear.review_flag, None);
}

#[test]
fn test_evaluate_empty_corpus_is_no_match() {
    let outcome = evaluate_matches(&[], &MapperConfig::default());
    assert!(outcome.best.is_none());
    assert_eq!(outcome.status, MatchStatus::NoMatch);
    assert_eq!(outcome.near_tie_count, 0);
}
