use super::*;
use crate::services::mapper::golden_corpus::{golden_snapshot, run_golden_case, GOLDEN_CASES};
use crate::services::mapper::models::types::FoodRecord;
use crate::services::mapper::state::corpus::CorpusSnapshot;

fn score_pair(snapshot: &CorpusSnapshot, ingredient: &str, fdc_id: i64) -> ScoredMatch {
    let config = MapperConfig::default();
    let query = snapshot.query(ingredient, 1);
    let food = snapshot.food(fdc_id).expect("fixture food");
    score_candidate(&query, food, snapshot.stats(), &config)
}

#[test]
fn test_golden_cases() {
    let snapshot = golden_snapshot();
    let config = MapperConfig::default();
    for case in GOLDEN_CASES {
        run_golden_case(case, &snapshot, &config);
    }
}

#[test]
fn test_score_candidate_is_pure() {
    let snapshot = golden_snapshot();
    let first = score_pair(&snapshot, "olive oil", 1);
    let second = score_pair(&snapshot, "olive oil", 1);
    assert_eq!(first.score.to_bits(), second.score.to_bits());
    assert_eq!(first.reason, second.reason);
    assert_eq!(first.signals, second.signals);
}

#[test]
fn test_oil_beats_boiled_by_wide_margin() {
    let snapshot = golden_snapshot();
    let true_oil = score_pair(&snapshot, "oil", 2);
    let boiled = score_pair(&snapshot, "oil", 4);
    assert!(true_oil.score >= 0.5, "oil vs canola oil: {}", true_oil.score);
    assert!(boiled.score < 0.3, "oil vs boiled potatoes: {}", boiled.score);
    assert_eq!(boiled.signals.overlap, 0.0);
}

#[test]
fn test_olive_oil_maps_and_beats_olive_fruit() {
    let snapshot = golden_snapshot();
    let olive_oil = score_pair(&snapshot, "olive oil", 1);
    let olives = score_pair(&snapshot, "olive oil", 3);
    assert!(olive_oil.score >= 0.80, "olive oil: {}", olive_oil.score);
    assert!(olives.score < olive_oil.score);
    assert_eq!(olive_oil.reason, MatchReason::SynonymConfirmed);
}

#[test]
fn test_variant_match_earns_partial_credit() {
    let snapshot = golden_snapshot();
    let eggs = score_pair(&snapshot, "eggs", 13);
    assert!((eggs.signals.overlap - 0.9).abs() < 1e-9);
}

#[test]
fn test_similarity_capped_without_overlap() {
    let snapshot = golden_snapshot();
    let config = MapperConfig::default();
    for food in snapshot.foods() {
        let query = snapshot.query("olive oyl", 1);
        let signals = compute_signals(&query, food, snapshot.stats(), &config);
        if signals.overlap < config.gates.similarity_gate_overlap {
            assert!(signals.similarity <= config.gates.similarity_cap + 1e-12);
        }
    }
}

#[test]
fn test_segment_levels() {
    let snapshot = golden_snapshot();
    assert_eq!(score_pair(&snapshot, "salt", 8).signals.segment, 1.0);
    // "salt" only in a later segment of the peanut description.
    assert_eq!(score_pair(&snapshot, "salt", 20).signals.segment, 0.6);
    // "olive" + "oil": each segment carries roughly half the weight.
    assert_eq!(score_pair(&snapshot, "olive oil", 1).signals.segment, 0.3);
    assert_eq!(score_pair(&snapshot, "salt", 1).signals.segment, 0.0);
}

#[test]
fn test_affinity_three_states() {
    let snapshot = golden_snapshot();
    // match
    assert_eq!(score_pair(&snapshot, "butter", 5).signals.affinity, 1.0);
    // mismatch: butter expects dairy, peanut butter is a legume product
    assert_eq!(score_pair(&snapshot, "butter", 7).signals.affinity, -2.0);
    // unknown candidate category: no penalty
    assert_eq!(score_pair(&snapshot, "butter", 24).signals.affinity, 0.0);
    // no expectation for any ingredient token: neutral
    assert_eq!(score_pair(&snapshot, "cooking spray", 5).signals.affinity, 0.0);
}

#[test]
fn test_synonym_requires_overlap_and_required_set() {
    let snapshot = golden_snapshot();
    assert_eq!(score_pair(&snapshot, "salt", 8).signals.synonym, 1.0);
    // shares "salt" but lacks "table"
    assert_eq!(score_pair(&snapshot, "salt", 6).signals.synonym, 0.0);
    // required set satisfied through a state token ("raw")
    assert_eq!(score_pair(&snapshot, "garlic", 14).signals.synonym, 1.0);
    // zero overlap never confirms
    assert_eq!(score_pair(&snapshot, "salt", 1).signals.synonym, 0.0);
}

#[test]
fn test_composite_is_clamped() {
    let config = MapperConfig::default();
    let negative = SignalBreakdown {
        affinity: -2.0,
        ..SignalBreakdown::default()
    };
    assert_eq!(composite_score(&negative, &config), 0.0);
    let perfect = SignalBreakdown {
        overlap: 1.0,
        similarity: 1.0,
        segment: 1.0,
        affinity: 1.0,
        synonym: 1.0,
    };
    assert!((composite_score(&perfect, &config) - 1.0).abs() < 1e-12);
}

#[test]
fn test_reason_precedence() {
    let config = MapperConfig::default();
    let base = SignalBreakdown {
        overlap: 0.95,
        similarity: 0.95,
        segment: 1.0,
        affinity: 1.0,
        synonym: 1.0,
    };
    assert_eq!(derive_reason(&base, &config), MatchReason::PrimarySegment);

    let no_segment = SignalBreakdown { segment: 0.6, ..base };
    assert_eq!(derive_reason(&no_segment, &config), MatchReason::SynonymConfirmed);

    let no_synonym = SignalBreakdown { synonym: 0.0, ..no_segment };
    assert_eq!(derive_reason(&no_synonym, &config), MatchReason::StrongOverlap);

    let weak_overlap = SignalBreakdown { overlap: 0.5, ..no_synonym };
    assert_eq!(derive_reason(&weak_overlap, &config), MatchReason::StrongSimilarity);

    let nothing_strong = SignalBreakdown { similarity: 0.5, ..weak_overlap };
    // overlap 0.175 vs similarity 0.125 vs segment 0.12 vs affinity 0.1
    assert_eq!(
        derive_reason(&nothing_strong, &config),
        MatchReason::Dominant(Signal::Overlap)
    );
}

#[test]
fn test_dominant_ties_follow_signal_order() {
    let mut config = MapperConfig::default();
    config.weights = crate::services::config::SignalWeights {
        overlap: 0.2,
        similarity: 0.2,
        segment: 0.2,
        affinity: 0.2,
        synonym: 0.2,
    };
    let tied = SignalBreakdown {
        overlap: 0.0,
        similarity: 0.5,
        segment: 0.5,
        affinity: 0.0,
        synonym: 0.0,
    };
    assert_eq!(dominant_signal(&tied, &config), Signal::Similarity);

    let all_zero = SignalBreakdown::default();
    assert_eq!(dominant_signal(&all_zero, &config), Signal::Overlap);
}

#[test]
fn test_unmatchable_token_does_not_depress_overlap() {
    let snapshot = golden_snapshot();
    let plain = score_pair(&snapshot, "canola oil", 2);
    let with_noise = score_pair(&snapshot, "canola oil xyzzyq", 2);
    assert!((plain.signals.overlap - with_noise.signals.overlap).abs() < 1e-12);
}

#[test]
fn test_empty_core_scores_zero_overlap() {
    let snapshot = CorpusSnapshot::build(vec![FoodRecord {
        fdc_id: 1,
        description: "Salt, table".into(),
        category: None,
        data_type: "foundation_food".into(),
    }]);
    let matched = score_pair(&snapshot, "raw", 1);
    assert_eq!(matched.signals.overlap, 0.0);
    assert_eq!(matched.signals.synonym, 0.0);
}
