//! Five-signal composite scorer for one (ingredient, reference food) pair.
//!
//! Every function here is pure: identical inputs always yield a
//! bit-identical score and reason.

use std::collections::BTreeSet;

use crate::services::config::MapperConfig;
use crate::services::mapper::analysis::indexes::CorpusStats;
use crate::services::mapper::analysis::tables::{expected_categories, synonym_requirements};
use crate::services::mapper::analysis::tokenizer::token_variants;
use crate::services::mapper::models::types::{
    IngredientQuery, MatchReason, ReferenceFood, ScoredMatch, Signal, SignalBreakdown,
};

#[cfg(feature = "debug_matcher")]
use log::debug;

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 1.0;

/// Score one candidate against one ingredient.
pub fn score_candidate(
    query: &IngredientQuery,
    food: &ReferenceFood,
    stats: &CorpusStats,
    config: &MapperConfig,
) -> ScoredMatch {
    let signals = compute_signals(query, food, stats, config);
    let score = composite_score(&signals, config);
    let reason = derive_reason(&signals, config);

    #[cfg(feature = "debug_matcher")]
    debug!(
        "[MATCHER_CALIBRATION] score | ingredient={} fdc_id={} score={:.4} reason={} signals={:?}",
        query.key, food.fdc_id, score, reason, signals
    );

    ScoredMatch {
        fdc_id: food.fdc_id,
        score,
        reason,
        signals,
    }
}

pub fn compute_signals(
    query: &IngredientQuery,
    food: &ReferenceFood,
    stats: &CorpusStats,
    config: &MapperConfig,
) -> SignalBreakdown {
    let overlap = token_overlap(query, &food.core_set, stats, config.gates.variant_credit);
    SignalBreakdown {
        overlap,
        similarity: gated_similarity(query, food, overlap, config),
        segment: segment_match(query, food, stats, config),
        affinity: category_affinity(query, food, config),
        synonym: synonym_confirmation(query, food, overlap),
    }
}

/// Directional IDF-weighted overlap of the ingredient's core tokens against
/// `target`. Variant-only matches earn `variant_credit` of the weight.
pub fn token_overlap(
    query: &IngredientQuery,
    target: &BTreeSet<String>,
    stats: &CorpusStats,
    variant_credit: f64,
) -> f64 {
    if query.matchable_weight <= 0.0 {
        return 0.0;
    }
    let mut matched = 0.0;
    for token in &query.core_tokens {
        if target.contains(token) {
            matched += stats.weight(token);
        } else if token_variants(token)
            .iter()
            .any(|variant| target.contains(variant))
        {
            matched += variant_credit * stats.weight(token);
        }
    }
    (matched / query.matchable_weight).clamp(SCORE_MIN, SCORE_MAX)
}

/// Best Jaro-Winkler similarity over the candidate's name forms, capped when
/// overlap is too weak to support it.
pub fn gated_similarity(
    query: &IngredientQuery,
    food: &ReferenceFood,
    overlap: f64,
    config: &MapperConfig,
) -> f64 {
    let core_joined = food.core_tokens.join(" ");
    let mut forms: Vec<&str> = vec![food.inverted_name.as_str(), core_joined.as_str()];
    if let Some(second) = food.second_segment() {
        forms.push(second);
    }
    forms.extend(food.alternate_names.iter().map(String::as_str));

    let raw = forms
        .into_iter()
        .filter(|form| !form.is_empty())
        .map(|form| strsim::jaro_winkler(&query.normalized, form))
        .fold(0.0_f64, f64::max);

    if overlap < config.gates.similarity_gate_overlap {
        raw.min(config.gates.similarity_cap)
    } else {
        raw
    }
}

/// 1.0 when the primary segment carries the ingredient, 0.6 when only later
/// segments do, 0.3 for partial coverage of either, else 0.
pub fn segment_match(
    query: &IngredientQuery,
    food: &ReferenceFood,
    stats: &CorpusStats,
    config: &MapperConfig,
) -> f64 {
    let credit = config.gates.variant_credit;
    let primary = food
        .primary_segment_tokens()
        .map(|tokens| token_overlap(query, tokens, stats, credit))
        .unwrap_or(0.0);
    let secondary = token_overlap(query, &food.secondary_segment_tokens(), stats, credit);

    let strong = config.gates.segment_strong;
    let weak = config.gates.segment_weak;
    if primary >= strong {
        1.0
    } else if secondary >= strong {
        0.6
    } else if primary >= weak || secondary >= weak {
        0.3
    } else {
        0.0
    }
}

/// +match when the candidate's category meets an expectation, 0 when no
/// expectation exists or the category is unknown, otherwise the mismatch
/// penalty.
pub fn category_affinity(query: &IngredientQuery, food: &ReferenceFood, config: &MapperConfig) -> f64 {
    let mut has_expectation = false;
    let mut satisfied = false;
    for token in &query.core_tokens {
        let Some(expected) = expected_categories(token) else {
            continue;
        };
        has_expectation = true;
        if let Some(category) = &food.category {
            if expected.iter().any(|c| c.eq_ignore_ascii_case(category)) {
                satisfied = true;
            }
        }
    }

    match (&food.category, has_expectation, satisfied) {
        (_, false, _) => 0.0,
        (None, true, _) => 0.0,
        (Some(_), true, true) => config.gates.affinity_match,
        (Some(_), true, false) => config.gates.affinity_mismatch,
    }
}

/// 1.0 when the candidate's tokens satisfy a required set of the synonym
/// table. Never fires without overlap.
pub fn synonym_confirmation(query: &IngredientQuery, food: &ReferenceFood, overlap: f64) -> f64 {
    if overlap <= 0.0 {
        return 0.0;
    }
    let requirements = synonym_requirements(&query.normalized)
        .or_else(|| synonym_requirements(&query.core_tokens.join(" ")));
    let Some(sets) = requirements else {
        return 0.0;
    };
    let confirmed = sets
        .iter()
        .any(|set| set.iter().all(|token| food.has_token(token)));
    if confirmed {
        1.0
    } else {
        0.0
    }
}

pub fn weighted_contribution(signals: &SignalBreakdown, signal: Signal, config: &MapperConfig) -> f64 {
    let weights = &config.weights;
    let weight = match signal {
        Signal::Overlap => weights.overlap,
        Signal::Similarity => weights.similarity,
        Signal::Segment => weights.segment,
        Signal::Affinity => weights.affinity,
        Signal::Synonym => weights.synonym,
    };
    weight * signals.get(signal)
}

/// Weighted sum of the five signals, clamped to [0, 1].
pub fn composite_score(signals: &SignalBreakdown, config: &MapperConfig) -> f64 {
    let sum: f64 = Signal::ORDER
        .iter()
        .map(|signal| weighted_contribution(signals, *signal, config))
        .sum();
    sum.clamp(SCORE_MIN, SCORE_MAX)
}

pub fn derive_reason(signals: &SignalBreakdown, config: &MapperConfig) -> MatchReason {
    let gates = &config.gates;
    if signals.segment >= 1.0 && signals.overlap >= gates.reason_segment_overlap {
        return MatchReason::PrimarySegment;
    }
    if signals.synonym >= 1.0 {
        return MatchReason::SynonymConfirmed;
    }
    if signals.overlap >= gates.reason_high_overlap {
        return MatchReason::StrongOverlap;
    }
    if signals.similarity >= gates.reason_high_similarity {
        return MatchReason::StrongSimilarity;
    }
    MatchReason::Dominant(dominant_signal(signals, config))
}

/// Highest weighted contribution; earlier signals win ties.
pub fn dominant_signal(signals: &SignalBreakdown, config: &MapperConfig) -> Signal {
    let mut best = Signal::ORDER[0];
    let mut best_value = weighted_contribution(signals, best, config);
    for signal in Signal::ORDER.iter().skip(1) {
        let value = weighted_contribution(signals, *signal, config);
        if value > best_value {
            best = *signal;
            best_value = value;
        }
    }
    best
}

#[cfg(test)]
#[path = "../tests/analysis/scoring_tests.rs"]
mod tests;
