//! Domain types for the lexical mapper.
//!
//! Contains: FoodRecord, VocabularyEntry, ReferenceFood, IngredientQuery,
//! Signal, SignalBreakdown, MatchReason, ScoredMatch, MatchStatus.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::services::mapper::analysis::canonical::Domain;

// ==================== INPUT RECORDS ====================

/// One reference-food row as read from the corpus snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub fdc_id: i64,
    pub description: String,
    pub category: Option<String>,
    /// Data-source tier (e.g. "foundation_food", "sr_legacy_food").
    pub data_type: String,
}

/// One ingredient-vocabulary row (name + observed frequency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub name: String,
    pub frequency: i64,
}

/// Ingredient key: lower-cased raw name with whitespace runs collapsed.
pub fn ingredient_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ==================== PROCESSED INPUTS ====================

/// A reference food processed once per corpus snapshot. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFood {
    pub fdc_id: i64,
    pub description: String,
    pub data_type: String,
    pub category: Option<String>,
    pub domain: Option<Domain>,
    /// Normalized comma segments (prefix and brands removed).
    pub segments: Vec<String>,
    /// Core tokens in first-seen order.
    pub core_tokens: Vec<String>,
    pub core_set: BTreeSet<String>,
    pub state_tokens: Vec<String>,
    /// Core-token set of each segment, aligned with `segments`.
    pub segment_tokens: Vec<BTreeSet<String>>,
    pub base_name: String,
    pub specific_name: String,
    pub inverted_name: String,
    pub slug: String,
    pub alternate_names: Vec<String>,
}

impl ReferenceFood {
    pub fn primary_segment_tokens(&self) -> Option<&BTreeSet<String>> {
        self.segment_tokens.first()
    }

    /// Union of the core tokens of every segment after the first.
    pub fn secondary_segment_tokens(&self) -> BTreeSet<String> {
        self.segment_tokens
            .iter()
            .skip(1)
            .flat_map(|set| set.iter().cloned())
            .collect()
    }

    pub fn second_segment(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// Membership over core and state tokens combined.
    pub fn has_token(&self, token: &str) -> bool {
        self.core_set.contains(token) || self.state_tokens.iter().any(|t| t == token)
    }
}

/// An ingredient processed once per run against the corpus statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientQuery {
    pub key: String,
    pub raw: String,
    pub normalized: String,
    pub core_tokens: Vec<String>,
    pub state_tokens: Vec<String>,
    pub slug: String,
    pub total_weight: f64,
    pub matchable_weight: f64,
    pub frequency: i64,
}

// ==================== SIGNALS & REASONS ====================

/// The five scoring signals, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Overlap,
    Similarity,
    Segment,
    Affinity,
    Synonym,
}

impl Signal {
    pub const ORDER: [Signal; 5] = [
        Signal::Overlap,
        Signal::Similarity,
        Signal::Segment,
        Signal::Affinity,
        Signal::Synonym,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Overlap => "overlap",
            Signal::Similarity => "similarity",
            Signal::Segment => "segment",
            Signal::Affinity => "affinity",
            Signal::Synonym => "synonym",
        }
    }
}

/// Raw (unweighted) signal values of one (ingredient, food) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub overlap: f64,
    pub similarity: f64,
    pub segment: f64,
    pub affinity: f64,
    pub synonym: f64,
}

impl SignalBreakdown {
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Overlap => self.overlap,
            Signal::Similarity => self.similarity,
            Signal::Segment => self.segment,
            Signal::Affinity => self.affinity,
            Signal::Synonym => self.synonym,
        }
    }
}

/// Dominant reason behind a score. Codes are stable and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MatchReason {
    /// Primary description segment fully covered with solid overlap.
    PrimarySegment,
    SynonymConfirmed,
    StrongOverlap,
    StrongSimilarity,
    /// Highest weighted contribution when no stronger reason applies.
    Dominant(Signal),
}

impl MatchReason {
    /// Every reason the scorer can produce.
    pub fn all() -> Vec<MatchReason> {
        let mut reasons = vec![
            MatchReason::PrimarySegment,
            MatchReason::SynonymConfirmed,
            MatchReason::StrongOverlap,
            MatchReason::StrongSimilarity,
        ];
        reasons.extend(Signal::ORDER.iter().map(|s| MatchReason::Dominant(*s)));
        reasons
    }

    pub fn code(self) -> &'static str {
        match self {
            MatchReason::PrimarySegment => "primary_segment",
            MatchReason::SynonymConfirmed => "synonym_confirmed",
            MatchReason::StrongOverlap => "strong_overlap",
            MatchReason::StrongSimilarity => "strong_similarity",
            MatchReason::Dominant(Signal::Overlap) => "dominant_overlap",
            MatchReason::Dominant(Signal::Similarity) => "dominant_similarity",
            MatchReason::Dominant(Signal::Segment) => "dominant_segment",
            MatchReason::Dominant(Signal::Affinity) => "dominant_affinity",
            MatchReason::Dominant(Signal::Synonym) => "dominant_synonym",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|reason| reason.code() == code)
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl From<MatchReason> for String {
    fn from(reason: MatchReason) -> Self {
        reason.code().to_string()
    }
}

impl TryFrom<String> for MatchReason {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        MatchReason::from_code(&code).ok_or_else(|| format!("Unknown reason code: {code}"))
    }
}

/// Score of one (ingredient, food) pair. Produced fresh, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub fdc_id: i64,
    pub score: f64,
    pub reason: MatchReason,
    pub signals: SignalBreakdown,
}

/// Classification of a best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Mapped,
    NeedsReview,
    NoMatch,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Mapped => "mapped",
            MatchStatus::NeedsReview => "needs_review",
            MatchStatus::NoMatch => "no_match",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mapped" => Some(MatchStatus::Mapped),
            "needs_review" => Some(MatchStatus::NeedsReview),
            "no_match" => Some(MatchStatus::NoMatch),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== DETERMINISTIC ORDERING ====================

/// Sort matches deterministically: score desc → fdc_id asc.
pub fn sort_matches_deterministic(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.fdc_id.cmp(&b.fdc_id))
    });
}

#[cfg(test)]
#[path = "../tests/models/types_tests.rs"]
mod tests;
