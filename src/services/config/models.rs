use serde::{Deserialize, Serialize};

use crate::services::gate::tripwire::{TripwireCase, TRIPWIRE_VERSION};
use crate::services::mapper::analysis::tables::{CATEGORY_TABLE_VERSION, SYNONYM_TABLE_VERSION};
use crate::services::mapper::analysis::tokenizer::{
    STATE_TOKENS_VERSION, STOP_WORDS_VERSION, TOKENIZER_VERSION,
};

pub const DEFAULT_CONFIG_VERSION: &str = "lexmap-v1";

/// Signal weights. Must sum to 1.0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SignalWeights {
    pub overlap: f64,
    pub similarity: f64,
    pub segment: f64,
    pub affinity: f64,
    pub synonym: f64,
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.overlap + self.similarity + self.segment + self.affinity + self.synonym
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            overlap: 0.35,
            similarity: 0.25,
            segment: 0.20,
            affinity: 0.10,
            synonym: 0.10,
        }
    }
}

/// Status thresholds on the composite score.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub mapped: f64,
    pub review: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mapped: 0.80,
            review: 0.40,
        }
    }
}

/// Gate parameters of the individual signals, near-ties and reason derivation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GateParams {
    pub variant_credit: f64,
    pub similarity_gate_overlap: f64,
    pub similarity_cap: f64,
    pub segment_strong: f64,
    pub segment_weak: f64,
    pub affinity_match: f64,
    pub affinity_mismatch: f64,
    pub near_tie_delta: f64,
    pub near_tie_limit: usize,
    pub reason_segment_overlap: f64,
    pub reason_high_overlap: f64,
    pub reason_high_similarity: f64,
}

impl Default for GateParams {
    fn default() -> Self {
        Self {
            variant_credit: 0.9,
            similarity_gate_overlap: 0.40,
            similarity_cap: 0.20,
            segment_strong: 0.60,
            segment_weak: 0.30,
            affinity_match: 1.0,
            affinity_mismatch: -2.0,
            near_tie_delta: 0.05,
            near_tie_limit: 20,
            reason_segment_overlap: 0.60,
            reason_high_overlap: 0.90,
            reason_high_similarity: 0.92,
        }
    }
}

/// Versions of every frozen table a run depended on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TableVersions {
    pub tokenizer: String,
    pub state_tokens: String,
    pub stop_words: String,
    pub category_expectations: String,
    pub synonyms: String,
    pub tripwires: String,
}

impl Default for TableVersions {
    fn default() -> Self {
        Self {
            tokenizer: TOKENIZER_VERSION.into(),
            state_tokens: STATE_TOKENS_VERSION.into(),
            stop_words: STOP_WORDS_VERSION.into(),
            category_expectations: CATEGORY_TABLE_VERSION.into(),
            synonyms: SYNONYM_TABLE_VERSION.into(),
            tripwires: TRIPWIRE_VERSION.into(),
        }
    }
}

/// Complete scorer/pipeline configuration. Snapshotted into every run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MapperConfig {
    pub version: String,
    pub weights: SignalWeights,
    pub thresholds: Thresholds,
    pub gates: GateParams,
    pub tables: TableVersions,
    /// Replaces the built-in tripwire battery when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tripwires: Option<Vec<TripwireCase>>,
    pub write_concurrency: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.into(),
            weights: SignalWeights::default(),
            thresholds: Thresholds::default(),
            gates: GateParams::default(),
            tables: TableVersions::default(),
            tripwires: None,
            write_concurrency: 4,
        }
    }
}
