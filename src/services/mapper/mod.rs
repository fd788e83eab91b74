//! Lexical mapper: the deterministic core that scores ingredients against
//! reference foods.
//!
//! Tokenizer → canonical/inverted names → corpus statistics → five-signal
//! scorer → classifier and near-ties.
pub mod analysis;
pub mod models;
pub mod state;

// Test-only modules
#[cfg(test)]
pub mod golden_corpus;

pub use analysis::scoring::score_candidate;
pub use models::acceptance::{classify_score, collect_near_ties, evaluate_matches, MatchOutcome};
pub use models::types::{
    ingredient_key, FoodRecord, IngredientQuery, MatchReason, MatchStatus, ReferenceFood,
    ScoredMatch, Signal, SignalBreakdown, VocabularyEntry,
};
pub use state::corpus::CorpusSnapshot;
