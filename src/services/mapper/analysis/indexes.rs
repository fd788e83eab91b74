//! Corpus statistics: per-token document frequency and IDF weights.

use std::collections::{BTreeMap, BTreeSet};

use super::tokenizer::token_variants;

/// Document-frequency table over the core-token sets of one corpus snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorpusStats {
    pub total_foods: usize,
    pub token_df: BTreeMap<String, usize>,
}

impl CorpusStats {
    /// Build df(t) = number of reference foods whose core-token set contains t.
    pub fn build<'a, I>(core_token_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut token_df: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_foods = 0usize;
        for tokens in core_token_sets {
            total_foods += 1;
            let unique: BTreeSet<&String> = tokens.iter().collect();
            for token in unique {
                *token_df.entry(token.clone()).or_default() += 1;
            }
        }
        Self {
            total_foods,
            token_df,
        }
    }

    pub fn df(&self, token: &str) -> usize {
        self.token_df.get(token).copied().unwrap_or(0)
    }

    pub fn weight(&self, token: &str) -> f64 {
        idf_weight(self.df(token))
    }

    /// A token can match if it, or one of its plural/singular variants, occurs
    /// in at least one reference food.
    pub fn is_matchable(&self, token: &str) -> bool {
        self.df(token) > 0
            || token_variants(token)
                .iter()
                .any(|variant| self.df(variant) > 0)
    }

    pub fn total_weight(&self, tokens: &[String]) -> f64 {
        tokens.iter().map(|token| self.weight(token)).sum()
    }

    /// Weight of the tokens that can possibly be satisfied by some food.
    pub fn matchable_weight(&self, tokens: &[String]) -> f64 {
        tokens
            .iter()
            .filter(|token| self.is_matchable(token))
            .map(|token| self.weight(token))
            .sum()
    }

    /// Canonical text of the entire df table; input of the corpus fingerprint.
    pub fn fingerprint_text(&self) -> String {
        let mut text = format!("N={}\n", self.total_foods);
        for (token, df) in &self.token_df {
            text.push_str(token);
            text.push('\t');
            text.push_str(&df.to_string());
            text.push('\n');
        }
        text
    }
}

/// w(t) = 1 / ln(2 + df). Positive, non-increasing in df, defined at df = 0.
pub fn idf_weight(document_frequency: usize) -> f64 {
    1.0 / (2.0 + document_frequency as f64).ln()
}

#[cfg(test)]
#[path = "../tests/analysis/indexes_tests.rs"]
mod tests;
