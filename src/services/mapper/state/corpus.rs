use std::collections::{BTreeSet, HashMap};

use crate::services::config::MapperConfig;
use crate::services::mapper::analysis::canonical::resolve_canonical;
use crate::services::mapper::analysis::indexes::CorpusStats;
use crate::services::mapper::analysis::inverted::resolve_inverted;
use crate::services::mapper::analysis::scoring::score_candidate;
use crate::services::mapper::analysis::tokenizer::{
    classify_tokens, normalize_text, slugify, tokenize,
};
use crate::services::mapper::models::types::{
    ingredient_key, sort_matches_deterministic, FoodRecord, IngredientQuery, ReferenceFood,
    ScoredMatch,
};

/// Immutable reference corpus for one run: processed foods plus their
/// document-frequency statistics. Built once, shared read-only.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    foods: Vec<ReferenceFood>,
    by_id: HashMap<i64, usize>,
    stats: CorpusStats,
}

impl CorpusSnapshot {
    /// Process raw records (ordered by id) and compute corpus statistics.
    pub fn build(mut records: Vec<FoodRecord>) -> Self {
        records.sort_by_key(|record| record.fdc_id);
        records.dedup_by_key(|record| record.fdc_id);

        let foods: Vec<ReferenceFood> = records.into_iter().map(process_food).collect();
        let by_id = foods
            .iter()
            .enumerate()
            .map(|(index, food)| (food.fdc_id, index))
            .collect();
        let stats = CorpusStats::build(foods.iter().map(|food| food.core_tokens.as_slice()));

        Self {
            foods,
            by_id,
            stats,
        }
    }

    pub fn foods(&self) -> &[ReferenceFood] {
        &self.foods
    }

    pub fn food(&self, fdc_id: i64) -> Option<&ReferenceFood> {
        self.by_id.get(&fdc_id).map(|index| &self.foods[*index])
    }

    pub fn stats(&self) -> &CorpusStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Process one ingredient string against this snapshot's statistics.
    pub fn query(&self, raw: &str, frequency: i64) -> IngredientQuery {
        let tokens = tokenize(raw);
        let channels = classify_tokens(&tokens);
        IngredientQuery {
            key: ingredient_key(raw),
            raw: raw.to_string(),
            normalized: normalize_text(raw),
            total_weight: self.stats.total_weight(&channels.core),
            matchable_weight: self.stats.matchable_weight(&channels.core),
            core_tokens: channels.core,
            state_tokens: channels.state,
            slug: slugify(raw),
            frequency,
        }
    }

    /// Score the ingredient against every food: score desc, fdc_id asc.
    pub fn score_all(&self, query: &IngredientQuery, config: &MapperConfig) -> Vec<ScoredMatch> {
        let mut matches: Vec<ScoredMatch> = self
            .foods
            .iter()
            .map(|food| score_candidate(query, food, &self.stats, config))
            .collect();
        sort_matches_deterministic(&mut matches);
        matches
    }
}

fn process_food(record: FoodRecord) -> ReferenceFood {
    let canonical = resolve_canonical(&record.description);
    let inverted_name = resolve_inverted(&canonical);

    let tokens = tokenize(&canonical.working_segments.join(" "));
    let channels = classify_tokens(&tokens);
    let core_set: BTreeSet<String> = channels.core.iter().cloned().collect();
    let segment_tokens: Vec<BTreeSet<String>> = canonical
        .working_segments
        .iter()
        .map(|segment| classify_tokens(&tokenize(segment)).core.into_iter().collect())
        .collect();

    ReferenceFood {
        fdc_id: record.fdc_id,
        description: record.description,
        data_type: record.data_type,
        category: record.category,
        domain: canonical.domain,
        segments: canonical.working_segments,
        core_tokens: channels.core,
        core_set,
        state_tokens: channels.state,
        segment_tokens,
        base_name: canonical.base_name,
        specific_name: canonical.specific_name,
        inverted_name,
        slug: canonical.specific_slug,
        alternate_names: canonical.alternate_names,
    }
}

#[cfg(test)]
#[path = "../tests/state/corpus_tests.rs"]
mod tests;
