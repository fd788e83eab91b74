//! Synonym clusters over the ingredient vocabulary.
//!
//! Entries are grouped by their identity tokens plus lemmatized form
//! modifiers, so "garlic powder" and "powdered garlic" share a cluster while
//! "minced garlic" stays separate. The most frequent member is canonical.
//!
//! Clusters the current run has not mapped can be scored against the corpus
//! to propose new entries: a best candidate plus the surface forms to add.

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use crate::database::corpus_repo;
use crate::services::config::MapperConfig;
use crate::services::mapper::analysis::tokenizer::slugify;
use crate::services::mapper::models::acceptance::evaluate_matches;
use crate::services::mapper::models::types::{ingredient_key, MatchStatus, VocabularyEntry};
use crate::services::mapper::state::corpus::CorpusSnapshot;
use crate::types::errors::{MapperError, MapperResult};

/// Aliases rarer than this are dropped.
pub const MIN_ALIAS_COUNT: i64 = 5;
/// A single-member cluster is kept only at this frequency or above.
pub const MIN_SINGLE_COUNT: i64 = 50;
/// Clusters used less than this are not proposed as new entries.
pub const DEFAULT_SUGGEST_MIN_COUNT: i64 = 50;
/// Candidates scoring at least this are counted as strong.
const STRONG_CANDIDATE_SCORE: f64 = 0.5;

const FORM_MODIFIERS: &[&str] = &[
    "powder", "powdered", "ground", "granulated", "granules", "flakes", "flaked", "minced",
    "chopped", "diced", "sliced", "shredded", "grated", "crushed", "whole", "halved",
    "quartered", "cubed", "mashed", "pureed", "fresh", "dried", "dry", "frozen", "canned",
    "pickled", "smoked", "cured", "roasted", "toasted", "raw", "cooked", "uncooked",
    "blanched", "peeled", "seeded", "pitted", "boneless", "skinless", "melted", "softened",
    "large", "medium", "small", "baby", "mini", "jumbo", "thin", "thick", "organic",
    "natural", "pure", "real", "imitation", "low-fat", "nonfat", "unsalted", "salted",
    "sweetened", "unsweetened",
];

const LEMMAS: &[(&str, &str)] = &[
    ("powdered", "powder"),
    ("granulated", "granules"),
    ("flaked", "flakes"),
    ("dried", "dry"),
    ("roasted", "roast"),
    ("toasted", "toast"),
    ("smoked", "smoke"),
    ("minced", "mince"),
    ("chopped", "chop"),
    ("diced", "dice"),
    ("sliced", "slice"),
    ("shredded", "shred"),
    ("grated", "grate"),
    ("crushed", "crush"),
    ("peeled", "peel"),
    ("seeded", "seed"),
    ("pitted", "pit"),
    ("halved", "half"),
    ("quartered", "quarter"),
    ("cubed", "cube"),
    ("mashed", "mash"),
    ("pureed", "puree"),
    ("cloves", "clove"),
    ("heads", "head"),
    ("bulbs", "bulb"),
    ("stalks", "stalk"),
    ("leaves", "leaf"),
    ("sprigs", "sprig"),
    ("bunches", "bunch"),
    ("ribs", "rib"),
    ("ears", "ear"),
    ("strips", "strip"),
    ("pieces", "piece"),
];

/// Measurement words; never part of an ingredient's identity.
const UNIT_WORDS: &[&str] = &[
    "clove", "cloves", "head", "heads", "bulb", "bulbs", "stalk", "stalks", "leaf", "leaves",
    "sprig", "sprigs", "bunch", "bunches", "rib", "ribs", "ear", "ears", "strip", "strips",
    "piece", "pieces", "slice", "slices", "cup", "cups", "tablespoon", "tablespoons",
    "teaspoon", "teaspoons", "pound", "pounds", "ounce", "ounces", "can", "cans", "package",
    "packages",
];

static RE_CLUSTER_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("Invalid regex"));
static FORM_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| FORM_MODIFIERS.iter().copied().collect());
static UNIT_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| UNIT_WORDS.iter().copied().collect());
static LEMMA_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LEMMAS.iter().copied().collect());

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClusterAlias {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SynonymCluster {
    pub canonical: String,
    pub count: i64,
    pub base: Vec<String>,
    /// Sorted lemmatized modifiers joined by `+`, or `base`.
    pub form: String,
    pub aliases: Vec<ClusterAlias>,
    pub total_usage: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClusterReport {
    pub min_frequency: i64,
    pub total_clusters: usize,
    pub base_ingredients: usize,
    pub with_aliases: usize,
    pub clusters: Vec<SynonymCluster>,
}

fn cluster_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE_CLUSTER_NOISE
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.len() >= 2)
        .map(str::to_string)
        .collect()
}

pub fn lemmatize(word: &str) -> &str {
    LEMMA_MAP.get(word).copied().unwrap_or(word)
}

/// Split an ingredient into identity tokens and lemmatized form modifiers.
pub fn split_base_and_form(ingredient: &str) -> (Vec<String>, Vec<String>) {
    let mut base = Vec::new();
    let mut form = Vec::new();
    for token in cluster_tokens(ingredient) {
        let lemma = lemmatize(&token);
        if FORM_SET.contains(token.as_str()) || FORM_SET.contains(lemma) {
            form.push(lemma.to_string());
        } else if !UNIT_SET.contains(token.as_str()) {
            base.push(token);
        }
    }
    (base, form)
}

/// `base+tokens|form+tokens`, both halves sorted.
pub fn cluster_key(base: &[String], form: &[String]) -> String {
    let join_sorted = |tokens: &[String], empty: &str| {
        if tokens.is_empty() {
            return empty.to_string();
        }
        let mut sorted = tokens.to_vec();
        sorted.sort();
        sorted.join("+")
    };
    format!("{}|{}", join_sorted(base, "_empty_"), join_sorted(form, "base"))
}

struct Member {
    name: String,
    count: i64,
    base: Vec<String>,
    form: Vec<String>,
}

pub fn build_clusters(entries: &[VocabularyEntry], min_frequency: i64) -> ClusterReport {
    let mut groups: BTreeMap<String, Vec<Member>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.frequency >= min_frequency) {
        let (base, form) = split_base_and_form(&entry.name);
        if base.is_empty() {
            continue;
        }
        groups
            .entry(cluster_key(&base, &form))
            .or_default()
            .push(Member {
                name: entry.name.to_lowercase(),
                count: entry.frequency,
                base,
                form,
            });
    }

    let mut clusters: Vec<SynonymCluster> = groups
        .into_values()
        .filter_map(|mut members| {
            members.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
            let total_usage = members.iter().map(|m| m.count).sum();
            let aliases: Vec<ClusterAlias> = members[1..]
                .iter()
                .filter(|m| m.count >= MIN_ALIAS_COUNT)
                .map(|m| ClusterAlias {
                    name: m.name.clone(),
                    count: m.count,
                })
                .collect();
            let canonical = members.swap_remove(0);
            if aliases.is_empty() && canonical.count < MIN_SINGLE_COUNT {
                return None;
            }

            let mut form = canonical.form;
            form.sort();
            Some(SynonymCluster {
                canonical: canonical.name,
                count: canonical.count,
                base: canonical.base,
                form: if form.is_empty() {
                    "base".to_string()
                } else {
                    form.join("+")
                },
                aliases,
                total_usage,
            })
        })
        .collect();

    clusters.sort_by(|a, b| {
        b.total_usage
            .cmp(&a.total_usage)
            .then_with(|| a.canonical.cmp(&b.canonical))
    });

    let base_ingredients = clusters
        .iter()
        .map(|cluster| {
            let mut base = cluster.base.clone();
            base.sort();
            base.join("+")
        })
        .collect::<BTreeSet<_>>()
        .len();

    ClusterReport {
        min_frequency,
        total_clusters: clusters.len(),
        base_ingredients,
        with_aliases: clusters.iter().filter(|c| !c.aliases.is_empty()).count(),
        clusters,
    }
}

/// Cluster the stored vocabulary.
pub async fn clusters_from_vocabulary(
    pool: &SqlitePool,
    min_frequency: i64,
) -> MapperResult<ClusterReport> {
    let vocabulary = corpus_repo::load_vocabulary(pool).await?;
    let report = build_clusters(&vocabulary.entries, min_frequency);
    log::info!(
        "Built {} clusters ({} with aliases) from {} vocabulary entries",
        report.total_clusters,
        report.with_aliases,
        vocabulary.entries.len()
    );
    Ok(report)
}

/// Reference food proposed for an unresolved cluster.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestedCandidate {
    pub fdc_id: i64,
    pub description: String,
    pub category: Option<String>,
    pub score: f64,
    pub status: MatchStatus,
    /// Cluster member whose score produced the candidate.
    pub matched_form: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClusterSuggestion {
    pub slug: String,
    pub display_name: String,
    /// Canonical first, then aliases not already resolved.
    pub surface_forms: Vec<String>,
    pub recipe_count: i64,
    pub candidate: Option<SuggestedCandidate>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestionReport {
    /// Run whose mapped ingredients count as resolved.
    pub run_id: Option<String>,
    pub min_count: i64,
    pub considered: usize,
    pub skipped_resolved: usize,
    pub without_candidate: usize,
    pub strong_candidates: usize,
    pub suggestions: Vec<ClusterSuggestion>,
}

fn display_name(canonical: &str) -> String {
    canonical
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn surface_forms(cluster: &SynonymCluster, resolved: &HashSet<String>) -> Vec<String> {
    let canonical = ingredient_key(&cluster.canonical);
    let mut seen = HashSet::from([canonical.clone()]);
    let mut forms = vec![canonical];
    for alias in &cluster.aliases {
        let form = ingredient_key(&alias.name);
        if !resolved.contains(&form) && seen.insert(form.clone()) {
            forms.push(form);
        }
    }
    forms
}

/// First member (canonical, then aliases by count) that scores above no-match.
fn best_candidate(
    snapshot: &CorpusSnapshot,
    cluster: &SynonymCluster,
    config: &MapperConfig,
) -> Option<SuggestedCandidate> {
    std::iter::once(cluster.canonical.as_str())
        .chain(cluster.aliases.iter().map(|alias| alias.name.as_str()))
        .find_map(|form| {
            let query = snapshot.query(form, 0);
            let outcome = evaluate_matches(&snapshot.score_all(&query, config), config);
            if outcome.status == MatchStatus::NoMatch {
                return None;
            }
            let best = outcome.best?;
            let food = snapshot.food(best.fdc_id)?;
            Some(SuggestedCandidate {
                fdc_id: best.fdc_id,
                description: food.description.clone(),
                category: food.category.clone(),
                score: best.score,
                status: outcome.status,
                matched_form: form.to_string(),
            })
        })
}

/// Propose entries for clusters with at least `min_count` total usage whose
/// canonical name is not in `resolved`. Sorted by usage, then slug.
pub fn suggest_entries(
    snapshot: &CorpusSnapshot,
    clusters: &[SynonymCluster],
    config: &MapperConfig,
    min_count: i64,
    resolved: &HashSet<String>,
) -> SuggestionReport {
    let (skipped, open): (Vec<&SynonymCluster>, Vec<&SynonymCluster>) = clusters
        .iter()
        .filter(|cluster| cluster.total_usage >= min_count)
        .partition(|cluster| resolved.contains(&ingredient_key(&cluster.canonical)));

    let mut suggestions: Vec<ClusterSuggestion> = open
        .par_iter()
        .map(|cluster| ClusterSuggestion {
            slug: slugify(&cluster.canonical),
            display_name: display_name(&cluster.canonical),
            surface_forms: surface_forms(cluster, resolved),
            recipe_count: cluster.total_usage,
            candidate: best_candidate(snapshot, cluster, config),
        })
        .collect();
    suggestions.sort_by(|a, b| {
        b.recipe_count
            .cmp(&a.recipe_count)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    SuggestionReport {
        run_id: None,
        min_count,
        considered: skipped.len() + open.len(),
        skipped_resolved: skipped.len(),
        without_candidate: suggestions.iter().filter(|s| s.candidate.is_none()).count(),
        strong_candidates: suggestions
            .iter()
            .filter(|s| {
                s.candidate
                    .as_ref()
                    .is_some_and(|c| c.score >= STRONG_CANDIDATE_SCORE)
            })
            .count(),
        suggestions,
    }
}

/// Cluster the stored vocabulary and score the unresolved clusters against
/// the stored corpus. Writes nothing.
pub async fn suggest_from_vocabulary(
    pool: &SqlitePool,
    config: &MapperConfig,
    min_frequency: i64,
    min_count: i64,
    resolved: HashSet<String>,
) -> MapperResult<SuggestionReport> {
    let corpus = corpus_repo::load_reference_foods(pool).await?;
    if corpus.records.is_empty() {
        return Err(MapperError::Precondition(
            "reference corpus is empty".to_string(),
        ));
    }
    let clusters = clusters_from_vocabulary(pool, min_frequency).await?.clusters;

    let snapshot = CorpusSnapshot::build(corpus.records);
    let worker_config = config.clone();
    let report = tokio::task::spawn_blocking(move || {
        suggest_entries(&snapshot, &clusters, &worker_config, min_count, &resolved)
    })
    .await
    .map_err(|e| MapperError::Internal(format!("Suggestion worker failed: {e}")))?;

    log::info!(
        "Suggested {} entries ({} with a candidate, {} strong); {} clusters already resolved",
        report.suggestions.len(),
        report.suggestions.len() - report.without_candidate,
        report.strong_candidates,
        report.skipped_resolved
    );
    Ok(report)
}

#[cfg(test)]
#[path = "tests/clusters_tests.rs"]
mod tests;
