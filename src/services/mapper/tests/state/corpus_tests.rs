use super::*;
use crate::services::mapper::golden_corpus::{golden_records, golden_snapshot, GOLDEN_FOODS};

#[test]
fn test_snapshot_processes_every_record() {
    let snapshot = golden_snapshot();
    assert_eq!(snapshot.len(), GOLDEN_FOODS.len());
    assert_eq!(snapshot.stats().total_foods, GOLDEN_FOODS.len());
    assert!(!snapshot.is_empty());
}

#[test]
fn test_reference_food_fields() {
    let snapshot = golden_snapshot();
    let olive_oil = snapshot.food(1).expect("olive oil");
    assert_eq!(olive_oil.core_tokens, vec!["oil", "olive", "salad", "cooking"]);
    assert!(olive_oil.state_tokens.is_empty());
    assert_eq!(olive_oil.inverted_name, "olive oil");
    assert_eq!(olive_oil.slug, "oil");
    assert_eq!(olive_oil.segment_tokens.len(), 3);

    let potatoes = snapshot.food(4).expect("potatoes");
    assert!(potatoes.state_tokens.contains(&"boiled".to_string()));
    assert!(!potatoes.core_set.contains("oil"));
}

#[test]
fn test_brand_tokens_excluded_from_core() {
    let snapshot = golden_snapshot();
    let snack = snapshot.food(21).expect("snack");
    assert!(!snack.core_set.contains("kellogg"));
    assert!(snack.core_set.contains("nutri"));
}

#[test]
fn test_query_fields() {
    let snapshot = golden_snapshot();
    let query = snapshot.query("  Ground   BEEF ", 12);
    assert_eq!(query.key, "ground beef");
    assert_eq!(query.normalized, "ground beef");
    assert_eq!(query.core_tokens, vec!["beef"]);
    assert_eq!(query.state_tokens, vec!["ground"]);
    assert_eq!(query.slug, "ground-beef");
    assert_eq!(query.frequency, 12);
    assert!((query.matchable_weight - query.total_weight).abs() < 1e-12);
}

#[test]
fn test_snapshot_order_is_independent_of_input_order() {
    let mut reversed = golden_records();
    reversed.reverse();
    let a = golden_snapshot();
    let b = CorpusSnapshot::build(reversed);
    assert_eq!(a.stats().fingerprint_text(), b.stats().fingerprint_text());
    let ids_a: Vec<i64> = a.foods().iter().map(|f| f.fdc_id).collect();
    let ids_b: Vec<i64> = b.foods().iter().map(|f| f.fdc_id).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn test_score_all_is_sorted() {
    let snapshot = golden_snapshot();
    let config = MapperConfig::default();
    let ranked = snapshot.score_all(&snapshot.query("oil", 1), &config);
    assert_eq!(ranked.len(), snapshot.len());
    for pair in ranked.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].fdc_id < pair[1].fdc_id)
        );
    }
}
