use super::*;

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn sample_stats() -> CorpusStats {
    let foods = [
        tokens(&["oil", "olive", "salad", "cooking"]),
        tokens(&["oil", "canola"]),
        tokens(&["olives", "ripe"]),
        tokens(&["potatoes", "skin", "flesh", "salt"]),
    ];
    CorpusStats::build(foods.iter().map(|t| t.as_slice()))
}

#[test]
fn test_document_frequency_counts_foods() {
    let stats = sample_stats();
    assert_eq!(stats.total_foods, 4);
    assert_eq!(stats.df("oil"), 2);
    assert_eq!(stats.df("canola"), 1);
    assert_eq!(stats.df("boiled"), 0);
}

#[test]
fn test_duplicate_tokens_in_one_food_count_once() {
    let foods = [tokens(&["salt", "salt"])];
    let stats = CorpusStats::build(foods.iter().map(|t| t.as_slice()));
    assert_eq!(stats.df("salt"), 1);
}

#[test]
fn test_idf_weight_non_increasing_in_df() {
    let mut previous = idf_weight(0);
    assert!(previous > 0.0);
    for df in 1..500 {
        let current = idf_weight(df);
        assert!(current > 0.0);
        assert!(current <= previous, "weight rose at df={df}");
        previous = current;
    }
    assert!((idf_weight(0) - 1.0 / 2f64.ln()).abs() < 1e-12);
}

#[test]
fn test_matchable_weight_excludes_unmatchable_tokens() {
    let stats = sample_stats();
    let query = tokens(&["olive", "oil", "xyzzy"]);
    let matchable = stats.matchable_weight(&query);
    let total = stats.total_weight(&query);
    assert!((matchable - (stats.weight("olive") + stats.weight("oil"))).abs() < 1e-12);
    assert!(total > matchable);
}

#[test]
fn test_variant_makes_token_matchable() {
    let stats = sample_stats();
    assert!(stats.is_matchable("potato"));
    assert!(stats.is_matchable("olive"));
    assert!(!stats.is_matchable("butter"));
}

#[test]
fn test_fingerprint_text_covers_full_table() {
    let stats = sample_stats();
    let text = stats.fingerprint_text();
    assert!(text.starts_with("N=4\n"));
    assert_eq!(text.lines().count(), 1 + stats.token_df.len());
    assert!(text.contains("oil\t2\n"));
}
