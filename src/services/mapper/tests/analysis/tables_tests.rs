use super::*;
use crate::services::mapper::analysis::tokenizer::{is_state_token, normalize_text};

#[test]
fn test_expected_categories_direct_and_variant() {
    assert_eq!(expected_categories("oil"), Some(&[FATS][..]));
    assert_eq!(expected_categories("eggs"), Some(&[DAIRY][..]));
    assert_eq!(expected_categories("tomatoes"), Some(&[VEGETABLES][..]));
    assert_eq!(expected_categories("zucchini"), None);
}

#[test]
fn test_synonym_lookup_by_phrase() {
    let sets = synonym_requirements("olive oil").expect("olive oil synonym");
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0], &["olive", "oil"]);
    assert!(synonym_requirements("olive").is_none());
}

#[test]
fn test_synonym_keys_are_normalized_phrases() {
    for (phrase, sets) in SYNONYMS {
        assert_eq!(normalize_text(phrase), *phrase, "key {phrase:?} not normalized");
        assert!(!sets.is_empty());
        for set in *sets {
            assert!(!set.is_empty());
        }
    }
}

#[test]
fn test_category_keys_are_never_state_tokens() {
    for (token, _) in CATEGORY_EXPECTATIONS {
        assert!(!is_state_token(token), "{token} is a state token");
    }
}

#[test]
fn test_tables_signature_is_deterministic() {
    let signature = tables_signature();
    assert_eq!(signature, tables_signature());
    assert!(signature.starts_with(CATEGORY_TABLE_VERSION));
    assert!(signature.contains("olive oil=oil+olive"));
}
