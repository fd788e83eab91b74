use super::*;

fn toks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_tokenize_lowercases_and_splits_on_punctuation() {
    assert_eq!(
        tokenize("Oil, olive, salad or cooking"),
        toks(&["oil", "olive", "salad", "cooking"])
    );
    assert_eq!(
        tokenize("Wheat flour, white, all-purpose"),
        toks(&["wheat", "flour", "white", "all", "purpose"])
    );
}

#[test]
fn test_tokenize_drops_short_tokens_and_stop_words() {
    assert_eq!(tokenize("2 % milk, of the day"), toks(&["milk", "day"]));
    assert!(tokenize("a an of").is_empty());
    assert!(tokenize("").is_empty());
}

#[test]
fn test_tokenize_dedupes_preserving_first_seen_order() {
    assert_eq!(
        tokenize("salt, pepper, SALT and Pepper, thyme"),
        toks(&["salt", "pepper", "thyme"])
    );
}

#[test]
fn test_tokenize_transliterates() {
    assert_eq!(tokenize("Jalapeño peppers"), toks(&["jalapeno", "peppers"]));
    assert_eq!(tokenize("crème fraîche"), toks(&["creme", "fraiche"]));
}

#[test]
fn test_tokenize_is_idempotent_and_deterministic() {
    let inputs = [
        "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
        "Snacks, KELLOGG'S, NUTRI-GRAIN cereal bars, fruit",
        "  extra-virgin   olive oil!! ",
        "Beef, ground, 80% lean meat / 20% fat, raw",
    ];
    for input in inputs {
        let first = tokenize(input);
        let second = tokenize(input);
        assert_eq!(first, second);
        let reapplied = tokenize(&first.join(" "));
        assert_eq!(first, reapplied, "not idempotent for {input:?}");
    }
}

#[test]
fn test_word_boundaries_never_leak_substrings() {
    for word in ["boiled", "broiled", "foil", "coil", "toil"] {
        assert!(
            !tokenize(word).iter().any(|t| t == "oil"),
            "'oil' leaked from {word}"
        );
        let phrase = format!("potatoes, {word}, with skin");
        assert!(!tokenize(&phrase).iter().any(|t| t == "oil"));
    }
    for word in ["asphalt", "basalt", "cobalt"] {
        assert!(!tokenize(word).iter().any(|t| t == "salt"));
    }
    assert!(!tokenize("corner").iter().any(|t| t == "corn"));
    assert!(!tokenize("the corner store").iter().any(|t| t == "corn"));
}

#[test]
fn test_classify_tokens_partitions_without_loss() {
    let tokens = tokenize("Chicken, breast, boneless, skinless, grilled, cooking spray");
    let channels = classify_tokens(&tokens);

    assert_eq!(channels.core, toks(&["chicken", "breast", "cooking", "spray"]));
    assert_eq!(channels.state, toks(&["boneless", "skinless", "grilled"]));

    let mut union: Vec<String> = channels.core.clone();
    union.extend(channels.state.clone());
    union.sort();
    let mut expected = tokens.clone();
    expected.sort();
    assert_eq!(union, expected);
    assert!(channels.core.iter().all(|t| !channels.state.contains(t)));
}

#[test]
fn test_cooking_and_powder_stay_core() {
    let channels = classify_tokens(&toks(&["cooking", "wine", "garlic", "powder", "dried"]));
    assert_eq!(channels.core, toks(&["cooking", "wine", "garlic", "powder"]));
    assert_eq!(channels.state, toks(&["dried"]));
}

#[test]
fn test_token_variants_plural_and_singular() {
    assert!(token_variants("olives").contains(&"olive".to_string()));
    assert!(token_variants("olive").contains(&"olives".to_string()));
    assert!(token_variants("berries").contains(&"berry".to_string()));
    assert!(token_variants("cherry").contains(&"cherries".to_string()));
    assert!(token_variants("tomatoes").contains(&"tomato".to_string()));
    assert!(token_variants("tomato").contains(&"tomatoes".to_string()));
    assert!(token_variants("peaches").contains(&"peach".to_string()));
    assert!(token_variants("leaves").contains(&"leaf".to_string()));
    assert!(token_variants("sugar").contains(&"sugars".to_string()));
}

#[test]
fn test_token_variants_skip_non_plurals() {
    assert!(!token_variants("hummus").contains(&"hummu".to_string()));
    assert!(!token_variants("glass").contains(&"glas".to_string()));
    assert!(token_variants("100").is_empty());
    assert!(!token_variants("oil").contains(&"oil".to_string()));
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Olive Oil"), "olive-oil");
    assert_eq!(slugify("  --Black   pepper!! "), "black-pepper");
    assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
    assert_eq!(slugify(""), "");
}

#[test]
fn test_tokenizer_signature_is_stable() {
    let first = tokenizer_signature();
    assert_eq!(first, tokenizer_signature());
    assert!(first.starts_with(TOKENIZER_VERSION));
    assert!(first.contains(STATE_TOKENS_VERSION));
}
