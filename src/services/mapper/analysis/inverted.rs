//! Natural-language ("inverted") names reconstructed from comma-ordered
//! reference descriptions, e.g. "Oil, olive" -> "olive oil".
//!
//! Heuristics are tried in order: container, protein-base, product-form,
//! then the first-plus-second default.

use super::canonical::{strip_state_words, CanonicalName, Domain};
use super::tokenizer::{is_state_token, is_stop_word, token_variants};

/// Containers whose noun stays in the name ("olive oil", "cheddar cheese").
const APPENDABLE_CONTAINERS: &[&str] = &["oil", "vinegar", "cheese", "sauce", "soup", "syrup"];

/// Containers that only label a group ("Spices, pepper" -> "pepper").
const LABEL_CONTAINERS: &[&str] = &[
    "spices", "nuts", "seeds", "fish", "crustaceans", "mollusks",
];

const PROTEIN_BASES: &[&str] = &[
    "chicken", "turkey", "beef", "pork", "lamb", "veal", "duck", "goose",
];

/// Intermediate classifier segments between a protein base and its cut.
const CLASSIFIER_SEGMENTS: &[&str] = &[
    "broilers or fryers",
    "broiler or fryers",
    "roasting",
    "stewing",
    "capons",
    "young",
    "mature",
    "retail cuts",
    "composite of trimmed retail cuts",
    "separable lean and fat",
    "separable lean only",
];

/// State words that name a cut and read naturally in front ("ground beef").
const CUT_STATE_WORDS: &[&str] = &["ground", "minced", "cured", "smoked"];

const FORM_NOUNS: &[&str] = &[
    "flour", "starch", "meal", "bran", "germ", "juice", "paste", "powder", "butter",
];

/// Resolve the inverted display name of a canonicalized description.
pub fn resolve_inverted(name: &CanonicalName) -> String {
    if name.domain == Some(Domain::Alcohol) {
        return name.specific_name.clone();
    }
    let Some((first, rest)) = name.working_segments.split_first() else {
        return name.specific_name.clone();
    };

    container_form(first, rest)
        .or_else(|| protein_form(first, rest))
        .or_else(|| product_form(first, rest))
        .unwrap_or_else(|| default_form(first, rest))
}

fn matches_noun<'a>(segment: &str, nouns: &[&'a str]) -> Option<&'a str> {
    if segment.contains(' ') {
        return None;
    }
    nouns.iter().copied().find(|noun| {
        *noun == segment || token_variants(segment).iter().any(|variant| variant == noun)
    })
}

fn last_word(segment: &str) -> &str {
    segment.rsplit(' ').next().unwrap_or(segment)
}

fn is_single_qualifier(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.contains(' ')
        && !is_state_token(segment)
        && !is_stop_word(segment)
        && !segment.chars().all(|ch| ch.is_ascii_digit())
}

fn container_form(first: &str, rest: &[String]) -> Option<String> {
    let (container, appendable) = match matches_noun(first, APPENDABLE_CONTAINERS) {
        Some(noun) => (noun, true),
        None => (matches_noun(first, LABEL_CONTAINERS)?, false),
    };

    let qualifier = strip_state_words(rest.first()?);
    if qualifier.is_empty() {
        return None;
    }

    let mut inverted = if appendable && last_word(&qualifier) != container {
        format!("{qualifier} {container}")
    } else {
        qualifier
    };

    // Only a single-word third segment is promoted; multi-word ones are descriptors.
    if let Some(third) = rest.get(1) {
        if is_single_qualifier(third) {
            inverted = format!("{third} {inverted}");
        }
    }
    Some(inverted)
}

fn protein_form(first: &str, rest: &[String]) -> Option<String> {
    matches_noun(first, PROTEIN_BASES)?;

    for segment in rest {
        if CUT_STATE_WORDS.contains(&segment.as_str()) {
            return Some(format!("{segment} {first}"));
        }
        if CLASSIFIER_SEGMENTS.contains(&segment.as_str()) {
            continue;
        }
        let cleaned = strip_state_words(segment);
        if cleaned.is_empty() {
            continue;
        }
        return Some(format!("{first} {cleaned}"));
    }
    Some(first.to_string())
}

fn product_form(first: &str, rest: &[String]) -> Option<String> {
    let head = strip_state_words(first);
    if !head.is_empty() && FORM_NOUNS.contains(&last_word(&head)) {
        return Some(head);
    }
    let second = strip_state_words(rest.first()?);
    if !second.is_empty() && FORM_NOUNS.contains(&last_word(&second)) {
        return Some(format!("{head} {second}").trim().to_string());
    }
    None
}

fn default_form(first: &str, rest: &[String]) -> String {
    let head = match strip_state_words(first) {
        cleaned if cleaned.is_empty() => first.to_string(),
        cleaned => cleaned,
    };
    match rest.first().map(|segment| strip_state_words(segment)) {
        Some(second) if !second.is_empty() => format!("{head} {second}"),
        _ => head,
    }
}

#[cfg(test)]
#[path = "../tests/analysis/inverted_tests.rs"]
mod tests;
