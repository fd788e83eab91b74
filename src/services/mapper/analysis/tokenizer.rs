//! Text normalization and tokenization for ingredient names and reference-food
//! descriptions.
//!
//! Tokens are whole words only: the input is split on every non-alphanumeric
//! run, so "oil" can never be produced from "boiled" or "foil".

use deunicode::deunicode;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

pub const TOKENIZER_VERSION: &str = "tokenizer-v1";
pub const STATE_TOKENS_VERSION: &str = "state-v1";
pub const STOP_WORDS_VERSION: &str = "stop-v1";

/// Compiled regex for collapsing non-alphanumeric runs.
static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex"));

const MIN_TOKEN_LEN: usize = 2;

const STOP_WORDS: &[&str] = &[
    "and", "or", "the", "of", "with", "without", "in", "for", "to", "from", "on", "by", "at",
    "as", "into", "plus", "only", "ns", "nfs", "not", "than", "per", "made",
];

/// Cooking method, preservation, processing and physical descriptors.
///
/// "cooking", "powder" and "powdered" are NOT here: they carry identity in
/// reference descriptions ("cooking spray", "garlic powder", "powdered sugar").
const STATE_TOKENS: &[&str] = &[
    // cooking method
    "raw", "cooked", "uncooked", "boiled", "broiled", "baked", "fried", "deep", "roasted",
    "grilled", "steamed", "braised", "stewed", "sauteed", "poached", "toasted", "smoked",
    "simmered", "microwaved", "heated", "unheated", "reheated", "heat", "moist",
    // preservation
    "dried", "dry", "dehydrated", "frozen", "thawed", "canned", "bottled", "fresh",
    "refrigerated", "chilled", "pickled", "cured", "brined", "salted", "unsalted",
    // processing
    "sweetened", "unsweetened", "enriched", "unenriched", "fortified", "unfortified",
    "bleached", "unbleached", "chopped", "diced", "sliced", "minced", "shredded", "grated",
    "crushed", "ground", "mashed", "pureed", "cubed", "halved", "quartered", "peeled",
    "unpeeled", "pitted", "seeded", "boneless", "skinless", "trimmed", "drained", "rinsed",
    "melted", "softened", "granulated", "prepared", "unprepared", "packed", "solids",
    "liquids", "commercial", "homemade",
    // physical descriptor
    "whole", "large", "medium", "small", "mini", "jumbo", "extra", "thin", "thick", "organic",
    "natural", "imitation", "regular", "plain",
];

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("geese", "goose"),
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

static STATE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STATE_TOKENS.iter().copied().collect());

/// Core (identity) and state (process/preservation/descriptor) channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenChannels {
    pub core: Vec<String>,
    pub state: Vec<String>,
}

/// Transliterate, lower-case and collapse every non-alphanumeric run into a
/// single space.
pub fn normalize_text(text: &str) -> String {
    let latin = deunicode(text).to_lowercase();
    RE_NON_ALNUM.replace_all(&latin, " ").trim().to_string()
}

/// Ordered, deduplicated, stop-word-free tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for token in normalized.split(' ') {
        if token.len() < MIN_TOKEN_LEN || STOP_SET.contains(token) {
            continue;
        }
        if seen.insert(token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

pub fn is_state_token(token: &str) -> bool {
    STATE_SET.contains(token)
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_SET.contains(token)
}

/// Partition tokens into core and state channels, preserving order.
pub fn classify_tokens(tokens: &[String]) -> TokenChannels {
    let mut channels = TokenChannels::default();
    for token in tokens {
        if is_state_token(token) {
            channels.state.push(token.clone());
        } else {
            channels.core.push(token.clone());
        }
    }
    channels
}

/// Plural/singular variants of a token (never the token itself).
pub fn token_variants(token: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if candidate.len() >= MIN_TOKEN_LEN && candidate != token && !variants.contains(&candidate)
        {
            variants.push(candidate);
        }
    };

    for (plural, singular) in IRREGULAR_PLURALS {
        if token == *plural {
            push((*singular).to_string());
        } else if token == *singular {
            push((*plural).to_string());
        }
    }

    if token.chars().all(|ch| ch.is_ascii_digit()) {
        return variants;
    }

    // plural -> singular
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            push(format!("{stem}y"));
        }
    } else if let Some(stem) = token.strip_suffix("oes") {
        push(format!("{stem}o"));
    } else if ["ches", "shes", "xes", "zes", "sses"]
        .iter()
        .any(|suffix| token.ends_with(suffix))
    {
        push(token[..token.len() - 2].to_string());
    } else if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
    {
        push(token[..token.len() - 1].to_string());
    }

    // singular -> plural
    if !token.ends_with('s') || token.ends_with("ss") {
        let bytes = token.as_bytes();
        let ends_consonant_y = token.ends_with('y')
            && bytes.len() >= 2
            && !matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u');
        if ends_consonant_y {
            push(format!("{}ies", &token[..token.len() - 1]));
        } else if token.ends_with('o') {
            push(format!("{token}es"));
            push(format!("{token}s"));
        } else if ["ch", "sh", "x", "z", "ss"]
            .iter()
            .any(|suffix| token.ends_with(suffix))
        {
            push(format!("{token}es"));
        } else {
            push(format!("{token}s"));
        }
    }

    variants
}

/// Machine-stable slug: lower-case, non-alphanumeric runs collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let normalized = normalize_text(text);
    normalized.split(' ').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("-")
}

/// Canonical description of every table the tokenizer depends on.
/// Feeds the tokenizer fingerprint of a run.
pub fn tokenizer_signature() -> String {
    let stop: BTreeSet<&str> = STOP_WORDS.iter().copied().collect();
    let state: BTreeSet<&str> = STATE_TOKENS.iter().copied().collect();
    format!(
        "{TOKENIZER_VERSION}\n{STOP_WORDS_VERSION}:{}\n{STATE_TOKENS_VERSION}:{}\nmin_len:{MIN_TOKEN_LEN}\n",
        stop.into_iter().collect::<Vec<_>>().join(","),
        state.into_iter().collect::<Vec<_>>().join(","),
    )
}

#[cfg(test)]
#[path = "../tests/analysis/tokenizer_tests.rs"]
mod tests;
