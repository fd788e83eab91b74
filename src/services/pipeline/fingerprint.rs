use crate::services::mapper::analysis::indexes::CorpusStats;
use crate::services::mapper::analysis::tables::tables_signature;
use crate::services::mapper::analysis::tokenizer::tokenizer_signature;

/// blake3 over the tokenizer rules and every frozen lookup table.
pub fn tokenizer_fingerprint() -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(tokenizer_signature().as_bytes());
    hasher.update(tables_signature().as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// blake3 over the complete document-frequency table (never a sample).
pub fn corpus_fingerprint(stats: &CorpusStats) -> String {
    blake3::hash(stats.fingerprint_text().as_bytes())
        .to_hex()
        .to_string()
}

#[cfg(test)]
#[path = "tests/fingerprint_tests.rs"]
mod tests;
