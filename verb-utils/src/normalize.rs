//! Lexical form normalization
//!
//! Every string that crosses from a raw source (scraped table cell, dictionary
//! annotation, generator output) into the pipeline goes through [`normalize`]
//! first. The predicates in this module assume normalized input.

/// Suffixes that mark an infinitive. `re` only ever matches on the Catalan
/// side (`prendre`, `beure`), but it is harmless for Spanish forms.
const VERB_SUFFIXES: [&str; 4] = ["ar", "er", "ir", "re"];

const REFLEXIVE_SUFFIX: &str = "se";
const REFLEXIVE_SEGMENT: &str = "-se";

/// Normalize a raw lexical string
///
/// - Trims surrounding whitespace
/// - Collapses internal whitespace runs to a single space
/// - Converts to lowercase
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True if the word ends with an infinitive suffix.
pub fn is_verb_like(word: &str) -> bool {
    VERB_SUFFIXES.iter().any(|suffix| word.ends_with(suffix))
}

/// True if the word is a pronominal infinitive (`lavarse`, `rentar-se`).
pub fn is_reflexive(word: &str) -> bool {
    word.ends_with(REFLEXIVE_SUFFIX) || word.contains(REFLEXIVE_SEGMENT)
}

/// True if the word can enter the dataset: verb-like and not reflexive.
pub fn is_plain_infinitive(word: &str) -> bool {
    !word.is_empty() && is_verb_like(word) && !is_reflexive(word)
}
