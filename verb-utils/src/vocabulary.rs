use crate::first_seen::dedup_first_seen;
use crate::normalize::normalize;

/// A ranked source-language word with its gloss.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VocabularyEntry {
    pub source_form: String,
    pub gloss: String,
}

impl VocabularyEntry {
    pub fn new(source_form: &str, gloss: &str) -> Self {
        Self {
            source_form: normalize(source_form),
            gloss: normalize(gloss),
        }
    }
}

/// Turns table rows (`rank, source form, gloss, ...`) into a deduplicated
/// vocabulary list, preserving rank order.
///
/// Rows with fewer than three cells are malformed and dropped, as are rows
/// whose source form or gloss is empty after normalization.
pub fn adapt_list<S: AsRef<str>>(rows: impl IntoIterator<Item = Vec<S>>) -> Vec<VocabularyEntry> {
    let entries = rows.into_iter().filter_map(|row| {
        let [_rank, source, gloss, ..] = row.as_slice() else {
            return None;
        };
        let entry = VocabularyEntry::new(source.as_ref(), gloss.as_ref());
        if entry.source_form.is_empty() || entry.gloss.is_empty() {
            return None;
        }
        Some(entry)
    });
    dedup_first_seen(entries, |entry| entry.source_form.clone())
}
