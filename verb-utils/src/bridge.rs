//! Spanish → Catalan infinitive mapping, built from a bilingual dictionary.
//!
//! The dictionary is keyed by Catalan headword, with Spanish translations as
//! quotations. The bridge turns that around so a Spanish frequency list can be
//! mapped onto Catalan infinitives.

use crate::first_seen::FirstSeen;
use crate::normalize::{is_plain_infinitive, normalize};

/// One dictionary entry, as plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Headword annotations (`orth`), in document order.
    pub headwords: Vec<String>,
    /// Translation quotations (`quote`), in document order.
    pub translations: Vec<String>,
}

/// Read-only mapping from a source-language infinitive to a target-language one.
#[derive(Clone, Debug, Default)]
pub struct TranslationMap {
    inner: FirstSeen<String, String>,
}

impl TranslationMap {
    pub fn get(&self, source_form: &str) -> Option<&str> {
        self.inner.get(source_form).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TranslationMap {
    /// Builds a map from already normalized pairs, first pair per source wins.
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Accumulates dictionary entries one at a time.
///
/// Entries are consumed as they are added, so a streaming reader only ever
/// holds one entry in memory.
#[derive(Debug, Default)]
pub struct BridgeBuilder {
    map: FirstSeen<String, String>,
    entries_seen: usize,
    entries_kept: usize,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry. Returns the number of new mappings it contributed.
    pub fn add_entry(&mut self, entry: DictionaryEntry) -> usize {
        self.entries_seen += 1;

        let Some(target) = entry.headwords.iter().find(|h| !h.trim().is_empty()) else {
            return 0;
        };
        let target = normalize(target);
        if !is_plain_infinitive(&target) {
            return 0;
        }
        self.entries_kept += 1;

        let mut added = 0;
        for quote in &entry.translations {
            let source = normalize(quote);
            if !is_plain_infinitive(&source) {
                continue;
            }
            if self.map.insert(source, target.clone()) {
                added += 1;
            }
        }
        added
    }

    /// Entries passed to [`BridgeBuilder::add_entry`] so far.
    pub fn entries_seen(&self) -> usize {
        self.entries_seen
    }

    /// Entries whose headword was a plain infinitive.
    pub fn entries_kept(&self) -> usize {
        self.entries_kept
    }

    pub fn finish(self) -> TranslationMap {
        log::info!(
            "Bridge built from {} of {} dictionary entries: {} mappings",
            self.entries_kept,
            self.entries_seen,
            self.map.len()
        );
        TranslationMap { inner: self.map }
    }
}

pub fn build_bridge(entries: impl IntoIterator<Item = DictionaryEntry>) -> TranslationMap {
    let mut builder = BridgeBuilder::new();
    for entry in entries {
        builder.add_entry(entry);
    }
    builder.finish()
}

/// Like [`build_bridge`], stopping at the first error from the entry source.
pub fn try_build_bridge<E>(
    entries: impl IntoIterator<Item = Result<DictionaryEntry, E>>,
) -> Result<TranslationMap, E> {
    let mut builder = BridgeBuilder::new();
    for entry in entries {
        builder.add_entry(entry?);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(headwords: &[&str], translations: &[&str]) -> DictionaryEntry {
        DictionaryEntry {
            headwords: headwords.iter().map(|s| s.to_string()).collect(),
            translations: translations.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_maps_translations_to_headword() {
        let bridge = build_bridge([entry(&["parlar"], &["hablar", "conversar"])]);
        assert_eq!(bridge.get("hablar"), Some("parlar"));
        assert_eq!(bridge.get("conversar"), Some("parlar"));
        assert_eq!(bridge.len(), 2);
    }

    #[test]
    fn test_first_mapping_wins() {
        let bridge = build_bridge([
            entry(&["parlar"], &["hablar"]),
            entry(&["enraonar"], &["hablar", "razonar"]),
        ]);
        assert_eq!(bridge.get("hablar"), Some("parlar"));
        assert_eq!(bridge.get("razonar"), Some("enraonar"));
    }

    #[test]
    fn test_normalizes_both_sides() {
        let bridge = build_bridge([entry(&["  Menjar "], &["COMER", " tomar  "])]);
        assert_eq!(bridge.get("comer"), Some("menjar"));
        assert_eq!(bridge.get("tomar"), Some("menjar"));
    }

    #[test]
    fn test_uses_first_nonempty_headword() {
        let bridge = build_bridge([entry(&["", "beure"], &["beber"])]);
        assert_eq!(bridge.get("beber"), Some("beure"));

        let bridge = build_bridge([entry(&["casa", "viure"], &["vivir"])]);
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_skips_non_verb_and_reflexive_headwords() {
        let bridge = build_bridge([
            entry(&["casa"], &["casa"]),
            entry(&["rentar-se"], &["lavarse", "lavar"]),
            entry(&[], &["hablar"]),
        ]);
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_skips_non_verb_and_reflexive_translations() {
        let bridge = build_bridge([entry(&["rentar"], &["lavarse", "lavado", "", "lavar"])]);
        let pairs: Vec<_> = bridge.iter().collect();
        assert_eq!(pairs, vec![("lavar", "rentar")]);
    }

    #[test]
    fn test_builder_counts() {
        let mut builder = BridgeBuilder::new();
        assert_eq!(builder.add_entry(entry(&["parlar"], &["hablar"])), 1);
        assert_eq!(builder.add_entry(entry(&["dir"], &["hablar", "decir"])), 1);
        assert_eq!(builder.add_entry(entry(&["gat"], &["gato"])), 0);
        assert_eq!(builder.entries_seen(), 3);
        assert_eq!(builder.entries_kept(), 2);
        assert_eq!(builder.finish().len(), 2);
    }

    #[test]
    fn test_try_build_bridge_propagates_errors() {
        let entries: Vec<Result<DictionaryEntry, String>> = vec![
            Ok(entry(&["parlar"], &["hablar"])),
            Err("truncated archive".to_string()),
        ];
        assert_eq!(
            try_build_bridge(entries).unwrap_err(),
            "truncated archive".to_string()
        );
    }
}
