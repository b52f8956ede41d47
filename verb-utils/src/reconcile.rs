//! Joins the frequency list, the dictionary bridge and the conjugation
//! generator into the final verb table.
//!
//! Every per-verb problem (no translation, reflexive, incomplete conjugation)
//! drops that verb and bumps a counter in [`ReconcileReport`]. The only error
//! that stops the run is the generator being unavailable altogether.

use itertools::Itertools;

use crate::bridge::TranslationMap;
use crate::classify::{classify, mismatches};
use crate::conjugation::{ConjugationTable, GeneratedConjugation, Group};
use crate::first_seen::FirstSeen;
use crate::normalize::{is_plain_infinitive, is_reflexive, normalize};
use crate::regular::expected_conjugation;
use crate::vocabulary::VocabularyEntry;

/// One verb of the output dataset.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct VerbRecord {
    pub infinitive: String,
    pub translation: String,
    pub regular: bool,
    pub group: Group,
    pub tenses: ConjugationTable,
}

/// A target infinitive that survived bridging, waiting to be conjugated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub infinitive: String,
    pub translation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    ConjugatorUnavailable(#[from] ConjugatorUnavailable),
}

/// The conjugation generator cannot be used at all.
#[derive(Debug, thiserror::Error)]
#[error("conjugation generator unavailable: {reason}")]
pub struct ConjugatorUnavailable {
    pub reason: String,
}

impl ConjugatorUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// How many verbs each stage let through or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub reflexive_sources: usize,
    pub missing: Vec<String>,
    pub mapped: usize,
    pub duplicate_targets: usize,
    pub not_verb_like: usize,
    pub incomplete_conjugations: usize,
    pub duplicate_records: usize,
    pub regular: usize,
    pub irregular: usize,
    pub written: usize,
}

impl ReconcileReport {
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub records: Vec<VerbRecord>,
    pub report: ReconcileReport,
}

/// Maps the vocabulary onto target infinitives and dedups them.
pub fn select_candidates(
    vocabulary: &[VocabularyEntry],
    bridge: &TranslationMap,
    report: &mut ReconcileReport,
) -> Vec<Candidate> {
    let mut unique = FirstSeen::new();
    for entry in vocabulary {
        let source = normalize(&entry.source_form);
        if is_reflexive(&source) {
            report.reflexive_sources += 1;
            continue;
        }
        let Some(target) = bridge.get(&source) else {
            log::debug!("No translation for {source}");
            report.missing.push(source);
            continue;
        };
        report.mapped += 1;
        let candidate = Candidate {
            infinitive: target.to_string(),
            translation: entry.gloss.clone(),
        };
        if !unique.insert(candidate.infinitive.clone(), candidate) {
            report.duplicate_targets += 1;
        }
    }

    unique
        .into_values()
        .filter(|candidate| {
            // the bridge only stores plain infinitives, but a hand-built map might not
            let keep = is_plain_infinitive(&candidate.infinitive);
            if !keep {
                log::debug!("Dropping {}: not a plain infinitive", candidate.infinitive);
                report.not_verb_like += 1;
            }
            keep
        })
        .collect()
}

/// Conjugates and classifies each candidate, then sorts and dedups the result.
///
/// `conjugate` returns `Ok(None)` when it has nothing for a verb, which only
/// drops that verb. An `Err` aborts the whole run.
pub fn build_records<F>(
    candidates: Vec<Candidate>,
    mut conjugate: F,
    report: &mut ReconcileReport,
) -> Result<Vec<VerbRecord>, ReconcileError>
where
    F: FnMut(&str) -> Result<Option<GeneratedConjugation>, ConjugatorUnavailable>,
{
    let mut records = Vec::with_capacity(candidates.len());
    for Candidate {
        infinitive,
        translation,
    } in candidates
    {
        let Some(tenses) = conjugate(&infinitive)?.and_then(|c| c.to_table()) else {
            log::debug!("Incomplete conjugation for {infinitive}");
            report.incomplete_conjugations += 1;
            continue;
        };

        let group = Group::from_infinitive(&infinitive);
        let expected = expected_conjugation(&infinitive, group);
        let regular = classify(&tenses, &expected);
        if regular {
            report.regular += 1;
        } else {
            report.irregular += 1;
            if log::log_enabled!(log::Level::Trace) {
                for (tense, person, form, regular_form) in mismatches(&tenses, &expected) {
                    log::trace!("{infinitive} {tense} {person}: {form} (regular {regular_form})");
                }
            }
        }

        records.push(VerbRecord {
            infinitive,
            translation,
            regular,
            group,
            tenses,
        });
    }

    let before = records.len();
    let records = records
        .into_iter()
        .map(|record| (record.infinitive.clone(), record))
        .collect::<FirstSeen<_, _>>()
        .into_values()
        .sorted_by(|a, b| a.infinitive.cmp(&b.infinitive))
        .collect_vec();
    report.duplicate_records += before - records.len();
    report.written = records.len();
    Ok(records)
}

/// Runs the whole pipeline in one call.
pub fn reconcile<F>(
    vocabulary: &[VocabularyEntry],
    bridge: &TranslationMap,
    conjugate: F,
) -> Result<Reconciliation, ReconcileError>
where
    F: FnMut(&str) -> Result<Option<GeneratedConjugation>, ConjugatorUnavailable>,
{
    let mut report = ReconcileReport::default();
    let candidates = select_candidates(vocabulary, bridge, &mut report);
    let records = build_records(candidates, conjugate, &mut report)?;
    Ok(Reconciliation { records, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{DictionaryEntry, build_bridge};
    use crate::{Person, Tense};
    use std::collections::{BTreeMap, HashMap};

    /// Builds generator output from a table, optionally with pronoun prefixes.
    fn generated(table: &ConjugationTable, with_pronouns: bool) -> GeneratedConjugation {
        let tenses = Tense::ALL
            .iter()
            .map(|tense| {
                let forms = Person::ALL
                    .iter()
                    .map(|person| {
                        let form = table.get(*tense, *person);
                        if with_pronouns {
                            format!("{} {form}", person.pronoun())
                        } else {
                            form.to_string()
                        }
                    })
                    .collect::<Vec<_>>();
                (tense.generator_label().to_string(), forms)
            })
            .collect::<BTreeMap<_, _>>();
        GeneratedConjugation {
            moods: BTreeMap::from([("indicatiu".to_string(), tenses)]),
        }
    }

    fn regular_generator(infinitive: &str) -> GeneratedConjugation {
        let expected = expected_conjugation(infinitive, Group::from_infinitive(infinitive));
        generated(&expected, true)
    }

    fn bridge(pairs: &[(&str, &str)]) -> TranslationMap {
        pairs
            .iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect()
    }

    fn always_regular(infinitive: &str) -> Result<Option<GeneratedConjugation>, ConjugatorUnavailable> {
        Ok(Some(regular_generator(infinitive)))
    }

    #[test]
    fn test_regular_verb_end_to_end() {
        let vocabulary = vec![VocabularyEntry::new("hablar", "to speak")];
        let bridge = bridge(&[("hablar", "parlar")]);

        let result = reconcile(&vocabulary, &bridge, always_regular).unwrap();

        assert_eq!(result.records.len(), 1);
        let record = &result.records[0];
        assert_eq!(record.infinitive, "parlar");
        assert_eq!(record.translation, "to speak");
        assert!(record.regular);
        assert_eq!(record.group, Group::Ar);
        assert_eq!(record.tenses.get(Tense::Present, Person::Jo), "parlo");
        assert_eq!(result.report.mapped, 1);
        assert_eq!(result.report.written, 1);
    }

    #[test]
    fn test_irregular_verb_end_to_end() {
        let vocabulary = vec![VocabularyEntry::new("ir", "to go")];
        let bridge = bridge(&[("ir", "anar")]);

        let result = reconcile(&vocabulary, &bridge, |infinitive| {
            let mut conjugation = regular_generator(infinitive);
            conjugation.moods.get_mut("indicatiu").unwrap().get_mut("present").unwrap()[2] =
                "ell va".to_string();
            Ok(Some(conjugation))
        })
        .unwrap();

        assert_eq!(result.records.len(), 1);
        assert!(!result.records[0].regular);
        assert_eq!(result.records[0].tenses.get(Tense::Present, Person::Ell), "va");
        assert_eq!(result.report.irregular, 1);
    }

    #[test]
    fn test_missing_translation_end_to_end() {
        let vocabulary = vec![VocabularyEntry::new("hablar", "to speak")];
        let bridge = bridge(&[]);
        let mut calls = 0;

        let result = reconcile(&vocabulary, &bridge, |infinitive| {
            calls += 1;
            always_regular(infinitive)
        })
        .unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.report.missing, vec!["hablar".to_string()]);
        assert_eq!(result.report.missing_count(), 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_reflexive_sources_never_reach_output() {
        let vocabulary = vec![
            VocabularyEntry::new("lavarse", "to wash oneself"),
            VocabularyEntry::new("lavar", "to wash"),
        ];
        let bridge = bridge(&[("lavarse", "rentar-se"), ("lavar", "rentar")]);

        let result = reconcile(&vocabulary, &bridge, always_regular).unwrap();

        assert_eq!(result.report.reflexive_sources, 1);
        let infinitives: Vec<_> = result.records.iter().map(|r| r.infinitive.as_str()).collect();
        assert_eq!(infinitives, vec!["rentar"]);
    }

    #[test]
    fn test_reflexive_or_non_verb_targets_are_dropped() {
        // hand-built map that breaks the bridge invariant
        let vocabulary = vec![
            VocabularyEntry::new("lavar", "to wash"),
            VocabularyEntry::new("casar", "to marry"),
        ];
        let bridge = bridge(&[("lavar", "rentar-se"), ("casar", "casa")]);

        let result = reconcile(&vocabulary, &bridge, always_regular).unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.report.not_verb_like, 2);
    }

    #[test]
    fn test_duplicate_targets_keep_first_translation() {
        let vocabulary = vec![
            VocabularyEntry::new("hablar", "to speak"),
            VocabularyEntry::new("charlar", "to chat"),
        ];
        let bridge = bridge(&[("hablar", "parlar"), ("charlar", "parlar")]);

        let result = reconcile(&vocabulary, &bridge, always_regular).unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].translation, "to speak");
        assert_eq!(result.report.duplicate_targets, 1);
    }

    #[test]
    fn test_incomplete_conjugation_is_skipped() {
        let vocabulary = vec![
            VocabularyEntry::new("hablar", "to speak"),
            VocabularyEntry::new("dormir", "to sleep"),
            VocabularyEntry::new("temer", "to fear"),
        ];
        let bridge = bridge(&[("hablar", "parlar"), ("dormir", "dormir"), ("temer", "témer")]);

        let result = reconcile(&vocabulary, &bridge, |infinitive| match infinitive {
            "parlar" => {
                let mut conjugation = regular_generator(infinitive);
                conjugation.moods.get_mut("indicatiu").unwrap().remove("futur");
                Ok(Some(conjugation))
            }
            "dormir" => Ok(None),
            _ => always_regular(infinitive),
        })
        .unwrap();

        let infinitives: Vec<_> = result.records.iter().map(|r| r.infinitive.as_str()).collect();
        assert_eq!(infinitives, vec!["témer"]);
        assert_eq!(result.report.incomplete_conjugations, 2);
    }

    #[test]
    fn test_unavailable_generator_aborts() {
        let vocabulary = vec![VocabularyEntry::new("hablar", "to speak")];
        let bridge = bridge(&[("hablar", "parlar")]);

        let result = reconcile(&vocabulary, &bridge, |_| {
            Err(ConjugatorUnavailable::new("verbecc is not installed"))
        });

        assert!(matches!(result, Err(ReconcileError::ConjugatorUnavailable(_))));
    }

    #[test]
    fn test_output_is_sorted_and_unique() {
        let vocabulary = vec![
            VocabularyEntry::new("vivir", "to live"),
            VocabularyEntry::new("comer", "to eat"),
            VocabularyEntry::new("hablar", "to speak"),
            VocabularyEntry::new("abrir", "to open"),
        ];
        let bridge = bridge(&[
            ("vivir", "viure"),
            ("comer", "menjar"),
            ("hablar", "parlar"),
            ("abrir", "obrir"),
        ]);

        let result = reconcile(&vocabulary, &bridge, always_regular).unwrap();

        let infinitives: Vec<_> = result.records.iter().map(|r| r.infinitive.as_str()).collect();
        assert_eq!(infinitives, vec!["menjar", "obrir", "parlar", "viure"]);
        assert!(infinitives.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_build_records_dedups_after_bridging() {
        let candidates = vec![
            Candidate {
                infinitive: "parlar".to_string(),
                translation: "to speak".to_string(),
            },
            Candidate {
                infinitive: "cantar".to_string(),
                translation: "to sing".to_string(),
            },
            Candidate {
                infinitive: "parlar".to_string(),
                translation: "to talk".to_string(),
            },
        ];
        let mut report = ReconcileReport::default();

        let records = build_records(candidates, always_regular, &mut report).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].infinitive, "parlar");
        assert_eq!(records[1].translation, "to speak");
        assert_eq!(report.duplicate_records, 1);
    }

    #[test]
    fn test_bridge_built_from_dictionary_entries() {
        let bridge = build_bridge([
            DictionaryEntry {
                headwords: vec!["dormir".to_string()],
                translations: vec!["dormir".to_string()],
            },
            DictionaryEntry {
                headwords: vec!["rentar-se".to_string()],
                translations: vec!["lavarse".to_string()],
            },
        ]);
        let vocabulary = vec![
            VocabularyEntry::new("dormir", "to sleep"),
            VocabularyEntry::new("lavarse", "to wash oneself"),
        ];
        let conjugations: HashMap<&str, GeneratedConjugation> =
            HashMap::from([("dormir", regular_generator("dormir"))]);

        let result = reconcile(&vocabulary, &bridge, |infinitive| {
            Ok(conjugations.get(infinitive).cloned())
        })
        .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].group, Group::Ir);
        assert_eq!(result.records[0].tenses.get(Tense::Present, Person::Ell), "dorm");
        assert!(result.records[0].regular);
    }

    #[test]
    fn test_record_serializes_with_stable_keys() {
        let record = VerbRecord {
            infinitive: "parlar".to_string(),
            translation: "to speak".to_string(),
            regular: true,
            group: Group::Ar,
            tenses: expected_conjugation("parlar", Group::Ar),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(
            r#"{"infinitive":"parlar","translation":"to speak","regular":true,"group":"ar","tenses":{"present":{"jo":"parlo""#
        ));
        assert!(json.contains("parlàvem"));
    }
}
