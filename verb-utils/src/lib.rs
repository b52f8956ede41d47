pub mod bridge;
pub mod classify;
pub mod conjugation;
pub mod first_seen;
pub mod normalize;
pub mod reconcile;
pub mod regular;
pub mod vocabulary;

pub use bridge::{BridgeBuilder, DictionaryEntry, TranslationMap, build_bridge, try_build_bridge};
pub use classify::{classify, is_regular};
pub use conjugation::{ConjugationTable, GeneratedConjugation, Group, Person, Tense, strip_pronoun};
pub use first_seen::{FirstSeen, dedup_first_seen};
pub use normalize::{is_reflexive, is_verb_like, normalize};
pub use reconcile::{
    Candidate, ConjugatorUnavailable, ReconcileError, ReconcileReport, Reconciliation, VerbRecord,
    build_records, reconcile, select_candidates,
};
pub use regular::expected_conjugation;
pub use vocabulary::{VocabularyEntry, adapt_list};
