//! The conjugation a Catalan infinitive would have if it were fully regular.
//!
//! Present and imperfect forms are built from the stem (the infinitive minus
//! its two-letter ending); future and conditional forms append to the whole
//! infinitive. Suffixes are listed in [`Person::ALL`] order.

use crate::conjugation::{ConjugationTable, Group, Person, Tense};

type Suffixes = [&'static str; 6];

const PRESENT_AR: Suffixes = ["o", "es", "a", "em", "eu", "en"];
const PRESENT_ER: Suffixes = ["o", "s", "", "em", "eu", "en"];
const PRESENT_IR: Suffixes = ["o", "s", "", "im", "iu", "en"];

const IMPERFECT_AR: Suffixes = ["ava", "aves", "ava", "àvem", "àveu", "aven"];
const IMPERFECT_ER_IR: Suffixes = ["ia", "ies", "ia", "íem", "íeu", "ien"];

const FUTURE: Suffixes = ["é", "às", "à", "em", "eu", "an"];
const CONDITIONAL: Suffixes = ["ia", "ies", "ia", "íem", "íeu", "ien"];

fn suffixes(tense: Tense, group: Group) -> &'static Suffixes {
    match (tense, group) {
        (Tense::Present, Group::Ar) => &PRESENT_AR,
        (Tense::Present, Group::Er) => &PRESENT_ER,
        (Tense::Present, Group::Ir) => &PRESENT_IR,
        (Tense::Imperfect, Group::Ar) => &IMPERFECT_AR,
        (Tense::Imperfect, Group::Er | Group::Ir) => &IMPERFECT_ER_IR,
        (Tense::Future, _) => &FUTURE,
        (Tense::Conditional, _) => &CONDITIONAL,
    }
}

fn builds_on_stem(tense: Tense) -> bool {
    matches!(tense, Tense::Present | Tense::Imperfect)
}

/// The infinitive without its last two characters.
///
/// Counts characters rather than bytes so a stem never splits a letter.
pub fn stem(infinitive: &str) -> &str {
    match infinitive.char_indices().rev().nth(1) {
        Some((index, _)) => &infinitive[..index],
        None => "",
    }
}

/// The single expected form for one cell.
pub fn expected_form(infinitive: &str, group: Group, tense: Tense, person: Person) -> String {
    let base = if builds_on_stem(tense) {
        stem(infinitive)
    } else {
        infinitive
    };
    let suffix = suffixes(tense, group)[person as usize];
    format!("{base}{suffix}")
}

/// The full 24-cell regular table for an infinitive.
pub fn expected_conjugation(infinitive: &str, group: Group) -> ConjugationTable {
    ConjugationTable::from_fn(|tense, person| expected_form(infinitive, group, tense, person))
}
