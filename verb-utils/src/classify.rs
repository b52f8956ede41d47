use crate::conjugation::{ConjugationTable, Group};
use crate::regular::expected_conjugation;

/// True if every generated cell matches the expected cell exactly.
///
/// Both tables are complete by construction, so there are no missing cells to
/// account for. Stops at the first mismatch.
pub fn classify(generated: &ConjugationTable, expected: &ConjugationTable) -> bool {
    generated
        .cells()
        .all(|(tense, person, form)| form == expected.get(tense, person))
}

/// Classifies a generated table against the regular model for `infinitive`.
pub fn is_regular(infinitive: &str, group: Group, generated: &ConjugationTable) -> bool {
    classify(generated, &expected_conjugation(infinitive, group))
}

/// The cells where a generated table departs from the expected one.
///
/// Used for debug logging of irregular verbs.
pub fn mismatches<'a>(
    generated: &'a ConjugationTable,
    expected: &'a ConjugationTable,
) -> impl Iterator<Item = (crate::Tense, crate::Person, &'a str, &'a str)> {
    generated
        .cells()
        .map(move |(tense, person, form)| (tense, person, form, expected.get(tense, person)))
        .filter(|(_, _, form, regular)| form != regular)
}
