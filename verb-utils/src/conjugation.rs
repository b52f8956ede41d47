use std::collections::BTreeMap;

use serde::ser::SerializeMap;

/// Indicative tenses covered by the dataset, in output order.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Tense {
    Present,
    Imperfect,
    Future,
    Conditional,
}

impl Tense {
    pub const ALL: [Tense; 4] = [
        Tense::Present,
        Tense::Imperfect,
        Tense::Future,
        Tense::Conditional,
    ];

    /// Key used in the output file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Present => "present",
            Tense::Imperfect => "imperfect",
            Tense::Future => "future",
            Tense::Conditional => "conditional",
        }
    }

    /// Tense name as the conjugation generator spells it (Catalan labels).
    pub fn generator_label(&self) -> &'static str {
        match self {
            Tense::Present => "present",
            Tense::Imperfect => "imperfet",
            Tense::Future => "futur",
            Tense::Conditional => "condicional",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Tense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grammatical person, in the canonical order the generator emits forms.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Person {
    Jo,
    Tu,
    Ell,
    Nosaltres,
    Vosaltres,
    Ells,
}

impl Person {
    pub const ALL: [Person; 6] = [
        Person::Jo,
        Person::Tu,
        Person::Ell,
        Person::Nosaltres,
        Person::Vosaltres,
        Person::Ells,
    ];

    /// Subject pronoun for this person. Doubles as the output key.
    pub fn pronoun(&self) -> &'static str {
        match self {
            Person::Jo => "jo",
            Person::Tu => "tu",
            Person::Ell => "ell",
            Person::Nosaltres => "nosaltres",
            Person::Vosaltres => "vosaltres",
            Person::Ells => "ells",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pronoun())
    }
}

/// Infinitive class, decided by the last two letters.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Ar,
    Er,
    Ir,
}

impl Group {
    /// `-ar` and `-ir` map to their own group; everything else (`-er`, `-re`) is `Er`.
    pub fn from_infinitive(infinitive: &str) -> Self {
        if infinitive.ends_with("ar") {
            Group::Ar
        } else if infinitive.ends_with("ir") {
            Group::Ir
        } else {
            Group::Er
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Ar => "ar",
            Group::Er => "er",
            Group::Ir => "ir",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete indicative table: four tenses by six persons.
///
/// There is no way to build a partial table, so anything holding one can rely
/// on all 24 cells being present.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ConjugationTable {
    cells: [[String; 6]; 4],
}

impl ConjugationTable {
    pub fn from_fn(mut f: impl FnMut(Tense, Person) -> String) -> Self {
        Self {
            cells: Tense::ALL.map(|tense| Person::ALL.map(|person| f(tense, person))),
        }
    }

    pub fn get(&self, tense: Tense, person: Person) -> &str {
        &self.cells[tense.index()][person.index()]
    }

    pub fn tense(&self, tense: Tense) -> &[String; 6] {
        &self.cells[tense.index()]
    }

    /// All cells in tense-major canonical order.
    pub fn cells(&self) -> impl Iterator<Item = (Tense, Person, &str)> {
        Tense::ALL.into_iter().flat_map(move |tense| {
            Person::ALL
                .into_iter()
                .map(move |person| (tense, person, self.get(tense, person)))
        })
    }
}

impl serde::Serialize for ConjugationTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a>(&'a [String; 6]);

        impl serde::Serialize for Row<'_> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(6))?;
                for (person, form) in Person::ALL.iter().zip(self.0) {
                    map.serialize_entry(person.pronoun(), form)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(4))?;
        for tense in Tense::ALL {
            map.serialize_entry(tense.as_str(), &Row(self.tense(tense)))?;
        }
        map.end()
    }
}

/// Raw output of a conjugation generator: mood → tense label → forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedConjugation {
    pub moods: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl GeneratedConjugation {
    pub const INDICATIVE_LABELS: [&'static str; 2] = ["Indicatiu", "indicatiu"];

    pub fn indicative(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        Self::INDICATIVE_LABELS
            .iter()
            .find_map(|label| self.moods.get(*label))
    }

    /// Extracts the four indicative tenses, pronouns stripped.
    ///
    /// Returns `None` if the indicative mood or any of the four tenses is
    /// missing, or if a tense does not hold exactly six forms.
    pub fn to_table(&self) -> Option<ConjugationTable> {
        let indicative = self.indicative()?;
        let mut rows = Vec::with_capacity(Tense::ALL.len());
        for tense in Tense::ALL {
            let forms = indicative.get(tense.generator_label())?;
            if forms.len() != Person::ALL.len() {
                return None;
            }
            rows.push(forms);
        }
        Some(ConjugationTable::from_fn(|tense, person| {
            strip_pronoun(&rows[tense.index()][person.index()], person)
        }))
    }
}

/// Removes a leading subject pronoun from a generated form.
///
/// The prefix must be the person's own pronoun followed by whitespace; the
/// comparison ignores ASCII case. Any other spelling (`ella parla`,
/// `vostè parla`) is returned verbatim apart from trimming.
pub fn strip_pronoun(form: &str, person: Person) -> String {
    let value = form.trim();
    let pronoun = person.pronoun();
    match value.get(..pronoun.len()) {
        Some(head)
            if head.eq_ignore_ascii_case(pronoun)
                && value[pronoun.len()..].starts_with(char::is_whitespace) =>
        {
            value[pronoun.len()..].trim().to_string()
        }
        _ => value.to_string(),
    }
}
