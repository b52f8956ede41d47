pub mod download;
pub mod freedict;
pub mod frequency_list;
pub mod output;
pub mod verbecc;
pub mod wiktionary_conjugations;

use std::collections::HashMap;
use verb_utils::{ConjugatorUnavailable, GeneratedConjugation};

/// Ranked list of the most common Spanish verbs.
pub const FREQUENCY_LIST_URL: &str = "https://lingualid.com/top-200-common-verbs-in-spanish/";

/// FreeDict Catalan → Spanish dictionary in TEI format.
pub const DICTIONARY_URL: &str =
    "https://download.freedict.org/generated/cat-spa/tei/freedict-cat-spa.tei.gz";

/// Where the conjugations for the dataset come from.
pub enum Conjugator {
    Verbecc(verbecc::VerbeccConjugator),
    Wiktionary(wiktionary_conjugations::WiktionaryConjugator),
}

impl Conjugator {
    pub async fn conjugate_all(
        &self,
        verbs: &[String],
    ) -> Result<HashMap<String, GeneratedConjugation>, ConjugatorUnavailable> {
        match self {
            Conjugator::Verbecc(conjugator) => conjugator.conjugate_all(verbs).await,
            Conjugator::Wiktionary(conjugator) => conjugator.conjugate_all(verbs).await,
        }
    }
}
