//! Conjugations from the `verbecc` Python library.
//!
//! All verbs are conjugated by a single interpreter process, which prints one
//! JSON line `[verb, conjugation]` per verb (`null` when verbecc raises).

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::process::Stdio;
use verb_utils::{ConjugatorUnavailable, GeneratedConjugation};

/// Exit status the helper script uses when verbecc cannot be imported.
const MISSING_LIBRARY_STATUS: i32 = 3;

const SCRIPT: &str = r#"
import json
import sys

try:
    from verbecc import Conjugator, LangCodeISO639_1
except ImportError as e:
    print(f"verbecc import failed: {e}", file=sys.stderr)
    sys.exit(3)

conj = Conjugator(lang=LangCodeISO639_1.ca)
for verb in sys.argv[1:]:
    try:
        result = conj.conjugate(verb)
    except Exception as e:
        print(f"{verb}: {e}", file=sys.stderr)
        result = None
    print(json.dumps([verb, result], ensure_ascii=False), flush=True)
"#;

pub struct VerbeccConjugator {
    python: String,
}

impl VerbeccConjugator {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Conjugate every verb in one interpreter run.
    ///
    /// Verbs verbecc could not handle are absent from the result. A missing
    /// interpreter, a missing library, or a crashed process is fatal.
    pub async fn conjugate_all(
        &self,
        verbs: &[String],
    ) -> Result<HashMap<String, GeneratedConjugation>, ConjugatorUnavailable> {
        if verbs.is_empty() {
            return Ok(HashMap::new());
        }
        println!("Conjugating {} verbs with verbecc...", verbs.len());

        let output = tokio::process::Command::new(&self.python)
            .arg("-c")
            .arg(SCRIPT)
            .args(verbs)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ConjugatorUnavailable::new(format!("could not run {}: {e}", self.python))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let reason = match output.status.code() {
                Some(MISSING_LIBRARY_STATUS) => {
                    format!("verbecc is not installed for {}: {}", self.python, stderr.trim())
                }
                _ => format!("verbecc exited with {}: {}", output.status, stderr.trim()),
            };
            return Err(ConjugatorUnavailable::new(reason));
        }
        for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
            log::warn!("verbecc: {line}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let conjugations = parse_output(&stdout);
        log::info!(
            "verbecc conjugated {} of {} verbs",
            conjugations.len(),
            verbs.len()
        );
        Ok(conjugations)
    }
}

/// Parse the helper's JSON lines. Malformed lines and `null` results are skipped.
pub fn parse_output(stdout: &str) -> HashMap<String, GeneratedConjugation> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (verb, value): (String, Value) = match serde_json::from_str(line) {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("Ignoring malformed verbecc output line: {e}");
                    return None;
                }
            };
            let conjugation = conjugation_from_json(&value)?;
            Some((verb, conjugation))
        })
        .collect()
}

/// Keep the tenses whose forms are a plain list of strings.
///
/// verbecc also reports participles and other shapes that the dataset does
/// not use; those are dropped here.
pub fn conjugation_from_json(value: &Value) -> Option<GeneratedConjugation> {
    let moods = value.get("moods")?.as_object()?;
    let moods = moods
        .iter()
        .filter_map(|(mood, tenses)| {
            let tenses = tenses
                .as_object()?
                .iter()
                .filter_map(|(tense, forms)| {
                    let forms = forms
                        .as_array()?
                        .iter()
                        .map(|form| form.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()?;
                    Some((tense.clone(), forms))
                })
                .collect::<BTreeMap<_, _>>();
            Some((mood.clone(), tenses))
        })
        .collect();
    Some(GeneratedConjugation { moods })
}
