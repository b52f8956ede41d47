use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use verb_utils::{ConjugatorUnavailable, GeneratedConjugation, Tense};

const WIKTIONARY_BASE: &str = "https://en.wiktionary.org/wiki/";

/// Mood label used for the generated conjugation, matching verbecc's spelling.
const INDICATIVE: &str = "indicatiu";

static H2_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2#Catalan").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static A_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// English row label Wiktionary uses for each tense.
fn row_label(tense: Tense) -> &'static str {
    match tense {
        Tense::Present => "present",
        Tense::Imperfect => "imperfect",
        Tense::Future => "future",
        Tense::Conditional => "conditional",
    }
}

/// Extract the Catalan language section from a Wiktionary page
fn extract_catalan_section(document: &Html) -> anyhow::Result<Html> {
    let catalan_heading = document
        .select(&H2_SELECTOR)
        .next()
        .context("Could not find Catalan language section")?;

    // Collect all content until the next h2 (language section)
    let mut catalan_content = String::new();
    let mut current = catalan_heading.parent();

    while let Some(node) = current {
        current = node.next_sibling();
        if let Some(current_node) = current {
            if let Some(elem) = ElementRef::wrap(current_node) {
                let starts_new_language = elem.value().name() == "div"
                    && elem
                        .first_child()
                        .and_then(ElementRef::wrap)
                        .is_some_and(|child| child.value().name() == "h2");
                if starts_new_language {
                    break;
                }
                catalan_content.push_str(&elem.html());
            }
        }
    }

    Ok(Html::parse_fragment(&catalan_content))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    // the link holds the form; footnote markers and alternatives sit outside it
    let text = match cell.select(&A_SELECTOR).next() {
        Some(link) => link.text().collect::<String>(),
        None => cell.text().collect::<String>(),
    };
    let first = text.split([',', '/']).next().unwrap_or_default();
    first.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn header_text(row: ElementRef<'_>) -> Option<String> {
    let th = row.select(&TH_SELECTOR).next()?;
    let text = th.text().collect::<String>().to_lowercase();
    Some(
        text.chars()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect::<String>()
            .trim()
            .to_string(),
    )
}

/// Parse the indicative tenses out of a Catalan conjugation table.
///
/// Rows are read top to bottom; a header row mentioning a mood switches the
/// current mood, and only rows under "indicative" are used.
pub fn parse_catalan_verb_conjugation(html: &str) -> anyhow::Result<GeneratedConjugation> {
    let document = Html::parse_document(html);
    let catalan_section = extract_catalan_section(&document)?;

    let mut in_indicative = false;
    let mut tenses: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for row in catalan_section.select(&ROW_SELECTOR) {
        let Some(header) = header_text(row) else {
            continue;
        };
        if header.contains("indicative") {
            in_indicative = true;
            continue;
        }
        if header.contains("subjunctive") || header.contains("imperative") {
            in_indicative = false;
            continue;
        }
        if !in_indicative {
            continue;
        }
        let Some(tense) = Tense::ALL.into_iter().find(|t| row_label(*t) == header) else {
            continue;
        };
        if tenses.contains_key(tense.generator_label()) {
            continue;
        }

        let forms = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .map(cell_text)
            .collect::<Vec<_>>();
        if forms.len() != 6 {
            anyhow::bail!(
                "Expected 6 forms for indicative {}, found {}",
                row_label(tense),
                forms.len()
            );
        }
        tenses.insert(tense.generator_label().to_string(), forms);
    }

    for tense in Tense::ALL {
        if !tenses.contains_key(tense.generator_label()) {
            anyhow::bail!("Failed to find tense row for indicative {}", row_label(tense));
        }
    }

    Ok(GeneratedConjugation {
        moods: BTreeMap::from([(INDICATIVE.to_string(), tenses)]),
    })
}

/// Fetches Catalan conjugations from Wiktionary, with an on-disk cache.
///
/// Successful parses are appended to `conjugations_cache.jsonl` and failures to
/// `conjugations_failures.txt`, so a rerun only touches verbs it has never
/// tried.
pub struct WiktionaryConjugator {
    cache_file: PathBuf,
    failures_file: PathBuf,
}

impl WiktionaryConjugator {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_file: cache_dir.join("conjugations_cache.jsonl"),
            failures_file: cache_dir.join("conjugations_failures.txt"),
        }
    }

    fn load_cache(&self) -> anyhow::Result<HashMap<String, GeneratedConjugation>> {
        if !self.cache_file.exists() {
            return Ok(HashMap::new());
        }
        let reader = BufReader::new(File::open(&self.cache_file)?);
        Ok(reader
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<(String, GeneratedConjugation)>(&line).ok())
            .collect())
    }

    fn load_failures(&self) -> anyhow::Result<HashSet<String>> {
        if !self.failures_file.exists() {
            return Ok(HashSet::new());
        }
        let reader = BufReader::new(File::open(&self.failures_file)?);
        Ok(reader
            .lines()
            .map_while(Result::ok)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Conjugations for every verb Wiktionary has a parsable table for.
    ///
    /// Verbs that fail to fetch or parse are left out. If Wiktionary cannot be
    /// reached at all the generator is reported unavailable.
    pub async fn conjugate_all(
        &self,
        verbs: &[String],
    ) -> Result<HashMap<String, GeneratedConjugation>, ConjugatorUnavailable> {
        self.fetch(verbs)
            .await
            .map_err(|e| ConjugatorUnavailable::new(format!("{e:#}")))
    }

    async fn fetch(&self, verbs: &[String]) -> anyhow::Result<HashMap<String, GeneratedConjugation>> {
        let mut cached = self.load_cache().context("Failed to load conjugation cache")?;
        let failures = self.load_failures().context("Failed to load conjugation failures")?;

        let to_fetch: Vec<&String> = verbs
            .iter()
            .filter(|verb| !cached.contains_key(*verb) && !failures.contains(*verb))
            .collect();

        if to_fetch.is_empty() {
            return Ok(cached);
        }

        println!(
            "Fetching {} verb conjugations from Wiktionary...",
            to_fetch.len()
        );

        let client = crate::download::http_client()?;
        client
            .head(WIKTIONARY_BASE)
            .send()
            .await
            .context("Wiktionary is unreachable")?;

        if let Some(dir) = self.cache_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut cache_writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.cache_file)?;
        let mut failures_writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.failures_file)?;

        let pb = ProgressBar::new(to_fetch.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} verbs ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );

        for (i, verb) in to_fetch.iter().enumerate() {
            if i > 0 && i % 10 == 0 {
                // Rate limiting: sleep between batches
                tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            }
            pb.inc(1);

            let url = format!("{WIKTIONARY_BASE}{verb}");
            let html = match fetch_page(&client, &url).await {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("Failed to fetch {verb}: {e:#}");
                    writeln!(failures_writer, "{verb}")?;
                    continue;
                }
            };

            match parse_catalan_verb_conjugation(&html) {
                Ok(conjugation) => {
                    let json = serde_json::to_string(&(verb, &conjugation))?;
                    writeln!(cache_writer, "{json}")?;
                    cached.insert((*verb).clone(), conjugation);
                }
                Err(e) => {
                    log::warn!("Failed to parse conjugation for {verb}: {e:#}");
                    writeln!(failures_writer, "{verb}")?;
                }
            }
        }

        pb.finish();
        log::info!(
            "Finished fetching conjugations. Total cached: {}",
            cached.len()
        );

        Ok(cached)
    }
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
