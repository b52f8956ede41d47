use anyhow::Context;
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use std::path::PathBuf;
use verb_utils::{ReconcileReport, build_records, select_candidates};

use generate_verbs::verbecc::VerbeccConjugator;
use generate_verbs::wiktionary_conjugations::WiktionaryConjugator;
use generate_verbs::{Conjugator, DICTIONARY_URL, FREQUENCY_LIST_URL};
use generate_verbs::{download, freedict, frequency_list, output};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConjugatorKind {
    /// The verbecc Python library
    Verbecc,
    /// Conjugation tables scraped from Wiktionary
    Wiktionary,
}

/// Builds the Catalan verb dataset from a Spanish frequency list.
#[derive(Parser, Debug)]
#[command(name = "generate-verbs")]
struct Args {
    /// Page holding the ranked Spanish verb table
    #[arg(long, default_value = FREQUENCY_LIST_URL)]
    frequency_list_url: String,

    /// Read the frequency list from a local HTML file instead
    #[arg(long)]
    frequency_list_file: Option<PathBuf>,

    /// FreeDict cat-spa TEI dictionary (gzipped)
    #[arg(long, default_value = DICTIONARY_URL)]
    dictionary_url: String,

    /// Read the dictionary from a local TEI file (.tei or .tei.gz) instead
    #[arg(long)]
    dictionary_file: Option<PathBuf>,

    #[arg(long, short, default_value = "src/data/verbs.json")]
    output: PathBuf,

    /// Downloads and conjugation caches live here
    #[arg(long, default_value = ".cache/generate-verbs")]
    cache_dir: PathBuf,

    /// Download the inputs again even if cached copies exist
    #[arg(long)]
    refresh: bool,

    #[arg(long, value_enum, default_value_t = ConjugatorKind::Verbecc)]
    conjugator: ConjugatorKind,

    /// Python interpreter with verbecc installed
    #[arg(long, env = "VERBECC_PYTHON", default_value = "python3")]
    python: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let client = download::http_client()?;

    println!("Fetching frequency list...");
    let html = match &args.frequency_list_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read frequency list {}", path.display()))?,
        None => {
            download::fetch_text_cached(
                &client,
                &args.frequency_list_url,
                &args.cache_dir.join("frequency-list.html"),
                args.refresh,
            )
            .await?
        }
    };
    let vocabulary = frequency_list::parse_vocabulary(&html);
    if vocabulary.is_empty() {
        anyhow::bail!("Frequency list contained no usable rows");
    }

    let dictionary_path = match &args.dictionary_file {
        Some(path) => path.clone(),
        None => {
            println!("Downloading FreeDict (cat-spa)...");
            download::download_file(
                &client,
                &args.dictionary_url,
                &args.cache_dir.join("freedict-cat-spa.tei.gz"),
                args.refresh,
            )
            .await?
        }
    };

    println!("Building Spanish->Catalan map...");
    let bridge = freedict::read_bridge(&dictionary_path)?;

    println!("Mapping Spanish list to Catalan...");
    let mut report = ReconcileReport::default();
    let candidates = select_candidates(&vocabulary, &bridge, &mut report);
    println!(
        "Mapped {} verbs. Missing: {}",
        candidates.len(),
        report.missing_count()
    );
    if !report.missing.is_empty() {
        log::info!("No translation for: {}", report.missing.iter().join(", "));
    }

    let conjugator = match args.conjugator {
        ConjugatorKind::Verbecc => Conjugator::Verbecc(VerbeccConjugator::new(&args.python)),
        ConjugatorKind::Wiktionary => {
            Conjugator::Wiktionary(WiktionaryConjugator::new(&args.cache_dir))
        }
    };
    let infinitives = candidates
        .iter()
        .map(|candidate| candidate.infinitive.clone())
        .collect_vec();
    let mut conjugations = conjugator.conjugate_all(&infinitives).await?;

    let records = build_records(
        candidates,
        |infinitive| Ok(conjugations.remove(infinitive)),
        &mut report,
    )?;

    log::info!(
        "Dropped {} reflexive sources, {} duplicate targets, {} non-verbs, {} incomplete conjugations",
        report.reflexive_sources,
        report.duplicate_targets,
        report.not_verb_like,
        report.incomplete_conjugations
    );
    println!(
        "{} regular, {} irregular.",
        report.regular, report.irregular
    );

    output::write_verbs_file(&records, &args.output)?;
    println!("Wrote {} verbs to {}.", records.len(), args.output.display());

    Ok(())
}
