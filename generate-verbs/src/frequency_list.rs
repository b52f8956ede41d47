use scraper::{Html, Selector};
use std::sync::LazyLock;
use verb_utils::{VocabularyEntry, adapt_list};

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Extract the plain text of every `td` cell, row by row.
///
/// Markup inside a cell is dropped and whitespace collapsed. Rows without any
/// `td` (header rows made of `th`) are skipped.
pub fn parse_table_rows(html: &str) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);
    document
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| {
                    cell.text()
                        .collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Parse a ranked word list page (rank / Spanish / English columns).
pub fn parse_vocabulary(html: &str) -> Vec<VocabularyEntry> {
    let rows = parse_table_rows(html);
    let row_count = rows.len();
    let vocabulary = adapt_list(rows);
    log::info!(
        "Frequency list: {row_count} table rows, {} unique source words",
        vocabulary.len()
    );
    vocabulary
}
