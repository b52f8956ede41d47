//! Streaming reader for FreeDict TEI dictionaries.
//!
//! The cat-spa dictionary is tens of megabytes of XML of which only the verb
//! entries matter. Entries are read one at a time from a pull parser, so
//! memory use stays bounded by the largest single entry.

use anyhow::Context as _;
use flate2::read::GzDecoder;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use verb_utils::{DictionaryEntry, TranslationMap, try_build_bridge};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Orth,
    Quote,
}

/// Iterator over the `entry` elements of a TEI document.
pub struct TeiEntries<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> TeiEntries<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            finished: false,
        }
    }

    fn read_entry(&mut self) -> anyhow::Result<Option<DictionaryEntry>> {
        let mut entry: Option<DictionaryEntry> = None;
        // the orth/quote element being read, with the depth it was opened at
        let mut field: Option<(Field, usize, String)> = None;
        let mut depth = 0usize;

        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .with_context(|| {
                    format!(
                        "Malformed dictionary XML near byte {}",
                        self.reader.buffer_position()
                    )
                })?;

            match event {
                Event::Start(start) => {
                    let name = start.local_name();
                    if entry.is_none() {
                        if name.as_ref() == b"entry" {
                            entry = Some(DictionaryEntry::default());
                            depth = 0;
                        }
                        continue;
                    }
                    depth += 1;
                    if field.is_none() {
                        let kind = match name.as_ref() {
                            b"orth" => Some(Field::Orth),
                            b"quote" => Some(Field::Quote),
                            _ => None,
                        };
                        if let Some(kind) = kind {
                            field = Some((kind, depth, String::new()));
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some((_, open_depth, value)) = field.as_mut() {
                        // only the element's own text, not that of nested children
                        if *open_depth == depth {
                            value.push_str(&text.unescape()?);
                        }
                    }
                }
                Event::CData(data) => {
                    if let Some((_, open_depth, value)) = field.as_mut() {
                        if *open_depth == depth {
                            value.push_str(&String::from_utf8_lossy(&data));
                        }
                    }
                }
                Event::End(_) => {
                    if entry.is_none() {
                        continue;
                    }
                    if depth == 0 {
                        return Ok(entry);
                    }
                    if matches!(&field, Some((_, open_depth, _)) if *open_depth == depth) {
                        if let (Some((kind, _, value)), Some(current)) = (field.take(), entry.as_mut()) {
                            if !value.trim().is_empty() {
                                match kind {
                                    Field::Orth => current.headwords.push(value),
                                    Field::Quote => current.translations.push(value),
                                }
                            }
                        }
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    if entry.is_some() {
                        anyhow::bail!("Dictionary ended inside an entry");
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for TeiEntries<R> {
    type Item = anyhow::Result<DictionaryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Open a TEI dictionary, decompressing on the fly if the name ends in `.gz`.
pub fn open_dictionary(path: &Path) -> anyhow::Result<TeiEntries<Box<dyn BufRead>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dictionary at {}", path.display()))?;
    let is_gzip = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("gz"));
    let source: Box<dyn BufRead> = if is_gzip {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(TeiEntries::new(source))
}

/// Build the Spanish → Catalan bridge from a cat-spa TEI dictionary.
pub fn read_bridge(path: &Path) -> anyhow::Result<TranslationMap> {
    let bridge = try_build_bridge(open_dictionary(path)?)
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
    if bridge.is_empty() {
        anyhow::bail!(
            "Dictionary {} produced no verb translations",
            path.display()
        );
    }
    Ok(bridge)
}
