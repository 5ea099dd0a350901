//! Span-tagged segmentation lexicon.
//!
//! Each line of the lexicon file describes one lemma. Column 0 holds the
//! lemma and column 4 a JSON object whose `segmentation` array lists the
//! segments with character spans into the lemma:
//!
//! ```text
//! unhappiness<TAB>...<TAB>...<TAB>...<TAB>{"segmentation": [{"span": [0, 1], "type": "prefix"}, ...]}
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, RetreeError};
use crate::source::{Segment, SourceRecord};
use crate::text::lookup_key;

const RESOURCE: &str = "segmentation lexicon";

/// Column holding the lemma
const LEMMA_COLUMN: usize = 0;
/// Column holding the JSON payload
const PAYLOAD_COLUMN: usize = 4;

/// JSON payload of a lexicon line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconEntry {
    /// Segments in lemma order; absent for unsegmented lemmas
    #[serde(default)]
    pub segmentation: Option<Vec<Segment>>,
}

impl LexiconEntry {
    /// Segments of this entry, empty if the lemma is unsegmented
    pub fn segments(&self) -> &[Segment] {
        self.segmentation.as_deref().unwrap_or(&[])
    }

    /// Whether the entry carries an actual split (more than one segment)
    pub fn is_segmented(&self) -> bool {
        self.segments().len() > 1
    }
}

/// Lemma → segmentation mapping
#[derive(Debug, Clone, Default)]
pub struct SegmentationLexicon {
    entries: HashMap<String, LexiconEntry>,
}

impl SegmentationLexicon {
    pub fn new() -> Self {
        SegmentationLexicon::default()
    }

    /// Number of lemmas in the lexicon
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add or replace the entry of a lemma
    pub fn insert(&mut self, lemma: &str, entry: LexiconEntry) {
        self.entries.insert(lookup_key(lemma), entry);
    }

    /// Look up the raw entry of a lemma, case-insensitively
    pub fn get(&self, lemma: &str) -> Option<&LexiconEntry> {
        self.entries.get(&lookup_key(lemma))
    }

    /// The span-tagged record for a lemma, if it is actually segmented
    pub fn record(&self, lemma: &str) -> Option<SourceRecord<'_>> {
        self.get(lemma)
            .filter(|entry| entry.is_segmented())
            .map(|entry| SourceRecord::SpanTagged(entry.segments()))
    }

    /// Parse lexicon lines from a TSV string
    pub fn from_tsv(content: &str) -> Result<Self> {
        let mut lexicon = SegmentationLexicon::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() <= PAYLOAD_COLUMN {
                return Err(RetreeError::malformed(
                    RESOURCE,
                    line_no,
                    format!(
                        "expected at least {} columns, found {}",
                        PAYLOAD_COLUMN + 1,
                        columns.len()
                    ),
                ));
            }

            let entry: LexiconEntry =
                serde_json::from_str(columns[PAYLOAD_COLUMN]).map_err(|source| {
                    RetreeError::Json {
                        resource: RESOURCE.to_string(),
                        line: line_no,
                        source,
                    }
                })?;
            lexicon.insert(columns[LEMMA_COLUMN], entry);
        }

        Ok(lexicon)
    }

    /// Load the lexicon from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RetreeError::io(path, e))?;
        let lexicon = Self::from_tsv(&content)?;
        info!(lemmas = lexicon.len(), path = %path.display(), "loaded segmentation lexicon");
        Ok(lexicon)
    }
}
