//! Inflection lexicon.
//!
//! Lines are `lemma<TAB>form<TAB>features<TAB>segmentation`, where the
//! segmentation is the form split on `|` into a stem followed by its
//! inflectional endings (`walk|ed`). Lines whose segmentation is `-` or
//! has no `|` carry no split and are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, RetreeError};
use crate::source::SourceRecord;
use crate::text::{fold_diacritics, lookup_key};

const RESOURCE: &str = "inflection lexicon";

const LEMMA_COLUMN: usize = 0;
const FORM_COLUMN: usize = 1;
const SEGMENTATION_COLUMN: usize = 3;

/// Separator between stem and endings
pub const AFFIX_SEPARATOR: char = '|';

/// Surface form → (lemma → affix list) mapping
#[derive(Debug, Clone, Default)]
pub struct InflectionLexicon {
    forms: HashMap<String, HashMap<String, Vec<String>>>,
}

impl InflectionLexicon {
    pub fn new() -> Self {
        InflectionLexicon::default()
    }

    /// Number of distinct surface forms
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Register an affix list for a (form, lemma) pair
    pub fn insert(&mut self, form: &str, lemma: &str, affixes: Vec<String>) {
        self.forms
            .entry(lookup_key(form))
            .or_default()
            .insert(lookup_key(lemma), affixes);
    }

    /// Whether any candidate exists for this form
    pub fn contains_form(&self, form: &str) -> bool {
        self.forms.contains_key(&lookup_key(form))
    }

    /// Affix list for a (form, lemma) pair, compared case-insensitively
    pub fn affixes(&self, form: &str, lemma: &str) -> Option<&[String]> {
        self.forms
            .get(&lookup_key(form))
            .and_then(|candidates| candidates.get(&lookup_key(lemma)))
            .map(Vec::as_slice)
    }

    /// The inflection record for an exact (form, lemma) pair
    pub fn record(&self, form: &str, lemma: &str) -> Option<SourceRecord<'_>> {
        self.affixes(form, lemma)
            .map(SourceRecord::InflectionAffixes)
    }

    /// Parse lexicon lines from a TSV string.
    ///
    /// With `fold` set, lemma, form and segmentation are stripped of
    /// diacritics before they are stored.
    pub fn from_tsv(content: &str, fold: bool) -> Result<Self> {
        let mut lexicon = InflectionLexicon::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() <= SEGMENTATION_COLUMN {
                return Err(RetreeError::malformed(
                    RESOURCE,
                    line_no,
                    format!(
                        "expected at least {} columns, found {}",
                        SEGMENTATION_COLUMN + 1,
                        columns.len()
                    ),
                ));
            }

            let normalize = |s: &str| {
                if fold {
                    fold_diacritics(s)
                } else {
                    s.to_string()
                }
            };
            let lemma = normalize(columns[LEMMA_COLUMN]);
            let form = normalize(columns[FORM_COLUMN]);
            let segmentation = normalize(columns[SEGMENTATION_COLUMN].trim());

            if segmentation == "-" || !segmentation.contains(AFFIX_SEPARATOR) {
                continue;
            }

            let affixes = segmentation
                .split(AFFIX_SEPARATOR)
                .map(str::to_string)
                .collect();
            lexicon.insert(&form, &lemma, affixes);
        }

        Ok(lexicon)
    }

    /// Load the lexicon from a file
    pub fn load(path: &Path, fold: bool) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RetreeError::io(path, e))?;
        let lexicon = Self::from_tsv(&content, fold)?;
        info!(forms = lexicon.len(), path = %path.display(), "loaded inflection lexicon");
        Ok(lexicon)
    }
}
