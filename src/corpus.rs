//! Supervised segmentation corpus and derived morph frequencies.
//!
//! Each corpus line is `id<TAB>segmented sentence`, where morph boundaries
//! inside a word are marked with `@@` (`do @@ing` or `do@@ing`). Only words
//! containing a boundary are kept. Every morph occurrence across the kept
//! words contributes to a relative frequency table, which the root selector
//! uses to tell rare roots from recurring affixes.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, RetreeError};
use crate::source::SourceRecord;
use crate::text::lookup_key;

const RESOURCE: &str = "segmentation corpus";

const SENTENCE_COLUMN: usize = 1;

/// Morph boundary marker
pub const BOUNDARY: &str = "@@";

/// Morph → relative frequency (percentage of all morph occurrences)
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    freqs: HashMap<String, f64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable::default()
    }

    /// Build a table from explicit (morph, percentage) pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        FrequencyTable {
            freqs: pairs
                .into_iter()
                .map(|(morph, freq)| (morph.to_string(), freq))
                .collect(),
        }
    }

    /// Count every morph of every word and convert counts to percentages
    /// rounded to two decimals.
    pub fn compute<'a>(words: impl IntoIterator<Item = &'a Vec<String>>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut total = 0usize;
        for morphs in words {
            for morph in morphs {
                *counts.entry(morph.as_str()).or_insert(0) += 1;
                total += 1;
            }
        }

        let freqs = counts
            .into_iter()
            .map(|(morph, count)| {
                let pct = count as f64 / total as f64 * 100.0;
                (morph.to_string(), (pct * 100.0).round() / 100.0)
            })
            .collect();
        FrequencyTable { freqs }
    }

    /// Frequency of a morph, 0 when unseen
    pub fn get(&self, morph: &str) -> f64 {
        self.freqs.get(morph).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Word → ordered morph list, with morph frequencies
#[derive(Debug, Clone, Default)]
pub struct MorphCorpus {
    words: HashMap<String, Vec<String>>,
    frequency: FrequencyTable,
}

impl MorphCorpus {
    /// Build a corpus from already segmented words and compute frequencies
    pub fn from_words(words: HashMap<String, Vec<String>>) -> Self {
        let frequency = FrequencyTable::compute(words.values());
        MorphCorpus { words, frequency }
    }

    /// Number of segmented words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn frequency(&self) -> &FrequencyTable {
        &self.frequency
    }

    /// Morphs of a (lowercased) word
    pub fn morphs(&self, word: &str) -> Option<&[String]> {
        self.words.get(word).map(Vec::as_slice)
    }

    /// The corpus record for a (lowercased) word
    pub fn record(&self, word: &str) -> Option<SourceRecord<'_>> {
        self.morphs(word).map(SourceRecord::FrequencyCorpus)
    }

    /// Parse corpus lines from a TSV string.
    ///
    /// A word seen several times keeps its last segmentation; frequencies
    /// are computed over the distinct words.
    pub fn from_tsv(content: &str) -> Result<Self> {
        let mut words = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let sentence = line.split('\t').nth(SENTENCE_COLUMN).ok_or_else(|| {
                RetreeError::malformed(RESOURCE, line_no, "missing segmented sentence column")
            })?;

            let joined = sentence.trim_end().replace(" @@", BOUNDARY);
            for word in joined.split(' ') {
                if !word.contains(BOUNDARY) {
                    continue;
                }
                let key = lookup_key(word);
                let morphs: Vec<String> = key
                    .split(BOUNDARY)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect();
                if morphs.is_empty() {
                    continue;
                }
                words.insert(key.replace(BOUNDARY, ""), morphs);
            }
        }

        Ok(Self::from_words(words))
    }

    /// Load the corpus from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RetreeError::io(path, e))?;
        let corpus = Self::from_tsv(&content)?;
        info!(
            words = corpus.len(),
            morphs = corpus.frequency.len(),
            path = %path.display(),
            "loaded segmentation corpus"
        );
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundaries() {
        let corpus = MorphCorpus::from_tsv("1\tThe do @@ing of pre @@view @@s .\n").unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.morphs("doing"),
            Some(&["do".to_string(), "ing".to_string()][..])
        );
        assert_eq!(corpus.morphs("previews").unwrap().len(), 3);
        assert!(corpus.morphs("the").is_none());
    }

    #[test]
    fn test_glued_boundaries_and_case() {
        let corpus = MorphCorpus::from_tsv("7\tWalk@@ed home\n").unwrap();
        assert_eq!(
            corpus.morphs("walked"),
            Some(&["walk".to_string(), "ed".to_string()][..])
        );
    }

    #[test]
    fn test_decomposed_input_is_composed() {
        let corpus = MorphCorpus::from_tsv("1\tC\u{30c}ist@@it\n").unwrap();
        assert_eq!(
            corpus.morphs("\u{10d}istit"),
            Some(&["\u{10d}ist".to_string(), "it".to_string()][..])
        );
        assert_eq!(corpus.frequency().get("\u{10d}ist"), 50.0);
    }

    #[test]
    fn test_frequency_percentages() {
        let mut words = HashMap::new();
        words.insert("doing".to_string(), vec!["do".to_string(), "ing".to_string()]);
        words.insert("going".to_string(), vec!["go".to_string(), "ing".to_string()]);
        let corpus = MorphCorpus::from_words(words);

        assert_eq!(corpus.frequency().get("ing"), 50.0);
        assert_eq!(corpus.frequency().get("do"), 25.0);
        assert_eq!(corpus.frequency().get("unseen"), 0.0);
    }

    #[test]
    fn test_rounding() {
        let words = vec![vec!["a".to_string(), "b".to_string(), "b".to_string()]];
        let table = FrequencyTable::compute(words.iter());
        assert_eq!(table.get("a"), 33.33);
        assert_eq!(table.get("b"), 66.67);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = MorphCorpus::from_tsv("no tabs here\n").unwrap_err();
        assert!(matches!(err, RetreeError::MalformedRecord { line: 1, .. }));
    }
}
