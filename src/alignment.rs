//! Morph-to-feature alignment hints.
//!
//! The alignment table lists, per morph, the `Feat=Value` pairs that morph
//! expresses (`s<TAB>Number=Plur`). After splitting, every morph node
//! carries a copy of the original word's FEATS; when a hint confirms that a
//! morph expresses a pair, the pair is dropped from the node the morph
//! attaches to so it is not marked twice.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::conllu::{Document, Sentence};
use crate::error::{Result, RetreeError};

const RESOURCE: &str = "alignment table";

/// Morph → feature pairs it expresses
#[derive(Debug, Clone, Default)]
pub struct AlignmentTable {
    hints: HashMap<String, Vec<String>>,
}

impl AlignmentTable {
    pub fn new() -> Self {
        AlignmentTable::default()
    }

    /// Number of morphs with hints
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Record that `morph` expresses `pair` (`Feat=Value`)
    pub fn insert(&mut self, morph: &str, pair: &str) {
        self.hints
            .entry(morph.to_string())
            .or_default()
            .push(pair.to_string());
    }

    /// Whether `morph` is known to express `feat=value`
    pub fn confirms(&self, morph: &str, feat: &str, value: &str) -> bool {
        self.hints.get(morph).is_some_and(|pairs| {
            pairs.iter().any(|p| {
                p.split_once('=')
                    .is_some_and(|(f, v)| f == feat && v == value)
            })
        })
    }

    pub fn has_morph(&self, morph: &str) -> bool {
        self.hints.contains_key(morph)
    }

    /// Parse table lines from a TSV string; `+` around morphs is trimmed
    pub fn from_tsv(content: &str) -> Result<Self> {
        let mut table = AlignmentTable::new();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut columns = line.split('\t');
            let morph = columns.next().unwrap_or_default();
            let pair = columns.next().ok_or_else(|| {
                RetreeError::malformed(RESOURCE, idx + 1, "missing feature column")
            })?;
            table.insert(morph.trim_matches('+'), pair.trim());
        }

        Ok(table)
    }

    /// Load the table from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RetreeError::io(path, e))?;
        let table = Self::from_tsv(&content)?;
        info!(morphs = table.len(), path = %path.display(), "loaded alignment table");
        Ok(table)
    }

    /// Drop parent features expressed by split morphs in one sentence.
    ///
    /// Only morphs whose head lies in the same multiword token are
    /// considered. Returns the number of features removed; a second run
    /// removes nothing.
    pub fn null_redundant_features(&self, sentence: &mut Sentence) -> usize {
        let mut removals: Vec<(usize, String)> = Vec::new();

        for mwt in &sentence.multiwords {
            for id in mwt.first..=mwt.last.min(sentence.words.len()) {
                let Some(word) = id.checked_sub(1).and_then(|i| sentence.words.get(i)) else {
                    continue;
                };
                let Some(head) = word.head.filter(|h| *h != id && mwt.contains(*h)) else {
                    continue;
                };
                if !self.has_morph(&word.form) {
                    continue;
                }
                for (feat, value) in word.feats.iter() {
                    if self.confirms(&word.form, feat, value) {
                        removals.push((head, feat.to_string()));
                    }
                }
            }
        }

        let mut removed = 0;
        for (head, feat) in removals {
            if let Some(parent) = head.checked_sub(1).and_then(|i| sentence.words.get_mut(i)) {
                if parent.feats.remove(&feat).is_some() {
                    debug!(form = %parent.form, %feat, "nulled feature expressed by morph");
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Run [`null_redundant_features`](Self::null_redundant_features) over
    /// every sentence
    pub fn null_document(&self, doc: &mut Document) -> usize {
        doc.sentences
            .iter_mut()
            .map(|s| self.null_redundant_features(s))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conllu::MultiwordToken;

    const TREE: &str = "1-2\tcats\t_\t_\t_\t_\t_\t_\t_\t_\n\
1\tcat\tcat\tNOUN\t_\tNumber=Plur\t3\tnsubj\t_\t_\n\
2\ts\ts\tX\t_\tNumber=Plur\t1\tcase:morph\t_\t_\n\
3\tsleep\tsleep\tVERB\t_\tNumber=Plur\t0\troot\t_\t_\n\
4\ts\ts\tX\t_\tNumber=Plur\t3\tdep\t_\t_\n";

    #[test]
    fn test_load_tsv() {
        let table = AlignmentTable::from_tsv("+s\tNumber=Plur\ning+\tVerbForm=Ger\n").unwrap();
        assert!(table.confirms("s", "Number", "Plur"));
        assert!(table.confirms("ing", "VerbForm", "Ger"));
        assert!(!table.confirms("s", "Number", "Sing"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        assert!(AlignmentTable::from_tsv("s\n").is_err());
    }

    #[test]
    fn test_null_parent_feature() {
        let mut doc = Document::parse(TREE).unwrap();
        let table = AlignmentTable::from_tsv("s\tNumber=Plur\n").unwrap();

        assert_eq!(table.null_document(&mut doc), 1);
        let words = &doc.sentences[0].words;
        assert!(words[0].feats.is_empty());
        // the morph keeps its copy
        assert_eq!(words[1].feats.get("Number"), Some("Plur"));
        // the stray "s" outside any multiword token changes nothing
        assert_eq!(words[2].feats.get("Number"), Some("Plur"));
    }

    #[test]
    fn test_ranges_past_the_words_are_ignored() {
        let mut sentence = Document::parse(TREE).unwrap().sentences.remove(0);
        sentence.multiwords.push(MultiwordToken {
            first: 0,
            last: 100,
            form: "stray".to_string(),
            misc: Default::default(),
        });
        let table = AlignmentTable::from_tsv("x\tNumber=Plur\n").unwrap();

        assert_eq!(table.null_redundant_features(&mut sentence), 0);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut doc = Document::parse(TREE).unwrap();
        let table = AlignmentTable::from_tsv("s\tNumber=Plur\n").unwrap();
        table.null_document(&mut doc);
        let once = doc.clone();

        assert_eq!(table.null_document(&mut doc), 0);
        assert_eq!(doc, once);
    }
}
