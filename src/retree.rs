//! Per-word dispatch over the segmentation resources.
//!
//! For every word the resources are tried in a fixed order: the
//! segmentation corpus, then the span-tagged lexicon (refined with the
//! inflection lexicon or the ending heuristic), then the inflection lexicon
//! alone. The first usable segmentation becomes a directive and the word is
//! split; a word no resource covers stays as it is.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::alignment::AlignmentTable;
use crate::config::RunConfig;
use crate::conllu::{Document, Sentence, Word};
use crate::corpus::MorphCorpus;
use crate::directive::MultiwordDirective;
use crate::error::Result;
use crate::inflection::InflectionLexicon;
use crate::lexicon::SegmentationLexicon;
use crate::morph::{Segmentation, SourceKind};
use crate::normalizer::{append_ending, append_inflection, normalize};
use crate::text::lookup_key;

/// MISC attributes whose values must not contain spaces
const SPACELESS_MISC: &[&str] = &["XML", "CorrectForm", "Gloss"];

/// All loaded resources, read-only once built
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub lexicon: SegmentationLexicon,
    pub inflection: InflectionLexicon,
    pub corpus: Option<MorphCorpus>,
    pub alignments: Option<AlignmentTable>,
}

impl Resources {
    /// Load every resource a run configuration names
    pub fn load(config: &RunConfig) -> Result<Self> {
        let fold = config.should_fold();
        if fold {
            debug!("folding diacritics in inflection data");
        }

        Ok(Resources {
            lexicon: SegmentationLexicon::load(&config.lexicon)?,
            inflection: InflectionLexicon::load(&config.inflection, fold)?,
            corpus: config.corpus.as_deref().map(MorphCorpus::load).transpose()?,
            alignments: config
                .alignments
                .as_deref()
                .map(AlignmentTable::load)
                .transpose()?,
        })
    }
}

/// Counters of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetreeStats {
    /// Words visited
    pub words: usize,
    pub split_corpus: usize,
    pub split_lexicon: usize,
    pub split_inflection: usize,
    /// Words left alone because they already belong to a multiword token
    pub skipped_multiword: usize,
    /// Features removed by the alignment pass
    pub feats_nulled: usize,
}

impl RetreeStats {
    /// Total number of split words
    pub fn split(&self) -> usize {
        self.split_corpus + self.split_lexicon + self.split_inflection
    }

    fn record(&mut self, source: SourceKind) {
        match source {
            SourceKind::Corpus => self.split_corpus += 1,
            SourceKind::Lexicon => self.split_lexicon += 1,
            SourceKind::Inflection => self.split_inflection += 1,
        }
    }
}

/// A planned split, reported in dry runs
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSplit {
    pub sentence: usize,
    pub word_id: usize,
    pub form: String,
    pub directive: MultiwordDirective,
}

/// The retreeing engine
pub struct Retreer {
    /// Loaded resources (shared reference)
    resources: Arc<Resources>,
}

impl Retreer {
    /// Create a new engine owning the resources
    pub fn new(resources: Resources) -> Self {
        Retreer {
            resources: Arc::new(resources),
        }
    }

    /// Create a new engine with a shared resource reference
    pub fn with_arc(resources: Arc<Resources>) -> Self {
        Retreer { resources }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Segment one word, or `None` to leave it unsplit.
    ///
    /// Each stage yields only segmentations of at least two morphs; a stage
    /// that yields nothing hands the word on to the next one.
    pub fn segment(&self, form: &str, lemma: &str) -> Option<Segmentation> {
        let form_key = lookup_key(form);
        let lemma_key = lookup_key(lemma);

        self.segment_from_corpus(&form_key, lemma)
            .or_else(|| self.segment_from_lexicon(form, lemma, &form_key, &lemma_key))
            .or_else(|| self.segment_from_inflection(form, &form_key, &lemma_key))
    }

    fn segment_from_corpus(&self, form_key: &str, lemma: &str) -> Option<Segmentation> {
        let corpus = self.resources.corpus.as_ref()?;
        let record = corpus.record(form_key)?;
        normalize(record, form_key, lemma, Some(corpus.frequency())).filter(|s| s.len() > 1)
    }

    fn segment_from_lexicon(
        &self,
        form: &str,
        lemma: &str,
        form_key: &str,
        lemma_key: &str,
    ) -> Option<Segmentation> {
        let record = self.resources.lexicon.record(lemma_key)?;
        let seg = normalize(record, form, lemma, None)?;

        let seg = if form_key == lemma_key {
            seg
        } else if let Some(affixes) = self.resources.inflection.affixes(form_key, lemma_key) {
            append_inflection(seg, affixes)?
        } else {
            append_ending(seg, form, lemma)
        };

        Some(seg).filter(|s| s.len() > 1)
    }

    fn segment_from_inflection(
        &self,
        form: &str,
        form_key: &str,
        lemma_key: &str,
    ) -> Option<Segmentation> {
        let record = self.resources.inflection.record(form_key, lemma_key)?;
        normalize(record, form, lemma_key, None).filter(|s| s.len() > 1)
    }

    /// Directive for a treebank word, or `None` to leave it unsplit
    pub fn directive_for(&self, word: &Word) -> Option<MultiwordDirective> {
        let seg = self.segment(&word.form, &word.lemma)?;
        Some(MultiwordDirective::build(
            &seg,
            &word.upos,
            &word.deprel,
            &word.feats.to_string(),
        ))
    }

    /// Split every coverable word of a sentence
    pub fn process_sentence(&self, sentence: &mut Sentence, stats: &mut RetreeStats) -> Result<()> {
        let mut index = 0;
        while index < sentence.words.len() {
            stats.words += 1;
            let word = &sentence.words[index];

            if sentence.multiword_of(word.id).is_some() {
                stats.skipped_multiword += 1;
                index += 1;
                continue;
            }

            match self.directive_for(word) {
                Some(directive) => {
                    debug!(
                        form = %word.form,
                        source = directive.source.as_str(),
                        morphs = %directive.form_line(),
                        "splitting word"
                    );
                    let pieces = directive.len();
                    stats.record(directive.source);
                    sentence.split_word(index, &directive)?;
                    index += pieces;
                }
                None => index += 1,
            }
        }
        Ok(())
    }

    /// Split a whole document, then null features the morphs express
    pub fn process_document(&self, doc: &mut Document) -> Result<RetreeStats> {
        let mut stats = RetreeStats::default();

        for sentence in &mut doc.sentences {
            sanitize_misc(sentence);
            self.process_sentence(sentence, &mut stats)?;
        }

        if let Some(alignments) = &self.resources.alignments {
            stats.feats_nulled = alignments.null_document(doc);
        }

        info!(
            words = stats.words,
            split = stats.split(),
            corpus = stats.split_corpus,
            lexicon = stats.split_lexicon,
            inflection = stats.split_inflection,
            feats_nulled = stats.feats_nulled,
            "retreeing finished"
        );
        Ok(stats)
    }

    /// Directives the document would receive, without modifying it
    pub fn plan_document(&self, doc: &Document) -> Vec<PlannedSplit> {
        let mut planned = Vec::new();
        for (s, sentence) in doc.sentences.iter().enumerate() {
            for word in &sentence.words {
                if sentence.multiword_of(word.id).is_some() {
                    continue;
                }
                if let Some(directive) = self.directive_for(word) {
                    planned.push(PlannedSplit {
                        sentence: s + 1,
                        word_id: word.id,
                        form: word.form.clone(),
                        directive,
                    });
                }
            }
        }
        planned
    }
}

/// Replace spaces in MISC values that downstream tools read as single tokens
pub fn sanitize_misc(sentence: &mut Sentence) {
    for word in &mut sentence.words {
        for key in SPACELESS_MISC {
            let fixed = match word.misc.get(key) {
                Some(value) if value.contains(' ') => value.replace(' ', "-"),
                _ => continue,
            };
            word.misc.set(key, &fixed);
        }
    }
}
