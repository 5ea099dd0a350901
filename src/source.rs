//! Segmentation source records.
//!
//! The three resources describe a word's morphs in incompatible shapes.
//! [`SourceRecord`] wraps a borrowed record of any of them so the
//! orchestrator can hand it to the matching normalizer.

use serde::Deserialize;

/// Type tag of a span-tagged segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Prefix,
    Root,
    Suffix,
    /// Interfixes, unsegmentable markers and anything else
    #[default]
    #[serde(other)]
    Other,
}

/// One segment of a lexicon entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Segment {
    /// Character indices into the lemma covered by this segment
    #[serde(default)]
    pub span: Vec<usize>,
    #[serde(rename = "type", default)]
    pub kind: SegmentType,
    /// Lemma override for the morph
    #[serde(default)]
    pub morpheme: Option<String>,
}

impl Segment {
    pub fn new(span: Vec<usize>, kind: SegmentType) -> Self {
        Segment {
            span,
            kind,
            morpheme: None,
        }
    }

    pub fn with_morpheme(mut self, morpheme: &str) -> Self {
        self.morpheme = Some(morpheme.to_string());
        self
    }

    /// Half-open character range covered by the span.
    ///
    /// The span lists included indices, so the end is the last index plus
    /// one. Returns `None` for an empty or mis-ordered span.
    pub fn char_range(&self) -> Option<(usize, usize)> {
        let start = *self.span.first()?;
        let end = *self.span.last()? + 1;
        if start >= end {
            return None;
        }
        Some((start, end))
    }

    /// Slice `text` by this segment's span, counting characters.
    ///
    /// Returns `None` when the span is empty or falls outside `text`.
    pub fn slice(&self, text: &str) -> Option<String> {
        let (start, end) = self.char_range()?;
        let piece: String = text.chars().skip(start).take(end - start).collect();
        if piece.chars().count() != end - start {
            return None;
        }
        Some(piece)
    }
}

/// A borrowed segmentation record from one of the resources
#[derive(Debug, Clone, Copy)]
pub enum SourceRecord<'a> {
    /// Lexicon segments with spans into the lemma and role tags
    SpanTagged(&'a [Segment]),
    /// Inflection lexicon affixes: stem first, then endings
    InflectionAffixes(&'a [String]),
    /// Corpus morphs in surface order, without role tags
    FrequencyCorpus(&'a [String]),
}

impl SourceRecord<'_> {
    /// Number of pieces in the record
    pub fn len(&self) -> usize {
        match self {
            SourceRecord::SpanTagged(segments) => segments.len(),
            SourceRecord::InflectionAffixes(affixes) => affixes.len(),
            SourceRecord::FrequencyCorpus(morphs) => morphs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
