//! Root selection.
//!
//! A lexicon names its root explicitly; a corpus does not. For corpus
//! words the root is taken to be the rarest morph: inflectional and
//! derivational affixes recur across many words, roots do not.

use std::collections::HashSet;

use tracing::warn;

use crate::corpus::FrequencyTable;
use crate::source::{Segment, SegmentType};

/// Index of the least frequent candidate, leftmost on ties.
///
/// Candidates missing from the table count as frequency 0. Returns `None`
/// for an empty candidate list.
pub fn select_by_frequency(candidates: &[String], frequency: &FrequencyTable) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, morph) in candidates.iter().enumerate() {
        let freq = frequency.get(morph);
        match best {
            Some((_, min)) if freq >= min => {}
            _ => best = Some((i, freq)),
        }
    }
    best.map(|(i, _)| i)
}

/// Segments of a span-tagged record that can be trusted, in order.
///
/// A segment is dropped when its span is empty, mis-ordered or out of the
/// lemma, or when an earlier segment already covered the identical span.
pub fn usable_segments<'a>(segments: &'a [Segment], lemma: &str) -> Vec<(&'a Segment, String)> {
    let mut seen: HashSet<&[usize]> = HashSet::new();
    let mut usable = Vec::with_capacity(segments.len());

    for seg in segments {
        if seg.span.is_empty() {
            continue;
        }
        if !seen.insert(seg.span.as_slice()) {
            warn!(lemma, span = ?seg.span, "skipping duplicate segment span");
            continue;
        }
        match seg.slice(lemma) {
            Some(piece) => usable.push((seg, piece)),
            None => warn!(lemma, span = ?seg.span, "skipping segment with unusable span"),
        }
    }

    usable
}

/// Position of the first explicit root among usable segments
pub fn select_tagged(usable: &[(&Segment, String)]) -> Option<usize> {
    usable
        .iter()
        .position(|(seg, _)| seg.kind == SegmentType::Root)
}
