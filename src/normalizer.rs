//! Segmentation normalization.
//!
//! Every resource record is turned into the same [`Segmentation`] shape:
//! ordered prefixes, roots and suffixes with a designated root. There is
//! one normalizer per record variant; [`normalize`] picks the right one.
//! Two refinements apply to lexicon segmentations of inflected words,
//! whose lexicon entry only covers the lemma:
//!
//! - [`append_inflection`] adds the inflection lexicon's endings;
//! - [`append_ending`] guesses the ending from where form and lemma diverge.

use tracing::{debug, warn};

use crate::corpus::FrequencyTable;
use crate::morph::{Morph, Role, Segmentation, SourceKind, SuffixKind};
use crate::root::{select_by_frequency, select_tagged, usable_segments};
use crate::source::{Segment, SegmentType, SourceRecord};
use crate::text::{first_mismatch, lookup_key, strip_suffix_ignore_case, tail_from};

/// Normalize one record of a word.
///
/// Corpus records need the frequency table to pick their root and yield
/// nothing without it.
pub fn normalize(
    record: SourceRecord<'_>,
    form: &str,
    lemma: &str,
    frequency: Option<&FrequencyTable>,
) -> Option<Segmentation> {
    match record {
        SourceRecord::FrequencyCorpus(morphs) => from_corpus(morphs, frequency?),
        SourceRecord::SpanTagged(segments) => from_lexicon(segments, lemma),
        SourceRecord::InflectionAffixes(affixes) => from_inflection(affixes, form),
    }
}

/// Split corpus morphs around the least frequent one.
pub fn from_corpus(morphs: &[String], frequency: &FrequencyTable) -> Option<Segmentation> {
    let root = select_by_frequency(morphs, frequency)?;

    let prefixes = morphs[..root]
        .iter()
        .map(|m| Morph::new(m.as_str(), Role::Prefix))
        .collect();
    let roots = vec![Morph::new(morphs[root].as_str(), Role::Root)];
    let suffixes = morphs[root + 1..]
        .iter()
        .map(|m| Morph::new(m.as_str(), Role::Suffix(SuffixKind::Derivational)))
        .collect();

    Segmentation::new(prefixes, roots, suffixes, SourceKind::Corpus)
}

/// Resolve lexicon spans against the lemma and group morphs by type.
///
/// Returns `None` when no root survives span validation.
pub fn from_lexicon(segments: &[Segment], lemma: &str) -> Option<Segmentation> {
    let usable = usable_segments(segments, lemma);
    if select_tagged(&usable).is_none() {
        warn!(lemma, "lexicon segmentation has no usable root");
        return None;
    }

    let mut prefixes = Vec::new();
    let mut roots = Vec::new();
    let mut suffixes = Vec::new();

    for (seg, piece) in usable {
        let morph_lemma = seg.morpheme.clone().unwrap_or_else(|| piece.clone());
        match seg.kind {
            SegmentType::Prefix => prefixes.push(Morph::with_lemma(piece, morph_lemma, Role::Prefix)),
            SegmentType::Root => roots.push(Morph::with_lemma(piece, morph_lemma, Role::Root)),
            SegmentType::Suffix => suffixes.push(Morph::with_lemma(
                piece,
                morph_lemma,
                Role::Suffix(SuffixKind::Derivational),
            )),
            SegmentType::Other => {}
        }
    }

    Segmentation::new(prefixes, roots, suffixes, SourceKind::Lexicon)
}

/// Append the inflection lexicon's endings (everything after the stem).
///
/// A placeholder segmentation is not worth extending and yields `None`,
/// leaving the word to the inflection lexicon alone.
pub fn append_inflection(mut seg: Segmentation, affixes: &[String]) -> Option<Segmentation> {
    if seg.is_placeholder() {
        return None;
    }
    seg.suffixes.extend(
        affixes
            .iter()
            .skip(1)
            .filter(|a| !a.is_empty())
            .map(|a| Morph::new(a.as_str(), Role::Suffix(SuffixKind::Inflectional))),
    );
    Some(seg)
}

/// Derive an ending from the point where form and lemma diverge.
///
/// The form's tail after the first mismatch becomes a final suffix, and the
/// lemma's tail is cut off the last root so the root only keeps what the
/// form shares with the lemma. Nothing is cut when that would empty the
/// root. Pairs that differ from the first character on (suppletive forms
/// such as `went`/`go`) are left untouched; this is a best-effort guess.
pub fn append_ending(mut seg: Segmentation, form: &str, lemma: &str) -> Segmentation {
    let form = lookup_key(form);
    let lemma = lookup_key(lemma);

    let split_at = match first_mismatch(&form, &lemma) {
        Some(i) if i > 0 => i,
        _ => {
            debug!(%form, %lemma, "form and lemma share no initial, no ending derived");
            return seg;
        }
    };

    let ending = tail_from(&form, split_at);
    let lemma_tail = tail_from(&lemma, split_at);

    if let Some(root) = seg.roots.last_mut() {
        if let Some(kept) = strip_suffix_ignore_case(&root.text, &lemma_tail) {
            if !kept.is_empty() {
                root.text = kept;
            }
        }
    }

    if !ending.is_empty() {
        seg.suffixes
            .push(Morph::new(ending, Role::Suffix(SuffixKind::Inflectional)));
    }
    seg
}

/// Stem plus endings from the inflection lexicon alone.
///
/// The root is the raw form with the joined endings removed from its end,
/// so it keeps the form's casing; when the form does not end with them,
/// the lexicon stem is used instead.
pub fn from_inflection(affixes: &[String], form: &str) -> Option<Segmentation> {
    let (stem, endings) = affixes.split_first()?;
    let endings: Vec<&String> = endings.iter().filter(|e| !e.is_empty()).collect();
    if endings.is_empty() {
        return None;
    }

    let joined: String = endings.iter().map(|e| e.as_str()).collect();
    let root = strip_suffix_ignore_case(form, &joined)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| stem.clone());

    let suffixes = endings
        .into_iter()
        .map(|e| Morph::new(e.as_str(), Role::Suffix(SuffixKind::Inflectional)))
        .collect();

    Segmentation::new(
        Vec::new(),
        vec![Morph::new(root, Role::Root)],
        suffixes,
        SourceKind::Inflection,
    )
}
