//! CoNLL-U reading, writing and word splitting.
//!
//! A [`Document`] holds sentences; a [`Sentence`] keeps its words in order
//! together with multiword token ranges, empty nodes and comments. The one
//! structural edit supported is [`Sentence::split_word`], which replaces a
//! word with the nodes described by a [`MultiwordDirective`] and keeps every
//! ID, HEAD and DEPS reference in the sentence consistent.

use std::fmt::Write as _;

use crate::directive::{MultiwordDirective, Shape};
use crate::error::{Result, RetreeError};

/// Placeholder for an empty column
pub const EMPTY: &str = "_";

const COLUMNS: usize = 10;

/// Ordered `key=value` pairs of a FEATS or MISC column.
///
/// Bare MISC flags are stored with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Parse a `|`-separated column, `_` being empty
    pub fn parse(column: &str) -> Self {
        if column == EMPTY || column.is_empty() {
            return Attributes::new();
        }
        Attributes(
            column
                .split('|')
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, replacing an existing one in place
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str(EMPTY);
        }
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char('|')?;
            }
            if v.is_empty() {
                write!(f, "{}", k)?;
            } else {
                write!(f, "{}={}", k, v)?;
            }
        }
        Ok(())
    }
}

/// A syntactic word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    /// 1-based position in the sentence
    pub id: usize,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: Attributes,
    /// Head ID, 0 for the root, `None` when unannotated
    pub head: Option<usize>,
    pub deprel: String,
    /// Enhanced dependencies, verbatim
    pub deps: String,
    pub misc: Attributes,
}

impl Word {
    /// Create a word with every other column empty
    pub fn new(id: usize, form: &str) -> Self {
        Word {
            id,
            form: form.to_string(),
            lemma: EMPTY.to_string(),
            upos: EMPTY.to_string(),
            xpos: EMPTY.to_string(),
            feats: Attributes::new(),
            head: None,
            deprel: EMPTY.to_string(),
            deps: EMPTY.to_string(),
            misc: Attributes::new(),
        }
    }
}

/// A multiword token spanning words `first..=last`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiwordToken {
    pub first: usize,
    pub last: usize,
    pub form: String,
    pub misc: Attributes,
}

impl MultiwordToken {
    pub fn contains(&self, id: usize) -> bool {
        (self.first..=self.last).contains(&id)
    }
}

/// An empty node `anchor.sub` of an enhanced graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNode {
    /// Word ID the node follows (0 before the first word)
    pub anchor: usize,
    pub sub: usize,
    /// Columns 2 to 10, verbatim except for DEPS heads
    pub columns: Vec<String>,
}

/// A sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub comments: Vec<String>,
    pub words: Vec<Word>,
    pub multiwords: Vec<MultiwordToken>,
    pub empty_nodes: Vec<EmptyNode>,
}

/// ID renumbering after one word became several
struct Renumber {
    at: usize,
    main: usize,
    extra: usize,
}

impl Renumber {
    /// New ID of a word
    fn word(&self, id: usize) -> usize {
        if id < self.at {
            id
        } else if id == self.at {
            self.at + self.main
        } else {
            id + self.extra
        }
    }

    /// New anchor of an empty node; nodes after the split word follow all
    /// of its pieces
    fn anchor(&self, id: usize) -> usize {
        if id < self.at {
            id
        } else {
            id + self.extra
        }
    }

    /// Rewrite the heads of a DEPS column (`head:rel|head:rel`)
    fn deps(&self, deps: &str) -> String {
        if deps == EMPTY {
            return deps.to_string();
        }
        deps.split('|')
            .map(|pair| {
                let Some((head, rel)) = pair.split_once(':') else {
                    return pair.to_string();
                };
                let head = match head.split_once('.') {
                    Some((anchor, sub)) => match anchor.parse::<usize>() {
                        Ok(a) => format!("{}.{}", self.anchor(a), sub),
                        Err(_) => head.to_string(),
                    },
                    None => match head.parse::<usize>() {
                        Ok(h) => self.word(h).to_string(),
                        Err(_) => head.to_string(),
                    },
                };
                format!("{}:{}", head, rel)
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Sentence {
    /// Multiword token a word belongs to, if any
    pub fn multiword_of(&self, id: usize) -> Option<&MultiwordToken> {
        self.multiwords.iter().find(|mwt| mwt.contains(id))
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Replace the word at `index` (0-based) with the directive's nodes.
    ///
    /// The node at `directive.main` keeps the word's head, its dependents,
    /// XPOS, DEPS and MISC (except `SpaceAfter`, which moves to the new
    /// multiword token). The other nodes attach to the main node; when the
    /// word has enhanced dependencies they get the same edge in DEPS.
    pub fn split_word(&mut self, index: usize, directive: &MultiwordDirective) -> Result<()> {
        let word_id = index + 1;
        let invalid = |reason: &str| RetreeError::InvalidSplit {
            word_id,
            reason: reason.to_string(),
        };

        if index >= self.words.len() {
            return Err(invalid("no such word"));
        }
        if !directive.is_consistent() {
            return Err(invalid("directive columns disagree"));
        }
        if directive.len() < 2 {
            return Err(invalid("directive has a single node"));
        }
        if self.multiword_of(word_id).is_some() {
            return Err(invalid("word already belongs to a multiword token"));
        }

        let renumber = Renumber {
            at: word_id,
            main: directive.main,
            extra: directive.len() - 1,
        };

        for word in &mut self.words {
            word.head = word.head.map(|h| renumber.word(h));
            word.deps = renumber.deps(&word.deps);
        }
        for mwt in &mut self.multiwords {
            mwt.first = renumber.word(mwt.first);
            mwt.last = renumber.word(mwt.last);
        }
        for node in &mut self.empty_nodes {
            node.anchor = renumber.anchor(node.anchor);
            if let Some(deps) = node.columns.get_mut(7) {
                *deps = renumber.deps(deps);
            }
        }

        let mut original = self.words[index].clone();
        let space_after = original.misc.remove("SpaceAfter");
        let main_id = word_id + directive.main;

        let pieces: Vec<Word> = (0..directive.len())
            .map(|k| {
                let mut piece = if k == directive.main {
                    original.clone()
                } else {
                    let mut w = Word::new(0, EMPTY);
                    w.head = match directive.shape {
                        Shape::Subtree => Some(main_id),
                    };
                    w
                };
                piece.form = directive.forms[k].clone();
                piece.lemma = directive.lemmas[k].clone();
                piece.upos = directive.upos[k].clone();
                piece.feats = Attributes::parse(&directive.feats[k]);
                piece.deprel = directive.deprels[k].clone();
                // enhanced graphs get the basic edge for new nodes
                if k != directive.main && original.deps != EMPTY {
                    piece.deps = format!("{}:{}", main_id, piece.deprel);
                }
                piece
            })
            .collect();

        self.words.splice(index..=index, pieces);
        for (i, word) in self.words.iter_mut().enumerate() {
            word.id = i + 1;
        }

        let mut misc = Attributes::new();
        if let Some(value) = space_after {
            misc.set("SpaceAfter", &value);
        }
        self.multiwords.push(MultiwordToken {
            first: word_id,
            last: word_id + renumber.extra,
            form: original.form,
            misc,
        });
        self.multiwords.sort_by_key(|mwt| mwt.first);

        Ok(())
    }

    fn write_conllu(&self, out: &mut String) {
        for comment in &self.comments {
            out.push_str(comment);
            out.push('\n');
        }

        let write_empty = |out: &mut String, anchor: usize| {
            for node in self.empty_nodes.iter().filter(|n| n.anchor == anchor) {
                let _ = writeln!(out, "{}.{}\t{}", node.anchor, node.sub, node.columns.join("\t"));
            }
        };

        write_empty(out, 0);
        for word in &self.words {
            for mwt in self.multiwords.iter().filter(|m| m.first == word.id) {
                let _ = writeln!(
                    out,
                    "{}-{}\t{}\t_\t_\t_\t_\t_\t_\t_\t{}",
                    mwt.first, mwt.last, mwt.form, mwt.misc
                );
            }
            let head = word
                .head
                .map(|h| h.to_string())
                .unwrap_or_else(|| EMPTY.to_string());
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                word.id,
                word.form,
                word.lemma,
                word.upos,
                word.xpos,
                word.feats,
                head,
                word.deprel,
                word.deps,
                word.misc
            );
            write_empty(out, word.id);
        }
        out.push('\n');
    }
}

/// A CoNLL-U document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Parse a CoNLL-U string
    pub fn parse(content: &str) -> Result<Self> {
        let mut sentences = Vec::new();
        let mut current = Sentence::default();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                if !current.words.is_empty() || !current.comments.is_empty() {
                    sentences.push(std::mem::take(&mut current));
                }
                continue;
            }
            if line.starts_with('#') {
                current.comments.push(line.to_string());
                continue;
            }
            parse_line(&mut current, line, line_no)?;
        }

        if !current.words.is_empty() || !current.comments.is_empty() {
            sentences.push(current);
        }

        Ok(Document { sentences })
    }

    /// Serialize back to CoNLL-U
    pub fn to_conllu_string(&self) -> String {
        let mut out = String::new();
        for sentence in &self.sentences {
            sentence.write_conllu(&mut out);
        }
        out
    }

    /// Total number of words
    pub fn word_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }
}

fn parse_line(sentence: &mut Sentence, line: &str, line_no: usize) -> Result<()> {
    let error = |reason: String| RetreeError::Conllu {
        line: line_no,
        reason,
    };

    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != COLUMNS {
        return Err(error(format!(
            "expected {} columns, found {}",
            COLUMNS,
            cols.len()
        )));
    }
    let id = cols[0];
    let number = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| error(format!("invalid ID '{}'", id)))
    };

    if let Some((first, last)) = id.split_once('-') {
        let (first, last) = (number(first)?, number(last)?);
        if first == 0 || first > last {
            return Err(error(format!("invalid range '{}'", id)));
        }
        sentence.multiwords.push(MultiwordToken {
            first,
            last,
            form: cols[1].to_string(),
            misc: Attributes::parse(cols[9]),
        });
        return Ok(());
    }

    if let Some((anchor, sub)) = id.split_once('.') {
        sentence.empty_nodes.push(EmptyNode {
            anchor: number(anchor)?,
            sub: number(sub)?,
            columns: cols[1..].iter().map(|c| c.to_string()).collect(),
        });
        return Ok(());
    }

    let id = number(id)?;
    if id != sentence.words.len() + 1 {
        return Err(error(format!(
            "word ID {} out of sequence, expected {}",
            id,
            sentence.words.len() + 1
        )));
    }
    let head = match cols[6] {
        EMPTY => None,
        h => Some(
            h.parse::<usize>()
                .map_err(|_| error(format!("invalid HEAD '{}'", h)))?,
        ),
    };

    sentence.words.push(Word {
        id,
        form: cols[1].to_string(),
        lemma: cols[2].to_string(),
        upos: cols[3].to_string(),
        xpos: cols[4].to_string(),
        feats: Attributes::parse(cols[5]),
        head,
        deprel: cols[7].to_string(),
        deps: cols[8].to_string(),
        misc: Attributes::parse(cols[9]),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::SourceKind;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "# sent_id = 1
# text = Unhappiness grows.
1\tUnhappiness\tunhappiness\tNOUN\tNN\tNumber=Sing\t2\tnsubj\t2:nsubj\t_
2\tgrows\tgrow\tVERB\tVBZ\tNumber=Sing|Person=3\t0\troot\t0:root\tSpaceAfter=No
3\t.\t.\tPUNCT\t.\t_\t2\tpunct\t2:punct\t_

";

    fn directive(forms: &[&str], main: usize, deprels: &[&str]) -> MultiwordDirective {
        let n = forms.len();
        MultiwordDirective {
            forms: forms.iter().map(|s| s.to_string()).collect(),
            lemmas: forms.iter().map(|s| s.to_string()).collect(),
            upos: (0..n)
                .map(|i| if i == main { "NOUN" } else { "X" }.to_string())
                .collect(),
            deprels: deprels.iter().map(|s| s.to_string()).collect(),
            feats: vec!["Number=Sing".to_string(); n],
            main,
            shape: Shape::Subtree,
            source: SourceKind::Lexicon,
        }
    }

    #[test]
    fn test_round_trip() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.sentences.len(), 1);
        assert_eq!(doc.word_count(), 3);
        assert_eq!(doc.to_conllu_string(), SAMPLE.trim_end().to_string() + "\n\n");
    }

    #[test]
    fn test_attributes() {
        let mut feats = Attributes::parse("Number=Sing|Person=3");
        assert_eq!(feats.get("Person"), Some("3"));
        feats.remove("Person");
        assert_eq!(feats.to_string(), "Number=Sing");
        feats.remove("Number");
        assert_eq!(feats.to_string(), "_");
        assert!(Attributes::parse("_").is_empty());
    }

    #[test]
    fn test_split_renumbers_heads() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let sentence = &mut doc.sentences[0];
        let d = directive(
            &["un", "happi", "ness"],
            1,
            &["nmod:morph", "nsubj", "case:morph"],
        );
        sentence.split_word(0, &d).unwrap();

        let words = &sentence.words;
        assert_eq!(words.len(), 5);
        assert_eq!(words.iter().map(|w| w.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        // morphs hang off the main node
        assert_eq!(words[0].head, Some(2));
        assert_eq!(words[2].head, Some(2));
        assert_eq!(words[0].deps, "2:nmod:morph");
        assert_eq!(words[2].deps, "2:case:morph");
        // main node keeps the original head, shifted
        assert_eq!(words[1].head, Some(4));
        assert_eq!(words[1].xpos, "NN");
        assert_eq!(words[1].deps, "4:nsubj");
        // later words shift
        assert_eq!(words[3].form, "grows");
        assert_eq!(words[4].head, Some(4));
        assert_eq!(words[4].deps, "4:punct");

        assert_eq!(sentence.multiwords.len(), 1);
        assert_eq!(sentence.multiwords[0].first, 1);
        assert_eq!(sentence.multiwords[0].last, 3);
        assert_eq!(sentence.multiwords[0].form, "Unhappiness");
    }

    #[test]
    fn test_split_moves_dependents_and_space_after() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let sentence = &mut doc.sentences[0];
        let d = directive(&["grow", "s"], 0, &["root", "aux:morph"]);
        sentence.split_word(1, &d).unwrap();

        let out = doc.to_conllu_string();
        assert!(out.contains("2-3\tgrows\t_\t_\t_\t_\t_\t_\t_\tSpaceAfter=No\n"));
        assert!(out.contains("2\tgrow\tgrow\tNOUN\tVBZ\tNumber=Sing\t0\troot\t0:root\t_\n"));
        assert!(out.contains("3\ts\ts\tX\t_\tNumber=Sing\t2\taux:morph\t2:aux:morph\t_\n"));
        // the subject and the period still point at the main node
        let sentence = &doc.sentences[0];
        assert_eq!(sentence.words[0].head, Some(2));
        assert_eq!(sentence.words[3].head, Some(2));
    }

    #[test]
    fn test_split_without_enhanced_graph_keeps_deps_empty() {
        let text = "1\tgrows\tgrow\tVERB\t_\t_\t0\troot\t_\t_\n";
        let mut doc = Document::parse(text).unwrap();
        let d = directive(&["grow", "s"], 0, &["root", "aux:morph"]);
        doc.sentences[0].split_word(0, &d).unwrap();

        let words = &doc.sentences[0].words;
        assert_eq!(words[0].deps, "_");
        assert_eq!(words[1].deps, "_");
    }

    #[test]
    fn test_split_rejects_existing_multiword() {
        let text = "1-2\tzum\t_\t_\t_\t_\t_\t_\t_\t_\n\
1\tzu\tzu\tADP\t_\t_\t2\tcase\t_\t_\n\
2\tdem\tder\tDET\t_\t_\t0\troot\t_\t_\n";
        let mut doc = Document::parse(text).unwrap();
        let d = directive(&["z", "u"], 0, &["case", "dep:morph"]);
        let err = doc.sentences[0].split_word(0, &d).unwrap_err();
        assert!(matches!(err, RetreeError::InvalidSplit { word_id: 1, .. }));
    }

    #[test]
    fn test_split_shifts_empty_nodes_and_ranges() {
        let text = "1\tmorning\tmorning\tNOUN\t_\t_\t0\troot\t0:root\t_\n\
1.1\tgo\tgo\tVERB\t_\t_\t_\t_\t1:dep\t_\n\
2-3\tzum\t_\t_\t_\t_\t_\t_\t_\t_\n\
2\tzu\tzu\tADP\t_\t_\t3\tcase\t3:case|1.1:dep\t_\n\
3\tdem\tder\tDET\t_\t_\t1\tnmod\t1:nmod\t_\n";
        let mut doc = Document::parse(text).unwrap();
        let d = directive(&["morn", "ing"], 0, &["root", "case:morph"]);
        doc.sentences[0].split_word(0, &d).unwrap();

        let sentence = &doc.sentences[0];
        assert_eq!(sentence.empty_nodes[0].anchor, 2);
        assert_eq!(sentence.empty_nodes[0].columns[7], "1:dep");
        assert_eq!(sentence.words[2].deps, "4:case|2.1:dep");
        assert_eq!(sentence.words[3].head, Some(1));
        let ranges: Vec<(usize, usize)> = sentence
            .multiwords
            .iter()
            .map(|m| (m.first, m.last))
            .collect();
        assert_eq!(ranges, vec![(1, 2), (3, 4)]);
        let out = doc.to_conllu_string();
        assert!(out.contains("2\ting\t"));
        assert!(out.contains("\n2.1\tgo\t"));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            Document::parse("1\tonly\tthree\n"),
            Err(RetreeError::Conllu { line: 1, .. })
        ));
        assert!(matches!(
            Document::parse("2\ta\ta\tX\t_\t_\t0\troot\t_\t_\n"),
            Err(RetreeError::Conllu { line: 1, .. })
        ));
        assert!(matches!(
            Document::parse("1\ta\ta\tX\t_\t_\tx\troot\t_\t_\n"),
            Err(RetreeError::Conllu { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_ranges() {
        for range in ["0-1", "2-1"] {
            let text = format!(
                "{}\tab\t_\t_\t_\t_\t_\t_\t_\t_\n1\ta\ta\tX\t_\t_\t0\troot\t_\t_\n",
                range
            );
            assert!(
                matches!(Document::parse(&text), Err(RetreeError::Conllu { line: 1, .. })),
                "{}",
                range
            );
        }
        // a single-word range is still accepted
        assert!(Document::parse("1-1\tab\t_\t_\t_\t_\t_\t_\t_\t_\n1\tab\tab\tX\t_\t_\t0\troot\t_\t_\n").is_ok());
    }
}
