//! Multiword directives.
//!
//! A [`MultiwordDirective`] tells the treebank how to replace one word with
//! its morph nodes: per-node forms, lemmas, tags, relations and features,
//! plus which node takes over the original word's attachment.

use serde::Serialize;

use crate::deprel;
use crate::morph::{Segmentation, SourceKind};

/// Tag given to every morph that is not a root
pub const MORPH_UPOS: &str = "X";

/// How split nodes attach to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Shape {
    /// Every morph hangs off the main node, which keeps the original
    /// word's head and dependents
    #[default]
    Subtree,
}

/// Splitting instructions for one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiwordDirective {
    pub forms: Vec<String>,
    pub lemmas: Vec<String>,
    pub upos: Vec<String>,
    pub deprels: Vec<String>,
    /// Original FEATS, repeated for every node
    pub feats: Vec<String>,
    /// Index of the node inheriting the original subtree
    pub main: usize,
    pub shape: Shape,
    /// Resource the split came from
    pub source: SourceKind,
}

impl MultiwordDirective {
    /// Build the directive for a word with the given UPOS, DEPREL and FEATS.
    pub fn build(seg: &Segmentation, upos: &str, word_deprel: &str, feats: &str) -> Self {
        let n = seg.len();
        let mut forms = Vec::with_capacity(n);
        let mut lemmas = Vec::with_capacity(n);
        let mut tags = Vec::with_capacity(n);
        let mut deprels = Vec::with_capacity(n);

        let mut root_rank = 0;
        for morph in seg.iter() {
            forms.push(morph.text.clone());
            lemmas.push(morph.lemma.clone());
            deprels.push(deprel::assign(morph.role, upos, word_deprel, root_rank).to_string());
            if morph.role.is_root() {
                tags.push(upos.to_string());
                root_rank += 1;
            } else {
                tags.push(MORPH_UPOS.to_string());
            }
        }

        MultiwordDirective {
            forms,
            lemmas,
            upos: tags,
            deprels,
            feats: vec![feats.to_string(); n],
            main: seg.main,
            shape: Shape::Subtree,
            source: seg.source,
        }
    }

    /// Number of nodes the word is split into
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Whether all per-node columns agree in length and `main` is in range
    pub fn is_consistent(&self) -> bool {
        let n = self.len();
        n > 0
            && self.lemmas.len() == n
            && self.upos.len() == n
            && self.deprels.len() == n
            && self.feats.len() == n
            && self.main < n
    }

    /// Space-joined forms
    pub fn form_line(&self) -> String {
        self.forms.join(" ")
    }

    /// Space-joined lemmas
    pub fn lemma_line(&self) -> String {
        self.lemmas.join(" ")
    }

    /// Space-joined tags
    pub fn upos_line(&self) -> String {
        self.upos.join(" ")
    }

    /// Space-joined relations
    pub fn deprel_line(&self) -> String {
        self.deprels.join(" ")
    }
}

impl std::fmt::Display for MultiwordDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\tmain={}",
            self.form_line(),
            self.lemma_line(),
            self.upos_line(),
            self.deprel_line(),
            self.main
        )
    }
}
