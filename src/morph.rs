//! Morph representation.
//!
//! A [`Morph`] is one piece of a segmented word: its surface text, the lemma
//! it is filed under, and the role it plays relative to the root. A
//! [`Segmentation`] orders morphs as prefixes, roots, suffixes and remembers
//! which root inherits the original word's place in the tree.

use serde::{Deserialize, Serialize};

/// What kind of suffix a morph is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuffixKind {
    /// Derivational suffix from a segmentation lexicon or corpus
    Derivational,
    /// Inflectional ending (inflection lexicon or the ending heuristic)
    Inflectional,
}

/// The role of a morph relative to the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Prefix,
    Root,
    Suffix(SuffixKind),
}

impl Role {
    /// Convert to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Prefix => "prefix",
            Role::Root => "root",
            Role::Suffix(SuffixKind::Derivational) => "suffix",
            Role::Suffix(SuffixKind::Inflectional) => "ending",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Role::Root)
    }
}

/// A single morph of a segmented word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morph {
    /// Surface text of the morph
    pub text: String,
    /// Lemma of the morph (lexicon override or the text itself)
    pub lemma: String,
    /// Role relative to the root
    pub role: Role,
}

impl Morph {
    /// Create a morph whose lemma is its own text
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        let text = text.into();
        Morph {
            lemma: text.clone(),
            text,
            role,
        }
    }

    /// Create a morph with an explicit lemma
    pub fn with_lemma(text: impl Into<String>, lemma: impl Into<String>, role: Role) -> Self {
        Morph {
            text: text.into(),
            lemma: lemma.into(),
            role,
        }
    }
}

impl std::fmt::Display for Morph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)?;
        if self.lemma != self.text {
            write!(f, "({})", self.lemma)?;
        }
        write!(f, "/{}", self.role.as_str())
    }
}

/// Which resource a segmentation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Supervised segmentation corpus with derived morph frequencies
    Corpus,
    /// Span-tagged derivational lexicon
    Lexicon,
    /// Inflection lexicon alone
    Inflection,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Corpus => "corpus",
            SourceKind::Lexicon => "lexicon",
            SourceKind::Inflection => "inflection",
        }
    }
}

/// A word split into ordered morphs.
///
/// Morphs are kept in three groups so that the flattened order is always
/// prefixes, then roots, then suffixes. `main` indexes the flattened
/// sequence and always lands on a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub prefixes: Vec<Morph>,
    pub roots: Vec<Morph>,
    pub suffixes: Vec<Morph>,
    /// Flattened index of the root that inherits the original subtree
    pub main: usize,
    /// Resource the segmentation was built from
    pub source: SourceKind,
}

impl Segmentation {
    /// Build a segmentation whose designated root is the first root.
    ///
    /// Returns `None` when there is no root to designate.
    pub fn new(
        prefixes: Vec<Morph>,
        roots: Vec<Morph>,
        suffixes: Vec<Morph>,
        source: SourceKind,
    ) -> Option<Self> {
        if roots.is_empty() {
            return None;
        }
        let main = prefixes.len();
        Some(Segmentation {
            prefixes,
            roots,
            suffixes,
            main,
            source,
        })
    }

    /// Total number of morphs
    pub fn len(&self) -> usize {
        self.prefixes.len() + self.roots.len() + self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all morphs in flattened order
    pub fn iter(&self) -> impl Iterator<Item = &Morph> {
        self.prefixes
            .iter()
            .chain(self.roots.iter())
            .chain(self.suffixes.iter())
    }

    /// The designated root
    pub fn main_root(&self) -> &Morph {
        &self.roots[self.main - self.prefixes.len()]
    }

    /// Concatenated surface text of all morphs
    pub fn surface(&self) -> String {
        self.iter().map(|m| m.text.as_str()).collect()
    }

    /// Whether this is a lone placeholder root with no affixes
    pub fn is_placeholder(&self) -> bool {
        self.prefixes.is_empty()
            && self.suffixes.is_empty()
            && self.roots.iter().all(|r| r.text.is_empty() || r.text == "_")
    }
}

impl std::fmt::Display for Segmentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
    }
}
