//! Dependency relations for morph nodes.
//!
//! Affixes hang off the root as satellites carrying grammatical function;
//! only the designated root keeps the relation the whole word had.

use crate::morph::Role;

pub const NMOD_MORPH: &str = "nmod:morph";
pub const ADVMOD_MORPH: &str = "advmod:morph";
pub const CASE_MORPH: &str = "case:morph";
pub const AUX_MORPH: &str = "aux:morph";
pub const DEP_MORPH: &str = "dep:morph";
pub const CONJ_MORPH: &str = "conj:morph";

/// UPOS classes that take nominal prefixes
const NOMINAL_PREFIX_HOSTS: &[&str] = &["NOUN", "PROPN"];

/// UPOS classes whose suffixes are case-like
const CASE_SUFFIX_HOSTS: &[&str] = &[
    "NOUN", "ADJ", "DET", "NUM", "PRON", "PROPN", "ADP", "ADV",
];

/// UPOS classes whose suffixes are auxiliary-like
const VERBAL_HOSTS: &[&str] = &["VERB", "AUX"];

/// Relation of a prefix on a word with the given UPOS
pub fn prefix_relation(upos: &str) -> &'static str {
    if NOMINAL_PREFIX_HOSTS.contains(&upos) {
        NMOD_MORPH
    } else {
        ADVMOD_MORPH
    }
}

/// Relation of a suffix or ending on a word with the given UPOS
pub fn suffix_relation(upos: &str) -> &'static str {
    if VERBAL_HOSTS.contains(&upos) {
        AUX_MORPH
    } else if CASE_SUFFIX_HOSTS.contains(&upos) {
        CASE_MORPH
    } else {
        DEP_MORPH
    }
}

/// Relation of a morph.
///
/// `root_rank` is the morph's position among the roots of its word; the
/// first root inherits `word_deprel`, later compound roots are conjuncts.
pub fn assign<'a>(role: Role, upos: &str, word_deprel: &'a str, root_rank: usize) -> &'a str {
    match role {
        Role::Prefix => prefix_relation(upos),
        Role::Suffix(_) => suffix_relation(upos),
        Role::Root if root_rank == 0 => word_deprel,
        Role::Root => CONJ_MORPH,
    }
}
