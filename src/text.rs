//! Text normalization helpers shared by the loaders and the normalizer.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// NFC-normalize and lowercase a lookup key.
pub fn lookup_key(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Strip diacritics by decomposing and dropping combining marks.
///
/// Used for Latin inflection data, where vowel length is marked with
/// macrons that treebank forms do not carry (`amō` -> `amo`).
pub fn fold_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Remove `suffix` from the end of `text`, ignoring case.
///
/// Characters are compared by their lowercase mappings from the end, so
/// the cut falls on a char boundary of `text` even where lowercasing
/// changes the length (`İ` -> `i̇`). The kept part retains the casing of
/// `text`. Returns `None` when `text` does not end with `suffix`.
pub fn strip_suffix_ignore_case(text: &str, suffix: &str) -> Option<String> {
    let mut wanted: Vec<char> = suffix.chars().flat_map(char::to_lowercase).collect();
    if wanted.is_empty() {
        return Some(text.to_string());
    }

    for (at, c) in text.char_indices().rev() {
        let lowered: Vec<char> = c.to_lowercase().collect();
        if !wanted.ends_with(&lowered) {
            return None;
        }
        wanted.truncate(wanted.len() - lowered.len());
        if wanted.is_empty() {
            return Some(text[..at].to_string());
        }
    }
    None
}

/// Char index of the first position where `a` and `b` differ.
///
/// Running off the end of the shorter string counts as a difference.
/// Returns `None` when the strings are identical.
pub fn first_mismatch(a: &str, b: &str) -> Option<usize> {
    let mut left = a.chars();
    let mut right = b.chars();
    let mut i = 0;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (l, r) if l != r => return Some(i),
            _ => i += 1,
        }
    }
}

/// Characters of `text` from char index `start` on
pub fn tail_from(text: &str, start: usize) -> String {
    text.chars().skip(start).collect()
}
