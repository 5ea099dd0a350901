//! Run configuration and output naming.
//!
//! Treebanks are expected in the Universal Dependencies layout,
//! `UD_<Language>-<Name>/<code>-ud-<split>.conllu`; lexicons are named
//! `UniSegments-<version>-<lang>-<Resource>.useg`. The output file name is
//! derived from these pieces.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Name used for treebank and split outside the UD layout
pub const OTHER: &str = "other";

/// Language whose inflection data marks vowel length
const FOLDED_LANGUAGE: &str = "Latin";

/// Treebank directory component: `UD_Czech-PUD`
static TREEBANK_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^UD_([^-]+(?:-.+)?)$").expect("Invalid regex"));

/// Treebank file name: `cs_pud-ud-test.conllu`
static TREEBANK_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^-]+-ud-([A-Za-z]+)\.conllu$").expect("Invalid regex"));

/// Resources and output settings of one run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Span-tagged segmentation lexicon
    pub lexicon: PathBuf,
    /// Inflection lexicon
    pub inflection: PathBuf,
    /// Optional supervised segmentation corpus
    pub corpus: Option<PathBuf>,
    /// Optional morph-to-feature alignment table
    pub alignments: Option<PathBuf>,
    /// Input treebank
    pub treebank: PathBuf,
    /// Output root directory
    pub output_dir: PathBuf,
    /// Strip diacritics from inflection data regardless of language
    pub fold_diacritics: bool,
}

impl RunConfig {
    /// Treebank identifier, e.g. `Czech-PUD`
    pub fn treebank_id(&self) -> Option<String> {
        self.treebank
            .parent()?
            .file_name()?
            .to_str()
            .and_then(|dir| TREEBANK_DIR.captures(dir))
            .map(|caps| caps[1].to_string())
    }

    /// Treebank language, e.g. `Czech`
    pub fn language(&self) -> Option<String> {
        self.treebank_id()
            .map(|id| id.split('-').next().unwrap_or_default().to_string())
    }

    /// Corpus split, e.g. `test`
    pub fn split(&self) -> Option<String> {
        self.treebank
            .file_name()?
            .to_str()
            .and_then(|name| TREEBANK_FILE.captures(name))
            .map(|caps| caps[1].to_string())
    }

    /// Segmentation resource identifier, e.g. `DeriNet`
    pub fn segmentation_id(&self) -> String {
        segmentation_id(&self.lexicon)
    }

    /// Whether inflection data should be folded to plain letters
    pub fn should_fold(&self) -> bool {
        self.fold_diacritics || self.language().as_deref() == Some(FOLDED_LANGUAGE)
    }

    /// `<output>/<split>/<treebank>-<split>-<segm>.conllu`
    pub fn output_path(&self) -> PathBuf {
        let split = self.split().unwrap_or_else(|| OTHER.to_string());
        let treebank = self.treebank_id().unwrap_or_else(|| OTHER.to_string());
        self.output_dir.join(&split).join(format!(
            "{}-{}-{}.conllu",
            treebank,
            split,
            self.segmentation_id()
        ))
    }
}

/// Last `-`-separated part of a lexicon file stem
pub fn segmentation_id(lexicon: &Path) -> String {
    lexicon
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.rsplit('-').next())
        .unwrap_or(OTHER)
        .to_string()
}
